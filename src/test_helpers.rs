//! Shared fakes for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::NaiveDate;

use crate::net::api::TokenApi;
use crate::net::error::ApiError;
use crate::net::types::{LeaveApplication, LeaveStatus, LeaveType, RefreshResponse, SignInResponse, User};
use crate::routes::{Navigator, Route};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub(crate) fn user(id: i64, name: &str) -> User {
    User {
        id,
        name: name.to_owned(),
        username: name.to_lowercase(),
        email: format!("{}@example.com", name.to_lowercase()),
    }
}

pub(crate) fn sign_in_response() -> SignInResponse {
    SignInResponse { access: "acc-0".to_owned(), refresh: "ref-0".to_owned(), user: user(1, "Ada") }
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub(crate) fn application(id: i64, status: LeaveStatus, start: NaiveDate, end: NaiveDate) -> LeaveApplication {
    LeaveApplication {
        id,
        user: Some(user(1, "Ada")),
        leave_type: LeaveType::Annual,
        start_date: start,
        end_date: end,
        reason: "Family visit abroad".to_owned(),
        status,
        manager: 2,
    }
}

// =============================================================
// MockTokenApi
// =============================================================

pub(crate) struct MockTokenApi {
    verify_ok: AtomicBool,
    refresh_ok: AtomicBool,
    verify_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    seen_refresh_tokens: Mutex<Vec<String>>,
    refresh_delay: Duration,
}

impl MockTokenApi {
    pub(crate) fn new(verify_ok: bool, refresh_ok: bool) -> Self {
        Self {
            verify_ok: AtomicBool::new(verify_ok),
            refresh_ok: AtomicBool::new(refresh_ok),
            verify_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            seen_refresh_tokens: Mutex::new(Vec::new()),
            refresh_delay: Duration::ZERO,
        }
    }

    /// Make every refresh wait `delay` before answering.
    pub(crate) fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    pub(crate) fn set_refresh_ok(&self, ok: bool) {
        self.refresh_ok.store(ok, Ordering::SeqCst);
    }

    pub(crate) fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn seen_refresh_tokens(&self) -> Vec<String> {
        lock(&self.seen_refresh_tokens).clone()
    }
}

fn unauthorized() -> ApiError {
    ApiError::Status { status: 401, body: serde_json::json!({"detail": "Token is invalid or expired"}) }
}

#[async_trait::async_trait]
impl TokenApi for MockTokenApi {
    async fn verify_token(&self, _token: &str) -> Result<(), ApiError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if self.verify_ok.load(Ordering::SeqCst) { Ok(()) } else { Err(unauthorized()) }
    }

    async fn refresh_token(&self, refresh: &str) -> Result<RefreshResponse, ApiError> {
        let n = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.seen_refresh_tokens).push(refresh.to_owned());
        if !self.refresh_delay.is_zero() {
            tokio::time::sleep(self.refresh_delay).await;
        }
        if self.refresh_ok.load(Ordering::SeqCst) {
            Ok(RefreshResponse { access: format!("acc-{n}"), refresh: None, user: None })
        } else {
            Err(unauthorized())
        }
    }
}

// =============================================================
// RecordingNavigator
// =============================================================

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub(crate) fn routes(&self) -> Vec<Route> {
        lock(&self.routes).clone()
    }

    pub(crate) fn last(&self) -> Option<Route> {
        lock(&self.routes).last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        lock(&self.routes).push(route);
    }
}
