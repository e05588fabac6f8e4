//! Sign-in page.

#[cfg(test)]
#[path = "signin_test.rs"]
mod signin_test;

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use super::{SubmitOutcome, failure_message};
use crate::components::busy::BusyFlag;
use crate::components::toast::ToastQueue;
use crate::net::api::ApiClient;
use crate::net::types::SignInRequest;
use crate::routes::{Navigator, Route};
use crate::state::session::SessionContext;
use crate::validation::FieldErrors;

pub const FIELD_USERNAME: &str = "username";
pub const FIELD_PASSWORD: &str = "password";

const GENERIC_FAILURE: &str = "Sign in failed";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignInForm {
    pub username: String,
    pub password: String,
}

impl SignInForm {
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.username.trim().is_empty() {
            errors.insert(FIELD_USERNAME, "Username is required");
        }
        if self.password.is_empty() {
            errors.insert(FIELD_PASSWORD, "Password is required");
        }
        errors
    }
}

pub struct SignInPage {
    api: ApiClient,
    ctx: SessionContext,
    navigator: Arc<dyn Navigator>,
    pub form: SignInForm,
    errors: FieldErrors,
    error: Option<String>,
    toasts: ToastQueue,
    busy: BusyFlag,
}

impl SignInPage {
    pub fn new(api: ApiClient, ctx: SessionContext, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            ctx,
            navigator,
            form: SignInForm::default(),
            errors: FieldErrors::new(),
            error: None,
            toasts: ToastQueue::default(),
            busy: BusyFlag::default(),
        }
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Banner message from the last failed attempt.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Shared view of the in-flight flag, readable while `submit` runs.
    #[must_use]
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(_in_flight) = self.busy.try_begin() else {
            return SubmitOutcome::Busy;
        };
        self.errors = self.form.validate();
        if !self.errors.is_empty() {
            return SubmitOutcome::Invalid;
        }
        self.error = None;

        let request = SignInRequest { username: self.form.username.trim().to_owned(), password: self.form.password.clone() };
        let result = self.api.sign_in(&request).await;

        match result {
            Ok(response) => {
                info!(username = %request.username, "sign in succeeded");
                self.ctx.sign_in(response);
                self.form = SignInForm::default();
                self.navigator.navigate(Route::Home);
                SubmitOutcome::Submitted
            }
            Err(e) => {
                warn!(error = %e, username = %request.username, "sign in failed");
                let message = failure_message(&e, GENERIC_FAILURE);
                self.toasts.error(message.clone(), Instant::now());
                self.error = Some(message);
                SubmitOutcome::Failed
            }
        }
    }
}
