//! Sign-up page.
//!
//! Fields validate locally before anything is sent. Editing a field clears its
//! inline error. Backend rejections keyed by `email` or `username` land on
//! those fields; anything else becomes a toast.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use super::{SubmitOutcome, failure_message};
use crate::components::busy::BusyFlag;
use crate::components::toast::ToastQueue;
use crate::net::api::ApiClient;
use crate::routes::{Navigator, Route};
use crate::validation::FieldErrors;
use crate::validation::signup::{FIELD_EMAIL, FIELD_NAME, FIELD_PASSWORD, FIELD_USERNAME, SignUpForm};

const GENERIC_FAILURE: &str = "Sign up failed";
const SUCCESS: &str = "Account created, please sign in";

pub struct SignUpPage {
    api: ApiClient,
    navigator: Arc<dyn Navigator>,
    form: SignUpForm,
    errors: FieldErrors,
    toasts: ToastQueue,
    busy: BusyFlag,
}

impl SignUpPage {
    pub fn new(api: ApiClient, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            navigator,
            form: SignUpForm::default(),
            errors: FieldErrors::new(),
            toasts: ToastQueue::default(),
            busy: BusyFlag::default(),
        }
    }

    #[must_use]
    pub fn form(&self) -> &SignUpForm {
        &self.form
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
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

    /// Set one field by name and clear its error. Unknown names are ignored.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            FIELD_NAME => &mut self.form.name,
            FIELD_EMAIL => &mut self.form.email,
            FIELD_USERNAME => &mut self.form.username,
            FIELD_PASSWORD => &mut self.form.password,
            _ => return false,
        };
        *slot = value.into();
        self.errors.clear_field(field);
        true
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(_in_flight) = self.busy.try_begin() else {
            return SubmitOutcome::Busy;
        };
        let request = match self.form.to_request() {
            Ok(request) => request,
            Err(errors) => {
                self.errors = errors;
                return SubmitOutcome::Invalid;
            }
        };
        self.errors.clear();

        let result = self.api.sign_up(&request).await;

        match result {
            Ok(user) => {
                info!(user_id = user.id, username = %user.username, "account created");
                self.toasts.success(SUCCESS, Instant::now());
                self.navigator.navigate(Route::SignIn);
                SubmitOutcome::Submitted
            }
            Err(e) => {
                warn!(error = %e, "sign up failed");
                let fields = e.field_errors().only(&[FIELD_EMAIL, FIELD_USERNAME]);
                if fields.is_empty() {
                    self.toasts.error(failure_message(&e, GENERIC_FAILURE), Instant::now());
                }
                self.errors.merge(fields);
                SubmitOutcome::Failed
            }
        }
    }
}
