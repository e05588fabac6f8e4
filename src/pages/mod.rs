//! Page view-models for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped state and orchestration: form fields, inline
//! errors, loaded records, toasts and the in-flight flag. Rendering reads that
//! state back; the `quickleave-cli` binary is one such renderer.

pub mod employee;
pub mod home;
pub mod layout;
pub mod manager;
pub mod signin;
pub mod signup;

pub use employee::{EmployeePage, WithdrawOutcome};
pub use home::HomePage;
pub use layout::NavbarLayout;
pub use manager::{EmployeeTotals, ManagerPage, Section, StatusOutcome};
pub use signin::{SignInForm, SignInPage};
pub use signup::SignUpPage;

use crate::net::error::ApiError;

/// Result of a form submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend accepted the request.
    Submitted,
    /// Local validation failed; nothing was sent.
    Invalid,
    /// The request was sent and failed.
    Failed,
    /// A previous submission is still in flight.
    Busy,
}

/// Toast text for a failed call: the backend's message when it sent one.
pub(crate) fn failure_message(err: &ApiError, fallback: &str) -> String {
    err.server_message().unwrap_or_else(|| fallback.to_owned())
}
