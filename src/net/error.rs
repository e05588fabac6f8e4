//! Typed errors for REST gateway calls.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses keep their decoded JSON body so pages can lift
//! field-keyed messages into form state and show the rest as a toast.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport failure: DNS, connect, timeout, TLS.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: u16, body: Value },

    /// A success body did not match the expected shape.
    #[error("response parse failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`], `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Field-keyed errors from the response body, if any.
    #[must_use]
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            Self::Status { body, .. } => FieldErrors::from_server_body(body),
            _ => FieldErrors::new(),
        }
    }

    /// Top-level backend message (`error`, then `detail`).
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        ["error", "detail"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map(str::to_owned)
    }
}
