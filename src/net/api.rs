//! REST gateway client for the QuickLeave backend.
//!
//! Every call goes through [`ApiClient::request`], which attaches
//! `Authorization: Bearer <access>` when the client holds a token and forwards
//! the call unauthenticated otherwise. Sign-in, sign-up and the token
//! endpoints are always sent anonymously.
//!
//! ERROR HANDLING
//! ==============
//! No retry, no backoff. Every failure surfaces as [`ApiError`] and the
//! caller decides how to degrade.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::ApiError;
use super::types::{
    ApplicationId, LeaveApplication, LeaveReportRow, LeaveStatus, NewLeaveApplication, RefreshRequest,
    RefreshResponse, SignInRequest, SignInResponse, SignUpRequest, StatusUpdate, User, VerifyRequest,
};
use crate::config::ClientConfig;
use crate::state::session::SessionContext;

pub const SIGNIN_PATH: &str = "/signin/";
pub const USERS_PATH: &str = "/users/";
pub const TOKEN_REFRESH_PATH: &str = "/token/refresh/";
pub const TOKEN_VERIFY_PATH: &str = "/token/verify/";
pub const APPLICATIONS_PATH: &str = "/applications/";
pub const SUBORDINATE_APPLICATIONS_PATH: &str = "/subordinate-applications/";
pub const TOTAL_LEAVES_REPORT_PATH: &str = "/total-leaves-report/";

#[must_use]
pub fn application_path(id: ApplicationId) -> String {
    format!("{APPLICATIONS_PATH}{id}/")
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl ApiClient {
    /// Build an unauthenticated client from config.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the TLS backend cannot initialise.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.api_base_url.trim_end_matches('/').to_owned(), access_token: None })
    }

    /// Build a client for `base_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the TLS backend cannot initialise.
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        let config = ClientConfig { api_base_url: base_url.to_owned(), ..ClientConfig::default() };
        Self::new(&config)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Copy of this client carrying `token`. Empty tokens count as absent.
    #[must_use]
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            access_token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Copy of this client carrying the session's current access token.
    #[must_use]
    pub fn for_session(&self, session: &SessionContext) -> Self {
        self.with_token(session.access_token())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    async fn execute(builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().path().to_owned();
        let text = response.text().await?;
        if !status.is_success() {
            let body = match serde_json::from_str::<Value>(&text) {
                Ok(value) => value,
                Err(_) => Value::String(text),
            };
            warn!(status = status.as_u16(), path = %url, "request rejected");
            return Err(ApiError::Status { status: status.as_u16(), body });
        }
        debug!(status = status.as_u16(), path = %url, "request ok");
        Ok(text)
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let text = Self::execute(builder).await?;
        Ok(serde_json::from_str(&text)?)
    }

    // -------------------------------------------------------------------------
    // Auth
    // -------------------------------------------------------------------------

    /// `POST /signin/`.
    ///
    /// # Errors
    ///
    /// Transport, status and decode failures.
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<SignInResponse, ApiError> {
        Self::send_json(self.anonymous(Method::POST, SIGNIN_PATH).json(request)).await
    }

    /// `POST /users/`: Account creation.
    ///
    /// # Errors
    ///
    /// Transport, status and decode failures; field errors arrive as status 400.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<User, ApiError> {
        Self::send_json(self.anonymous(Method::POST, USERS_PATH).json(request)).await
    }

    // -------------------------------------------------------------------------
    // Users and applications
    // -------------------------------------------------------------------------

    /// `GET /users/`: Candidates for the manager picker.
    ///
    /// # Errors
    ///
    /// Transport, status and decode failures.
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Self::send_json(self.request(Method::GET, USERS_PATH)).await
    }

    /// `GET /applications/`: The caller's own applications.
    ///
    /// # Errors
    ///
    /// Transport, status and decode failures.
    pub async fn list_applications(&self) -> Result<Vec<LeaveApplication>, ApiError> {
        Self::send_json(self.request(Method::GET, APPLICATIONS_PATH)).await
    }

    /// `POST /applications/`.
    ///
    /// # Errors
    ///
    /// Transport, status and decode failures.
    pub async fn create_application(&self, payload: &NewLeaveApplication) -> Result<LeaveApplication, ApiError> {
        Self::send_json(self.request(Method::POST, APPLICATIONS_PATH).json(payload)).await
    }

    /// `PATCH /applications/{id}/` with a new status. Manager only.
    ///
    /// # Errors
    ///
    /// Transport, status and decode failures.
    pub async fn update_application_status(
        &self,
        id: ApplicationId,
        status: LeaveStatus,
    ) -> Result<LeaveApplication, ApiError> {
        let path = application_path(id);
        Self::send_json(self.request(Method::PATCH, &path).json(&StatusUpdate { status })).await
    }

    /// `DELETE /applications/{id}/`. Owner only.
    ///
    /// # Errors
    ///
    /// Transport and status failures.
    pub async fn delete_application(&self, id: ApplicationId) -> Result<(), ApiError> {
        let path = application_path(id);
        Self::execute(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    /// `GET /subordinate-applications/`: Applications addressed to the caller.
    ///
    /// # Errors
    ///
    /// Transport, status and decode failures.
    pub async fn list_subordinate_applications(&self) -> Result<Vec<LeaveApplication>, ApiError> {
        Self::send_json(self.request(Method::GET, SUBORDINATE_APPLICATIONS_PATH)).await
    }

    /// `GET /total-leaves-report/`.
    ///
    /// # Errors
    ///
    /// Transport, status and decode failures.
    pub async fn total_leaves_report(&self) -> Result<Vec<LeaveReportRow>, ApiError> {
        Self::send_json(self.request(Method::GET, TOTAL_LEAVES_REPORT_PATH)).await
    }
}

// =============================================================================
// TOKEN SEAM
// =============================================================================

/// Token endpoints used by the session manager. Split out so the refresh
/// lifecycle can run against a fake backend.
#[async_trait::async_trait]
pub trait TokenApi: Send + Sync {
    /// `POST /token/verify/`; `Ok` means the token is still valid.
    async fn verify_token(&self, token: &str) -> Result<(), ApiError>;

    /// `POST /token/refresh/`.
    async fn refresh_token(&self, refresh: &str) -> Result<RefreshResponse, ApiError>;
}

#[async_trait::async_trait]
impl TokenApi for ApiClient {
    async fn verify_token(&self, token: &str) -> Result<(), ApiError> {
        let builder = self
            .anonymous(Method::POST, TOKEN_VERIFY_PATH)
            .json(&VerifyRequest { token });
        Self::execute(builder).await?;
        Ok(())
    }

    async fn refresh_token(&self, refresh: &str) -> Result<RefreshResponse, ApiError> {
        let builder = self
            .anonymous(Method::POST, TOKEN_REFRESH_PATH)
            .json(&RefreshRequest { refresh });
        Self::send_json(builder).await
    }
}
