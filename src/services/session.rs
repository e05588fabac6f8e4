//! Session manager: mount-time token check and proactive refresh.
//!
//! DESIGN
//! ======
//! On mount an authenticated session has its refresh token verified; a failed
//! verify falls through to a refresh, and a failed refresh clears the session
//! and redirects to sign-in. While authenticated, a background task refreshes
//! on a fixed interval so the access token never lapses mid-use.
//!
//! ERROR HANDLING
//! ==============
//! Any verify/refresh failure is terminal for the session. There is no retry
//! beyond the next interval tick, and the task exits after clearing.
//!
//! LIFETIME
//! ========
//! [`RefreshTask`] aborts its loop when dropped. The loop also stops by itself
//! when the session is signed out elsewhere.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::net::api::TokenApi;
use crate::net::error::ApiError;
use crate::routes::{Navigator, Route};
use crate::state::session::SessionContext;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no refresh token in session")]
    MissingRefreshToken,

    #[error("session ended while refreshing")]
    SessionEnded,

    #[error("token request failed: {0}")]
    Api(#[from] ApiError),
}

/// Result of the mount-time check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCheck {
    /// Nobody is signed in; sign-in was requested.
    Unauthenticated,
    /// The stored refresh token verified.
    Verified,
    /// Verification failed but a refresh succeeded.
    Refreshed,
    /// Verify and refresh both failed; the session was cleared.
    Expired,
}

impl SessionCheck {
    #[must_use]
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Verified | Self::Refreshed)
    }
}

pub struct SessionManager {
    ctx: SessionContext,
    api: Arc<dyn TokenApi>,
    navigator: Arc<dyn Navigator>,
}

impl SessionManager {
    pub fn new(ctx: SessionContext, api: Arc<dyn TokenApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self { ctx, api, navigator }
    }

    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Mount-time check: verify, then refresh, then give up.
    pub async fn on_mount(&self) -> SessionCheck {
        if !self.ctx.is_authenticated() {
            debug!("no session on mount");
            self.navigator.navigate(Route::SignIn);
            return SessionCheck::Unauthenticated;
        }

        let verified = match self.ctx.refresh_token() {
            Some(token) => self.api.verify_token(&token).await.map_err(SessionError::from),
            None => Err(SessionError::MissingRefreshToken),
        };
        match verified {
            Ok(()) => {
                debug!("refresh token verified");
                SessionCheck::Verified
            }
            Err(e) => {
                warn!(error = %e, "token verification failed; refreshing");
                match self.refresh().await {
                    Ok(()) => SessionCheck::Refreshed,
                    Err(_) => SessionCheck::Expired,
                }
            }
        }
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// On failure the session is cleared and sign-in is requested before the
    /// error is returned. A response that arrives after the session was signed
    /// out or replaced is dropped.
    ///
    /// # Errors
    ///
    /// [`SessionError::MissingRefreshToken`], [`SessionError::SessionEnded`] or
    /// the failing API call.
    pub async fn refresh(&self) -> Result<(), SessionError> {
        let result = match self.ctx.refresh_token() {
            Some(token) => match self.api.refresh_token(&token).await {
                Ok(response) => Ok((token, response)),
                Err(e) => Err(SessionError::from(e)),
            },
            None => Err(SessionError::MissingRefreshToken),
        };
        match result {
            Ok((token, response)) => {
                if !self.ctx.apply_refresh(&token, response) {
                    debug!("session changed during refresh");
                    return Err(SessionError::SessionEnded);
                }
                info!("access token refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed; signing out");
                self.expire();
                Err(e)
            }
        }
    }

    fn expire(&self) {
        self.ctx.sign_out();
        self.navigator.navigate(Route::SignIn);
    }
}

/// Handle to the background refresh loop. Dropping it cancels the loop.
#[derive(Debug)]
pub struct RefreshTask {
    handle: JoinHandle<()>,
}

impl RefreshTask {
    /// Stop the loop now.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawn the proactive refresh loop. The first refresh fires one full
/// `interval` after spawning.
#[must_use]
pub fn spawn_refresh_task(manager: Arc<SessionManager>, interval: Duration) -> RefreshTask {
    info!(interval_secs = interval.as_secs(), "session refresh task started");
    let handle = tokio::spawn(async move {
        let mut changes = manager.ctx.subscribe();
        if !changes.borrow_and_update().is_authenticated {
            debug!("refresh task started without a session");
            return;
        }

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if manager.refresh().await.is_err() {
                        break;
                    }
                }
                changed = changes.changed() => {
                    if changed.is_err() || !changes.borrow_and_update().is_authenticated {
                        debug!("session ended; stopping refresh task");
                        break;
                    }
                }
            }
        }
    });
    RefreshTask { handle }
}
