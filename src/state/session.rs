//! Authenticated session and the context that owns it.
//!
//! The context wraps a `tokio::sync::watch` channel: readers take snapshots
//! or subscribe to changes, writers apply one action at a time through
//! `send_modify`. Each action is persisted through the configured
//! [`SessionStore`]; store failures are logged and otherwise ignored.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::store::{MemorySessionStore, SessionStore};
use crate::net::types::{RefreshResponse, SignInResponse, User, UserId};

/// The authenticated user's token pair and identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub is_authenticated: bool,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn signed_in(response: SignInResponse) -> Self {
        Self {
            is_authenticated: true,
            access_token: Some(response.access),
            refresh_token: Some(response.refresh),
            user: Some(response.user),
        }
    }

    /// Apply a refresh response. Fields the backend omitted keep their value.
    pub fn apply_refresh(&mut self, response: RefreshResponse) {
        self.is_authenticated = true;
        self.access_token = Some(response.access);
        if let Some(refresh) = response.refresh {
            self.refresh_token = Some(refresh);
        }
        if let Some(user) = response.user {
            self.user = Some(user);
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.name.as_str())
    }
}

/// Explicit, shareable handle to the current session.
#[derive(Clone)]
pub struct SessionContext {
    state: Arc<watch::Sender<Session>>,
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("is_authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    /// Restore the persisted session from `store`, or start signed out.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let initial = match store.load() {
            Ok(Some(session)) => session,
            Ok(None) => Session::default(),
            Err(e) => {
                warn!(error = %e, "persisted session unreadable; starting signed out");
                Session::default()
            }
        };
        let (tx, _rx) = watch::channel(initial);
        Self { state: Arc::new(tx), store }
    }

    /// Context backed by a throwaway in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::default()))
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().access_token.clone()
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.state.borrow().refresh_token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Receiver notified after every session action.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn sign_in(&self, response: SignInResponse) {
        let session = Session::signed_in(response);
        info!(user_id = session.user_id(), "signed in");
        self.state.send_replace(session.clone());
        self.persist(&session);
    }

    /// Apply a refresh answer obtained with the refresh token `sent`.
    ///
    /// Returns `false` and leaves the session untouched when it was signed out
    /// or its refresh token changed while the request was in flight.
    pub fn apply_refresh(&self, sent: &str, response: RefreshResponse) -> bool {
        let applied = self.state.send_if_modified(|session| {
            if !session.is_authenticated || session.refresh_token.as_deref() != Some(sent) {
                return false;
            }
            session.apply_refresh(response);
            true
        });
        if applied {
            let session = self.snapshot();
            self.persist(&session);
        } else {
            debug!("stale refresh response discarded");
        }
        applied
    }

    pub fn sign_out(&self) {
        self.state.send_modify(Session::clear);
        info!("signed out");
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear persisted session");
        }
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = self.store.save(session) {
            warn!(error = %e, "failed to persist session");
        }
    }
}
