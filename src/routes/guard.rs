//! Route guards.
//!
//! DESIGN
//! ======
//! [`ProtectedRoutes`] wraps the authenticated layout. Mounting it runs the
//! session check and, when a session survives, owns the refresh loop for as
//! long as the layout stays mounted. [`ReverseProtectedRoutes`] wraps the
//! sign-in and sign-up pages and bounces signed-in users home.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::{GuardKind, Navigator, Route};
use crate::services::session::{RefreshTask, SessionCheck, SessionManager, spawn_refresh_task};
use crate::state::session::{Session, SessionContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(Route),
}

/// Decision for a route under the protected guard.
#[must_use]
pub fn protected(session: &Session) -> GuardDecision {
    if session.is_authenticated { GuardDecision::Render } else { GuardDecision::Redirect(Route::SignIn) }
}

/// Decision for a route under the reverse-protected guard.
#[must_use]
pub fn reverse_protected(session: &Session) -> GuardDecision {
    if session.is_authenticated { GuardDecision::Redirect(Route::Home) } else { GuardDecision::Render }
}

/// Decision for any route given the current session.
#[must_use]
pub fn decide(route: Route, session: &Session) -> GuardDecision {
    match route.guard() {
        GuardKind::Protected => protected(session),
        GuardKind::ReverseProtected => reverse_protected(session),
    }
}

/// Mounted protected layout. Dropping it stops the refresh loop.
pub struct ProtectedRoutes {
    manager: Arc<SessionManager>,
    check: SessionCheck,
    task: Option<RefreshTask>,
}

impl ProtectedRoutes {
    pub async fn mount(manager: Arc<SessionManager>, refresh_interval: Duration) -> Self {
        let check = manager.on_mount().await;
        let task = check
            .is_authenticated()
            .then(|| spawn_refresh_task(Arc::clone(&manager), refresh_interval));
        debug!(?check, refreshing = task.is_some(), "protected routes mounted");
        Self { manager, check, task }
    }

    #[must_use]
    pub fn check(&self) -> SessionCheck {
        self.check
    }

    /// Current decision; changes if the session ends while mounted.
    #[must_use]
    pub fn decision(&self) -> GuardDecision {
        protected(&self.manager.context().snapshot())
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    #[must_use]
    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }

    pub fn unmount(mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
    }
}

/// Mounted sign-in/sign-up wrapper.
pub struct ReverseProtectedRoutes {
    decision: GuardDecision,
}

impl ReverseProtectedRoutes {
    pub fn mount(ctx: &SessionContext, navigator: &dyn Navigator) -> Self {
        let decision = reverse_protected(&ctx.snapshot());
        if let GuardDecision::Redirect(route) = decision {
            navigator.navigate(route);
        }
        Self { decision }
    }

    #[must_use]
    pub fn decision(&self) -> GuardDecision {
        self.decision
    }
}
