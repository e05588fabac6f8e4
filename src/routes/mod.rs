//! Route table, navigation seam and access guards.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendering and the actual router live outside this crate. Pages and the
//! session manager only ask a [`Navigator`] to move somewhere; guards decide
//! whether a route may render for the current session.

pub mod guard;

use std::fmt;

pub use guard::{GuardDecision, ProtectedRoutes, ReverseProtectedRoutes, decide};

/// Every page the client knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Employee,
    Manager,
    SignIn,
    SignUp,
}

/// Which guard wraps a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardKind {
    /// Authenticated users only; lives under the navbar layout.
    Protected,
    /// Signed-out users only.
    ReverseProtected,
}

impl Route {
    pub const ALL: [Route; 5] = [Route::Home, Route::Employee, Route::Manager, Route::SignIn, Route::SignUp];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Employee => "/employee",
            Self::Manager => "/manager",
            Self::SignIn => "/signin",
            Self::SignUp => "/signup",
        }
    }

    /// Resolve a path, ignoring one trailing slash.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = if path.len() > 1 { path.trim_end_matches('/') } else { path };
        Self::ALL.into_iter().find(|r| r.path() == trimmed)
    }

    #[must_use]
    pub fn guard(self) -> GuardKind {
        match self {
            Self::Home | Self::Employee | Self::Manager => GuardKind::Protected,
            Self::SignIn | Self::SignUp => GuardKind::ReverseProtected,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation side effect, implemented by whatever owns the router.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
