//! Long-lived client services.

pub mod session;

pub use session::{RefreshTask, SessionCheck, SessionError, SessionManager, spawn_refresh_task};
