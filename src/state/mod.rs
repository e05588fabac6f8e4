//! Shared client-side state.
//!
//! DESIGN
//! ======
//! The session is the only state shared across pages. It lives in an
//! explicit [`session::SessionContext`] handed to whoever needs it, and every
//! update is a single atomic action (sign-in, refresh, sign-out).

pub mod session;
pub mod store;

pub use session::{Session, SessionContext};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};
