//! Renderer-independent UI pieces shared by pages.

pub mod busy;
pub mod toast;

pub use busy::{BusyFlag, BusyGuard};
pub use toast::{Toast, ToastKind, ToastQueue};
