//! Navbar layout wrapping the protected pages.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::sync::Arc;

use crate::routes::{Navigator, Route};
use crate::state::session::SessionContext;

pub struct NavbarLayout {
    ctx: SessionContext,
    navigator: Arc<dyn Navigator>,
}

impl NavbarLayout {
    pub fn new(ctx: SessionContext, navigator: Arc<dyn Navigator>) -> Self {
        Self { ctx, navigator }
    }

    pub fn home(&self) {
        self.navigator.navigate(Route::Home);
    }

    /// Clear the session and return to sign-in.
    pub fn logout(&self) {
        self.ctx.sign_out();
        self.navigator.navigate(Route::SignIn);
    }
}
