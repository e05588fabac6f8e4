//! Landing page behind the protected layout.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use crate::routes::Route;
use crate::state::session::Session;

/// Destinations offered on the home page, in display order.
pub const HOME_LINKS: [(&str, Route); 2] = [("Employee", Route::Employee), ("Manager", Route::Manager)];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomePage {
    pub greeting: String,
    pub links: Vec<(&'static str, Route)>,
}

impl HomePage {
    #[must_use]
    pub fn for_session(session: &Session) -> Self {
        let name = session.display_name().unwrap_or_default();
        Self { greeting: format!("Hello {name}, welcome to QuickLeave"), links: HOME_LINKS.to_vec() }
    }
}
