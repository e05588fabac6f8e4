use super::*;
use crate::state::store::{MemorySessionStore, SessionStore};
use crate::test_helpers::{RecordingNavigator, sign_in_response};

#[test]
fn logout_clears_session_and_store() {
    let store = Arc::new(MemorySessionStore::default());
    let ctx = SessionContext::new(store.clone());
    ctx.sign_in(sign_in_response());
    let nav = Arc::new(RecordingNavigator::default());

    NavbarLayout::new(ctx.clone(), nav.clone()).logout();

    assert!(!ctx.is_authenticated());
    assert!(ctx.access_token().is_none());
    assert!(store.load().unwrap().is_none());
    assert_eq!(nav.routes(), vec![Route::SignIn]);
}

#[test]
fn home_link_navigates_home() {
    let nav = Arc::new(RecordingNavigator::default());
    NavbarLayout::new(SessionContext::in_memory(), nav.clone()).home();
    assert_eq!(nav.last(), Some(Route::Home));
}
