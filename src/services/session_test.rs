use super::*;
use crate::test_helpers::{MockTokenApi, RecordingNavigator, sign_in_response};

const INTERVAL: Duration = Duration::from_secs(110 * 60);

// =============================================================
// Helpers
// =============================================================

fn manager(signed_in: bool, verify_ok: bool, refresh_ok: bool) -> (Arc<SessionManager>, Arc<MockTokenApi>, Arc<RecordingNavigator>) {
    manager_with(signed_in, MockTokenApi::new(verify_ok, refresh_ok))
}

fn manager_with(signed_in: bool, api: MockTokenApi) -> (Arc<SessionManager>, Arc<MockTokenApi>, Arc<RecordingNavigator>) {
    let ctx = SessionContext::in_memory();
    if signed_in {
        ctx.sign_in(sign_in_response());
    }
    let api = Arc::new(api);
    let nav = Arc::new(RecordingNavigator::default());
    let manager = Arc::new(SessionManager::new(ctx, api.clone(), nav.clone()));
    (manager, api, nav)
}

// =============================================================
// on_mount
// =============================================================

#[tokio::test]
async fn mount_without_session_redirects_to_signin() {
    let (manager, api, nav) = manager(false, true, true);
    let check = manager.on_mount().await;
    assert_eq!(check, SessionCheck::Unauthenticated);
    assert!(!check.is_authenticated());
    assert_eq!(nav.routes(), vec![Route::SignIn]);
    assert_eq!(api.verify_calls(), 0);
}

#[tokio::test]
async fn mount_with_valid_token_verifies_only() {
    let (manager, api, nav) = manager(true, true, true);
    assert_eq!(manager.on_mount().await, SessionCheck::Verified);
    assert_eq!(api.verify_calls(), 1);
    assert_eq!(api.refresh_calls(), 0);
    assert!(nav.routes().is_empty());
    assert_eq!(manager.context().access_token().as_deref(), Some("acc-0"));
}

#[tokio::test]
async fn mount_falls_back_to_refresh() {
    let (manager, api, nav) = manager(true, false, true);
    let check = manager.on_mount().await;
    assert_eq!(check, SessionCheck::Refreshed);
    assert!(check.is_authenticated());
    assert_eq!(api.refresh_calls(), 1);
    assert_eq!(api.seen_refresh_tokens(), vec!["ref-0".to_owned()]);
    assert_eq!(manager.context().access_token().as_deref(), Some("acc-1"));
    assert_eq!(manager.context().refresh_token().as_deref(), Some("ref-0"));
    assert!(nav.routes().is_empty());
}

#[tokio::test]
async fn mount_with_dead_tokens_clears_session() {
    let (manager, api, nav) = manager(true, false, false);
    assert_eq!(manager.on_mount().await, SessionCheck::Expired);
    assert_eq!(api.verify_calls(), 1);
    assert_eq!(api.refresh_calls(), 1);
    assert!(!manager.context().is_authenticated());
    assert!(manager.context().user().is_none());
    assert_eq!(nav.last(), Some(Route::SignIn));
}

#[tokio::test]
async fn refresh_without_token_is_an_error() {
    let (manager, api, nav) = manager(false, true, true);
    let result = manager.refresh().await;
    assert!(matches!(result, Err(SessionError::MissingRefreshToken)));
    assert_eq!(api.refresh_calls(), 0);
    assert_eq!(nav.last(), Some(Route::SignIn));
}

// =============================================================
// Refresh loop
// =============================================================

#[tokio::test(start_paused = true)]
async fn refresh_fires_after_one_interval() {
    let (manager, api, _nav) = manager(true, true, true);
    let _task = spawn_refresh_task(manager.clone(), INTERVAL);

    tokio::time::sleep(INTERVAL - Duration::from_secs(1)).await;
    assert_eq!(api.refresh_calls(), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(api.refresh_calls(), 1);
    assert_eq!(manager.context().access_token().as_deref(), Some("acc-1"));
}

#[tokio::test(start_paused = true)]
async fn refresh_repeats_every_interval() {
    let (manager, api, _nav) = manager(true, true, true);
    let _task = spawn_refresh_task(manager.clone(), INTERVAL);

    tokio::time::sleep(INTERVAL * 3 + Duration::from_secs(1)).await;
    assert_eq!(api.refresh_calls(), 3);
    assert_eq!(api.seen_refresh_tokens(), vec!["ref-0".to_owned(); 3]);
    assert_eq!(manager.context().access_token().as_deref(), Some("acc-3"));
}

#[tokio::test(start_paused = true)]
async fn sign_out_stops_the_loop() {
    let (manager, api, _nav) = manager(true, true, true);
    let task = spawn_refresh_task(manager.clone(), INTERVAL);

    tokio::time::sleep(Duration::from_secs(60)).await;
    manager.context().sign_out();
    tokio::time::sleep(INTERVAL * 2).await;

    assert_eq!(api.refresh_calls(), 0);
    assert!(task.is_finished());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_task_cancels_it() {
    let (manager, api, _nav) = manager(true, true, true);
    let task = spawn_refresh_task(manager.clone(), INTERVAL);
    tokio::time::sleep(Duration::from_secs(1)).await;
    drop(task);

    tokio::time::sleep(INTERVAL * 2).await;
    assert_eq!(api.refresh_calls(), 0);
    assert!(manager.context().is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_the_loop() {
    let (manager, api, _nav) = manager(true, true, true);
    let task = spawn_refresh_task(manager.clone(), INTERVAL);
    task.cancel();

    tokio::time::sleep(INTERVAL * 2).await;
    assert_eq!(api.refresh_calls(), 0);
    assert!(task.is_finished());
}

#[tokio::test(start_paused = true)]
async fn failed_refresh_signs_out_and_stops() {
    let (manager, api, nav) = manager(true, true, true);
    let task = spawn_refresh_task(manager.clone(), INTERVAL);

    tokio::time::sleep(INTERVAL + Duration::from_secs(1)).await;
    assert_eq!(api.refresh_calls(), 1);

    api.set_refresh_ok(false);
    tokio::time::sleep(INTERVAL).await;
    assert_eq!(api.refresh_calls(), 2);
    assert!(!manager.context().is_authenticated());
    assert_eq!(nav.last(), Some(Route::SignIn));

    tokio::time::sleep(INTERVAL * 2).await;
    assert_eq!(api.refresh_calls(), 2);
    assert!(task.is_finished());
}

#[tokio::test(start_paused = true)]
async fn task_without_session_exits_immediately() {
    let (manager, api, _nav) = manager(false, true, true);
    let task = spawn_refresh_task(manager, INTERVAL);

    tokio::time::sleep(INTERVAL * 2).await;
    assert_eq!(api.refresh_calls(), 0);
    assert!(task.is_finished());
}

// =============================================================
// Sign-out racing an in-flight refresh
// =============================================================

#[tokio::test(start_paused = true)]
async fn sign_out_during_refresh_discards_late_response() {
    let slow = MockTokenApi::new(true, true).with_refresh_delay(Duration::from_secs(5));
    let (manager, api, nav) = manager_with(true, slow);

    let in_flight = tokio::spawn({
        let manager = Arc::clone(&manager);
        async move { manager.refresh().await }
    });
    tokio::time::sleep(Duration::from_secs(1)).await;
    manager.context().sign_out();

    let result = in_flight.await.unwrap();
    assert!(matches!(result, Err(SessionError::SessionEnded)));
    assert_eq!(api.refresh_calls(), 1);
    assert!(!manager.context().is_authenticated());
    assert!(manager.context().access_token().is_none());
    assert!(nav.routes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn loop_stops_when_signed_out_mid_refresh() {
    let slow = MockTokenApi::new(true, true).with_refresh_delay(Duration::from_secs(5));
    let (manager, api, _nav) = manager_with(true, slow);
    let task = spawn_refresh_task(Arc::clone(&manager), INTERVAL);

    tokio::time::sleep(INTERVAL + Duration::from_secs(1)).await;
    assert_eq!(api.refresh_calls(), 1);
    manager.context().sign_out();

    tokio::time::sleep(INTERVAL * 3).await;
    assert_eq!(api.refresh_calls(), 1);
    assert!(!manager.context().is_authenticated());
    assert!(task.is_finished());
}

#[tokio::test(start_paused = true)]
async fn sign_in_during_refresh_keeps_new_session() {
    let slow = MockTokenApi::new(true, true).with_refresh_delay(Duration::from_secs(5));
    let (manager, _api, _nav) = manager_with(true, slow);

    let in_flight = tokio::spawn({
        let manager = Arc::clone(&manager);
        async move { manager.refresh().await }
    });
    tokio::time::sleep(Duration::from_secs(1)).await;
    let mut fresh = sign_in_response();
    fresh.access = "acc-new".into();
    fresh.refresh = "ref-new".into();
    manager.context().sign_in(fresh);

    assert!(matches!(in_flight.await.unwrap(), Err(SessionError::SessionEnded)));
    assert_eq!(manager.context().access_token().as_deref(), Some("acc-new"));
    assert_eq!(manager.context().refresh_token().as_deref(), Some("ref-new"));
}
