use super::*;
use crate::test_helpers::RecordingNavigator;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_for(server: &MockServer) -> (SignUpPage, Arc<RecordingNavigator>) {
    let nav = Arc::new(RecordingNavigator::default());
    let api = ApiClient::with_base_url(&server.uri()).unwrap();
    (SignUpPage::new(api, nav.clone()), nav)
}

fn fill(page: &mut SignUpPage) {
    assert!(page.set_field(FIELD_NAME, "Janedoe"));
    assert!(page.set_field(FIELD_EMAIL, "jane@example.com"));
    assert!(page.set_field(FIELD_USERNAME, "jane_d"));
    assert!(page.set_field(FIELD_PASSWORD, "Secret123"));
}

#[tokio::test]
async fn invalid_form_never_hits_backend() {
    let server = MockServer::start().await;
    let (mut page, nav) = page_for(&server);

    assert_eq!(page.submit().await, SubmitOutcome::Invalid);
    assert_eq!(page.errors().len(), 4);
    assert_eq!(page.errors().get(FIELD_NAME), Some("Name is required"));
    assert!(nav.routes().is_empty());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn editing_a_field_clears_only_its_error() {
    let server = MockServer::start().await;
    let (mut page, _nav) = page_for(&server);
    assert_eq!(page.submit().await, SubmitOutcome::Invalid);

    page.set_field(FIELD_EMAIL, "j");
    assert!(!page.errors().contains(FIELD_EMAIL));
    assert!(page.errors().contains(FIELD_NAME));
    assert!(!page.set_field("nickname", "x"));
}

#[tokio::test]
async fn success_navigates_to_signin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/"))
        .and(body_json(json!({
            "name": "Janedoe",
            "email": "jane@example.com",
            "username": "jane_d",
            "password": "Secret123"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7, "name": "Janedoe", "username": "jane_d", "email": "jane@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut page, nav) = page_for(&server);
    fill(&mut page);

    assert_eq!(page.submit().await, SubmitOutcome::Submitted);
    assert_eq!(nav.routes(), vec![Route::SignIn]);
    assert!(page.errors().is_empty());
}

#[tokio::test]
async fn backend_field_errors_merge_into_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "email": ["user with this email already exists."],
            "username": ["A user with that username already exists."],
            "non_field_errors": ["ignored"]
        })))
        .mount(&server)
        .await;

    let (mut page, nav) = page_for(&server);
    fill(&mut page);

    assert_eq!(page.submit().await, SubmitOutcome::Failed);
    assert_eq!(page.errors().get(FIELD_EMAIL), Some("user with this email already exists."));
    assert_eq!(page.errors().get(FIELD_USERNAME), Some("A user with that username already exists."));
    assert!(!page.errors().contains("non_field_errors"));
    assert!(page.toasts().is_empty());
    assert!(nav.routes().is_empty());
    assert_eq!(page.form().name, "Janedoe");
}

#[tokio::test]
async fn unkeyed_failure_becomes_toast() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (mut page, _nav) = page_for(&server);
    fill(&mut page);

    assert_eq!(page.submit().await, SubmitOutcome::Failed);
    assert!(page.errors().is_empty());
    assert_eq!(page.toasts().latest().map(|t| t.message.as_str()), Some("Sign up failed"));
}
