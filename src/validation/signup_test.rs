use super::*;

fn valid_form() -> SignUpForm {
    SignUpForm {
        name: "Janedoe".to_owned(),
        email: "jane@example.com".to_owned(),
        username: "jane_doe1".to_owned(),
        password: "Secret123".to_owned(),
    }
}

#[test]
fn valid_form_passes() {
    assert!(validate_sign_up(&valid_form()).is_empty());
    let request = valid_form().to_request().unwrap();
    assert_eq!(request.username, "jane_doe1");
}

#[test]
fn empty_form_requires_every_field() {
    let errors = validate_sign_up(&SignUpForm::default());
    assert_eq!(errors.get(FIELD_NAME), Some("Name is required"));
    assert_eq!(errors.get(FIELD_EMAIL), Some("Email is required"));
    assert_eq!(errors.get(FIELD_USERNAME), Some("Username is required"));
    assert_eq!(errors.get(FIELD_PASSWORD), Some("Password is required"));
}

#[test]
fn name_rules() {
    let mut form = valid_form();
    form.name = "Al".to_owned();
    assert_eq!(validate_sign_up(&form).get(FIELD_NAME), Some("Name must be at least 4 characters long"));
    form.name = "R2D2 Unit".to_owned();
    assert_eq!(validate_sign_up(&form).get(FIELD_NAME), Some("Name must contain only alphabets"));
}

#[test]
fn name_rejects_spaces_between_words() {
    let mut form = valid_form();
    form.name = "Jane Doe".to_owned();
    assert_eq!(validate_sign_up(&form).get(FIELD_NAME), Some("Name must contain only alphabets"));
    form.name = "  Janedoe  ".to_owned();
    assert!(!validate_sign_up(&form).contains(FIELD_NAME));
}

#[test]
fn email_shapes() {
    let accepted = ["a@b.co", "first.last@mail.example.org"];
    let rejected = ["plain", "@b.co", "a@b", "a@.co", "a@b.", "a b@c.de", "a@b@c.de"];
    for email in accepted {
        assert!(looks_like_email(email), "{email} should pass");
    }
    for email in rejected {
        assert!(!looks_like_email(email), "{email} should fail");
    }
}

#[test]
fn username_rules() {
    let mut form = valid_form();
    form.username = "jo".to_owned();
    assert!(validate_sign_up(&form).contains(FIELD_USERNAME));
    form.username = "jo-doe".to_owned();
    assert_eq!(
        validate_sign_up(&form).get(FIELD_USERNAME),
        Some("Username can only contain letters, numbers, and underscores")
    );
}

#[test]
fn password_needs_mixed_classes() {
    let mut form = valid_form();
    form.password = "Short1".to_owned();
    assert_eq!(
        validate_sign_up(&form).get(FIELD_PASSWORD),
        Some("Password must be at least 8 characters long")
    );
    form.password = "alllowercase1".to_owned();
    assert!(validate_sign_up(&form).contains(FIELD_PASSWORD));
    form.password = "NoDigitsHere".to_owned();
    assert!(validate_sign_up(&form).contains(FIELD_PASSWORD));
}

#[test]
fn to_request_rejects_invalid_form() {
    let mut form = valid_form();
    form.email = "nope".to_owned();
    let errors = form.to_request().unwrap_err();
    assert_eq!(errors.len(), 1);
}
