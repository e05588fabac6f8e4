//! Sign-up form validation. Every field is checked; the first failing rule
//! per field wins.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use super::fields::FieldErrors;
use crate::net::types::SignUpRequest;

pub const FIELD_NAME: &str = "name";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_USERNAME: &str = "username";
pub const FIELD_PASSWORD: &str = "password";

pub const MIN_NAME_CHARS: usize = 4;
pub const MIN_USERNAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

impl SignUpForm {
    /// Validate and convert into the `POST /users/` payload.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any rule fails.
    pub fn to_request(&self) -> Result<SignUpRequest, FieldErrors> {
        let errors = validate_sign_up(self);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(SignUpRequest {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

#[must_use]
pub fn validate_sign_up(form: &SignUpForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let rules = [
        (FIELD_NAME, check_name(&form.name)),
        (FIELD_EMAIL, check_email(&form.email)),
        (FIELD_USERNAME, check_username(&form.username)),
        (FIELD_PASSWORD, check_password(&form.password)),
    ];
    for (field, outcome) in rules {
        if let Err(message) = outcome {
            errors.insert(field, message);
        }
    }
    errors
}

fn check_name(raw: &str) -> Result<(), &'static str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err("Name is required");
    }
    if name.chars().count() < MIN_NAME_CHARS {
        return Err("Name must be at least 4 characters long");
    }
    if !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err("Name must contain only alphabets");
    }
    Ok(())
}

fn check_email(raw: &str) -> Result<(), &'static str> {
    if raw.is_empty() {
        return Err("Email is required");
    }
    if !looks_like_email(raw) {
        return Err("Please enter a valid email address");
    }
    Ok(())
}

/// `local@domain.tld` with no whitespace and exactly one `@`; the domain needs
/// a dot with something on both sides.
fn looks_like_email(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn check_username(raw: &str) -> Result<(), &'static str> {
    if raw.is_empty() {
        return Err("Username is required");
    }
    if raw.chars().count() < MIN_USERNAME_CHARS {
        return Err("Username must be at least 3 characters long");
    }
    if !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("Username can only contain letters, numbers, and underscores");
    }
    Ok(())
}

fn check_password(raw: &str) -> Result<(), &'static str> {
    if raw.is_empty() {
        return Err("Password is required");
    }
    if raw.chars().count() < MIN_PASSWORD_CHARS {
        return Err("Password must be at least 8 characters long");
    }
    let has_lower = raw.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = raw.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = raw.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err("Password must contain at least one uppercase letter, one lowercase letter, and one number");
    }
    Ok(())
}
