//! Client-side form validation.
//!
//! DESIGN
//! ======
//! Validators are pure functions over raw form strings so they can be run on
//! every keystroke or right before submission. They return [`FieldErrors`];
//! an empty set means the form may be sent.

pub mod fields;
pub mod leave;
pub mod signup;

pub use fields::FieldErrors;
