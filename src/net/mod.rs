//! Network layer: REST gateway client, wire DTOs and errors.

pub mod api;
pub mod error;
pub mod types;

pub use api::{ApiClient, TokenApi};
pub use error::ApiError;
