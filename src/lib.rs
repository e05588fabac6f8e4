//! # quickleave
//!
//! Client core for the QuickLeave leave-management application.
//!
//! This crate contains the REST gateway client, the session context and its
//! token-refresh lifecycle, route guards, the leave and sign-up validators, and
//! page view-models. Rendering is left to the caller; the `quickleave-cli`
//! crate drives these view-models from a terminal.

pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_helpers;
