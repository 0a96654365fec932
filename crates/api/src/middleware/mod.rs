//! Request extractors guarding operator routes.
//!
//! - [`auth::Operator`] -- Requires the configured operator Bearer token.

pub mod auth;
