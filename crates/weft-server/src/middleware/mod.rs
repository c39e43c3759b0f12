//! Request-path middleware.

pub mod auth;

pub use auth::api_key_auth;
