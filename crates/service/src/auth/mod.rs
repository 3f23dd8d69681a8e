//! Auth module: password hashing, access tokens (JWT) and refresh tokens.
//!
//! `AuthService` is the entry point; `password` and `tokens` hold the
//! primitives it composes.

pub mod domain;
pub mod errors;
pub mod password;
pub mod service;
pub mod tokens;

pub use service::AuthService;
