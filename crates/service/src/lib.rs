//! Service layer: persistence and business rules behind the HTTP handlers.
//! - `store` defines the storage contract; `file` implements it on a JSON document.
//! - `auth` owns password hashing and token issuance/validation.
//! - `chirp_service`, `user_service` and `webhook_service` apply request-level rules.

pub mod auth;
pub mod chirp_service;
pub mod errors;
pub mod file;
pub mod runtime;
pub mod storage;
pub mod store;
#[cfg(test)]
pub mod test_support;
pub mod user_service;
pub mod webhook_service;
