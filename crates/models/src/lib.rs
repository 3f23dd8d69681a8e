//! Domain types persisted in the store document, plus the validation rules
//! that belong to the data itself (chirp length and profanity filter).

pub mod chirp;
pub mod document;
pub mod errors;
pub mod refresh_token;
pub mod user;

pub use chirp::Chirp;
pub use document::StoreDocument;
pub use refresh_token::RefreshToken;
pub use user::User;
