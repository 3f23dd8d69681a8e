use models::User;
use serde::{Deserialize, Serialize};

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    /// Requested access token lifetime; absent, zero or negative means the maximum.
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

/// Login result (session)
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

/// Access token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}
