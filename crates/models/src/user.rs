use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    /// PHC-format password hash.
    pub hashed_password: String,
    #[serde(rename = "is_chirpy_red", default)]
    pub is_upgraded: bool,
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if email.trim().is_empty() {
        return Err(ModelError::Validation("email required".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ModelError> {
    if password.is_empty() {
        return Err(ModelError::Validation("password required".into()));
    }
    Ok(())
}
