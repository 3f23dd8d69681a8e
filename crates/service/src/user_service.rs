use std::sync::Arc;

use models::user::{validate_email, validate_password};
use models::User;
use tracing::{info, instrument};

use crate::auth::errors::AuthError;
use crate::auth::AuthService;
use crate::errors::ServiceError;
use crate::store::ChirpyStore;

/// Account registration and credential updates. Passwords are hashed
/// through [`AuthService`] before they reach the store.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn ChirpyStore>,
    auth: Arc<AuthService>,
}

impl UserService {
    pub fn new(store: Arc<dyn ChirpyStore>, auth: Arc<AuthService>) -> Self { Self { store, auth } }

    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        validate_email(email).map_err(ServiceError::from)?;
        validate_password(password).map_err(ServiceError::from)?;
        let hash = self.auth.hash_password(password)?;
        let user = self.store.create_user(email, &hash).await?;
        info!(user_id = user.id, "user_registered");
        Ok(user)
    }

    /// Replace email and password of `user_id`; the upgrade flag is kept.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn update(&self, user_id: u64, email: &str, password: &str) -> Result<User, AuthError> {
        validate_email(email).map_err(ServiceError::from)?;
        validate_password(password).map_err(ServiceError::from)?;
        let hash = self.auth.hash_password(password)?;
        let user = self.store.update_user(user_id, email, &hash).await?;
        info!("user_updated");
        Ok(user)
    }
}
