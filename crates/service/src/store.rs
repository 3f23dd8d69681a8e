use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{Chirp, RefreshToken, User};

use crate::errors::ServiceError;

/// Ordering applied to chirp listings, by chirp ID.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `"desc"` (any case) sorts descending; anything else, including no value, ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ChirpFilter {
    pub author_id: Option<u64>,
    pub sort: SortOrder,
}

/// Storage contract for chirps, users and refresh tokens.
/// Implementations can be file-backed, database-backed, or in-memory.
#[async_trait]
pub trait ChirpyStore: Send + Sync {
    async fn create_chirp(&self, body: &str, author_id: u64) -> Result<Chirp, ServiceError>;
    async fn list_chirps(&self, filter: ChirpFilter) -> Result<Vec<Chirp>, ServiceError>;
    async fn get_chirp(&self, id: u64) -> Result<Chirp, ServiceError>;
    async fn delete_chirp(&self, id: u64) -> Result<(), ServiceError>;

    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, ServiceError>;
    async fn get_user(&self, id: u64) -> Result<User, ServiceError>;
    async fn update_user(&self, id: u64, email: &str, hashed_password: &str) -> Result<User, ServiceError>;
    async fn upgrade_user(&self, id: u64) -> Result<User, ServiceError>;
    async fn get_user_by_email(&self, email: &str) -> Result<User, ServiceError>;

    async fn create_refresh_token(
        &self,
        user_id: u64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, ServiceError>;
    /// Fails with `NotFound` for unknown tokens and `Expired` for tokens past
    /// their expiry, even while the record is still stored.
    async fn get_refresh_token(&self, token: &str) -> Result<RefreshToken, ServiceError>;
    async fn delete_refresh_token(&self, token: &str) -> Result<(), ServiceError>;
}
