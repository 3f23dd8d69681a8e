use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{Chirp, RefreshToken, StoreDocument, User};
use tracing::debug;

use crate::errors::ServiceError;
use crate::storage::json_document_store::JsonDocumentStore;
use crate::store::{ChirpFilter, ChirpyStore, SortOrder};

/// File-backed store keeping every entity in one JSON document.
#[derive(Clone)]
pub struct FileChirpyStore {
    doc: Arc<JsonDocumentStore<StoreDocument>>,
}

impl FileChirpyStore {
    /// Initialize the store from the given file path. Creates the file if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let doc = JsonDocumentStore::<StoreDocument>::open(path).await?;
        Ok(Arc::new(Self { doc }))
    }

    pub fn path(&self) -> &std::path::Path {
        self.doc.path()
    }
}

#[async_trait]
impl ChirpyStore for FileChirpyStore {
    async fn create_chirp(&self, body: &str, author_id: u64) -> Result<Chirp, ServiceError> {
        self.doc
            .update(|doc| {
                let id = doc.allocate_chirp_id();
                let chirp = Chirp { id, author_id, body: body.to_string() };
                doc.chirps.insert(id, chirp.clone());
                Ok(chirp)
            })
            .await
    }

    async fn list_chirps(&self, filter: ChirpFilter) -> Result<Vec<Chirp>, ServiceError> {
        self.doc
            .read(|doc| {
                // BTreeMap iteration is already ascending by id
                let mut chirps: Vec<Chirp> = doc
                    .chirps
                    .values()
                    .filter(|c| filter.author_id.map_or(true, |a| c.author_id == a))
                    .cloned()
                    .collect();
                if filter.sort == SortOrder::Desc {
                    chirps.reverse();
                }
                Ok(chirps)
            })
            .await
    }

    async fn get_chirp(&self, id: u64) -> Result<Chirp, ServiceError> {
        self.doc
            .read(|doc| doc.chirps.get(&id).cloned().ok_or_else(|| ServiceError::not_found("chirp")))
            .await
    }

    async fn delete_chirp(&self, id: u64) -> Result<(), ServiceError> {
        self.doc
            .update(|doc| {
                doc.chirps.remove(&id).map(|_| ()).ok_or_else(|| ServiceError::not_found("chirp"))
            })
            .await
    }

    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, ServiceError> {
        self.doc
            .update(|doc| {
                if doc.user_by_email(email).is_some() {
                    return Err(ServiceError::Conflict("a user with this email already exists".into()));
                }
                let id = doc.allocate_user_id();
                let user = User {
                    id,
                    email: email.to_string(),
                    hashed_password: hashed_password.to_string(),
                    is_upgraded: false,
                };
                doc.users.insert(id, user.clone());
                Ok(user)
            })
            .await
    }

    async fn get_user(&self, id: u64) -> Result<User, ServiceError> {
        self.doc
            .read(|doc| doc.users.get(&id).cloned().ok_or_else(|| ServiceError::not_found("user")))
            .await
    }

    async fn update_user(&self, id: u64, email: &str, hashed_password: &str) -> Result<User, ServiceError> {
        self.doc
            .update(|doc| {
                if doc.user_by_email(email).is_some_and(|other| other.id != id) {
                    return Err(ServiceError::Conflict("a user with this email already exists".into()));
                }
                let user = doc.users.get_mut(&id).ok_or_else(|| ServiceError::not_found("user"))?;
                // 保留 is_upgraded，只替换邮箱与密码
                user.email = email.to_string();
                user.hashed_password = hashed_password.to_string();
                Ok(user.clone())
            })
            .await
    }

    async fn upgrade_user(&self, id: u64) -> Result<User, ServiceError> {
        self.doc
            .update(|doc| {
                let user = doc.users.get_mut(&id).ok_or_else(|| ServiceError::not_found("user"))?;
                user.is_upgraded = true;
                Ok(user.clone())
            })
            .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, ServiceError> {
        self.doc
            .read(|doc| doc.user_by_email(email).cloned().ok_or_else(|| ServiceError::not_found("user")))
            .await
    }

    async fn create_refresh_token(
        &self,
        user_id: u64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, ServiceError> {
        self.doc
            .update(|doc| {
                let record = RefreshToken { token: token.to_string(), user_id, expires_at };
                doc.refresh_tokens.insert(record.token.clone(), record.clone());
                Ok(record)
            })
            .await
    }

    async fn get_refresh_token(&self, token: &str) -> Result<RefreshToken, ServiceError> {
        let record = self
            .doc
            .read(|doc| {
                doc.refresh_tokens
                    .get(token)
                    .cloned()
                    .ok_or_else(|| ServiceError::not_found("refresh token"))
            })
            .await?;
        if record.is_expired_at(Utc::now()) {
            debug!(user_id = record.user_id, "refresh token expired");
            return Err(ServiceError::Expired("refresh token has expired".into()));
        }
        Ok(record)
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<(), ServiceError> {
        self.doc
            .update(|doc| {
                doc.refresh_tokens
                    .remove(token)
                    .map(|_| ())
                    .ok_or_else(|| ServiceError::not_found("refresh token"))
            })
            .await
    }
}
