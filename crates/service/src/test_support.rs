#![cfg(test)]
use std::{path::PathBuf, sync::Arc};

use crate::auth::service::{AuthConfig, AuthService};
use crate::errors::ServiceError;
use crate::file::chirpy_store::FileChirpyStore;
use crate::store::ChirpyStore;

pub const TEST_SECRET: &str = "test-secret";

/// A store backed by a unique file under the system temp dir, removed on drop.
pub struct TempStore {
    pub store: Arc<FileChirpyStore>,
    path: PathBuf,
}

impl TempStore {
    pub async fn new() -> Result<Self, ServiceError> {
        let path = std::env::temp_dir().join(format!("chirpy_store_{}.json", uuid::Uuid::new_v4()));
        let store = FileChirpyStore::open(&path).await?;
        Ok(Self { store, path })
    }

    pub fn dyn_store(&self) -> Arc<dyn ChirpyStore> {
        self.store.clone()
    }

    pub fn auth(&self) -> Arc<AuthService> {
        Arc::new(AuthService::new(self.dyn_store(), AuthConfig::new(TEST_SECRET)))
    }
}

impl Drop for TempStore {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
