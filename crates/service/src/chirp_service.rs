use std::sync::Arc;

use models::chirp::{censor, validate_body};
use models::Chirp;
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::store::{ChirpFilter, ChirpyStore};

/// Chirp rules layered over the store: length check, profanity filter and
/// author-only deletion.
#[derive(Clone)]
pub struct ChirpService {
    store: Arc<dyn ChirpyStore>,
}

impl ChirpService {
    pub fn new(store: Arc<dyn ChirpyStore>) -> Self { Self { store } }

    /// Validate the raw body, censor it and persist it.
    #[instrument(skip(self, raw_body))]
    pub async fn create(&self, author_id: u64, raw_body: &str) -> Result<Chirp, ServiceError> {
        validate_body(raw_body)?;
        let chirp = self.store.create_chirp(&censor(raw_body), author_id).await?;
        info!(chirp_id = chirp.id, "chirp_created");
        Ok(chirp)
    }

    pub async fn list(&self, filter: ChirpFilter) -> Result<Vec<Chirp>, ServiceError> {
        self.store.list_chirps(filter).await
    }

    pub async fn get(&self, id: u64) -> Result<Chirp, ServiceError> {
        self.store.get_chirp(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, requester_id: u64, chirp_id: u64) -> Result<(), ServiceError> {
        let chirp = self.store.get_chirp(chirp_id).await?;
        if chirp.author_id != requester_id {
            return Err(ServiceError::Forbidden("only the author can delete a chirp".into()));
        }
        self.store.delete_chirp(chirp_id).await?;
        info!("chirp_deleted");
        Ok(())
    }
}
