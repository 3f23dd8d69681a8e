use std::sync::Arc;

use models::User;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::store::ChirpyStore;

pub const USER_UPGRADED: &str = "user.upgraded";

/// Payment provider notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookData {
    pub user_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Upgraded(User),
    Ignored,
}

#[derive(Clone)]
pub struct WebhookService {
    store: Arc<dyn ChirpyStore>,
}

impl WebhookService {
    pub fn new(store: Arc<dyn ChirpyStore>) -> Self { Self { store } }

    /// Apply `user.upgraded`; any other event is acknowledged without effect.
    #[instrument(skip(self, event), fields(event = %event.event, user_id = event.data.user_id))]
    pub async fn handle(&self, event: WebhookEvent) -> Result<WebhookOutcome, ServiceError> {
        if event.event != USER_UPGRADED {
            debug!("webhook event ignored");
            return Ok(WebhookOutcome::Ignored);
        }
        let user = self.store.upgrade_user(event.data.user_id).await?;
        info!("user_upgraded");
        Ok(WebhookOutcome::Upgraded(user))
    }
}
