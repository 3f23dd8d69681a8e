use std::sync::Arc;

use chrono::Duration;
use configs::AuthSettings;
use service::{
    auth::{service::AuthConfig, AuthService},
    chirp_service::ChirpService,
    store::ChirpyStore,
    user_service::UserService,
    webhook_service::WebhookService,
};

use crate::metrics::HitCounter;

/// Shared handler state. Cloning is cheap; every field is a handle.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService>,
    pub users: UserService,
    pub chirps: ChirpService,
    pub webhooks: WebhookService,
    pub hits: HitCounter,
    /// When set, webhook calls must present `Authorization: ApiKey <key>`.
    pub polka_api_key: Option<String>,
}

impl ServerState {
    pub fn new(store: Arc<dyn ChirpyStore>, settings: &AuthSettings) -> anyhow::Result<Self> {
        let cfg = AuthConfig {
            access_token_max_ttl: Duration::seconds(settings.access_token_max_secs),
            refresh_token_ttl: Duration::hours(settings.refresh_token_ttl_hours),
            password_cost: settings.password_cost,
            ..AuthConfig::new(settings.jwt_secret.clone())
        };
        let auth = Arc::new(AuthService::new(Arc::clone(&store), cfg));
        Ok(Self {
            users: UserService::new(Arc::clone(&store), Arc::clone(&auth)),
            chirps: ChirpService::new(Arc::clone(&store)),
            webhooks: WebhookService::new(store),
            auth,
            hits: HitCounter::new()?,
            polka_api_key: settings.polka_api_key.clone(),
        })
    }
}
