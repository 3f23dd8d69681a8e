use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use service::webhook_service::WebhookEvent;
use subtle::ConstantTimeEq;

use crate::errors::ApiError;
use crate::extract::api_key;
use crate::state::ServerState;

/// 常量时间比较，避免通过响应耗时推测密钥
pub(crate) fn api_key_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// 支付回调：配置了 POLKA_WEBHOOK_API_KEY 时要求 `Authorization: ApiKey <key>`
pub async fn polka_webhook(
    State(state): State<ServerState>,
    headers: HeaderMap,
    payload: Result<Json<WebhookEvent>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    if let Some(expected) = state.polka_api_key.as_deref() {
        if !api_key_matches(api_key(&headers)?, expected) {
            tracing::warn!("webhook rejected: api key mismatch");
            return Err(ApiError::Unauthorized("invalid api key".into()));
        }
    }
    let Json(event) = payload?;
    state.webhooks.handle(event).await?;
    Ok(StatusCode::NO_CONTENT)
}
