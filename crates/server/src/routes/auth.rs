use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use service::auth::domain::LoginInput;

use crate::errors::ApiError;
use crate::extract::BearerToken;
use crate::state::ServerState;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: u64,
    pub email: String,
    pub is_chirpy_red: bool,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(input) = payload?;
    let session = state.auth.login(input).await?;
    Ok(Json(LoginResponse {
        id: session.user.id,
        email: session.user.email,
        is_chirpy_red: session.user.is_upgraded,
        token: session.token,
        refresh_token: session.refresh_token,
    }))
}

pub async fn refresh(
    State(state): State<ServerState>,
    BearerToken(refresh_token): BearerToken,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.auth.refresh_access_token(&refresh_token).await?;
    Ok(Json(TokenResponse { token }))
}

pub async fn revoke(
    State(state): State<ServerState>,
    BearerToken(refresh_token): BearerToken,
) -> Result<StatusCode, ApiError> {
    state.auth.revoke_refresh_token(&refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
