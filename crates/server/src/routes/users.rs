use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use models::User;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::extract::AuthUser;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: u64,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self { id: u.id, email: u.email, is_chirpy_red: u.is_upgraded }
    }
}

pub async fn create_user(
    State(state): State<ServerState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(input) = payload?;
    let user = state.users.register(&input.email, &input.password).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn update_user(
    State(state): State<ServerState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(input) = payload?;
    let user = state.users.update(user_id, &input.email, &input.password).await?;
    Ok(Json(user.into()))
}
