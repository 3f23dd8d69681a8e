use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use models::Chirp;
use serde::Deserialize;
use service::store::{ChirpFilter, SortOrder};

use crate::errors::ApiError;
use crate::extract::AuthUser;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct CreateChirp {
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub author_id: Option<u64>,
    pub sort: Option<String>,
}

/// Path IDs that are not numbers cannot name a chirp.
fn parse_chirp_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>().map_err(|_| ApiError::NotFound("chirp not found".into()))
}

pub async fn create_chirp(
    State(state): State<ServerState>,
    AuthUser(author_id): AuthUser,
    payload: Result<Json<CreateChirp>, JsonRejection>,
) -> Result<(StatusCode, Json<Chirp>), ApiError> {
    let Json(input) = payload?;
    let chirp = state.chirps.create(author_id, &input.body).await?;
    Ok((StatusCode::CREATED, Json(chirp)))
}

pub async fn list_chirps(
    State(state): State<ServerState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Chirp>>, ApiError> {
    let Query(params) = params?;
    let filter = ChirpFilter { author_id: params.author_id, sort: SortOrder::parse(params.sort.as_deref()) };
    Ok(Json(state.chirps.list(filter).await?))
}

pub async fn get_chirp(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Chirp>, ApiError> {
    let id = parse_chirp_id(&id)?;
    Ok(Json(state.chirps.get(id).await?))
}

pub async fn delete_chirp(
    State(state): State<ServerState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_chirp_id(&id)?;
    state.chirps.delete(requester, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
