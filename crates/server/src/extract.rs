//! Request extractors for the `Authorization` header schemes the API accepts.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};

use crate::errors::ApiError;
use crate::state::ServerState;

fn authorization_credential<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, ApiError> {
    let raw = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".into()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("malformed Authorization header".into()))?;
    let (got_scheme, credential) = raw
        .split_once(' ')
        .ok_or_else(|| ApiError::Unauthorized("malformed Authorization header".into()))?;
    if !got_scheme.eq_ignore_ascii_case(scheme) {
        return Err(ApiError::Unauthorized(format!("expected {scheme} authorization")));
    }
    let credential = credential.trim();
    if credential.is_empty() {
        return Err(ApiError::Unauthorized("empty credential".into()));
    }
    Ok(credential)
}

/// `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    authorization_credential(headers, "Bearer")
}

/// `Authorization: ApiKey <key>`
pub fn api_key(headers: &HeaderMap) -> Result<&str, ApiError> {
    authorization_credential(headers, "ApiKey")
}

/// Raw bearer credential, used for refresh tokens.
pub struct BearerToken(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(&parts.headers).map(|t| BearerToken(t.to_string()))
    }
}

/// User ID taken from a validated bearer access token.
pub struct AuthUser(pub u64);

#[async_trait]
impl FromRequestParts<ServerState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let user_id = state.auth.validate_access_token(token)?;
        Ok(AuthUser(user_id))
    }
}
