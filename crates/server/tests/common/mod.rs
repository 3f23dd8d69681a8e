#![allow(dead_code)]
use std::{path::PathBuf, sync::Arc};

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use configs::AuthSettings;
use server::routes;
use server::state::ServerState;
use service::file::chirpy_store::FileChirpyStore;
use service::store::ChirpyStore;

pub const SECRET: &str = "test-secret";

/// Router over a throwaway store file and assets dir; both are removed on drop.
pub struct TestApp {
    pub router: Router,
    pub state: ServerState,
    store_path: PathBuf,
    assets_dir: PathBuf,
}

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_api_key(None).await
    }

    pub async fn with_api_key(key: Option<&str>) -> anyhow::Result<Self> {
        let id = uuid::Uuid::new_v4();
        let store_path = std::env::temp_dir().join(format!("chirpy_api_{id}.json"));
        let assets_dir = std::env::temp_dir().join(format!("chirpy_assets_{id}"));
        tokio::fs::create_dir_all(&assets_dir).await?;
        tokio::fs::write(assets_dir.join("index.html"), "<html>Welcome to Chirpy</html>").await?;

        let store: Arc<dyn ChirpyStore> = FileChirpyStore::open(&store_path).await?;
        let settings = AuthSettings {
            jwt_secret: SECRET.into(),
            polka_api_key: key.map(str::to_string),
            ..AuthSettings::default()
        };
        let state = ServerState::new(store, &settings)?;
        let router = routes::build_router(
            state.clone(),
            &assets_dir.to_string_lossy(),
            tower_http::cors::CorsLayer::very_permissive(),
        );
        Ok(Self { router, state, store_path, assets_dir })
    }

    pub async fn send(&self, req: Request<Body>) -> anyhow::Result<Response<Body>> {
        Ok(self.router.clone().oneshot(req).await?)
    }

    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<(u16, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(a) = auth {
            builder = builder.header(header::AUTHORIZATION, a);
        }
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };
        let resp = self.send(req).await?;
        let status = resp.status().as_u16();
        let bytes = resp.into_body().collect().await?.to_bytes();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        Ok((status, value))
    }

    /// Register and log in; returns (user id, access token, refresh token).
    pub async fn signup(&self, email: &str, password: &str) -> anyhow::Result<(u64, String, String)> {
        let creds = serde_json::json!({ "email": email, "password": password });
        let (status, _) = self.call("POST", "/api/users", None, Some(creds.clone())).await?;
        assert_eq!(status, 201);
        let (status, body) = self.call("POST", "/api/login", None, Some(creds)).await?;
        assert_eq!(status, 200);
        let id = body["id"].as_u64().unwrap_or_default();
        let token = body["token"].as_str().unwrap_or_default().to_string();
        let refresh = body["refresh_token"].as_str().unwrap_or_default().to_string();
        Ok((id, token, refresh))
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.store_path);
        let _ = std::fs::remove_dir_all(&self.assets_dir);
    }
}
