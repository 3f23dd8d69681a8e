use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use service::{file::chirpy_store::FileChirpyStore, runtime, store::ChirpyStore};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the store and assemble the router for `config`.
pub async fn build_app(config: &AppConfig, debug: bool) -> anyhow::Result<Router> {
    // 目录检查；--debug 时清空存储文件
    runtime::prepare_store(&config.server.assets_dir, &config.storage.path, debug).await?;
    let store: Arc<dyn ChirpyStore> = FileChirpyStore::open(&config.storage.path).await?;

    // 未配置回调密钥时仅告警，不拒绝请求
    if config.auth.polka_api_key.is_none() {
        warn!("POLKA_WEBHOOK_API_KEY not set; webhook calls are accepted without an api key");
    }
    let state = ServerState::new(store, &config.auth)?;
    Ok(routes::build_router(state, &config.server.assets_dir, build_cors()))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(config: AppConfig, debug: bool) -> anyhow::Result<()> {
    let app = build_app(&config, debug).await?;

    // 绑定地址并启动服务
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, store = %config.storage.path, "chirpy listening");
    axum::serve(listener, app).await?;
    Ok(())
}
