pub mod admin;
pub mod auth;
pub mod chirps;
pub mod users;
pub mod webhooks;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::metrics::count_hits;
use crate::state::ServerState;

/// Build the full application router: static files under `/app`, the JSON
/// API under `/api` and the admin page.
pub fn build_router(state: ServerState, assets_dir: &str, cors: CorsLayer) -> Router {
    // 静态文件：每次请求计入访问次数
    let app_files = Router::new()
        .nest_service("/app", ServeDir::new(assets_dir))
        .layer(middleware::from_fn_with_state(state.hits.clone(), count_hits));

    // JSON API
    let api = Router::new()
        .route("/api/healthz", get(admin::healthz))
        .route("/api/reset", get(admin::reset))
        .route("/api/users", post(users::create_user).put(users::update_user))
        .route("/api/login", post(auth::login))
        .route("/api/refresh", post(auth::refresh))
        .route("/api/revoke", post(auth::revoke))
        .route("/api/chirps", post(chirps::create_chirp).get(chirps::list_chirps))
        .route("/api/chirps/:id", get(chirps::get_chirp).delete(chirps::delete_chirp))
        .route("/api/polka/webhooks", post(webhooks::polka_webhook));

    // 管理端点
    let admin_routes = Router::new().route("/admin/metrics", get(admin::metrics));

    app_files
        .merge(api.merge(admin_routes).with_state(state))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
