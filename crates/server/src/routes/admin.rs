use axum::{extract::State, response::Html};

use crate::state::ServerState;

pub async fn healthz() -> &'static str {
    "OK"
}

pub async fn metrics(State(state): State<ServerState>) -> Html<String> {
    Html(format!(
        "<html><body><h1>Welcome, Chirpy Admin</h1><p>Chirpy has been visited {} times!</p></body></html>",
        state.hits.get()
    ))
}

pub async fn reset(State(state): State<ServerState>) -> &'static str {
    state.hits.reset();
    tracing::info!("hit counter reset");
    "Hits reset to 0"
}
