use axum::{
    extract::{Request, State},
    http::{header::CACHE_CONTROL, HeaderValue},
    middleware::Next,
    response::Response,
};
use prometheus::IntCounter;

/// Counts requests served from the static file tree.
#[derive(Clone)]
pub struct HitCounter {
    counter: IntCounter,
}

impl HitCounter {
    pub fn new() -> prometheus::Result<Self> {
        let counter = IntCounter::new("chirpy_fileserver_hits_total", "Requests served under /app")?;
        Ok(Self { counter })
    }

    pub fn inc(&self) {
        self.counter.inc();
    }

    pub fn get(&self) -> u64 {
        self.counter.get()
    }

    pub fn reset(&self) {
        self.counter.reset();
    }
}

/// Middleware for the file server: count the hit and disable caching so
/// every page view reaches the server.
pub async fn count_hits(State(hits): State<HitCounter>, req: Request, next: Next) -> Response {
    hits.inc();
    let mut resp = next.run(req).await;
    resp.headers_mut().insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    resp
}
