use salvo::{Router, handler};

#[handler]
async fn health() -> &'static str {
    "OK"
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("health").get(health)
}
