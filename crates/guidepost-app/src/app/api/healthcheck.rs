use salvo::writing::Json;
use salvo::{Router, handler};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

#[handler]
async fn liveness() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("healthcheck").get(liveness)
}
