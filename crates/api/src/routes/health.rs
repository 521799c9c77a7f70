//! Liveness endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Liveness response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service name.
    pub service: &'static str,
    /// Always `ok` while the process serves requests.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "leavedesk",
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates the unauthenticated liveness route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
