//! Health check handler.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves traffic.
    pub status: &'static str,
}

/// Liveness probe.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
