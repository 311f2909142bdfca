//! Health and identity handlers.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// Root response, kept stable for existing frontends.
#[derive(Serialize)]
pub struct RootResponse {
    pub status: String,
    pub version: String,
}

/// Identity endpoint.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "SmartPress Backend Ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
