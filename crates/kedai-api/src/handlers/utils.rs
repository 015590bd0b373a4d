//! Liveness endpoints.

use axum::{response::IntoResponse, Json};

use kedai_core::{Message, Status};

/// Versioned liveness check.
#[utoipa::path(
    get,
    path = "/api/v1/utils/health",
    tag = "utils",
    responses((status = 200, description = "Service is up", body = Status))
)]
pub async fn health() -> Json<Status> {
    Json(Status { ok: true })
}

/// Unversioned health check with the build version.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn root() -> Json<Message> {
    Json(Message {
        message: "Hello World".to_string(),
    })
}
