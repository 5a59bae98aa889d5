use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// Root endpoint, a plain greeting for smoke checks
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Hello from the Classic Plus API" }))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
