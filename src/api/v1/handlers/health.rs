/*
 * Responsibility
 * - GET /api/v1/health (liveness, outside the auth pipeline)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
