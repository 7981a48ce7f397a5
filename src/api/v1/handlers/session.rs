/*
 * Responsibility
 * - GET /session: report which account a refresh token belongs to
 *   (verify + authenticate_refresh in front; issuing new tokens is not done here)
 */
use axum::Json;
use serde_json::{Value, json};

use crate::api::v1::extractors::RefreshCtx;

pub async fn session(RefreshCtx(claims): RefreshCtx) -> Json<Value> {
    Json(json!({"id": claims.id}))
}
