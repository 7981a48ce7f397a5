/*
 * Responsibility
 * - GET /me: echo the caller's claims (verify + authenticate in front)
 * - GET /admin: same, additionally behind the admin role gate
 */
use axum::Json;
use serde_json::{Value, json};

use crate::api::v1::extractors::AuthCtx;
use crate::services::auth::AppClaims;

pub async fn me(AuthCtx(claims): AuthCtx) -> Json<AppClaims> {
    Json(claims)
}

pub async fn admin(AuthCtx(claims): AuthCtx) -> Json<Value> {
    tracing::info!(sub = %claims.sub, "admin area accessed");
    Json(json!({"status": "ok", "admin": claims.sub}))
}
