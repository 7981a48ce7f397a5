/*
 * Responsibility
 * - v1 URL layout
 * - Decide which routes sit behind which auth stages
 *   - /health: public
 *   - /me: verify → authenticate
 *   - /admin: verify → authenticate → require_role(admin)
 *   - /session: verify → authenticate_refresh
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{
    account::{admin, me},
    health::health,
    session::session,
};
use crate::middleware::auth;
use crate::services::auth::Role;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    // Role gates go on first so they run after authenticate.
    let admin_only = auth::require(Router::new().route("/admin", get(admin)), Role::admin());

    let account = auth::protect(
        Router::new().route("/me", get(me)).merge(admin_only),
        state.verifier.clone(),
    );

    let refresh = auth::protect_refresh(
        Router::new().route("/session", get(session)),
        state.verifier.clone(),
    );

    Router::new()
        .route("/health", get(health))
        .merge(account)
        .merge(refresh)
}
