//! Bearer token pipeline as axum middleware.
//!
//! Stages, outermost first:
//! 1. [`verify`]: locate + decode + classify, record a `VerificationOutcome`
//! 2. [`authenticate`] / [`authenticate_refresh`]: 401 unless verified, publish claims
//! 3. [`require_role`]: 401 unless the claims carry a role (optional, stackable)
//!
//! axum runs the layer added last first, so role gates are added before
//! `protect`:
//!
//! ```ignore
//! let admin = middleware::auth::require(admin_routes, Role::admin());
//! let api = middleware::auth::protect(account_routes.merge(admin), verifier);
//! ```

pub mod authenticate;
pub mod context;
pub mod role;
pub mod verify;

use std::sync::Arc;

use axum::{Router, middleware};

use crate::services::auth::{Role, Verifier};

pub use authenticate::{authenticate, authenticate_refresh};
pub use role::require_role;
pub use verify::verify;

/// verify → authenticate on every route of `router`.
pub fn protect<S>(router: Router<S>, verifier: Arc<Verifier>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route_layer(middleware::from_fn(authenticate))
        .route_layer(middleware::from_fn_with_state(verifier, verify))
}

/// verify → authenticate_refresh on every route of `router`.
pub fn protect_refresh<S>(router: Router<S>, verifier: Arc<Verifier>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route_layer(middleware::from_fn(authenticate_refresh))
        .route_layer(middleware::from_fn_with_state(verifier, verify))
}

/// Role gate on every route of `router`. Apply before `protect`.
pub fn require<S>(router: Router<S>, role: Role) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(role, require_role))
}
