use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::context;
use crate::error::AppError;
use crate::services::auth::Role;

/// Role gate. Must run after `authenticate`; without claims the request is rejected.
///
/// Stack several gates to require several roles.
pub async fn require_role(
    State(role): State<Role>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = context::app_claims(req.extensions());

    if !claims.has_role(&role) {
        tracing::warn!(required = %role, sub = %claims.sub, "missing required role");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(req).await)
}
