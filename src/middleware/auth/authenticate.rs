//! Authenticate stage: enforce "must be verified" and publish parsed claims.
//!
//! Every failure is the same 401. The reason is logged, not returned.

use axum::{extract::Request, http::Extensions, middleware::Next, response::Response};

use super::context;
use crate::error::AppError;
use crate::services::auth::{AppClaims, ClaimsError, RefreshClaims, token::RawClaims};

/// Requires a verified access token; attaches [`AppClaims`].
pub async fn authenticate(mut req: Request, next: Next) -> Result<Response, AppError> {
    let claims = verified_claims(req.extensions(), AppClaims::parse)?;
    context::attach(req.extensions_mut(), claims);
    Ok(next.run(req).await)
}

/// Requires a verified refresh token; attaches [`RefreshClaims`].
pub async fn authenticate_refresh(mut req: Request, next: Next) -> Result<Response, AppError> {
    let claims = verified_claims(req.extensions(), RefreshClaims::parse)?;
    context::attach(req.extensions_mut(), claims);
    Ok(next.run(req).await)
}

fn verified_claims<T>(
    extensions: &Extensions,
    parse: fn(&RawClaims) -> Result<T, ClaimsError>,
) -> Result<T, AppError> {
    let Some(outcome) = context::outcome(extensions) else {
        tracing::warn!("no verification outcome on request (verify layer missing?)");
        return Err(AppError::Unauthorized);
    };

    if let Some(err) = outcome.error() {
        tracing::warn!(error = ?err, "token verification failed");
        return Err(AppError::Unauthorized);
    }

    let token = match outcome.token() {
        Some(token) if token.is_valid() => token,
        _ => {
            tracing::warn!("token missing or not valid");
            return Err(AppError::Unauthorized);
        }
    };

    parse(token.claims()).map_err(|err| {
        tracing::warn!(error = %err, "token claims could not be parsed");
        AppError::Unauthorized
    })
}
