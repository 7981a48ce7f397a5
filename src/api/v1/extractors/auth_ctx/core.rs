use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::middleware::auth::context;
use crate::services::auth::{AppClaims, RefreshClaims, VerificationOutcome};

/// Claims published by `authenticate`.
/// Without that stage this is the empty claim set, so handlers need no presence check.
#[derive(Debug, Clone)]
pub struct AuthCtx(pub AppClaims);

impl<S> FromRequestParts<S> for AuthCtx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(AuthCtx(context::app_claims(&parts.extensions)))
    }
}

/// Claims published by `authenticate_refresh`.
#[derive(Debug, Clone)]
pub struct RefreshCtx(pub RefreshClaims);

impl<S> FromRequestParts<S> for RefreshCtx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RefreshCtx(context::refresh_claims(&parts.extensions)))
    }
}

/// The verify stage's outcome, for handlers or custom stages that apply their own policy.
/// 401 when the verify stage is not installed.
#[derive(Debug, Clone)]
pub struct Verified(pub VerificationOutcome);

impl<S> FromRequestParts<S> for Verified
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        context::outcome(&parts.extensions)
            .cloned()
            .map(Verified)
            .ok_or(AppError::Unauthorized)
    }
}
