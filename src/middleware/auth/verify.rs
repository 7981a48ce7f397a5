//! Verify stage: find + decode the credential and record the outcome.
//!
//! Always forwards. Rejection is the job of the next stage (`authenticate`, or
//! a custom one that reads `context::outcome` and answers however it likes).

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::context;
use crate::services::auth::Verifier;

pub async fn verify(
    State(verifier): State<Arc<Verifier>>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let outcome = verifier.verify(&parts);
    if let Some(err) = outcome.error() {
        tracing::debug!(error = %err, "request carries no verified token");
    }
    context::attach(&mut parts.extensions, outcome);

    next.run(Request::from_parts(parts, body)).await
}
