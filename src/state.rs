/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Built once at startup, read-only afterwards; Clone is cheap (Arc inside)
 */
use std::sync::Arc;

use crate::services::auth::Verifier;

#[derive(Clone, Debug)]
pub struct AppState {
    pub verifier: Arc<Verifier>,
}

impl AppState {
    pub fn new(verifier: Arc<Verifier>) -> Self {
        Self { verifier }
    }
}
