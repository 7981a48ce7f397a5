//! Factory: build the process-wide `Verifier` from `AuthConfig`.
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::services::auth::{
    Verifier,
    decoder::{AuthSetupError, JwtDecoder},
    locator::Locator,
};

pub fn build_verifier(config: &AuthConfig) -> Result<Arc<Verifier>, AuthSetupError> {
    let mut decoder = JwtDecoder::new(config.algorithm, &config.key, config.leeway_seconds)?;
    if let Some(issuer) = config.issuer.as_deref() {
        decoder = decoder.with_issuer(issuer);
    }
    if let Some(audience) = config.audience.as_deref() {
        decoder = decoder.with_audience(audience);
    }

    let locator = Locator::new(config.sources.clone());

    tracing::info!(
        algorithm = ?config.algorithm,
        token_name = %config.token_name,
        sources = ?locator.sources(),
        "token verifier ready"
    );

    Ok(Arc::new(Verifier::new(
        locator,
        Arc::new(decoder),
        config.algorithm,
    )))
}
