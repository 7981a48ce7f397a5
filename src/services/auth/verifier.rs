//! Locate → decode → classify.
//!
//! The verifier never rejects anything. It produces a [`VerificationOutcome`]
//! that the verify middleware records on the request; the policy stage that
//! follows decides what to do with it.

use std::fmt;
use std::sync::Arc;

use axum::http::request::Parts;
use jsonwebtoken::Algorithm;
use thiserror::Error;

use super::decoder::{DecodeErrorKind, Decoder};
use super::locator::Locator;
use super::token::Token;

/// Why a request is not carrying a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("no token found")]
    NoCredentialFound,
    #[error("token is expired")]
    Expired,
    #[error("invalid issued at")]
    IssuedAtInvalid,
    #[error("token nbf validation failed")]
    NotYetValid,
    #[error("algorithm mismatch")]
    AlgorithmMismatch,
    #[error("token decode failed: {0}")]
    Decode(String),
}

impl From<DecodeErrorKind> for VerifyError {
    fn from(kind: DecodeErrorKind) -> Self {
        match kind {
            DecodeErrorKind::Expired => Self::Expired,
            DecodeErrorKind::IssuedAtInvalid => Self::IssuedAtInvalid,
            DecodeErrorKind::NotYetValid => Self::NotYetValid,
            DecodeErrorKind::Other(reason) => Self::Decode(reason),
        }
    }
}

/// Result of verifying one request. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationOutcome {
    token: Option<Token>,
    error: Option<VerifyError>,
}

impl VerificationOutcome {
    pub fn new(token: Option<Token>, error: Option<VerifyError>) -> Self {
        Self { token, error }
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn error(&self) -> Option<&VerifyError> {
        self.error.as_ref()
    }

    /// No classified error and a token that verified.
    pub fn is_verified(&self) -> bool {
        self.error.is_none() && self.token.as_ref().is_some_and(Token::is_valid)
    }
}

#[derive(Clone)]
pub struct Verifier {
    locator: Locator,
    decoder: Arc<dyn Decoder>,
    algorithm: Algorithm,
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("locator", &self.locator)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl Verifier {
    /// `algorithm` is the only signing algorithm trusted, whatever the decoder accepts.
    pub fn new(locator: Locator, decoder: Arc<dyn Decoder>, algorithm: Algorithm) -> Self {
        Self {
            locator,
            decoder,
            algorithm,
        }
    }

    pub fn verify(&self, parts: &Parts) -> VerificationOutcome {
        match self.locator.locate(parts) {
            Some(credential) => self.verify_credential(&credential),
            None => VerificationOutcome::new(None, Some(VerifyError::NoCredentialFound)),
        }
    }

    pub fn verify_credential(&self, credential: &str) -> VerificationOutcome {
        match self.decoder.decode(credential) {
            Err(failure) => VerificationOutcome::new(failure.token, Some(failure.kind.into())),
            Ok(token) if token.alg() != self.algorithm => {
                VerificationOutcome::new(Some(token), Some(VerifyError::AlgorithmMismatch))
            }
            Ok(token) => VerificationOutcome::new(Some(token), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::decoder::{DecodeFailure, JwtDecoder, KeyMaterial};
    use crate::services::auth::token::RawClaims;
    use axum::http::Request;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::{Value, json};

    const SECRET: &str = "verifier-test-secret";

    fn sign(alg: Algorithm, claims: Value) -> String {
        jsonwebtoken::encode(
            &Header::new(alg),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn verifier() -> Verifier {
        let decoder =
            JwtDecoder::new(Algorithm::HS256, &KeyMaterial::Secret(SECRET.into()), 0).unwrap();
        Verifier::new(Locator::default(), Arc::new(decoder), Algorithm::HS256)
    }

    fn bearer(token: &str) -> Parts {
        Request::builder()
            .uri("/")
            .header("authorization", format!("Bearer {token}"))
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn missing_credential_is_no_credential_found() {
        let parts = Request::builder().uri("/").body(()).unwrap().into_parts().0;
        let outcome = verifier().verify(&parts);
        assert_eq!(outcome.error(), Some(&VerifyError::NoCredentialFound));
        assert!(outcome.token().is_none());
        assert!(!outcome.is_verified());
    }

    #[test]
    fn valid_token_is_verified() {
        let token = sign(Algorithm::HS256, json!({"exp": Utc::now().timestamp() + 60}));
        let outcome = verifier().verify(&bearer(&token));
        assert!(outcome.is_verified());
        assert_eq!(outcome.error(), None);
    }

    #[test]
    fn expired_token_is_classified_and_kept() {
        let token = sign(
            Algorithm::HS256,
            json!({"sub": "bob", "exp": Utc::now().timestamp() - 60}),
        );
        let outcome = verifier().verify(&bearer(&token));
        assert_eq!(outcome.error(), Some(&VerifyError::Expired));
        assert_eq!(outcome.token().unwrap().claims()["sub"], "bob");
    }

    #[test]
    fn sibling_algorithm_is_mismatch_even_though_signature_verifies() {
        let token = sign(Algorithm::HS384, json!({"exp": Utc::now().timestamp() + 60}));
        let outcome = verifier().verify(&bearer(&token));
        assert_eq!(outcome.error(), Some(&VerifyError::AlgorithmMismatch));
        let decoded = outcome.token().unwrap();
        assert!(decoded.is_valid());
        assert_eq!(decoded.alg(), Algorithm::HS384);
    }

    #[test]
    fn decode_kinds_map_one_to_one() {
        struct Failing(DecodeErrorKind);

        impl Decoder for Failing {
            fn decode(&self, _credential: &str) -> Result<Token, DecodeFailure> {
                Err(DecodeFailure::new(None, self.0.clone()))
            }
        }

        let cases = [
            (DecodeErrorKind::Expired, VerifyError::Expired),
            (DecodeErrorKind::IssuedAtInvalid, VerifyError::IssuedAtInvalid),
            (DecodeErrorKind::NotYetValid, VerifyError::NotYetValid),
            (
                DecodeErrorKind::Other("InvalidSignature".into()),
                VerifyError::Decode("InvalidSignature".into()),
            ),
        ];

        for (kind, expected) in cases {
            let v = Verifier::new(Locator::default(), Arc::new(Failing(kind)), Algorithm::HS256);
            assert_eq!(v.verify_credential("x").error(), Some(&expected));
        }
    }

    #[test]
    fn stub_decoder_result_passes_through() {
        struct Fixed;

        impl Decoder for Fixed {
            fn decode(&self, _credential: &str) -> Result<Token, DecodeFailure> {
                Ok(Token::new(Algorithm::RS256, RawClaims::new(), true))
            }
        }

        let v = Verifier::new(Locator::default(), Arc::new(Fixed), Algorithm::RS256);
        assert!(v.verify_credential("anything").is_verified());
    }
}
