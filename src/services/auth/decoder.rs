//! Credential decoding (signature + time window).
//!
//! The [`Decoder`] trait is the seam between the pipeline and the crypto
//! library. Failures come back as a closed [`DecodeErrorKind`] so callers never
//! have to inspect library-specific error values.
//!
//! [`JwtDecoder`] is the `jsonwebtoken` backed implementation:
//! - every algorithm of the configured key family is accepted at decode time;
//!   the verifier compares the header `alg` against the expected one afterwards
//! - the signature is checked before the time window, so a forged token is
//!   never reported as merely expired
//! - `exp` / `iat` / `nbf` are checked here (in that order) with a leeway

use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::Value;
use thiserror::Error;

use super::token::{RawClaims, Token, as_seconds};

/// Reason a credential could not be turned into a valid token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    #[error("token is expired")]
    Expired,
    #[error("token used before issued")]
    IssuedAtInvalid,
    #[error("token is not valid yet")]
    NotYetValid,
    #[error("{0}")]
    Other(String),
}

/// Decode failure, keeping whatever could be read from the token.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct DecodeFailure {
    pub token: Option<Token>,
    pub kind: DecodeErrorKind,
}

impl DecodeFailure {
    pub fn new(token: Option<Token>, kind: DecodeErrorKind) -> Self {
        Self { token, kind }
    }
}

/// Turns a credential string into a [`Token`].
///
/// Implementations must be pure and cheap enough to run inline on every request.
pub trait Decoder: Send + Sync {
    fn decode(&self, credential: &str) -> Result<Token, DecodeFailure>;
}

/// Errors raised while building a decoder at startup.
#[derive(Debug, Error)]
pub enum AuthSetupError {
    #[error("{alg:?} cannot be used with {material} key material")]
    KeyMismatch {
        alg: Algorithm,
        material: &'static str,
    },
    #[error("invalid key: {0}")]
    InvalidKey(#[from] jsonwebtoken::errors::Error),
}

/// Key material for verifying signatures.
#[derive(Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    /// Shared secret for the HMAC family.
    Secret(String),
    /// PEM encoded public key for RSA / EC / EdDSA.
    Pem(String),
}

impl KeyMaterial {
    fn label(&self) -> &'static str {
        match self {
            Self::Secret(_) => "shared secret",
            Self::Pem(_) => "PEM",
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material
        match self {
            Self::Secret(_) => f.write_str("Secret(..)"),
            Self::Pem(_) => f.write_str("Pem(..)"),
        }
    }
}

/// Algorithms that share one kind of verification key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    Hmac,
    Rsa,
    Ec,
    Ed,
}

impl KeyFamily {
    pub fn of(alg: Algorithm) -> Self {
        match alg {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Self::Hmac,
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => Self::Rsa,
            Algorithm::ES256 | Algorithm::ES384 => Self::Ec,
            Algorithm::EdDSA => Self::Ed,
        }
    }

    pub fn algorithms(self) -> Vec<Algorithm> {
        match self {
            Self::Hmac => vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512],
            Self::Rsa => vec![
                Algorithm::RS256,
                Algorithm::RS384,
                Algorithm::RS512,
                Algorithm::PS256,
                Algorithm::PS384,
                Algorithm::PS512,
            ],
            Self::Ec => vec![Algorithm::ES256, Algorithm::ES384],
            Self::Ed => vec![Algorithm::EdDSA],
        }
    }

    pub fn uses_secret(self) -> bool {
        matches!(self, Self::Hmac)
    }
}

/// `jsonwebtoken` backed decoder.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
    leeway: i64,
}

impl fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.leeway)
            .finish()
    }
}

impl JwtDecoder {
    pub fn new(
        alg: Algorithm,
        key: &KeyMaterial,
        leeway_seconds: u64,
    ) -> Result<Self, AuthSetupError> {
        let family = KeyFamily::of(alg);
        let decoding_key = match (family, key) {
            (KeyFamily::Hmac, KeyMaterial::Secret(secret)) => {
                DecodingKey::from_secret(secret.as_bytes())
            }
            (KeyFamily::Rsa, KeyMaterial::Pem(pem)) => DecodingKey::from_rsa_pem(pem.as_bytes())?,
            (KeyFamily::Ec, KeyMaterial::Pem(pem)) => DecodingKey::from_ec_pem(pem.as_bytes())?,
            (KeyFamily::Ed, KeyMaterial::Pem(pem)) => DecodingKey::from_ed_pem(pem.as_bytes())?,
            _ => {
                return Err(AuthSetupError::KeyMismatch {
                    alg,
                    material: key.label(),
                });
            }
        };

        // Time claims are checked by `check_window` so that each failure maps to its own kind.
        let mut validation = Validation::new(alg);
        validation.algorithms = family.algorithms();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
            leeway: i64::try_from(leeway_seconds).unwrap_or(i64::MAX),
        })
    }

    /// Require the `iss` claim to be present and match this value.
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self.validation.required_spec_claims.insert("iss".to_string());
        self
    }

    /// Require the `aud` claim to be present and contain this value.
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self.validation.required_spec_claims.insert("aud".to_string());
        self
    }

    fn check_window(&self, claims: &RawClaims, now: i64) -> Result<(), DecodeErrorKind> {
        if let Some(exp) = timestamp(claims, "exp")? {
            if exp < now.saturating_sub(self.leeway) {
                return Err(DecodeErrorKind::Expired);
            }
        }
        if let Some(iat) = timestamp(claims, "iat")? {
            if iat > now.saturating_add(self.leeway) {
                return Err(DecodeErrorKind::IssuedAtInvalid);
            }
        }
        if let Some(nbf) = timestamp(claims, "nbf")? {
            if nbf > now.saturating_add(self.leeway) {
                return Err(DecodeErrorKind::NotYetValid);
            }
        }
        Ok(())
    }
}

impl Decoder for JwtDecoder {
    fn decode(&self, credential: &str) -> Result<Token, DecodeFailure> {
        let data = jsonwebtoken::decode::<RawClaims>(credential, &self.decoding_key, &self.validation)
            .map_err(|e| DecodeFailure::new(peek(credential), DecodeErrorKind::Other(e.to_string())))?;

        let alg = data.header.alg;
        let claims = data.claims;

        if let Err(kind) = self.check_window(&claims, Utc::now().timestamp()) {
            return Err(DecodeFailure::new(Some(Token::new(alg, claims, false)), kind));
        }

        Ok(Token::new(alg, claims, true))
    }
}

fn timestamp(claims: &RawClaims, name: &'static str) -> Result<Option<i64>, DecodeErrorKind> {
    match claims.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => as_seconds(v)
            .map(Some)
            .ok_or_else(|| DecodeErrorKind::Other(format!("invalid '{name}' claim"))),
    }
}

// Unverified read of header + payload, used only to keep a partial token next to an error.
fn peek(credential: &str) -> Option<Token> {
    let header = jsonwebtoken::decode_header(credential).ok()?;
    let payload = credential.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims = serde_json::from_slice::<RawClaims>(&bytes).ok()?;
    Some(Token::new(header.alg, claims, false))
}
