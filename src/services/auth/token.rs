//! Decoded token as handed out by a [`Decoder`](super::decoder::Decoder).

use jsonwebtoken::Algorithm;
use serde_json::{Map, Value};

/// Raw claim set exactly as it appeared in the token payload.
pub type RawClaims = Map<String, Value>;

/// A credential after decoding.
///
/// - `valid` is only `true` when the signature verified and the time window held.
/// - A token that failed verification may still be carried (with `valid = false`)
///   so later stages can inspect its header/claims.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    alg: Algorithm,
    claims: RawClaims,
    valid: bool,
}

impl Token {
    pub fn new(alg: Algorithm, claims: RawClaims, valid: bool) -> Self {
        Self { alg, claims, valid }
    }

    /// Signing algorithm named in the token header.
    pub fn alg(&self) -> Algorithm {
        self.alg
    }

    pub fn claims(&self) -> &RawClaims {
        &self.claims
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// NumericDate claims may be encoded as integers or floats.
pub(crate) fn as_seconds(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}
