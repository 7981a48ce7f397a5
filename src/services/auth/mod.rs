pub mod claims;
pub mod decoder;
pub mod factory;
pub mod locator;
pub mod token;
pub mod verifier;

pub use claims::{AppClaims, ClaimsError, RefreshClaims, Role};
pub use decoder::{Decoder, JwtDecoder, KeyMaterial};
pub use factory::build_verifier;
pub use locator::{Locator, TokenSource};
pub use token::Token;
pub use verifier::{VerificationOutcome, Verifier, VerifyError};
