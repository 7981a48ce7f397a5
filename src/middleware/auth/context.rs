//! Request-scoped auth context.
//!
//! Values travel in the request's `http::Extensions`, keyed by type. Only the
//! types listed here can be attached, each at most once per request: a second
//! attach of the same type is refused and the first value stays.

use axum::http::Extensions;

use crate::services::auth::{AppClaims, RefreshClaims, VerificationOutcome};

mod sealed {
    pub trait Sealed {}
}

/// Types that may be carried on a request.
pub trait ContextValue: sealed::Sealed + Clone + Send + Sync + 'static {}

impl sealed::Sealed for VerificationOutcome {}
impl ContextValue for VerificationOutcome {}
impl sealed::Sealed for AppClaims {}
impl ContextValue for AppClaims {}
impl sealed::Sealed for RefreshClaims {}
impl ContextValue for RefreshClaims {}

/// Attach `value` unless one of the same type is already present.
///
/// Returns `false` (and keeps the existing value) when it was already attached.
pub fn attach<T: ContextValue>(extensions: &mut Extensions, value: T) -> bool {
    if extensions.get::<T>().is_some() {
        tracing::warn!(
            value = std::any::type_name::<T>(),
            "auth context value already attached, keeping the first one"
        );
        return false;
    }
    extensions.insert(value);
    true
}

/// `None` means the verify stage did not run for this request.
pub fn outcome(extensions: &Extensions) -> Option<&VerificationOutcome> {
    extensions.get::<VerificationOutcome>()
}

/// Claims attached by `authenticate`, or the empty claim set.
pub fn app_claims(extensions: &Extensions) -> AppClaims {
    extensions.get::<AppClaims>().cloned().unwrap_or_default()
}

/// Claims attached by `authenticate_refresh`, or the empty claim set.
pub fn refresh_claims(extensions: &Extensions) -> RefreshClaims {
    extensions.get::<RefreshClaims>().cloned().unwrap_or_default()
}
