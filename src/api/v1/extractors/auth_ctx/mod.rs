/*!
 * Authentication context extractors
 *
 * Responsibility:
 * - Hand the request-scoped auth context to handlers
 * - The middleware stages write it (request extensions); extractors only read
 *
 * Public API:
 * - AuthCtx     (AppClaims, empty when not authenticated; never rejects)
 * - RefreshCtx  (RefreshClaims, same rules)
 * - Verified    (raw VerificationOutcome; 401 if the verify stage did not run)
 */

mod core;

pub use self::core::{AuthCtx, RefreshCtx, Verified};
