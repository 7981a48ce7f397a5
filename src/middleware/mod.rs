/*
 * Responsibility
 * - auth: bearer token pipeline (verify / authenticate / role gates)
 * - http: request id, access log, timeout for the whole router
 */
pub mod auth;
pub mod http;
