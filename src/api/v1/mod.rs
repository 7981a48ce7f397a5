/*
 * Responsibility
 * - v1 entry point (routes() re-export, extractors for handlers)
 */
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
