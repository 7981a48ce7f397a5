//! Bearer token authentication pipeline for axum services.
//!
//! A request passes through up to three stages:
//! - `verify`: find the credential (query / `Authorization: Bearer` / cookie,
//!   in configured order), decode it and record a classified outcome
//! - `authenticate`: reject with 401 unless the outcome is a verified token
//!   with parsable claims, then publish `AppClaims`
//! - `require_role`: reject with 401 unless a role is present in the claims
//!
//! See [`middleware::auth`] for wiring and [`services::auth`] for the pieces.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
