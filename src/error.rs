/*
 * Responsibility
 * - HTTP facing error type for the auth stages and handlers
 * - IntoResponse: status code + its plain status text, nothing else
 *   (which verification check failed is logged, never sent to the client)
 */
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let text = status.canonical_reason().unwrap_or_default();
        (status, text).into_response()
    }
}
