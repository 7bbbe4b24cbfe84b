//! # Error Response Rendering
//!
//! Converts [`AppError`] into HTTP responses for Axum handlers.
//!
//! ## Usage
//!
//! ```rust
//! use error::{AppError, ErrorHandler};
//!
//! let handler = ErrorHandler::new(false);
//! let error = AppError::not_found("Team not found");
//! let response = handler.to_response(&error);
//! assert_eq!(response.status(), 404);
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{response::ErrorBody, AppError};

/// Error handler that converts errors to HTTP responses.
#[derive(Clone, Debug)]
pub struct ErrorHandler {
    /// Whether to include server-side error details in the response.
    pub include_details: bool,
}

impl ErrorHandler {
    /// Create a new error handler.
    #[inline]
    pub fn new(include_details: bool) -> Self {
        Self {
            include_details,
        }
    }

    /// The message shown to the client.
    ///
    /// Client errors always carry their own message. Server errors collapse
    /// to a generic message unless `include_details` is set.
    pub fn client_message(&self, err: &AppError) -> String {
        if err.is_client_error() || self.include_details {
            return err.message();
        }
        match err.status() {
            StatusCode::BAD_GATEWAY => "An external service failed. Please try again later.".to_string(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Convert an error to a response.
    pub fn to_response(&self, err: &AppError) -> Response {
        let status = err.status();
        if status.is_server_error() {
            tracing::error!(code = err.code(), error = %err, "Request failed");
        }
        else {
            tracing::debug!(code = err.code(), error = %err, "Request rejected");
        }

        let body = ErrorBody::new(err.code(), self.client_message(err));
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);

        if matches!(err, AppError::Unauthorized { .. } | AppError::JwtExpired | AppError::JwtInvalidToken) {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}

impl Default for ErrorHandler {
    fn default() -> Self { Self::new(false) }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response { ErrorHandler::default().to_response(&self) }
}
