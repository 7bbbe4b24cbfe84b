//! # Rejection Handlers
//!
//! Converts Axum extractor rejections into [`AppError`] so malformed bodies
//! and query strings share the standard error envelope.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};

use crate::AppError;

/// Turn serde's "missing field `name` at line 1 column 2" into a readable message.
fn humanize_body_error(error_message: String) -> String {
    let Some(start) = error_message.find("missing field `") else {
        return error_message;
    };
    let rest = &error_message[start + 15 ..];
    match rest.find('`') {
        Some(end) => format!("Missing required field: {}", &rest[.. end]),
        None => error_message,
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self { AppError::bad_request(humanize_body_error(rejection.body_text())) }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(format!(
            "Query string deserialization error: {}",
            rejection.body_text()
        ))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}
