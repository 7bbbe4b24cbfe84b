//! # Data Transfer Objects Module
//!
//! Request and response types for API endpoints.

use serde::{Deserialize, Serialize};

pub mod settings;
pub mod teams;
pub mod tech_stacks;

/// Generic success response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Indicates operation success
    pub success: bool,

    /// Human-readable message
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Formats a timestamp the way every response does.
pub(crate) fn timestamp(value: &chrono::DateTime<chrono::Utc>) -> String { value.to_rfc3339() }
