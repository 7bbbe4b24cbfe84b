//! # API Response Types
//!
//! Error body and pagination metadata shared by the API.
//!
//! ## Response Format
//!
//! ```json
//! { "status": "error", "code": "CONFLICT", "message": "...", "request_id": "..." }
//! ```

use serde::{Deserialize, Serialize};

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PaginationMeta {
    /// Current page number (1-indexed).
    pub page: u64,

    /// Number of items per page.
    pub per_page: u64,

    /// Total number of items.
    pub total_items: u64,

    /// Total number of pages.
    pub total_pages: u64,

    /// Has next page.
    pub has_next: bool,

    /// Has previous page.
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Maximum allowed page number.
    const MAX_PAGE: u64 = 1_000_000;

    /// Create a new pagination meta.
    ///
    /// `page` is clamped to `1..=MAX_PAGE`; a zero `per_page` yields zero pages.
    pub fn new(page: u64, per_page: u64, total_items: u64) -> Self {
        let page = page.clamp(1, Self::MAX_PAGE);
        let total_pages = if per_page == 0 {
            0
        }
        else {
            total_items.div_ceil(per_page)
        };
        Self {
            page,
            per_page,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// Body of every error response.
///
/// Rendered responses carry a copy in their extensions so that outer
/// middleware can attach the request id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename = "error")]
pub struct ErrorBody {
    /// Error code.
    pub code: String,

    /// Error message.
    pub message: String,

    /// Request ID for correlation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorBody {
    /// Create an error body without a request id.
    #[inline]
    pub fn new(code: impl ToString, message: impl ToString) -> Self {
        Self {
            code:       code.to_string(),
            message:    message.to_string(),
            request_id: None,
        }
    }

    /// Attach a request id.
    #[must_use]
    pub fn with_request_id(mut self, id: impl ToString) -> Self {
        self.request_id = Some(id.to_string());
        self
    }
}
