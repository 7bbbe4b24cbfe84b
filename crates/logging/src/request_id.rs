//! # Request ID Tracking
//!
//! Identifiers correlating a request across log lines and error bodies.
//! Uses CUID2 for collision-resistant, URL-safe identifiers.

/// Header carrying the request id in and out of the service.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A request ID type using CUID2.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request ID using CUID2.
    #[inline]
    pub fn new() -> Self { Self(cuid2::create_id()) }

    /// Accept a caller-supplied id from a header value.
    ///
    /// Ids must be 20 to 64 characters of `[A-Za-z0-9_-]`; anything else is
    /// ignored so clients cannot inject arbitrary text into the logs.
    pub fn from_header(value: &str) -> Option<Self> {
        let value = value.trim();
        let valid_len = (20 ..= 64).contains(&value.len());
        if valid_len &&
            value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            Some(Self(value.to_string()))
        }
        else {
            None
        }
    }

    /// Get the request ID as a string.
    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for RequestId {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}
