use thiserror::Error;

/// Result type alias for Hive API operations
pub type Result<T> = std::result::Result<T, HiveError>;

/// Failures that abort a page fetch, search or detail lookup.
///
/// "Nothing found" is not represented here: lookups return `Option` (or
/// [`crate::first_post::FirstPostSearch::NotFound`]) for that. Malformed
/// profile metadata never surfaces as an error either; the normalizer absorbs it.
#[derive(Error, Debug)]
pub enum HiveError {
    /// Network failure, timeout or undecodable HTTP body
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status after retries were exhausted
    #[error("http status {status}")]
    HttpStatus { status: u16 },

    /// The node answered with a JSON-RPC `error` object
    #[error("rpc {code} {message}")]
    Remote { code: i64, message: String },

    /// The node answered, but not with something we can decode
    #[error("invalid rpc payload: {0}")]
    InvalidPayload(String),

    /// Caller asked for something the API cannot express (e.g. a zero page size)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl HiveError {
    /// True for failures reaching the endpoint (as opposed to the endpoint
    /// rejecting the call).
    pub fn is_transport(&self) -> bool {
        matches!(self, HiveError::Transport(_) | HiveError::HttpStatus { .. })
    }

    /// True when the HTTP status is worth another attempt.
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 500 | 502 | 503 | 504)
    }
}
