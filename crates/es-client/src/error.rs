use thiserror::Error;
use validate::ValidationError;

#[derive(Debug, Error)]
pub enum EsError {
    /// A hostname or duration argument was not text, or was malformed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unsupported Elasticsearch version '{version}': major version '{major}' is not one of 1, 2, 5, 6, 7")]
    UnsupportedVersion { version: String, major: String },

    /// The cluster reported more hits than it delivered before the scroll ran dry
    #[error("expected {expected} results, instead got {got}")]
    Incomplete { expected: usize, got: usize },

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-2xx response, after any retries
    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, EsError>;
