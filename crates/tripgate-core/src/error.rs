use thiserror::Error;

/// Errors related to the core value types.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid profile id: {0}")]
    InvalidProfileId(String),
    #[error("invalid profile base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Errors raised when the upstream payload cannot be read as an object at all.
///
/// A payload without any recognizable trip list is *not* an error.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("payload is not valid json: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("payload is not a json object (found {0})")]
    NotAnObject(&'static str),
}

/// Reasons a single trip element is dropped during normalization.
#[derive(Debug, Error)]
pub enum TripError {
    #[error("trip element has an unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("trip slug is empty")]
    EmptySlug,
    #[error("trip timestamp {0} is not representable")]
    Timestamp(i64),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream request failed: {0}")]
    Transport(String),
    #[error("upstream request timed out: {0}")]
    Timeout(String),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("upstream response could not be decoded: {0}")]
    Decode(String),
}

/// Failure reported by a side-effect sink.
///
/// Sinks own their error types; the dispatcher only needs to log them.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct SinkError(Box<dyn std::error::Error + Send + Sync>);

impl SinkError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}
