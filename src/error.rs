//! Error handling for rcurl

use thiserror::Error;

/// Main error type for rcurl operations
///
/// Transport failures are deliberately absent: a request that reaches the
/// transport and fails there is recorded as a [`crate::http::TransportError`]
/// on the builder instead of being returned as an error.
#[derive(Error, Debug)]
pub enum CurlError {
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Argument already set: {0}")]
    ArgumentAlreadySet(String),

    #[error("Invalid communication method: {0}")]
    InvalidMethod(String),

    #[error("Invalid serializer: {0}")]
    InvalidSerializer(String),

    #[error("Request URL is not set")]
    MissingUrl,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for rcurl operations
pub type Result<T> = std::result::Result<T, CurlError>;
