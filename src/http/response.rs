//! Execution results and transfer metadata

use serde::Serialize;
use std::fmt;

/// Raw value produced by one transport execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawResult {
    /// The transfer failed; the falsy sentinel
    Failed,
    /// The transfer succeeded and the body went to stdout
    Completed,
    /// The transfer succeeded and the body was returned
    Body(String),
}

impl RawResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, RawResult::Failed)
    }

    pub fn as_body(&self) -> Option<&str> {
        match self {
            RawResult::Body(body) => Some(body),
            _ => None,
        }
    }

    pub fn into_body(self) -> Option<String> {
        match self {
            RawResult::Body(body) => Some(body),
            _ => None,
        }
    }
}

/// Metadata reported by the transport after execution
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransferInfo {
    /// Effective URL, after redirects
    pub url: String,
    /// HTTP status; 0 when no response was received
    pub http_code: u16,
    pub content_type: Option<String>,
    /// Seconds spent on the whole transfer
    pub total_time: f64,
    pub size_download: u64,
}

/// Failure reported by the transport, kept as data rather than raised
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportError {
    pub code: u32,
    pub message: String,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error {}: {}", self.code, self.message)
    }
}

/// Everything captured from a handle before it was closed
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub result: RawResult,
    pub info: TransferInfo,
    pub error_code: u32,
    pub error_message: String,
}

impl Transfer {
    /// The structured error, present only for a non-zero error code
    pub fn error(&self) -> Option<TransportError> {
        (self.error_code != 0).then(|| TransportError {
            code: self.error_code,
            message: self.error_message.clone(),
        })
    }
}
