//! Unified error types for komik.
//!
//! Only conditions that survive to the render boundary live here. Mirror-level
//! and adapter-level failures are recovered lower down and never reach this enum
//! with their internal detail intact.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the komik server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty slug).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No source holds content under the requested identifier.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// Every mirror failed for the request.
    #[error("UPSTREAM_UNAVAILABLE: {0}")]
    Upstream(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP_CLIENT: {0}")]
    HttpClient(String),

    /// Output could not be serialized.
    #[error("SERIALIZE_FAILED: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::NotFound(msg) => (-32001, format!("not found: {msg}")),
            Error::Upstream(_) => (-32008, "content source temporarily unavailable".to_string()),
            Error::HttpClient(_) => (-32603, "internal error".to_string()),
            Error::Serialize(_) => (-32603, "internal error".to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
