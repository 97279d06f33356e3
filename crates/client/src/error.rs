use storage::error::StorageError;
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Gateway returned HTTP {status}")]
    HttpStatus {
        status: u16,
        message: Option<String>,
    },

    #[error("Unexpected gateway response: {0}")]
    UnexpectedResponse(String),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ClientError {
    /// Message extracted from the gateway's `{ "error": ... }` body, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::HttpStatus {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::RequestError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
