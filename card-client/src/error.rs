//! Client error types

use reqwest::StatusCode;
use shared::error::{ErrorInfo, ErrorKind, FieldErrors};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Unclassified non-success status
    #[error("Server error ({status}): {message}")]
    Status { status: StatusCode, message: String },

    /// Validation error (400/422)
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: FieldErrors,
    },

    /// State conflict (409), e.g. stock exhausted
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authentication required
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session storage failed
    #[error("Session error: {0}")]
    Session(#[from] std::io::Error),
}

impl ClientError {
    /// Recovery class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Unauthorized(_) | Self::Forbidden(_) => ErrorKind::Auth,
            Self::Status { status, .. } => ErrorKind::from_status(*status),
            Self::Http(_)
            | Self::NotFound(_)
            | Self::InvalidResponse(_)
            | Self::Serialization(_)
            | Self::Session(_) => ErrorKind::Transport,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Message suitable for display, without the variant prefix
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Status { message, .. } => message.clone(),
            Self::Conflict(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::InvalidResponse(m) => m.clone(),
            other => other.to_string(),
        }
    }

    /// Normalize into the renderable error record
    pub fn to_info(&self) -> ErrorInfo {
        match self {
            Self::Validation {
                message,
                field_errors,
            } => ErrorInfo {
                kind: ErrorKind::Validation,
                message: message.clone(),
                field_errors: (!field_errors.is_empty()).then(|| field_errors.clone()),
            },
            other => ErrorInfo::new(other.kind(), other.message()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
