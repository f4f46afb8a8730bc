//! Error kind classification

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// How a failure is surfaced and recovered from
///
/// - `Validation`: shown per field, snapshot untouched
/// - `Conflict`: shown as a banner, caller refreshes to resynchronize
/// - `Transport`: network or server failure, user may retry
/// - `Auth`: session rejected, message passed through as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Conflict,
    Transport,
    Auth,
}

impl ErrorKind {
    /// Classify a non-success HTTP status
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::Validation,
            StatusCode::CONFLICT => Self::Conflict,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth,
            _ => Self::Transport,
        }
    }

    /// Get the string name for this kind
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::Transport => "transport",
            Self::Auth => "auth",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_status() {
        assert_eq!(ErrorKind::from_status(StatusCode::UNPROCESSABLE_ENTITY), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(StatusCode::BAD_REQUEST), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(StatusCode::CONFLICT), ErrorKind::Conflict);
        assert_eq!(ErrorKind::from_status(StatusCode::UNAUTHORIZED), ErrorKind::Auth);
        assert_eq!(ErrorKind::from_status(StatusCode::FORBIDDEN), ErrorKind::Auth);
        assert_eq!(ErrorKind::from_status(StatusCode::NOT_FOUND), ErrorKind::Transport);
        assert_eq!(ErrorKind::from_status(StatusCode::BAD_GATEWAY), ErrorKind::Transport);
    }

    #[test]
    fn test_kind_serialize() {
        let json = serde_json::to_string(&ErrorKind::Conflict).unwrap();
        assert_eq!(json, "\"conflict\"");

        let kind: ErrorKind = serde_json::from_str("\"transport\"").unwrap();
        assert_eq!(kind, ErrorKind::Transport);
    }
}
