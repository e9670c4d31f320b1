use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed taxonomy used to classify why a transition was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NetworkError,
    AuthRequired,
    ServerError,
    ValidationError,
    PermissionDenied,
    InvalidState,
    InvalidMode,
    UnauthorizedChange,
    BuildMismatch,
    Unknown,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 10] = [
        ErrorKind::NetworkError,
        ErrorKind::AuthRequired,
        ErrorKind::ServerError,
        ErrorKind::ValidationError,
        ErrorKind::PermissionDenied,
        ErrorKind::InvalidState,
        ErrorKind::InvalidMode,
        ErrorKind::UnauthorizedChange,
        ErrorKind::BuildMismatch,
        ErrorKind::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::AuthRequired => "auth_required",
            Self::ServerError => "server_error",
            Self::ValidationError => "validation_error",
            Self::PermissionDenied => "permission_denied",
            Self::InvalidState => "invalid_state",
            Self::InvalidMode => "invalid_mode",
            Self::UnauthorizedChange => "unauthorized_change",
            Self::BuildMismatch => "build_mismatch",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown error kind: {s}"))
    }
}
