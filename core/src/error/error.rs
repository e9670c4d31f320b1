use thiserror::Error;

use super::kind::ErrorKind;
use crate::status::AppMode;

/// Typed rejection returned by every store action.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid app mode: {0:?}")]
    InvalidMode(String),

    #[error("cannot {action} while in {mode} mode")]
    InvalidState { mode: AppMode, action: &'static str },

    #[error("a mode change is already in progress")]
    UnauthorizedChange,

    #[error("build is pinned to {pinned} mode, refusing {requested}")]
    BuildMismatch { pinned: AppMode, requested: AppMode },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("persisting {key} failed: {source}")]
    Persistence {
        key: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Map the rejection onto the closed error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidMode(_) => ErrorKind::InvalidMode,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::UnauthorizedChange => ErrorKind::UnauthorizedChange,
            Self::BuildMismatch { .. } => ErrorKind::BuildMismatch,
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::Persistence { .. } => ErrorKind::Unknown,
            Self::Serialization(_) => ErrorKind::ValidationError,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Errors surfaced by persistence gateway adapters.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("storage is closed")]
    Closed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unknown logical storage key: {0}")]
    UnknownLogicalKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            StoreError::InvalidMode("turbo".into()).kind(),
            ErrorKind::InvalidMode
        );
        assert_eq!(
            StoreError::UnauthorizedChange.kind(),
            ErrorKind::UnauthorizedChange
        );
        let persist = StoreError::Persistence {
            key: "app:app:settings",
            source: StorageError::Closed,
        };
        assert_eq!(persist.kind(), ErrorKind::Unknown);
        assert!(persist.to_string().contains("app:app:settings"));
    }

    #[test]
    fn test_build_mismatch_message() {
        let err = StoreError::BuildMismatch {
            pinned: AppMode::Live,
            requested: AppMode::Demo,
        };
        assert_eq!(err.kind(), ErrorKind::BuildMismatch);
        assert_eq!(
            err.to_string(),
            "build is pinned to live mode, refusing demo"
        );
    }
}
