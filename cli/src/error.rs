use thiserror::Error;

use modegate_core::api::StoreError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("rejected: {0} ({kind})", kind = .0.kind())]
    Rejected(#[source] StoreError),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Persistence { .. } => CliError::Storage(e.to_string()),
            other => CliError::Rejected(other),
        }
    }
}

impl CliError {
    // 0: success
    // 11: config error
    // 20: storage error
    // 30: rejected transition
    // 50: internal/uncategorized
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 11,
            CliError::Storage(_) => 20,
            CliError::Rejected(_) => 30,
            CliError::Anyhow(_) => 50,
        }
    }
}
