use thiserror::Error;

use super::{StorageError, StoreError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// 11: config error
    /// 20: io / command error
    /// 30: document store error
    /// 40: object storage error
    /// 50: internal/uncategorized
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 11,
            CliError::Io(_) | CliError::Command(_) => 20,
            CliError::Store(_) => 30,
            CliError::Storage(_) => 40,
            CliError::Anyhow(_) => 50,
        }
    }

    /// Store errors reach the user through the store's notifier, so the
    /// caller should not print them again.
    pub fn already_reported(&self) -> bool {
        matches!(self, CliError::Store(_))
    }
}
