use crate::record::Table;
use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("no record at {table}/{key}")]
    NotFound { table: Table, key: String },
    #[error(
        "persisted state at {path} is corrupt: {reason}. \
         repair the file by hand or delete it to start from empty tables"
    )]
    CorruptPersistedState { path: String, reason: String },
    #[error("storage io failed: {0}")]
    Io(String),
    #[error("snapshot serialization failed: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid short code: {0}")]
pub struct InvalidShortCode(pub String);

impl StoreError {
    /// Returns `true` for the recoverable [`StoreError::NotFound`] case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        StoreError::Io(value.to_string())
    }
}
