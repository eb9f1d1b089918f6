//! Error type shared by the core and its adapters.

use thiserror::Error;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum ArchiveError {
    /// No joke with this id in the collection
    #[error("joke not found with ID {0}")]
    NotFound(Uuid),

    /// User supplied value that cannot be interpreted (unknown author, sort order, ...)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure inside a storage backend
    #[error("storage error: {0}")]
    Storage(#[source] BoxError),

    /// Stored data that no longer maps onto the domain model
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ArchiveError {
    /// Wraps a backend-specific error (e.g. `rusqlite::Error`).
    pub fn storage<E: Into<BoxError>>(err: E) -> Self {
        ArchiveError::Storage(err.into())
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
