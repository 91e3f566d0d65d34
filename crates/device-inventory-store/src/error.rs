//! Error types for the device store.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed or missing input to a construction-only call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A document with the same identifier already exists.
    #[error("duplicate key: {collection}/{id} already exists")]
    DuplicateKey {
        /// Collection the insert targeted
        collection: String,
        /// Colliding identifier
        id: String,
    },

    /// The backend could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Driver error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The connection target could not be parsed or opened.
    #[error("failed to open store session: {0}")]
    Connection(String),

    /// A stored document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Check whether this is a backend availability failure.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Database(_))
    }
}
