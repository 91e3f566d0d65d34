//! Connection targets.
//!
//! A connection target is a URL-like string naming the backend:
//!
//! | Target | Backend |
//! |--------|---------|
//! | `memory:` | fresh [`MemoryStore`] |
//! | `sqlite::memory:` | in-memory [`SqliteStore`] |
//! | `sqlite:inventory.db` | [`SqliteStore`] at a relative path |
//! | `sqlite:///var/lib/inventory.db` | [`SqliteStore`] at an absolute path |

use crate::document::DocumentStore;
use crate::error::{StoreError, StoreResult};
use crate::memory::MemoryStore;
use crate::sqlite::SqliteStore;
use percent_encoding::percent_decode_str;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

const SQLITE_MEMORY_PATH: &str = ":memory:";

/// A parsed connection target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// Process-local memory store
    Memory,
    /// `SQLite` database kept in memory
    SqliteMemory,
    /// `SQLite` database file
    SqliteFile(PathBuf),
}

impl ConnectionTarget {
    /// Parse a connection target.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the target is not a URL, uses an
    /// unsupported scheme, names a remote host, or has no path.
    pub fn parse(target: &str) -> StoreResult<Self> {
        let url = Url::parse(target)
            .map_err(|e| StoreError::Connection(format!("invalid target {target:?}: {e}")))?;

        match url.scheme() {
            "memory" => Ok(Self::Memory),
            "sqlite" => {
                if url.host_str().is_some_and(|h| !h.is_empty()) {
                    return Err(StoreError::Connection(format!(
                        "remote sqlite hosts are not supported: {target:?}"
                    )));
                }
                let path = percent_decode_str(url.path())
                    .decode_utf8()
                    .map_err(|e| StoreError::Connection(format!("invalid path in {target:?}: {e}")))?;
                match &*path {
                    "" | "/" => Err(StoreError::Connection(format!(
                        "sqlite target has no path: {target:?}"
                    ))),
                    SQLITE_MEMORY_PATH => Ok(Self::SqliteMemory),
                    p => Ok(Self::SqliteFile(PathBuf::from(p))),
                }
            }
            scheme => Err(StoreError::Connection(format!(
                "unsupported scheme {scheme:?} in {target:?}"
            ))),
        }
    }

    /// Open the backend this target names.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the backend cannot be opened.
    pub fn open(&self) -> StoreResult<Arc<dyn DocumentStore>> {
        let store: Arc<dyn DocumentStore> = match self {
            Self::Memory => Arc::new(MemoryStore::new()),
            Self::SqliteMemory => Arc::new(SqliteStore::in_memory().map_err(connection_failed)?),
            Self::SqliteFile(path) => {
                Arc::new(SqliteStore::open(path).map_err(connection_failed)?)
            }
        };
        Ok(store)
    }
}

fn connection_failed(err: StoreError) -> StoreError {
    match err {
        StoreError::Connection(_) => err,
        other => StoreError::Connection(other.to_string()),
    }
}

impl std::fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory:"),
            Self::SqliteMemory => write!(f, "sqlite::memory:"),
            Self::SqliteFile(path) => write!(f, "sqlite:{}", path.display()),
        }
    }
}
