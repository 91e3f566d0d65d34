//! `SQLite` document store.
//!
//! Documents are stored as JSON text, one row per `(collection, id)`.

use crate::document::{
    apply_sets, document_id, seed_document, Document, DocumentStore, FieldSet, Filter,
    UpsertOutcome,
};
use crate::error::{StoreError, StoreResult};
use rusqlite::{Connection, ErrorCode, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// `SQLite`-backed document store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns error if database cannot be opened or initialized.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "Opened SQLite document store");
        Self::with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns error if database cannot be created.
    pub fn in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

/// Initialize database schema.
fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r"
        -- One row per document; body is the full JSON document including _id
        CREATE TABLE IF NOT EXISTS documents (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            PRIMARY KEY (collection, id)
        );
        ",
    )
}

impl DocumentStore for SqliteStore {
    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let conn = self.lock()?;

        let body: Option<String> = match filter {
            Filter::Id(id) => conn
                .query_row(
                    "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                    (collection, id),
                    |row| row.get(0),
                )
                .optional()?,
            Filter::All => conn
                .query_row(
                    "SELECT body FROM documents WHERE collection = ?1 ORDER BY id LIMIT 1",
                    [collection],
                    |row| row.get(0),
                )
                .optional()?,
        };

        body.map(|b| serde_json::from_str(&b))
            .transpose()
            .map_err(Into::into)
    }

    fn insert(&self, collection: &str, document: Document) -> StoreResult<()> {
        let id = document_id(&document)?;
        let body = serde_json::to_string(&document)?;
        let now = now_millis();

        let conn = self.lock()?;
        conn.execute(
            r"
            INSERT INTO documents (collection, id, body, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ",
            (collection, id, &body, now),
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    id: id.to_string(),
                }
            } else {
                e.into()
            }
        })?;

        Ok(())
    }

    fn upsert(&self, collection: &str, id: &str, sets: &[FieldSet]) -> StoreResult<UpsertOutcome> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                (collection, id),
                |row| row.get(0),
            )
            .optional()?;

        let now = now_millis();
        let outcome = match existing {
            Some(body) => {
                let mut doc: Document = serde_json::from_str(&body)?;
                apply_sets(&mut doc, sets);
                tx.execute(
                    r"
                    UPDATE documents SET body = ?3, updated_at = ?4
                    WHERE collection = ?1 AND id = ?2
                    ",
                    (collection, id, serde_json::to_string(&doc)?, now),
                )?;
                UpsertOutcome::Updated
            }
            None => {
                let mut doc = seed_document(id);
                apply_sets(&mut doc, sets);
                tx.execute(
                    r"
                    INSERT INTO documents (collection, id, body, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?4)
                    ",
                    (collection, id, serde_json::to_string(&doc)?, now),
                )?;
                UpsertOutcome::Created
            }
        };

        tx.commit()?;
        Ok(outcome)
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
