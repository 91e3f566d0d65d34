//! # Device Inventory Store
//!
//! Device store API over a pluggable document store.
//!
//! ## Architecture
//!
//! - [`DataStore`] exposes get, add and upsert-attributes for device records
//! - [`DocumentStore`] is the backend contract: find, insert, and atomic
//!   field-level upsert of JSON documents
//! - [`MemoryStore`] and [`SqliteStore`] implement that contract
//! - [`ConnectionTarget`] selects and opens a backend from a URL-like string

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod memory;
pub mod sqlite;
pub mod store;
pub mod target;

pub use document::{Document, DocumentStore, FieldSet, Filter, UpsertOutcome};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{DataStore, DEVICES_COLLECTION};
pub use target::ConnectionTarget;
