//! Durable key/value storage for exilence application stores.
//!
//! Provides the [`RecordStore`] trait defining the storage contract that all
//! backends implement, plus the [`InMemoryStore`] and [`SqliteStore`] as
//! first-class backends.
//!
//! # Architecture
//!
//! Every logical application store (account, league, setting, ...) is
//! persisted as a single record: a name and an opaque JSON payload. The
//! storage layer never interprets payloads; parsing happens in the state
//! layer during hydration.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: StoredRecord, RecordSummary, SaveOutcome
//! - [`traits`]: RecordStore trait definition
//! - [`hash`]: blake3 payload hashing used to skip redundant writes
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: SQL schema constants and migration setup
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod hash;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use hash::{hash_payload, payload_digest};
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::RecordStore;
pub use types::{RecordSummary, SaveOutcome, StoredRecord};
