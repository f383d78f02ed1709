//! # Schemaforge - Schema-Driven Persistence Engine
//!
//! Materializes an abstract table/column schema into two sinks at once.
//!
//! Schemaforge provides:
//! - A validated, ordered table/column schema model
//! - SQLite materialization with deterministic DDL generation
//! - Order-preserving JSON schema snapshots that round-trip losslessly
//! - A dual-sink persistence coordinator that joins both sinks' outcomes
//! - XML document ingestion over HTTP with well-formedness acceptance

pub mod schema;
pub mod storage;
pub mod snapshot;
pub mod persist;
pub mod document;
pub mod server;
pub mod config;

// Re-exports for convenient access
pub use schema::{Column, ColumnType, Constraint, SchemaModel, Table};
pub use storage::SqliteStore;
pub use document::{XmlDocument, XmlNode};
pub use persist::PersistOutcome;

/// Result type alias for Schemaforge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Schemaforge operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}
