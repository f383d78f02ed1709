//! Relational sink - SQLite materialization of a schema model

pub mod ddl;
pub mod sqlite;

pub use sqlite::{SqliteStore, StoreStats};
