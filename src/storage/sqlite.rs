//! SQLite storage implementation

use std::fmt;
use std::path::Path;
use rusqlite::Connection;
use crate::{Result, Error};
use crate::schema::SchemaModel;
use super::ddl;

/// SQLite-backed sink for schema materialization.
///
/// Owns the connection for its lifetime; the store file is exclusively
/// this store's while a materialization is in flight.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Delete the store file at `path`.
    ///
    /// A missing file is a successful no-op; any other failure propagates.
    pub fn remove(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Materialize a schema model: one `CREATE TABLE` per table, in model order.
    ///
    /// Fails with a schema error if any table name collides with a table
    /// already present in the store. Failures are reported, never retried.
    pub fn materialize(&self, schema: &SchemaModel) -> Result<()> {
        for table in schema.tables() {
            if self.table_exists(&table.name)? {
                return Err(Error::Schema(format!(
                    "table '{}' already exists in store",
                    table.name
                )));
            }
            self.conn.execute(&ddl::create_table_sql(table), [])?;
            tracing::debug!("created table '{}'", table.name);
        }
        Ok(())
    }

    /// Check whether a table is already present
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// List user tables in creation order
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid",
        )?;

        let names = stmt
            .query_map([], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(names)
    }

    /// Get store statistics
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            tables: self.table_names()?.len(),
        })
    }
}

/// Store statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub tables: usize,
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tables: {}", self.tables)
    }
}
