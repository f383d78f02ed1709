//! Schema model - backend-independent table/column descriptions
//!
//! A [`SchemaModel`] is an ordered set of tables, each an ordered list of
//! typed columns with constraints. The model is validated when constructed
//! and never mutated afterwards; the sinks in [`crate::storage`] and
//! [`crate::snapshot`] only ever read it.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

/// Column storage types - the closed set of types a column may carry.
///
/// These mirror the storage classes of the embedded relational store, so
/// materialization never needs a type-mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// 64-bit signed integer
    Integer,
    /// UTF-8 string
    Text,
    /// 64-bit float
    Real,
    /// Raw byte array
    Blob,
}

impl ColumnType {
    /// Get the string representation of the column type
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Text => "text",
            ColumnType::Real => "real",
            ColumnType::Blob => "blob",
        }
    }

    /// SQL type keyword for DDL emission
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "TEXT",
            ColumnType::Real => "REAL",
            ColumnType::Blob => "BLOB",
        }
    }
}

impl FromStr for ColumnType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "integer" | "int" => Ok(ColumnType::Integer),
            "text" | "string" => Ok(ColumnType::Text),
            "real" | "float" | "double" => Ok(ColumnType::Real),
            "blob" | "bytes" => Ok(ColumnType::Blob),
            _ => Err(Error::Schema(format!("Unknown column type: {}", s))),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Column constraints.
///
/// The `Ord` derive fixes the order constraints are emitted in DDL:
/// PRIMARY KEY, then NOT NULL, then UNIQUE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    PrimaryKey,
    NotNull,
    Unique,
}

impl Constraint {
    /// SQL keyword for DDL emission
    pub fn as_sql(&self) -> &'static str {
        match self {
            Constraint::PrimaryKey => "PRIMARY KEY",
            Constraint::NotNull => "NOT NULL",
            Constraint::Unique => "UNIQUE",
        }
    }
}

/// A single typed column with its constraint set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within its table
    pub name: String,
    /// Storage type
    #[serde(rename = "type")]
    pub ty: ColumnType,
    /// Constraints, kept ordered for deterministic DDL
    #[serde(default)]
    pub constraints: BTreeSet<Constraint>,
}

impl Column {
    /// Create an unconstrained column
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            constraints: BTreeSet::new(),
        }
    }

    /// Mark the column as the table's primary key
    pub fn primary_key(mut self) -> Self {
        self.constraints.insert(Constraint::PrimaryKey);
        self
    }

    /// Forbid NULL values
    pub fn not_null(mut self) -> Self {
        self.constraints.insert(Constraint::NotNull);
        self
    }

    /// Require distinct values
    pub fn unique(mut self) -> Self {
        self.constraints.insert(Constraint::Unique);
        self
    }
}

/// A named table: an ordered list of columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table name, unique within the model
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<Column>,
}

impl Table {
    /// Create a table from a name and its columns
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// An ordered set of tables, validated at construction.
///
/// Immutable once built; both persistence sinks read the same model
/// concurrently without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaModel {
    tables: Vec<Table>,
}

impl SchemaModel {
    /// Build a model, rejecting duplicate table or column names
    pub fn new(tables: Vec<Table>) -> Result<Self> {
        let mut seen_tables = HashSet::new();
        for table in &tables {
            if table.name.is_empty() {
                return Err(Error::Schema("table name must not be empty".to_string()));
            }
            if !seen_tables.insert(table.name.as_str()) {
                return Err(Error::Schema(format!("duplicate table '{}'", table.name)));
            }

            let mut seen_columns = HashSet::new();
            for column in &table.columns {
                if column.name.is_empty() {
                    return Err(Error::Schema(format!(
                        "table '{}' has a column with an empty name",
                        table.name
                    )));
                }
                if !seen_columns.insert(column.name.as_str()) {
                    return Err(Error::Schema(format!(
                        "duplicate column '{}' in table '{}'",
                        column.name, table.name
                    )));
                }
            }
        }

        Ok(Self { tables })
    }

    /// Tables in declaration order
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Look up a table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Number of tables in the model
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_table() -> Table {
        Table::new(
            "users",
            vec![
                Column::new("id", ColumnType::Integer).primary_key(),
                Column::new("name", ColumnType::Text).not_null(),
            ],
        )
    }

    #[test]
    fn test_valid_model() {
        let model = SchemaModel::new(vec![users_table()]).unwrap();
        assert_eq!(model.table_count(), 1);
        assert_eq!(model.table("users").unwrap().columns.len(), 2);
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let err = SchemaModel::new(vec![users_table(), users_table()]).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        assert!(err.to_string().contains("users"));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let table = Table::new(
            "users",
            vec![
                Column::new("id", ColumnType::Integer),
                Column::new("id", ColumnType::Text),
            ],
        );
        let err = SchemaModel::new(vec![table]).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_constraint_order_is_deterministic() {
        let column = Column::new("id", ColumnType::Integer)
            .unique()
            .not_null()
            .primary_key();
        let order: Vec<Constraint> = column.constraints.iter().copied().collect();
        assert_eq!(
            order,
            vec![Constraint::PrimaryKey, Constraint::NotNull, Constraint::Unique]
        );
    }

    #[test]
    fn test_column_type_round_trip() {
        for ty in [
            ColumnType::Integer,
            ColumnType::Text,
            ColumnType::Real,
            ColumnType::Blob,
        ] {
            assert_eq!(ty.as_str().parse::<ColumnType>().unwrap(), ty);
        }
        assert!("geometry".parse::<ColumnType>().is_err());
    }
}
