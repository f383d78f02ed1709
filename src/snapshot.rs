//! JSON schema snapshots
//!
//! A snapshot is an object whose keys are table names (in model order) and
//! whose values are ordered lists of `{name, type, constraints}` column
//! objects. Reading a snapshot back reconstructs an equivalent model, so the
//! same format doubles as the schema-definition input format for the CLI.

use std::path::Path;
use serde_json::{Map, Value};
use crate::{Error, Result};
use crate::schema::{Column, SchemaModel, Table};

/// Serialize a schema model to a JSON document at `path`
pub fn write(schema: &SchemaModel, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&to_value(schema)?)?;
    std::fs::write(path, json)?;
    tracing::debug!("wrote snapshot of {} tables to {:?}", schema.table_count(), path);
    Ok(())
}

/// Read a JSON document at `path` back into a validated schema model
pub fn read(path: &Path) -> Result<SchemaModel> {
    let raw = std::fs::read_to_string(path)?;
    from_str(&raw)
}

/// Encode a model as a JSON value, table order preserved
pub fn to_value(schema: &SchemaModel) -> Result<Value> {
    let mut root = Map::new();
    for table in schema.tables() {
        root.insert(table.name.clone(), serde_json::to_value(&table.columns)?);
    }
    Ok(Value::Object(root))
}

/// Decode a JSON snapshot string into a validated schema model
pub fn from_str(raw: &str) -> Result<SchemaModel> {
    let root: Value = serde_json::from_str(raw)?;
    let Value::Object(entries) = root else {
        return Err(Error::Schema(
            "snapshot root must be an object keyed by table name".to_string(),
        ));
    };

    let mut tables = Vec::with_capacity(entries.len());
    for (name, columns) in entries {
        let columns: Vec<Column> = serde_json::from_value(columns)?;
        tables.push(Table::new(name, columns));
    }

    SchemaModel::new(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnType};

    fn sample_model() -> SchemaModel {
        SchemaModel::new(vec![
            Table::new(
                "users",
                vec![
                    Column::new("id", ColumnType::Integer).primary_key(),
                    Column::new("name", ColumnType::Text).not_null(),
                ],
            ),
            Table::new(
                "orders",
                vec![
                    Column::new("id", ColumnType::Integer).primary_key(),
                    Column::new("user_id", ColumnType::Integer),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_round_trip_preserves_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");

        let model = sample_model();
        write(&model, &path).unwrap();
        let restored = read(&path).unwrap();

        assert_eq!(restored, model);
    }

    #[test]
    fn test_table_order_preserved() {
        let value = to_value(&sample_model()).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["users", "orders"]);
    }

    #[test]
    fn test_column_encoding() {
        let value = to_value(&sample_model()).unwrap();
        let id = &value["users"][0];
        assert_eq!(id["name"], "id");
        assert_eq!(id["type"], "integer");
        assert_eq!(id["constraints"][0], "primary_key");
    }

    #[test]
    fn test_non_object_root_rejected() {
        let err = from_str("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_invalid_model_rejected_on_read() {
        // two columns with the same name fail model validation
        let raw = r#"{"users": [{"name": "id", "type": "integer"}, {"name": "id", "type": "text"}]}"#;
        let err = from_str(raw).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }
}
