//! DDL generation
//!
//! Renders one `CREATE TABLE` statement per table. Output is deterministic:
//! columns appear in declaration order, constraints in the fixed
//! PRIMARY KEY / NOT NULL / UNIQUE order.

use crate::schema::{Column, Table};

/// Render the `CREATE TABLE` statement for one table
pub fn create_table_sql(table: &Table) -> String {
    let columns: Vec<String> = table.columns.iter().map(column_def).collect();
    format!("CREATE TABLE \"{}\" ({})", table.name, columns.join(", "))
}

fn column_def(column: &Column) -> String {
    let mut def = format!("\"{}\" {}", column.name, column.ty.as_sql());
    for constraint in &column.constraints {
        def.push(' ');
        def.push_str(constraint.as_sql());
    }
    def
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    #[test]
    fn test_create_table_sql() {
        let table = Table::new(
            "users",
            vec![
                Column::new("id", ColumnType::Integer).primary_key(),
                Column::new("name", ColumnType::Text).not_null(),
            ],
        );
        assert_eq!(
            create_table_sql(&table),
            "CREATE TABLE \"users\" (\"id\" INTEGER PRIMARY KEY, \"name\" TEXT NOT NULL)"
        );
    }

    #[test]
    fn test_constraint_emission_order() {
        let table = Table::new(
            "t",
            vec![Column::new("v", ColumnType::Real).unique().not_null()],
        );
        assert_eq!(
            create_table_sql(&table),
            "CREATE TABLE \"t\" (\"v\" REAL NOT NULL UNIQUE)"
        );
    }
}
