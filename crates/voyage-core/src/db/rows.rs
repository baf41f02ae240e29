//! Dynamic row handling for schema-driven SELECTs.
//!
//! Projection queries select a caller-chosen column set, so their rows
//! cannot be read into fixed structs. [`row_to_map`] converts whatever
//! columns came back into a [`RawRow`] keyed by column name, which the
//! schema resolver then projects into client shape.

use rusqlite::types::ValueRef;
use rusqlite::Row;
use serde_json::Value;

use crate::schema::RawRow;

/// Reads every column of a row into a column-name → JSON value map.
pub fn row_to_map(row: &Row) -> rusqlite::Result<RawRow> {
    let column_names: Vec<String> = row
        .as_ref()
        .column_names()
        .iter()
        .map(|name| (*name).to_string())
        .collect();

    let mut map = RawRow::with_capacity(column_names.len());
    for (index, name) in column_names.into_iter().enumerate() {
        map.insert(name, sql_to_json(row.get_ref(index)?));
    }
    Ok(map)
}

fn sql_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::from(n),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(text) => Value::String(String::from_utf8_lossy(text).into_owned()),
        // BLOBs have no client representation in this schema.
        ValueRef::Blob(_) => Value::Null,
    }
}

/// Quotes column names for interpolation into a SELECT list.
///
/// Column names only ever come from the static field dictionaries, never
/// from client input; quoting guards against keywords like `type`.
pub fn select_list(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds a `?1, ?2, ...` placeholder list for an `IN (...)` clause.
pub fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn rows_convert_to_json_maps() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (a TEXT, b INTEGER, c REAL, d TEXT);
             INSERT INTO t VALUES ('x', 7, 1.5, NULL);",
        )
        .unwrap();

        let map = conn
            .query_row("SELECT a, b, c, d FROM t", [], |row| row_to_map(row))
            .unwrap();

        assert_eq!(map["a"], serde_json::json!("x"));
        assert_eq!(map["b"], serde_json::json!(7));
        assert_eq!(map["c"], serde_json::json!(1.5));
        assert_eq!(map["d"], Value::Null);
    }

    #[test]
    fn select_list_quotes_keywords() {
        assert_eq!(select_list(&["type", "title"]), "\"type\", \"title\"");
    }

    #[test]
    fn placeholder_list_is_one_indexed() {
        assert_eq!(placeholders(3), "?1, ?2, ?3");
        assert_eq!(placeholders(0), "");
    }
}
