//! SQLite helper for data-backed assertions.
//!
//! Test flows sometimes need to cross-check what the UI shows against
//! what the application wrote. [`DbHelper`] keeps that to two calls:
//! [`DbHelper::query_rows`] for reads and [`DbHelper::execute`] for
//! setup and teardown statements.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::Value;

use crate::result::NavegarResult;

/// Thin wrapper over a SQLite connection
#[derive(Debug)]
pub struct DbHelper {
    conn: Connection,
}

impl DbHelper {
    /// Open a database file
    pub fn open(path: &Path) -> NavegarResult<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    /// Open a fresh in-memory database
    pub fn open_in_memory() -> NavegarResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Run a query and return every row as a column-name map
    pub fn query_rows(&self, sql: &str) -> NavegarResult<Vec<HashMap<String, Value>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|s| (*s).to_string()).collect();
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = HashMap::with_capacity(columns.len());
            for (index, column) in columns.iter().enumerate() {
                record.insert(column.clone(), json_value(row.get_ref(index)?));
            }
            out.push(record);
        }
        Ok(out)
    }

    /// Run a statement and return the number of affected rows
    pub fn execute(&self, sql: &str) -> NavegarResult<usize> {
        Ok(self.conn.execute(sql, [])?)
    }
}

fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(t) => Value::from(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::from(String::from_utf8_lossy(b).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> DbHelper {
        let db = DbHelper::open_in_memory().unwrap();
        db.execute("CREATE TABLE orders (id INTEGER, item TEXT, price REAL)")
            .unwrap();
        db.execute("INSERT INTO orders VALUES (1, 'mug', 9.5), (2, 'pen', 1.25)")
            .unwrap();
        db
    }

    #[test]
    fn test_query_rows_maps_columns() {
        let db = seeded();
        let rows = db.query_rows("SELECT * FROM orders ORDER BY id").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["item"], serde_json::json!("mug"));
        assert_eq!(rows[1]["price"], serde_json::json!(1.25));
    }

    #[test]
    fn test_query_rows_handles_null() {
        let db = seeded();
        db.execute("INSERT INTO orders VALUES (3, NULL, NULL)").unwrap();
        let rows = db
            .query_rows("SELECT item FROM orders WHERE id = 3")
            .unwrap();
        assert_eq!(rows[0]["item"], serde_json::Value::Null);
    }

    #[test]
    fn test_execute_reports_affected_rows() {
        let db = seeded();
        let affected = db.execute("DELETE FROM orders").unwrap();
        assert_eq!(affected, 2);
    }

    #[test]
    fn test_bad_sql_is_an_error() {
        let db = seeded();
        assert!(db.query_rows("SELECT nope FROM nothing").is_err());
    }
}
