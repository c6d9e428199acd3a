use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::schema::{generate_insert, TableSchema};

/// Bound-variable budget per statement (SQLite's historical default limit)
const MAX_VARIABLES: usize = 999;

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(s: &String) -> Self {
        SqlValue::Text(s.clone())
    }
}

impl From<i32> for SqlValue {
    fn from(i: i32) -> Self {
        SqlValue::Integer(i64::from(i))
    }
}

impl From<f64> for SqlValue {
    fn from(f: f64) -> Self {
        SqlValue::Real(f)
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        SqlValue::Integer(if b { 1 } else { 0 })
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

impl From<&Option<String>> for SqlValue {
    fn from(value: &Option<String>) -> Self {
        value.as_deref().map(SqlValue::from).unwrap_or(SqlValue::Null)
    }
}

/// Insert rows into `schema` using multi-row statements. Each row holds the
/// values for `schema.insert_columns()` in order. Nothing is executed for an
/// empty slice.
pub fn insert_rows(conn: &Connection, schema: &TableSchema, rows: &[Vec<SqlValue>]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let width = schema.insert_columns().len();
    if let Some(row) = rows.iter().find(|row| row.len() != width) {
        return Err(Error::InvalidOperation(format!(
            "row for {} has {} values, expected {}",
            schema.name,
            row.len(),
            width
        )));
    }
    let per_statement = (MAX_VARIABLES / width.max(1)).max(1);

    for chunk in rows.chunks(per_statement) {
        let sql = generate_insert(schema, chunk.len());
        let mut stmt = conn.prepare_cached(&sql)?;

        let mut idx = 1;
        for row in chunk {
            for value in row {
                value.bind_to(idx, &mut stmt)?;
                idx += 1;
            }
        }
        stmt.raw_execute()?;
    }

    Ok(())
}

/// Number of rows in a table
pub fn count_rows(conn: &Connection, schema: &TableSchema) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM {}", schema.name);
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count as u64)
}
