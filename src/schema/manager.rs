use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use tracing::debug;

use super::ddl::{generate_create_table, generate_indexes};
use super::dependencies::DependencyResolver;
use super::tables::TABLE_SCHEMAS;
use crate::error::{Error, Result};

/// Creates missing tables and indexes and keeps the schema version ledger
pub struct SchemaManager {
    resolver: DependencyResolver,
}

impl SchemaManager {
    pub fn new() -> Self {
        Self {
            resolver: DependencyResolver::new(),
        }
    }

    /// Create every table and index that does not exist yet. Must run inside
    /// a transaction; existing tables are left as they are.
    pub fn ensure_schema(&self, conn: &Connection) -> Result<()> {
        let tables = self.resolver.creation_order().map_err(Error::Configuration)?;

        for schema in &tables {
            conn.execute(&generate_create_table(schema), [])?;
            for index_sql in generate_indexes(schema) {
                conn.execute(&index_sql, [])?;
            }
        }

        let ledger = format!(
            "INSERT OR IGNORE INTO {} (name, version) VALUES (?1, ?2)",
            TABLE_SCHEMAS.name
        );
        let mut stmt = conn.prepare_cached(&ledger)?;
        for schema in &tables {
            if stmt.execute(params![schema.name, schema.version])? > 0 {
                debug!(table = schema.name, version = schema.version, "Recorded table version");
            }
        }

        Ok(())
    }

    /// Recorded version per table
    pub fn schema_versions(&self, conn: &Connection) -> Result<BTreeMap<String, u32>> {
        let sql = format!("SELECT name, version FROM {}", TABLE_SCHEMAS.name);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut versions = BTreeMap::new();
        for row in rows {
            let (name, version): (String, u32) = row?;
            versions.insert(name, version);
        }
        Ok(versions)
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        Self::new()
    }
}
