//! SQLite-backed universe store
//!
//! `Store` is constructed once with a `StoreConfig` and shared by reference.
//! Each operation either joins a caller-supplied active `Transaction` or runs
//! in its own transaction that commits on success and rolls back on error.

mod metadata;
mod overlay;
mod rows;
mod sector;
mod transaction;
mod universe;

pub use metadata::{METADATA_APP_VERSION, METADATA_SNAPSHOT_TIMESTAMP};
pub use overlay::ProgressCallback;
pub use rows::{count_rows, insert_rows, SqlValue};
pub use transaction::{open_connection, Transaction, TransactionState};

pub(crate) use metadata::{get_metadata, set_metadata};
pub(crate) use sector::{delete_default_sectors, insert_sector};

use rusqlite::Connection;
use std::collections::BTreeMap;
use tracing::info;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::schema::{SchemaManager, TableSchema};

pub struct Store {
    config: StoreConfig,
}

impl Store {
    /// Open (or create) the database and make sure every table exists
    pub fn open(config: StoreConfig) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }

        let store = Self { config };
        store.with_transaction(None, |conn| SchemaManager::new().ensure_schema(conn))?;
        info!(path = %store.config.path.display(), "Opened universe store");

        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Open a connection for a caller-controlled unit of work. The returned
    /// transaction has not begun yet.
    pub fn create_transaction(&self) -> Result<Transaction> {
        Transaction::create(&self.config)
    }

    /// Run `f` inside `tx` when given, otherwise inside a fresh transaction
    /// that commits on `Ok` and rolls back on `Err`
    pub fn with_transaction<T, F>(&self, tx: Option<&mut Transaction>, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        if let Some(tx) = tx {
            return f(tx.connection()?);
        }

        let mut tx = self.create_transaction()?;
        tx.begin()?;

        match f(tx.connection()?) {
            Ok(value) => {
                tx.end()?;
                Ok(value)
            }
            Err(err) => {
                tx.rollback().ok();
                Err(err)
            }
        }
    }

    /// Whether any default-universe sector has been imported
    pub fn has_default_universe(&self, tx: Option<&mut Transaction>) -> Result<bool> {
        self.with_transaction(tx, |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM sectors WHERE universe_id IS NULL)",
                [],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    /// Compact the database file. Runs on its own connection because the
    /// engine refuses to vacuum inside a transaction.
    pub fn vacuum_database(&self) -> Result<()> {
        let conn = open_connection(&self.config)?;
        conn.execute_batch("VACUUM")?;
        info!("Vacuumed database");
        Ok(())
    }

    /// Schema version recorded for each table
    pub fn schema_versions(&self, tx: Option<&mut Transaction>) -> Result<BTreeMap<String, u32>> {
        self.with_transaction(tx, |conn| SchemaManager::new().schema_versions(conn))
    }

    /// Row count of one table
    pub fn count_rows(&self, schema: &TableSchema, tx: Option<&mut Transaction>) -> Result<u64> {
        self.with_transaction(tx, |conn| count_rows(conn, schema))
    }

    /// Read a metadata value
    pub fn metadata(&self, key: &str, tx: Option<&mut Transaction>) -> Result<Option<String>> {
        self.with_transaction(tx, |conn| get_metadata(conn, key))
    }
}
