//! Scoped unit of work over one connection
//!
//! A `Transaction` owns its connection from `create` until `end` or
//! `rollback`, after which the connection is released. Dropping a transaction
//! that is still active rolls it back.

use rusqlite::Connection;
use tracing::warn;

use crate::config::StoreConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Connection open, no transaction begun yet
    Ready,
    Active,
    /// Committed or rolled back; the connection has been released
    Closed,
}

pub struct Transaction {
    conn: Option<Connection>,
    state: TransactionState,
}

impl Transaction {
    /// Open a configured connection without beginning a transaction
    pub fn create(config: &StoreConfig) -> Result<Self> {
        let conn = open_connection(config)?;
        Ok(Self {
            conn: Some(conn),
            state: TransactionState::Ready,
        })
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == TransactionState::Active
    }

    pub fn begin(&mut self) -> Result<()> {
        match self.state {
            TransactionState::Active => Err(Error::TransactionState("transaction already begun")),
            TransactionState::Closed => Err(Error::TransactionState("transaction already closed")),
            TransactionState::Ready => {
                let conn = self
                    .conn
                    .as_ref()
                    .ok_or(Error::TransactionState("connection released"))?;
                conn.execute_batch("BEGIN")?;
                self.state = TransactionState::Active;
                Ok(())
            }
        }
    }

    /// Commit and release the connection. The connection is released even
    /// when the commit fails.
    pub fn end(&mut self) -> Result<()> {
        let conn = self.release()?;
        let outcome = conn.execute_batch("COMMIT");
        drop(conn);
        outcome.map_err(Error::from)
    }

    /// Abort and release the connection
    pub fn rollback(&mut self) -> Result<()> {
        let conn = self.release()?;
        let outcome = conn.execute_batch("ROLLBACK");
        drop(conn);
        outcome.map_err(Error::from)
    }

    /// Connection for statements inside the active transaction
    pub fn connection(&self) -> Result<&Connection> {
        if self.state != TransactionState::Active {
            return Err(Error::TransactionState("transaction not begun"));
        }
        self.conn
            .as_ref()
            .ok_or(Error::TransactionState("connection released"))
    }

    fn release(&mut self) -> Result<Connection> {
        if self.state != TransactionState::Active {
            return Err(Error::TransactionState("transaction not begun"));
        }
        self.state = TransactionState::Closed;
        self.conn
            .take()
            .ok_or(Error::TransactionState("connection released"))
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state == TransactionState::Active {
            warn!("Transaction dropped while active, rolling back");
            if let Some(conn) = self.conn.take() {
                conn.execute_batch("ROLLBACK").ok();
            }
            self.state = TransactionState::Closed;
        }
    }
}

/// Open a connection and apply the configured pragmas
pub fn open_connection(config: &StoreConfig) -> Result<Connection> {
    let conn = Connection::open(&config.path)?;
    conn.execute_batch(&config.pragma_sql())?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> StoreConfig {
        StoreConfig::new(dir.path().join("tx.db"))
    }

    #[test]
    fn test_begin_twice_is_state_error() {
        let dir = TempDir::new().unwrap();
        let mut tx = Transaction::create(&config(&dir)).unwrap();
        tx.begin().unwrap();
        assert!(matches!(tx.begin(), Err(Error::TransactionState(_))));
        tx.rollback().unwrap();
    }

    #[test]
    fn test_end_without_begin_is_state_error() {
        let dir = TempDir::new().unwrap();
        let mut tx = Transaction::create(&config(&dir)).unwrap();
        assert!(matches!(tx.end(), Err(Error::TransactionState(_))));
        assert!(matches!(tx.rollback(), Err(Error::TransactionState(_))));
        assert!(matches!(tx.connection(), Err(Error::TransactionState(_))));
    }

    #[test]
    fn test_end_releases_connection() {
        let dir = TempDir::new().unwrap();
        let mut tx = Transaction::create(&config(&dir)).unwrap();
        tx.begin().unwrap();
        tx.connection()
            .unwrap()
            .execute_batch("CREATE TABLE t (x INTEGER)")
            .unwrap();
        tx.end().unwrap();

        assert_eq!(tx.state(), TransactionState::Closed);
        assert!(matches!(tx.begin(), Err(Error::TransactionState(_))));
        assert!(matches!(tx.end(), Err(Error::TransactionState(_))));
    }

    #[test]
    fn test_drop_rolls_back_active_transaction() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        {
            let mut tx = Transaction::create(&config).unwrap();
            tx.begin().unwrap();
            tx.connection()
                .unwrap()
                .execute_batch("CREATE TABLE t (x INTEGER)")
                .unwrap();
        }

        let conn = open_connection(&config).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 't'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_connection_applies_pragmas() {
        let dir = TempDir::new().unwrap();
        let conn = open_connection(&config(&dir)).unwrap();

        let fk: i64 = conn.query_row("PRAGMA foreign_keys", [], |r| r.get(0)).unwrap();
        let mode: String = conn.query_row("PRAGMA journal_mode", [], |r| r.get(0)).unwrap();
        let sync: i64 = conn.query_row("PRAGMA synchronous", [], |r| r.get(0)).unwrap();
        let cache: i64 = conn.query_row("PRAGMA cache_size", [], |r| r.get(0)).unwrap();

        assert_eq!(fk, 1);
        assert_eq!(mode.to_lowercase(), "wal");
        assert_eq!(sync, 1);
        assert_eq!(cache, 200_000);
    }
}
