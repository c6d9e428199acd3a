use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;

/// Application version that performed the last default-universe import
pub const METADATA_APP_VERSION: &str = "default_universe.app_version";

/// Snapshot timestamp of the last default-universe import
pub const METADATA_SNAPSHOT_TIMESTAMP: &str = "default_universe.timestamp";

pub(crate) fn get_metadata(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [key],
            |row| row.get::<_, Option<String>>(0),
        )
        .optional()?;
    Ok(value.flatten())
}

pub(crate) fn set_metadata(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO metadata (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}
