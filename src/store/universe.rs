//! Universe records

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::sector::{ensure_custom, save_sector_in};
use super::{Store, Transaction};
use crate::error::{Error, Result};
use crate::model::{Universe, UniverseInfo, DEFAULT_UNIVERSE_ID};

const SELECT_INFO: &str = "SELECT id, name, description, notes FROM universes";

impl Store {
    /// Insert or update a universe record and save the custom sectors it
    /// carries. Default-layer sectors in `universe.sectors` are ignored;
    /// stored sectors missing from the list are kept.
    pub fn save_universe(&self, universe: &Universe, tx: Option<&mut Transaction>) -> Result<()> {
        reject_default(&universe.id, "save")?;

        self.with_transaction(tx, |conn| {
            conn.execute(
                "INSERT INTO universes (id, name, description, notes) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     description = excluded.description,
                     notes = excluded.notes",
                params![universe.id, universe.name, universe.description, universe.notes],
            )?;

            for sector in universe.sectors.iter().filter(|s| s.is_custom) {
                if sector.universe_id.as_deref() != Some(universe.id.as_str()) {
                    return Err(Error::InvalidOperation(format!(
                        "sector {} belongs to universe {:?}, not {}",
                        sector.id, sector.universe_id, universe.id
                    )));
                }
                ensure_custom(sector)?;
                save_sector_in(conn, sector)?;
            }

            debug!(universe = %universe.id, "Saved universe");
            Ok(())
        })
    }

    /// Delete a universe record; its sectors are removed by cascade. Returns
    /// whether a record existed.
    pub fn delete_universe(&self, universe_id: &str, tx: Option<&mut Transaction>) -> Result<bool> {
        reject_default(universe_id, "delete")?;

        self.with_transaction(tx, |conn| {
            let deleted = conn.execute("DELETE FROM universes WHERE id = ?1", [universe_id])?;
            debug!(universe = universe_id, deleted, "Deleted universe");
            Ok(deleted > 0)
        })
    }

    /// All custom universes, ordered by name
    pub fn list_universe_info(&self, tx: Option<&mut Transaction>) -> Result<Vec<UniverseInfo>> {
        self.with_transaction(tx, |conn| {
            let mut stmt = conn.prepare(&format!("{} WHERE id <> ?1 ORDER BY name", SELECT_INFO))?;
            let infos = stmt
                .query_map([DEFAULT_UNIVERSE_ID], row_to_info)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(infos)
        })
    }

    pub fn universe_info_by_id(
        &self,
        universe_id: &str,
        tx: Option<&mut Transaction>,
    ) -> Result<Option<UniverseInfo>> {
        if universe_id == DEFAULT_UNIVERSE_ID {
            return Ok(None);
        }
        self.with_transaction(tx, |conn| info_by_id(conn, universe_id))
    }

    pub fn universe_info_by_name(
        &self,
        name: &str,
        tx: Option<&mut Transaction>,
    ) -> Result<Option<UniverseInfo>> {
        self.with_transaction(tx, |conn| {
            let info = conn
                .query_row(
                    &format!("{} WHERE name = ?1 AND id <> ?2", SELECT_INFO),
                    params![name, DEFAULT_UNIVERSE_ID],
                    row_to_info,
                )
                .optional()?;
            Ok(info)
        })
    }
}

pub(crate) fn info_by_id(conn: &Connection, universe_id: &str) -> Result<Option<UniverseInfo>> {
    let info = conn
        .query_row(
            &format!("{} WHERE id = ?1", SELECT_INFO),
            [universe_id],
            row_to_info,
        )
        .optional()?;
    Ok(info)
}

fn row_to_info(row: &Row) -> rusqlite::Result<UniverseInfo> {
    Ok(UniverseInfo {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        notes: row.get(3)?,
    })
}

fn reject_default(universe_id: &str, action: &str) -> Result<()> {
    if universe_id == DEFAULT_UNIVERSE_ID {
        return Err(Error::InvalidOperation(format!(
            "cannot {} the reserved default universe",
            action
        )));
    }
    Ok(())
}
