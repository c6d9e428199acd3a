//! Overlay resolution between custom and default sectors
//!
//! The default universe is stored with a NULL owner. For a custom universe,
//! the visible sector at (milieu, x, y) is its own sector if one exists and
//! the default sector otherwise; fields are never merged.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::sector::load_sector_in;
use super::universe::info_by_id;
use super::{Store, Transaction};
use crate::error::Result;
use crate::model::{SectorInfo, Universe, DEFAULT_UNIVERSE_ID, DEFAULT_UNIVERSE_NAME};

const INFO_COLUMNS: &str =
    "id, universe_id, is_custom, milieu, sector_x, sector_y, primary_name, abbreviation, tags";

/// Progress callback for per-sector work: `(milieu, sector name, processed,
/// total)`, with a final `(None, None, total, total)` on completion
pub type ProgressCallback<'a> = &'a mut dyn FnMut(Option<&str>, Option<&str>, usize, usize);

/// Owner key used in queries; the default universe has no owner row
fn owner_key(universe_id: &str) -> Option<&str> {
    if universe_id == DEFAULT_UNIVERSE_ID {
        None
    } else {
        Some(universe_id)
    }
}

impl Store {
    /// Sectors visible in a universe: its own sectors plus, when
    /// `include_default` is set, every default sector whose position it does
    /// not occupy
    pub fn list_sector_info(
        &self,
        universe_id: &str,
        milieu: Option<&str>,
        include_default: bool,
        tx: Option<&mut Transaction>,
    ) -> Result<Vec<SectorInfo>> {
        self.with_transaction(tx, |conn| {
            list_sector_info_in(conn, universe_id, milieu, include_default)
        })
    }

    /// The sector a universe sees at one position, preferring its own sector
    pub fn sector_info_by_position(
        &self,
        universe_id: &str,
        milieu: &str,
        sector_x: i32,
        sector_y: i32,
        tx: Option<&mut Transaction>,
    ) -> Result<Option<SectorInfo>> {
        self.with_transaction(tx, |conn| {
            let sql = format!(
                "SELECT {} FROM sectors
                 WHERE milieu = ?2 AND sector_x = ?3 AND sector_y = ?4
                   AND (universe_id = ?1 OR universe_id IS NULL)
                 ORDER BY CASE WHEN universe_id IS NULL THEN 1 ELSE 0 END
                 LIMIT 1",
                INFO_COLUMNS
            );
            let info = conn
                .query_row(
                    &sql,
                    params![owner_key(universe_id), milieu, sector_x, sector_y],
                    row_to_info,
                )
                .optional()?;
            Ok(info)
        })
    }

    /// Materialize a universe with every visible sector fully loaded.
    /// Returns `None` for an unknown universe, and for the default universe
    /// before anything has been imported.
    pub fn load_universe(
        &self,
        universe_id: &str,
        include_default: bool,
        mut progress: Option<ProgressCallback<'_>>,
        tx: Option<&mut Transaction>,
    ) -> Result<Option<Universe>> {
        self.with_transaction(tx, |conn| {
            let mut universe = match owner_key(universe_id) {
                Some(id) => match info_by_id(conn, id)? {
                    Some(info) => Universe {
                        id: info.id,
                        name: info.name,
                        description: info.description,
                        notes: info.notes,
                        sectors: Vec::new(),
                    },
                    None => return Ok(None),
                },
                None => {
                    let exists: bool = conn.query_row(
                        "SELECT EXISTS (SELECT 1 FROM sectors WHERE universe_id IS NULL)",
                        [],
                        |row| row.get(0),
                    )?;
                    if !exists {
                        return Ok(None);
                    }
                    Universe::new(DEFAULT_UNIVERSE_ID, DEFAULT_UNIVERSE_NAME)
                }
            };

            let infos = list_sector_info_in(conn, universe_id, None, include_default)?;
            let total = infos.len();

            for (processed, info) in infos.iter().enumerate() {
                if let Some(sector) = load_sector_in(conn, &info.id)? {
                    universe.sectors.push(sector);
                }
                if let Some(report) = progress.as_mut() {
                    report(
                        Some(info.milieu.as_str()),
                        Some(info.primary_name.as_str()),
                        processed + 1,
                        total,
                    );
                }
            }
            if let Some(report) = progress.as_mut() {
                report(None, None, total, total);
            }

            debug!(universe = universe_id, sectors = total, "Loaded universe");
            Ok(Some(universe))
        })
    }
}

fn list_sector_info_in(
    conn: &Connection,
    universe_id: &str,
    milieu: Option<&str>,
    include_default: bool,
) -> Result<Vec<SectorInfo>> {
    let owner = owner_key(universe_id);

    let own = format!(
        "SELECT {cols} FROM sectors s
         WHERE s.universe_id = ?1 AND (?2 IS NULL OR s.milieu = ?2)",
        cols = INFO_COLUMNS
    );
    let defaults = format!(
        "SELECT {cols} FROM sectors d
         WHERE d.universe_id IS NULL AND (?2 IS NULL OR d.milieu = ?2)
           AND NOT EXISTS (
               SELECT 1 FROM sectors c
               WHERE c.universe_id = ?1
                 AND c.milieu = d.milieu
                 AND c.sector_x = d.sector_x
                 AND c.sector_y = d.sector_y)",
        cols = INFO_COLUMNS
    );

    // The default universe owns exactly the NULL-owner rows
    let sql = match (owner, include_default) {
        (None, _) => format!("{} ORDER BY milieu, sector_x, sector_y", defaults),
        (Some(_), false) => format!("{} ORDER BY milieu, sector_x, sector_y", own),
        (Some(_), true) => format!(
            "SELECT * FROM ({} UNION ALL {}) ORDER BY milieu, sector_x, sector_y",
            own, defaults
        ),
    };

    let mut stmt = conn.prepare_cached(&sql)?;
    let infos = stmt
        .query_map(params![owner, milieu], row_to_info)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(infos)
}

fn row_to_info(row: &Row) -> rusqlite::Result<SectorInfo> {
    Ok(SectorInfo {
        id: row.get("id")?,
        universe_id: row.get("universe_id")?,
        is_custom: row.get("is_custom")?,
        milieu: row.get("milieu")?,
        sector_x: row.get("sector_x")?,
        sector_y: row.get("sector_y")?,
        primary_name: row.get("primary_name")?,
        abbreviation: row.get("abbreviation")?,
        tags: row.get("tags")?,
    })
}
