//! Default-universe snapshot import
//!
//! Parsing happens before the write transaction opens. The write replaces
//! the whole default layer and records the snapshot timestamp in one
//! transaction; compaction runs after commit.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use super::convert::build_sector;
use super::layout::{format_timestamp, parse_timestamp, IndexEntry, SnapshotLayout};
use super::parser::{SectorMetadata, SectorParser};
use super::second_survey::SecondSurveyParser;
use crate::error::{Error, Result};
use crate::model::Sector;
use crate::store::{
    delete_default_sectors, insert_sector, set_metadata, ProgressCallback, Store,
    METADATA_APP_VERSION, METADATA_SNAPSHOT_TIMESTAMP,
};

const UNNAMED_SECTOR: &str = "<unnamed>";

/// Stage of a running import, reported before each one starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Parsing,
    Writing,
    Compacting,
}

/// Optional hooks for a running import
#[derive(Default)]
pub struct ImportOptions<'a> {
    /// Called after each sector is parsed and again after each is written
    pub progress: Option<ProgressCallback<'a>>,
    pub stage: Option<&'a mut dyn FnMut(ImportStage)>,
    /// Checked between sectors; once set the import stops and nothing is
    /// written
    pub cancel: Option<&'a AtomicBool>,
}

impl<'a> ImportOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(mut self, progress: ProgressCallback<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_stage(mut self, stage: &'a mut dyn FnMut(ImportStage)) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_cancel(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn enter(&mut self, stage: ImportStage) {
        debug!(?stage, "Import stage");
        if let Some(notify) = self.stage.as_mut() {
            notify(stage);
        }
    }

    fn report(
        &mut self,
        milieu: Option<&str>,
        sector: Option<&str>,
        processed: usize,
        total: usize,
    ) {
        if let Some(report) = self.progress.as_mut() {
            report(milieu, sector, processed, total);
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        match self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

/// A sector left out of an import and why
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSector {
    pub milieu: String,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub timestamp: NaiveDateTime,
    pub milieus: usize,
    pub imported: usize,
    pub skipped: Vec<SkippedSector>,
    /// Whether the post-import compaction succeeded
    pub compacted: bool,
}

/// Reads a snapshot directory into the default universe of a store
pub struct SnapshotImporter<'s, P = SecondSurveyParser> {
    store: &'s Store,
    parser: P,
}

impl<'s> SnapshotImporter<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self::with_parser(store, SecondSurveyParser::new())
    }
}

impl<'s, P: SectorParser> SnapshotImporter<'s, P> {
    pub fn with_parser(store: &'s Store, parser: P) -> Self {
        Self { store, parser }
    }

    /// Whether the snapshot at `root` is newer than the last import. True
    /// when no default sector is stored or the stored timestamp is missing or
    /// unreadable.
    pub fn is_snapshot_newer(&self, root: &Path) -> Result<bool> {
        let snapshot = SnapshotLayout::new(root).read_timestamp()?;
        if !self.store.has_default_universe(None)? {
            debug!(snapshot = %snapshot, "No default universe stored");
            return Ok(true);
        }
        let stored = self.store.metadata(METADATA_SNAPSHOT_TIMESTAMP, None)?;

        let newer = match stored {
            None => true,
            Some(value) => match parse_timestamp(&value) {
                Ok(stored) => snapshot > stored,
                Err(err) => {
                    warn!(stored = %value, error = %err, "Unreadable import timestamp");
                    true
                }
            },
        };

        debug!(snapshot = %snapshot, newer, "Checked snapshot timestamp");
        Ok(newer)
    }

    /// Replace the default universe with the snapshot at `root`. Sectors that
    /// fail to parse are skipped and reported; I/O failures on the snapshot
    /// itself abort before anything is written.
    pub fn import(&self, root: &Path, mut options: ImportOptions<'_>) -> Result<ImportReport> {
        let layout = SnapshotLayout::new(root);
        let timestamp = layout.read_timestamp()?;
        let milieus = layout.milieus()?;

        let mut pending: Vec<(&str, IndexEntry)> = Vec::new();
        for milieu in &milieus {
            let index = layout.read_universe_index(milieu)?;
            debug!(milieu = %milieu, sectors = index.sectors.len(), "Read universe index");
            pending.extend(index.sectors.into_iter().map(|e| (milieu.as_str(), e)));
        }
        info!(
            root = %root.display(),
            snapshot = %timestamp,
            milieus = milieus.len(),
            sectors = pending.len(),
            "Importing default universe"
        );

        options.enter(ImportStage::Parsing);
        let total = pending.len();
        let mut sectors: Vec<Sector> = Vec::with_capacity(total);
        let mut skipped = Vec::new();
        let mut occupied = HashSet::new();

        for (processed, &(milieu, ref entry)) in pending.iter().enumerate() {
            options.check_cancelled()?;
            let name = entry.primary_name().unwrap_or(UNNAMED_SECTOR);

            let reason = match self.parse_sector(&layout, milieu, entry) {
                Ok(sector) => {
                    if occupied.insert((milieu, sector.sector_x, sector.sector_y)) {
                        sectors.push(sector);
                        None
                    } else {
                        Some(format!(
                            "position ({}, {}) is already taken",
                            sector.sector_x, sector.sector_y
                        ))
                    }
                }
                Err(err) => Some(err.to_string()),
            };

            if let Some(reason) = reason {
                warn!(milieu = %milieu, sector = %name, reason = %reason, "Skipping sector");
                skipped.push(SkippedSector {
                    milieu: milieu.to_string(),
                    name: name.to_string(),
                    reason,
                });
            }
            options.report(Some(milieu), Some(name), processed + 1, total);
        }

        options.enter(ImportStage::Writing);
        let total = sectors.len();
        let imported = self.store.with_transaction(None, |conn| {
            let removed = delete_default_sectors(conn)?;
            debug!(removed, "Removed previous default sectors");

            let mut imported = 0;
            for (processed, sector) in sectors.iter().enumerate() {
                options.check_cancelled()?;
                match insert_sector_isolated(conn, sector)? {
                    None => imported += 1,
                    Some(reason) => {
                        warn!(
                            milieu = %sector.milieu,
                            sector = %sector.primary_name,
                            reason = %reason,
                            "Skipping sector"
                        );
                        skipped.push(SkippedSector {
                            milieu: sector.milieu.clone(),
                            name: sector.primary_name.clone(),
                            reason,
                        });
                    }
                }
                options.report(
                    Some(sector.milieu.as_str()),
                    Some(sector.primary_name.as_str()),
                    processed + 1,
                    total,
                );
            }

            set_metadata(conn, METADATA_APP_VERSION, env!("CARGO_PKG_VERSION"))?;
            set_metadata(conn, METADATA_SNAPSHOT_TIMESTAMP, &format_timestamp(&timestamp))?;
            Ok(imported)
        })?;
        options.report(None, None, total, total);

        options.enter(ImportStage::Compacting);
        let compacted = match self.store.vacuum_database() {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "Compaction after import failed");
                false
            }
        };

        info!(
            imported,
            skipped = skipped.len(),
            compacted,
            "Imported default universe"
        );
        Ok(ImportReport {
            timestamp,
            milieus: milieus.len(),
            imported,
            skipped,
            compacted,
        })
    }

    /// Parse one indexed sector. The world data file is required; the
    /// metadata file is optional and the index fills in for it.
    fn parse_sector(
        &self,
        layout: &SnapshotLayout,
        milieu: &str,
        entry: &IndexEntry,
    ) -> Result<Sector> {
        let name = entry
            .primary_name()
            .ok_or_else(|| Error::parse(milieu, "index entry has no name"))?;

        let metadata_path = layout.metadata_path(milieu, name);
        let metadata = if metadata_path.is_file() {
            let text = read_file(&metadata_path)?;
            self.parser.parse_metadata(&display_name(&metadata_path), &text)?
        } else {
            debug!(sector = name, "No metadata file, using index entry");
            SectorMetadata::default()
        };

        let data_path = layout.data_path(milieu, name);
        let text = read_file(&data_path)?;
        let worlds = self.parser.parse_worlds(&display_name(&data_path), &text)?;

        build_sector(milieu, entry, metadata, worlds)
    }
}

impl Store {
    /// Whether the snapshot at `root` is newer than the last default-universe
    /// import
    pub fn is_default_universe_snapshot_newer(&self, root: &Path) -> Result<bool> {
        SnapshotImporter::new(self).is_snapshot_newer(root)
    }

    /// Replace the default universe with the snapshot at `root`
    pub fn import_default_universe(
        &self,
        root: &Path,
        options: ImportOptions<'_>,
    ) -> Result<ImportReport> {
        SnapshotImporter::new(self).import(root, options)
    }
}

/// Insert one sector inside a savepoint. A constraint violation undoes just
/// that sector and comes back as a skip reason; other failures propagate.
fn insert_sector_isolated(conn: &Connection, sector: &Sector) -> Result<Option<String>> {
    conn.execute_batch("SAVEPOINT import_sector")?;
    match insert_sector(conn, sector) {
        Ok(()) => {
            conn.execute_batch("RELEASE import_sector")?;
            Ok(None)
        }
        Err(Error::Storage(err))
            if err.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) =>
        {
            conn.execute_batch("ROLLBACK TO import_sector; RELEASE import_sector")?;
            Ok(Some(err.to_string()))
        }
        Err(err) => Err(err),
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
