//! Default-universe snapshot reading and import
//!
//! A snapshot is a directory with a timestamp, one universe index per
//! milieu, and a metadata file plus a world-data file per sector.

mod convert;
mod importer;
mod layout;
mod parser;
mod second_survey;
mod sector_xml;

pub use importer::{ImportOptions, ImportReport, ImportStage, SkippedSector, SnapshotImporter};
pub use layout::{
    escape_file_name, format_timestamp, parse_timestamp, IndexEntry, IndexName, SnapshotLayout,
    UniverseIndex, TIMESTAMP_FORMAT,
};
pub use parser::{
    AllegianceRecord, BorderRecord, Cultural, Economic, LabelRecord, Pbg, RegionRecord,
    RouteRecord, SectorMetadata, SectorParser, SophontRecord, Uwp, WorldRecord,
};
pub use second_survey::SecondSurveyParser;
