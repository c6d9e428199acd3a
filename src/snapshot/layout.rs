//! On-disk layout of a default-universe snapshot
//!
//! ```text
//! <root>/timestamp.txt                       YYYY-MM-DD HH:MM:SS
//! <root>/milieu/<M>/universe.json            sector index
//! <root>/milieu/<M>/<escaped name>.xml       sector metadata
//! <root>/milieu/<M>/<escaped name>.sec       tab-delimited world data
//! ```

use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Format of `timestamp.txt` and of the stored import timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TIMESTAMP_FILE: &str = "timestamp.txt";
const MILIEU_DIR: &str = "milieu";
const UNIVERSE_INDEX_FILE: &str = "universe.json";

/// Sector index of one milieu
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UniverseIndex {
    #[serde(default)]
    pub sectors: Vec<IndexEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexEntry {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub milieu: Option<String>,
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub names: Vec<IndexName>,
}

impl IndexEntry {
    /// First listed name, used to locate the sector files
    pub fn primary_name(&self) -> Option<&str> {
        self.names
            .iter()
            .map(|n| n.text.trim())
            .find(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexName {
    pub text: String,
    pub lang: Option<String>,
}

/// Paths of one snapshot directory
#[derive(Debug, Clone)]
pub struct SnapshotLayout {
    root: PathBuf,
}

impl SnapshotLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn timestamp_path(&self) -> PathBuf {
        self.root.join(TIMESTAMP_FILE)
    }

    pub fn milieu_path(&self, milieu: &str) -> PathBuf {
        self.root.join(MILIEU_DIR).join(milieu)
    }

    pub fn universe_index_path(&self, milieu: &str) -> PathBuf {
        self.milieu_path(milieu).join(UNIVERSE_INDEX_FILE)
    }

    pub fn metadata_path(&self, milieu: &str, sector_name: &str) -> PathBuf {
        self.milieu_path(milieu)
            .join(format!("{}.xml", escape_file_name(sector_name)))
    }

    pub fn data_path(&self, milieu: &str, sector_name: &str) -> PathBuf {
        self.milieu_path(milieu)
            .join(format!("{}.sec", escape_file_name(sector_name)))
    }

    /// Read and parse `timestamp.txt`
    pub fn read_timestamp(&self) -> Result<NaiveDateTime> {
        let path = self.timestamp_path();
        let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        parse_timestamp(&text)
    }

    /// Milieu directory names, sorted
    pub fn milieus(&self) -> Result<Vec<String>> {
        let dir = self.root.join(MILIEU_DIR);
        let entries = std::fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))?;

        let mut milieus = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&dir, e))?;
            let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
            if file_type.is_dir() {
                milieus.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        milieus.sort();

        Ok(milieus)
    }

    pub fn read_universe_index(&self, milieu: &str) -> Result<UniverseIndex> {
        let path = self.universe_index_path(milieu);
        let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        Ok(serde_json::from_str(&text)?)
    }
}

pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT)
        .map_err(|e| Error::parse(TIMESTAMP_FILE, e.to_string()))
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Replace characters that are invalid in file names with `_`
pub fn escape_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_escape_file_name() {
        assert_eq!(escape_file_name("Spinward Marches"), "Spinward Marches");
        assert_eq!(escape_file_name("A/B:C?"), "A_B_C_");
        assert_eq!(escape_file_name(r#"x<y>"z"|w\*"#), "x_y__z__w__");
    }

    #[test]
    fn test_timestamp_round_trip() {
        let ts = parse_timestamp("2024-03-01 12:30:00\n").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-03-01 12:30:00");
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_universe_index_deserializes() {
        let json = r#"{"Sectors":[
            {"X":-4,"Y":-1,"Milieu":"M1105","Abbreviation":"Spin",
             "Names":[{"Text":"Spinward Marches"},{"Text":"Gashikan","Lang":"Vilani"}]},
            {"X":0,"Y":0,"Names":[]}
        ]}"#;
        let index: UniverseIndex = serde_json::from_str(json).unwrap();
        assert_eq!(index.sectors.len(), 2);
        assert_eq!(index.sectors[0].x, Some(-4));
        assert_eq!(index.sectors[0].primary_name(), Some("Spinward Marches"));
        assert_eq!(index.sectors[0].names[1].lang.as_deref(), Some("Vilani"));
        assert_eq!(index.sectors[1].primary_name(), None);
    }

    #[test]
    fn test_milieus_are_sorted_directories() {
        let dir = TempDir::new().unwrap();
        let milieu = dir.path().join("milieu");
        std::fs::create_dir_all(milieu.join("M1105")).unwrap();
        std::fs::create_dir_all(milieu.join("M0")).unwrap();
        std::fs::write(milieu.join("README"), "not a milieu").unwrap();

        let layout = SnapshotLayout::new(dir.path());
        assert_eq!(layout.milieus().unwrap(), vec!["M0", "M1105"]);
        assert!(layout
            .data_path("M0", "Core")
            .ends_with("milieu/M0/Core.sec"));
    }

    #[test]
    fn test_missing_timestamp_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = SnapshotLayout::new(dir.path()).read_timestamp().unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
