//! Store configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! command-line overrides applied by the binary.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default page cache size applied to every connection
pub const DEFAULT_CACHE_PAGES: u32 = 200_000;

/// SQLite journal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    Delete,
    Truncate,
    Persist,
    Memory,
    Wal,
    Off,
}

impl JournalMode {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Truncate => "TRUNCATE",
            JournalMode::Persist => "PERSIST",
            JournalMode::Memory => "MEMORY",
            JournalMode::Wal => "WAL",
            JournalMode::Off => "OFF",
        }
    }
}

impl FromStr for JournalMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "delete" => Ok(JournalMode::Delete),
            "truncate" => Ok(JournalMode::Truncate),
            "persist" => Ok(JournalMode::Persist),
            "memory" => Ok(JournalMode::Memory),
            "wal" => Ok(JournalMode::Wal),
            "off" => Ok(JournalMode::Off),
            other => Err(Error::Configuration(format!(
                "unknown journal mode: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for JournalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// SQLite synchronous level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncLevel {
    Off,
    Normal,
    Full,
    Extra,
}

impl SyncLevel {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SyncLevel::Off => "OFF",
            SyncLevel::Normal => "NORMAL",
            SyncLevel::Full => "FULL",
            SyncLevel::Extra => "EXTRA",
        }
    }
}

impl FromStr for SyncLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(SyncLevel::Off),
            "normal" => Ok(SyncLevel::Normal),
            "full" => Ok(SyncLevel::Full),
            "extra" => Ok(SyncLevel::Extra),
            other => Err(Error::Configuration(format!(
                "unknown sync level: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for SyncLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Connection and location settings for a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub foreign_keys: bool,
    pub journal_mode: JournalMode,
    pub synchronous: SyncLevel,
    pub cache_pages: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("universe.db"),
            foreign_keys: true,
            journal_mode: JournalMode::Wal,
            synchronous: SyncLevel::Normal,
            cache_pages: DEFAULT_CACHE_PAGES,
        }
    }
}

impl StoreConfig {
    /// Default settings for a database at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Build a config from recognized option names.
    ///
    /// Accepts `foreign_keys`, `durability_mode` (or `journal_mode`),
    /// `sync_level` (or `synchronous`) and `cache_pages`. Any other key is
    /// rejected.
    pub fn from_options<'a, I>(path: impl Into<PathBuf>, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::new(path);

        for (key, value) in options {
            match key {
                "foreign_keys" => config.foreign_keys = parse_switch(key, value)?,
                "durability_mode" | "journal_mode" => config.journal_mode = value.parse()?,
                "sync_level" | "synchronous" => config.synchronous = value.parse()?,
                "cache_pages" => {
                    config.cache_pages = value.parse().map_err(|_| {
                        Error::Configuration(format!("invalid cache_pages: {}", value))
                    })?
                }
                other => {
                    return Err(Error::Configuration(format!(
                        "unrecognized option: {}",
                        other
                    )))
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: StoreConfig = toml::from_str(&contents)
            .map_err(|e| Error::Configuration(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::Configuration("database path is empty".into()));
        }
        if self.cache_pages == 0 {
            return Err(Error::Configuration("cache_pages must be positive".into()));
        }
        Ok(())
    }

    /// Pragma batch applied to every new connection
    pub fn pragma_sql(&self) -> String {
        format!(
            "PRAGMA foreign_keys = {};
             PRAGMA journal_mode = {};
             PRAGMA synchronous = {};
             PRAGMA cache_size = {};",
            if self.foreign_keys { "ON" } else { "OFF" },
            self.journal_mode.as_sql(),
            self.synchronous.as_sql(),
            self.cache_pages
        )
    }
}

fn parse_switch(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Ok(true),
        "off" | "false" | "0" | "no" => Ok(false),
        _ => Err(Error::Configuration(format!(
            "invalid value for {}: {}",
            key, value
        ))),
    }
}

/// Platform data directory location for the database
pub fn default_database_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "universe-db")
        .ok_or_else(|| Error::Configuration("could not determine data directory".into()))?;
    Ok(dirs.data_dir().join("universe.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_connection_contract() {
        let config = StoreConfig::default();
        assert!(config.foreign_keys);
        assert_eq!(config.journal_mode, JournalMode::Wal);
        assert_eq!(config.synchronous, SyncLevel::Normal);
        assert_eq!(config.cache_pages, 200_000);

        let sql = config.pragma_sql();
        assert!(sql.contains("foreign_keys = ON"));
        assert!(sql.contains("journal_mode = WAL"));
        assert!(sql.contains("synchronous = NORMAL"));
        assert!(sql.contains("cache_size = 200000"));
    }

    #[test]
    fn test_from_options_recognized_keys() {
        let config = StoreConfig::from_options(
            "x.db",
            [
                ("foreign_keys", "on"),
                ("durability_mode", "wal"),
                ("sync_level", "full"),
                ("cache_pages", "5000"),
            ],
        )
        .unwrap();

        assert_eq!(config.synchronous, SyncLevel::Full);
        assert_eq!(config.cache_pages, 5000);
    }

    #[test]
    fn test_from_options_rejects_unknown_key() {
        let err = StoreConfig::from_options("x.db", [("page_size", "4096")]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_from_options_rejects_bad_value() {
        let err = StoreConfig::from_options("x.db", [("durability_mode", "fast")]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let err = StoreConfig::from_options("x.db", [("cache_pages", "0")]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_toml_rejects_unknown_fields() {
        let parsed: std::result::Result<StoreConfig, _> =
            toml::from_str("path = \"a.db\"\nturbo = true\n");
        assert!(parsed.is_err());

        let parsed: StoreConfig = toml::from_str("path = \"a.db\"\nsynchronous = \"full\"\n").unwrap();
        assert_eq!(parsed.synchronous, SyncLevel::Full);
        assert_eq!(parsed.journal_mode, JournalMode::Wal);
    }
}
