use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{default_database_path, StoreConfig};
use crate::error::Result;

#[derive(Parser, Debug)]
#[command(name = "universe-db")]
#[command(version, about = "Default sector snapshot plus custom universe overlays in SQLite")]
pub struct Cli {
    /// Database file (defaults to the per-user data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Store configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or verify the schema and print table versions
    Init,

    /// Import a default-universe snapshot directory
    Import {
        /// Snapshot root containing timestamp.txt and milieu/
        snapshot: PathBuf,

        /// Import even if the snapshot is not newer than the last import
        #[arg(short, long)]
        force: bool,

        /// Show a full-screen progress view
        #[arg(long)]
        tui: bool,
    },

    /// List custom universes
    Universes,

    /// List the sectors visible in a universe ("default" for the snapshot)
    Sectors {
        universe: String,

        /// Only this milieu
        #[arg(short, long)]
        milieu: Option<String>,

        /// Leave out default sectors
        #[arg(long)]
        custom_only: bool,
    },

    /// Show the sector a universe sees at one position
    SectorAt {
        universe: String,
        milieu: String,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },

    /// Print a full sector as JSON
    ShowSector { id: String },

    /// Delete a custom sector
    DeleteSector { id: String },

    /// Delete a custom universe and its sectors
    DeleteUniverse { id: String },

    /// Compact the database file
    Vacuum,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Store configuration from `--config`, with `--db` overriding its path
    /// and the per-user default used when neither names one
    pub fn store_config(&self) -> Result<StoreConfig> {
        let mut config = match &self.config {
            Some(file) => StoreConfig::from_file(file)?,
            None => StoreConfig::default(),
        };
        match &self.db {
            Some(db) => config.path = db.clone(),
            None if self.config.is_none() => config.path = default_database_path()?,
            None => {}
        }
        Ok(config)
    }

    /// Default log filter for the chosen verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "universe_db=info",
            1 => "universe_db=debug",
            _ => "trace",
        }
    }

    /// Whether tracing output would clash with a full-screen view
    pub fn uses_tui(&self) -> bool {
        matches!(self.command, Commands::Import { tui: true, .. })
    }
}
