pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod schema;
pub mod snapshot;
pub mod store;
pub mod ui;

pub use cli::{Cli, Commands};
pub use config::{JournalMode, StoreConfig, SyncLevel};
pub use error::{Error, Result};
pub use model::{
    Sector, SectorInfo, Universe, UniverseInfo, DEFAULT_UNIVERSE_ID, DEFAULT_UNIVERSE_NAME,
};
pub use snapshot::{ImportOptions, ImportReport, ImportStage, SkippedSector};
pub use store::{Store, Transaction, TransactionState};
pub use ui::{run_import, LogQueue, Phase, SilentUi, Ui, UiApp};
