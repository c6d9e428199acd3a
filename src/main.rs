use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use universe_db::{
    cli::{Cli, Commands},
    run_import,
    store::Store,
    ImportReport, LogQueue, SilentUi, UiApp,
};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    // A full-screen view owns the terminal; its log lines go to the activity panel
    let log_queue = LogQueue::new();
    if cli.uses_tui() {
        let writer = log_queue.clone();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = cli.store_config()?;
    let store = Store::open(config.clone())
        .with_context(|| format!("opening store at {}", config.path.display()))?;

    match cli.command {
        Commands::Init => {
            println!("Store ready at {}\n", config.path.display());
            for (table, version) in store.schema_versions(None)? {
                println!("  {:<24} v{}", table, version);
            }
        }

        Commands::Import {
            snapshot,
            force,
            tui,
        } => import(&store, &snapshot, force, tui.then_some(log_queue))?,

        Commands::Universes => {
            let universes = store.list_universe_info(None)?;
            if universes.is_empty() {
                println!("No custom universes");
            }
            for universe in universes {
                println!("{}\t{}", universe.id, universe.name);
            }
        }

        Commands::Sectors {
            universe,
            milieu,
            custom_only,
        } => {
            let sectors =
                store.list_sector_info(&universe, milieu.as_deref(), !custom_only, None)?;
            for sector in &sectors {
                println!(
                    "{}\t{}\t{},{}\t{}{}",
                    sector.milieu,
                    sector.id,
                    sector.sector_x,
                    sector.sector_y,
                    sector.primary_name,
                    if sector.is_custom { "\t(custom)" } else { "" }
                );
            }
            println!("\n{} sector(s)", sectors.len());
        }

        Commands::SectorAt {
            universe,
            milieu,
            x,
            y,
        } => match store.sector_info_by_position(&universe, &milieu, x, y, None)? {
            Some(sector) => println!("{}", serde_json::to_string_pretty(&sector)?),
            None => bail!("no sector at {},{} in {} for {}", x, y, milieu, universe),
        },

        Commands::ShowSector { id } => match store.load_sector(&id, None)? {
            Some(sector) => println!("{}", serde_json::to_string_pretty(&sector)?),
            None => bail!("sector {} not found", id),
        },

        Commands::DeleteSector { id } => {
            if store.delete_sector(&id, None)? {
                println!("Deleted sector {}", id);
            } else {
                println!("Sector {} not found", id);
            }
        }

        Commands::DeleteUniverse { id } => {
            if store.delete_universe(&id, None)? {
                println!("Deleted universe {}", id);
            } else {
                println!("Universe {} not found", id);
            }
        }

        Commands::Vacuum => {
            let start = Instant::now();
            store.vacuum_database()?;
            println!("Compacted in {:.1}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}

/// Run an import; `tui` carries the queue feeding the full-screen view
fn import(store: &Store, snapshot: &Path, force: bool, tui: Option<LogQueue>) -> Result<()> {
    if !force && !store.is_default_universe_snapshot_newer(snapshot)? {
        println!("Default universe is up to date; use --force to re-import");
        return Ok(());
    }

    let start = Instant::now();
    let cancel = AtomicBool::new(false);

    if let Some(logs) = tui {
        let mut ui = UiApp::new()?.with_log_queue(logs);
        match run_import(store, snapshot, &mut ui, &cancel) {
            Ok(report) => ui.finish(&summary(&report, start))?,
            Err(err) => {
                ui.restore()?;
                return Err(err.into());
            }
        }
    } else {
        let report = run_import(store, snapshot, &mut SilentUi::new(), &cancel)?;
        for skipped in &report.skipped {
            eprintln!(
                "skipped {} / {}: {}",
                skipped.milieu, skipped.name, skipped.reason
            );
        }
        println!("{}", summary(&report, start));
    }

    Ok(())
}

fn summary(report: &ImportReport, start: Instant) -> String {
    format!(
        "Imported {} sector(s) from {} milieu(s), skipped {}, snapshot {} in {:.1}s",
        report.imported,
        report.milieus,
        report.skipped.len(),
        report.timestamp,
        start.elapsed().as_secs_f64()
    )
}
