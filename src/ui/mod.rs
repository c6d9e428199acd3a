//! Terminal UI for snapshot imports
//!
//! `UiApp` draws a full-screen view (phase, progress, activity log) with
//! ratatui; `SilentUi` discards everything. `run_import` drives an import
//! through either one. While the full-screen view is up, tracing output goes
//! to a `LogQueue` that the view drains into its activity panel.

mod components;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Terminal;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::snapshot::{ImportOptions, ImportReport, ImportStage};
use crate::store::Store;
use components::{ActivityPanel, ProgressPanel, StatusPanel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Checking,
    Parsing,
    Writing,
    Compacting,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Phase::Checking => "Checking snapshot",
            Phase::Parsing => "Parsing sectors",
            Phase::Writing => "Writing default universe",
            Phase::Compacting => "Compacting database",
            Phase::Complete => "Complete",
        };
        f.write_str(text)
    }
}

impl From<ImportStage> for Phase {
    fn from(stage: ImportStage) -> Self {
        match stage {
            ImportStage::Parsing => Phase::Parsing,
            ImportStage::Writing => Phase::Writing,
            ImportStage::Compacting => Phase::Compacting,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
    pub label: String,
}

impl Progress {
    pub fn new(current: u64, total: u64, label: impl Into<String>) -> Self {
        Self {
            current,
            total,
            label: label.into(),
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64).min(1.0)
        }
    }
}

/// Formatted log lines waiting to be shown. Cloned into a
/// `tracing_subscriber` writer on one side and drained by `UiApp` on the
/// other.
#[derive(Debug, Clone, Default)]
pub struct LogQueue(Arc<Mutex<VecDeque<String>>>);

impl LogQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued line, oldest first
    pub fn drain(&self) -> Vec<String> {
        match self.0.lock() {
            Ok(mut lines) => lines.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Write for LogQueue {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        if let Ok(mut lines) = self.0.lock() {
            lines.extend(
                text.lines()
                    .map(str::trim_end)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            );
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Import display; implemented by the terminal UI and the silent UI
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_info(&mut self, info: impl Into<String>);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);

    fn warn(&mut self, message: impl Into<String>) {
        self.log(message);
    }

    /// Whether the user asked to stop
    fn cancel_requested(&mut self) -> bool {
        false
    }
}

pub struct UiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    status: StatusPanel,
    progress: ProgressPanel,
    activity: ActivityPanel,
    logs: Option<LogQueue>,
    cancel_requested: bool,
}

impl UiApp {
    /// Switch the terminal to raw mode on the alternate screen
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            status: StatusPanel::new(),
            progress: ProgressPanel::new(),
            activity: ActivityPanel::new(),
            logs: None,
            cancel_requested: false,
        })
    }

    /// Show lines written to `logs` in the activity panel
    pub fn with_log_queue(mut self, logs: LogQueue) -> Self {
        self.logs = Some(logs);
        self
    }

    fn pull_logs(&mut self) {
        let Some(logs) = &self.logs else {
            return;
        };
        for line in logs.drain() {
            if line.trim_start().starts_with("WARN") || line.trim_start().starts_with("ERROR") {
                self.activity.warn(line);
            } else {
                self.activity.info(line);
            }
        }
    }

    fn draw(&mut self) -> Result<()> {
        self.pull_logs();
        let status = &self.status;
        let progress = &self.progress;
        let activity = &self.activity;

        self.terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(6),
                    Constraint::Length(3),
                    Constraint::Min(4),
                ])
                .split(frame.area());

            status.render(frame, chunks[0]);
            progress.render(frame, chunks[1]);
            activity.render(frame, chunks[2]);
        })?;

        Ok(())
    }

    /// Show the summary, wait for a key and restore the terminal
    pub fn finish(mut self, summary: &str) -> Result<()> {
        self.set_phase(Phase::Complete);
        self.clear_progress();
        self.log(summary);
        self.log("Press any key to exit");
        self.draw()?;

        loop {
            if event::poll(Duration::from_millis(100))? {
                if let CrosstermEvent::Key(_) = event::read()? {
                    break;
                }
            }
        }

        self.restore()
    }

    pub fn restore(mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Ui for UiApp {
    fn set_phase(&mut self, phase: Phase) {
        self.status.set_phase(phase);
        self.draw().ok();
    }

    fn set_info(&mut self, info: impl Into<String>) {
        self.status.set_info(info);
        self.draw().ok();
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        self.progress.set(Progress::new(current, total, label));
        self.draw().ok();
    }

    fn clear_progress(&mut self) {
        self.progress.clear();
        self.draw().ok();
    }

    fn log(&mut self, message: impl Into<String>) {
        self.activity.info(message);
        self.draw().ok();
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.status.count_warning();
        self.activity.warn(message);
        self.draw().ok();
    }

    /// `q`, `Esc` or Ctrl+C
    fn cancel_requested(&mut self) -> bool {
        while event::poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(CrosstermEvent::Key(KeyEvent {
                code, modifiers, ..
            })) = event::read()
            {
                let ctrl_c =
                    code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL);
                if ctrl_c || code == KeyCode::Char('q') || code == KeyCode::Esc {
                    self.cancel_requested = true;
                }
            }
        }
        self.cancel_requested
    }
}

impl Drop for UiApp {
    fn drop(&mut self) {
        terminal::disable_raw_mode().ok();
        self.terminal
            .backend_mut()
            .execute(LeaveAlternateScreen)
            .ok();
        self.terminal.show_cursor().ok();
    }
}

#[derive(Debug, Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_info(&mut self, _info: impl Into<String>) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
}

/// Import the snapshot at `root` while reporting to `ui`. A cancel request
/// from the UI raises `cancel`, which aborts the import without writing.
pub fn run_import<U: Ui>(
    store: &Store,
    root: &Path,
    ui: &mut U,
    cancel: &AtomicBool,
) -> crate::error::Result<ImportReport> {
    ui.set_phase(Phase::Checking);
    ui.set_info(format!("Snapshot {}", root.display()));

    let ui = RefCell::new(ui);
    let mut on_stage = |stage: ImportStage| {
        let mut ui = ui.borrow_mut();
        ui.clear_progress();
        ui.set_phase(stage.into());
        ui.log(Phase::from(stage).to_string());
    };
    let mut on_progress =
        |milieu: Option<&str>, sector: Option<&str>, processed: usize, total: usize| {
            let mut ui = ui.borrow_mut();
            if let (Some(milieu), Some(sector)) = (milieu, sector) {
                ui.set_progress(
                    processed as u64,
                    total as u64,
                    format!("{} / {}", milieu, sector),
                );
            }
            if ui.cancel_requested() {
                cancel.store(true, Ordering::Relaxed);
            }
        };

    let options = ImportOptions::new()
        .with_stage(&mut on_stage)
        .with_progress(&mut on_progress)
        .with_cancel(cancel);
    let report = store.import_default_universe(root, options)?;

    let mut ui = ui.borrow_mut();
    for skipped in &report.skipped {
        ui.warn(format!(
            "Skipped {} / {}: {}",
            skipped.milieu, skipped.name, skipped.reason
        ));
    }
    if !report.compacted {
        ui.warn("Database compaction failed");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingUi {
        phases: Vec<Phase>,
        warnings: Vec<String>,
        progress_calls: usize,
    }

    impl Ui for RecordingUi {
        fn set_phase(&mut self, phase: Phase) {
            self.phases.push(phase);
        }
        fn set_info(&mut self, _info: impl Into<String>) {}
        fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {
            self.progress_calls += 1;
        }
        fn clear_progress(&mut self) {}
        fn log(&mut self, _message: impl Into<String>) {}
        fn warn(&mut self, message: impl Into<String>) {
            self.warnings.push(message.into());
        }
    }

    #[test]
    fn test_log_queue_collects_tracing_lines() {
        let queue = LogQueue::new();
        let writer = queue.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Importing default universe");
            tracing::warn!(sector = "Broken", "Skipping sector");
        });

        let lines = queue.drain();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Importing default universe"));
        assert!(lines[1].trim_start().starts_with("WARN"));
        assert!(lines[1].contains("Broken"));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_progress_ratio_is_clamped() {
        assert_eq!(Progress::new(5, 0, "x").ratio(), 0.0);
        assert_eq!(Progress::new(3, 2, "x").ratio(), 1.0);
        assert_eq!(Progress::new(1, 4, "x").ratio(), 0.25);
    }

    #[test]
    fn test_run_import_reports_phases_and_skips() {
        use crate::config::StoreConfig;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let root = dir.path().join("snapshot");
        let milieu = root.join("milieu").join("M0");
        std::fs::create_dir_all(&milieu).unwrap();
        std::fs::write(root.join("timestamp.txt"), "2024-01-01 00:00:00").unwrap();
        std::fs::write(
            milieu.join("universe.json"),
            r#"{"Sectors":[
                {"X":0,"Y":0,"Names":[{"Text":"Good"}]},
                {"X":1,"Y":0,"Names":[{"Text":"Broken"}]}
            ]}"#,
        )
        .unwrap();
        std::fs::write(milieu.join("Good.sec"), "Hex\tUWP\n0101\tA000000-0\n").unwrap();
        std::fs::write(milieu.join("Broken.sec"), "Hex\tUWP\n0101\tnot-a-uwp\n").unwrap();

        let store = Store::open(StoreConfig::new(dir.path().join("store.db"))).unwrap();
        let mut ui = RecordingUi::default();
        let cancel = AtomicBool::new(false);
        let report = run_import(&store, &root, &mut ui, &cancel).unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(
            ui.phases,
            vec![
                Phase::Checking,
                Phase::Parsing,
                Phase::Writing,
                Phase::Compacting
            ]
        );
        assert_eq!(ui.warnings.len(), 1);
        assert!(ui.warnings[0].contains("Broken"));
        assert!(ui.progress_calls >= 3);
    }
}
