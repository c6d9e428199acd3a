//! Panels of the import screen

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph};
use ratatui::Frame;
use std::collections::VecDeque;

use super::{Phase, Progress};

const TITLE: &str = " Universe DB ";
const MAX_ACTIVITY: usize = 200;

pub struct StatusPanel {
    phase: Phase,
    info: String,
    warnings: usize,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self {
            phase: Phase::Checking,
            info: String::new(),
            warnings: 0,
        }
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn set_info(&mut self, info: impl Into<String>) {
        self.info = info.into();
    }

    pub fn count_warning(&mut self) {
        self.warnings += 1;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let color = match self.phase {
            Phase::Complete => Color::Green,
            _ => Color::Cyan,
        };
        let phase_style = Style::default().fg(color).add_modifier(Modifier::BOLD);

        let marker = match self.phase {
            Phase::Checking => "?",
            Phase::Parsing => "»",
            Phase::Writing => "▸",
            Phase::Compacting => "≡",
            Phase::Complete => "✓",
        };

        let warnings = if self.warnings == 0 {
            Span::styled("no warnings", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(
                format!("{} warning(s)", self.warnings),
                Style::default().fg(Color::Yellow),
            )
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(format!(" {} ", marker), phase_style),
                Span::styled(self.phase.to_string(), phase_style),
            ]),
            Line::from(vec![
                Span::raw("   "),
                Span::styled(self.info.as_str(), Style::default().fg(Color::Gray)),
            ]),
            Line::from(vec![Span::raw("   "), warnings]),
            Line::from(Span::styled(
                "   q / Esc to cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .title(TITLE)
            .border_style(Style::default().fg(Color::Blue));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

pub struct ProgressPanel {
    progress: Option<Progress>,
}

impl ProgressPanel {
    pub fn new() -> Self {
        Self { progress: None }
    }

    pub fn set(&mut self, progress: Progress) {
        self.progress = Some(progress);
    }

    pub fn clear(&mut self) {
        self.progress = None;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::Blue));

        let Some(progress) = &self.progress else {
            frame.render_widget(Paragraph::new("").block(block), area);
            return;
        };

        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
            .ratio(progress.ratio())
            .label(format!(
                "{}/{}  {}",
                progress.current, progress.total, progress.label
            ));
        frame.render_widget(gauge, area);
    }
}

enum Level {
    Info,
    Warn,
}

/// Most recent log lines, oldest dropped first
pub struct ActivityPanel {
    entries: VecDeque<(Level, String)>,
}

impl ActivityPanel {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_ACTIVITY),
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Level::Info, message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Level::Warn, message.into());
    }

    fn push(&mut self, level: Level, message: String) {
        if self.entries.len() == MAX_ACTIVITY {
            self.entries.pop_front();
        }
        self.entries.push_back((level, message));
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Activity ")
            .border_style(Style::default().fg(Color::Blue));

        let visible = area.height.saturating_sub(2) as usize;
        let skip = self.entries.len().saturating_sub(visible);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .skip(skip)
            .map(|(level, message)| {
                let (prefix, color) = match level {
                    Level::Info => (" ", Color::White),
                    Level::Warn => ("!", Color::Yellow),
                };
                ListItem::new(Span::styled(
                    format!("{} {}", prefix, message),
                    Style::default().fg(color),
                ))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}
