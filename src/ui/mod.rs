// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal UI for Scalescope.
//!
//! Provides a ratatui-based terminal interface with the harmonic graph
//! view, a per-family match list, and a held-note header.

mod graph_view;
mod matches;

pub use graph_view::GraphWidget;
pub use matches::MatchListWidget;

use std::collections::HashSet;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::config::DisplaySettings;
use crate::music::{FamilyId, HarmonicGraph, MatchResult, NodeId, PitchClassSet, ScaleCatalog};

/// UI state assembled by the main loop each frame
#[derive(Debug, Clone)]
pub struct UiState {
    /// Pitch classes currently sounding
    pub held: PitchClassSet,
    /// Match result for the held set
    pub matches: MatchResult,
    /// Nodes the match result lights up
    pub highlighted: HashSet<NodeId>,
    /// Sustain pedal down
    pub pedal: bool,
    /// Keys physically held
    pub keys_down: usize,
    /// Name of the connected MIDI source
    pub source_name: String,
    /// Measured frames per second
    pub fps: f64,
    /// Show the frame rate in the header
    pub show_fps: bool,
    /// Draw graph edges
    pub show_edges: bool,
    /// List families with no matches
    pub show_empty_families: bool,
    /// Help text visible
    pub show_help: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
}

impl UiState {
    /// Create the initial state: nothing held, full range highlighted
    pub fn new(catalog: &ScaleCatalog, graph: &HarmonicGraph, display: &DisplaySettings) -> Self {
        let matches = MatchResult::full_range(catalog);
        let highlighted = graph.highlight(&matches);
        Self {
            held: PitchClassSet::EMPTY,
            matches,
            highlighted,
            pedal: false,
            keys_down: 0,
            source_name: String::new(),
            fps: 0.0,
            show_fps: display.show_fps,
            show_edges: display.show_edges,
            show_empty_families: display.show_empty_families,
            show_help: false,
            status_message: None,
            status_time: None,
        }
    }

    /// Set a status message that will be displayed temporarily
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_time = Some(Instant::now());
    }

    /// Clear expired status message
    pub fn clear_expired_status(&mut self) {
        if let Some(time) = self.status_time {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_time = None;
            }
        }
    }

    /// Take over the display toggles from reloaded settings
    pub fn apply_display(&mut self, display: &DisplaySettings) {
        self.show_fps = display.show_fps;
        self.show_edges = display.show_edges;
        self.show_empty_families = display.show_empty_families;
    }
}

/// Color assigned to a family, shared by the list and graph views
pub fn family_color(id: FamilyId) -> Color {
    const PALETTE: [Color; 7] = [
        Color::Cyan,
        Color::Green,
        Color::Magenta,
        Color::Yellow,
        Color::Blue,
        Color::Red,
        Color::LightGreen,
    ];
    PALETTE[id % PALETTE.len()]
}

/// Frame rate counter averaged over one-second windows
#[derive(Debug)]
pub struct FpsCounter {
    frames: u32,
    window_start: Instant,
    fps: f64,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: 0,
            window_start: Instant::now(),
            fps: 0.0,
        }
    }

    /// Count one frame and return the current estimate
    pub fn tick(&mut self) -> f64 {
        self.frames += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed >= Duration::from_secs(1) {
            self.fps = self.frames as f64 / elapsed.as_secs_f64();
            self.frames = 0;
            self.window_start = Instant::now();
        }
        self.fps
    }

    /// The last completed estimate
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Key event result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// No action needed
    None,
    /// Quit the application
    Quit,
    /// Drop all held notes
    ClearNotes,
    /// Toggle the frame rate display
    ToggleFps,
    /// Toggle graph edges
    ToggleEdges,
    /// Toggle listing of families without matches
    ToggleEmptyFamilies,
    /// Toggle help
    ToggleHelp,
}

/// Map a key press to its action
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    match (code, modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE)
        | (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,

        // Notes
        (KeyCode::Char('c'), KeyModifiers::NONE) => KeyAction::ClearNotes,

        // Display toggles
        (KeyCode::Char('f'), KeyModifiers::NONE) => KeyAction::ToggleFps,
        (KeyCode::Char('e'), KeyModifiers::NONE) => KeyAction::ToggleEdges,
        (KeyCode::Char('m'), KeyModifiers::NONE) => KeyAction::ToggleEmptyFamilies,

        // Help
        (KeyCode::Char('?'), _) | (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::ToggleHelp,

        _ => KeyAction::None,
    }
}

/// Terminal UI application
pub struct App {
    /// Terminal handle
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Target frame rate
    frame_rate: u32,
    /// Whether to continue running
    running: bool,
}

impl App {
    /// Create the app and put the terminal in raw mode
    pub fn new() -> io::Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            frame_rate: 60,
            running: true,
        })
    }

    /// Set frame rate
    pub fn set_frame_rate(&mut self, fps: u32) {
        self.frame_rate = fps.clamp(1, 240);
    }

    /// Check if running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the app
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Handle a key event, applying display toggles to the state
    pub fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        state: &mut UiState,
    ) -> KeyAction {
        let action = map_key(code, modifiers);
        match action {
            KeyAction::Quit => self.quit(),
            KeyAction::ToggleFps => state.show_fps = !state.show_fps,
            KeyAction::ToggleEdges => state.show_edges = !state.show_edges,
            KeyAction::ToggleEmptyFamilies => {
                state.show_empty_families = !state.show_empty_families
            }
            KeyAction::ToggleHelp => state.show_help = !state.show_help,
            _ => {}
        }
        action
    }

    /// Poll for events with timeout
    pub fn poll_event(&self) -> io::Result<Option<Event>> {
        let timeout = Duration::from_millis(1000 / self.frame_rate as u64);
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Draw the UI
    pub fn draw(
        &mut self,
        state: &UiState,
        catalog: &ScaleCatalog,
        graph: &HarmonicGraph,
    ) -> io::Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.area();

            // Main layout: header, content, status bar
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3), // Header
                    Constraint::Min(10),   // Graph + match list
                    Constraint::Length(1), // Status bar
                ])
                .split(area);

            render_header(frame, chunks[0], state);

            let content = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
                .split(chunks[1]);

            let graph_widget = GraphWidget::new(graph, catalog, &state.highlighted)
                .show_edges(state.show_edges)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Harmonic Graph "),
                );
            frame.render_widget(graph_widget, content[0]);

            let list_widget = MatchListWidget::new(&state.matches, catalog)
                .show_empty(state.show_empty_families)
                .block(Block::default().borders(Borders::ALL).title(" Matches "));
            frame.render_widget(list_widget, content[1]);

            render_status_bar(frame, chunks[2], state);

            // Help overlay
            if state.show_help {
                render_help_overlay(frame, area);
            }
        })?;

        Ok(())
    }

    /// Cleanup terminal on drop
    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Render the header: held notes, match count, pedal, source
fn render_header(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().borders(Borders::ALL).title(" Scalescope ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let held = if state.held.is_empty() {
        Span::styled("(nothing held)", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            state.held.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    };

    let mut spans = vec![
        held,
        Span::raw("   "),
        Span::styled(
            format!("{} possibilities", state.matches.total_matches()),
            Style::default().fg(Color::Cyan),
        ),
    ];

    if state.pedal {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            "PEDAL",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    if state.show_fps {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("{:.1} fps", state.fps),
            Style::default().fg(Color::Magenta),
        ));
    }

    if !state.source_name.is_empty() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            &state.source_name,
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// Render status bar
fn render_status_bar(frame: &mut Frame, area: Rect, state: &UiState) {
    let text = if let Some(ref msg) = state.status_message {
        Span::styled(msg, Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            " c: Clear | e: Edges | m: Empty families | f: FPS | h: Help | q: Quit",
            Style::default().fg(Color::DarkGray),
        )
    };

    frame.render_widget(Paragraph::new(text), area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    // Calculate centered area
    let width = 46.min(area.width.saturating_sub(4));
    let height = 13.min(area.height.saturating_sub(4));
    let x = (area.width - width) / 2;
    let y = (area.height - height) / 2;
    let help_area = Rect::new(x, y, width, height);

    // Clear background
    frame.render_widget(
        Block::default().style(Style::default().bg(Color::Black)),
        help_area,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let help_text = vec![
        Line::from(Span::styled(
            "Display",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  e           Toggle graph edges"),
        Line::from("  m           Toggle empty families"),
        Line::from("  f           Toggle FPS display"),
        Line::from(""),
        Line::from(Span::styled(
            "Notes",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  c           Clear held notes"),
        Line::from(""),
        Line::from(Span::styled(
            "Other",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  h/?         Toggle help"),
        Line::from("  q/Ctrl+c    Quit"),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}
