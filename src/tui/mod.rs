//! Nevera Terminal UI
//!
//! Full-screen widget built on ratatui: status header, typing body, footer.

mod app;
mod render;
pub mod runner;

pub use app::{App, Cmd, Msg};
pub use render::render;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    Terminal,
};
use std::io::{self, Stdout};

use crate::config::Status;

/// The widget's colour palette
pub struct TuiPalette;

impl TuiPalette {
    pub const TEXT: Color = Color::Rgb(230, 230, 230);
    pub const DIM: Color = Color::Rgb(153, 153, 153);
    pub const BORDER: Color = Color::Rgb(48, 48, 48);

    // Status indicator colours
    pub const GREEN: Color = Color::Rgb(34, 197, 94);
    pub const BLUE: Color = Color::Rgb(59, 130, 246);
    pub const YELLOW: Color = Color::Rgb(234, 179, 8);
    pub const PURPLE: Color = Color::Rgb(168, 85, 247);

    pub fn status_color(status: Status) -> Color {
        match status {
            Status::Active => Self::GREEN,
            Status::Scanning => Self::BLUE,
            Status::Processing => Self::YELLOW,
            Status::Analyzing => Self::PURPLE,
        }
    }

    /// Header text (status label and clock)
    pub fn header_style() -> Style {
        Style::default().fg(Self::TEXT).add_modifier(Modifier::BOLD)
    }

    /// Typed code lines
    pub fn code_style() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Blinking block after the last line
    pub fn cursor_style() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .add_modifier(Modifier::SLOW_BLINK)
    }

    /// Footer text
    pub fn muted_style() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn border_style() -> Style {
        Style::default().fg(Self::BORDER)
    }
}

/// Terminal wrapper for TUI operations
pub struct TuiTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TuiTerminal {
    /// Create and initialize the terminal
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;

        Ok(Self { terminal })
    }

    /// Get mutable reference to terminal
    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    /// Restore terminal to normal state
    pub fn restore(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TuiTerminal {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Header, body and footer rows
pub fn standard_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Terminal body
            Constraint::Length(1), // Footer
        ])
        .split(area)
        .to_vec()
}

/// Read next terminal event with timeout
pub fn read_event(timeout_ms: u64) -> Result<Option<Event>> {
    if event::poll(std::time::Duration::from_millis(timeout_ms))? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Check for specific key press
pub fn is_key(event: &Event, key: KeyCode, modifiers: KeyModifiers) -> bool {
    matches!(
        event,
        Event::Key(k) if k.code == key && k.modifiers == modifiers
    )
}

/// Check for quit keys (q, Esc, Ctrl+C, Ctrl+D)
pub fn is_quit(event: &Event) -> bool {
    is_key(event, KeyCode::Char('q'), KeyModifiers::NONE)
        || is_key(event, KeyCode::Esc, KeyModifiers::NONE)
        || is_key(event, KeyCode::Char('c'), KeyModifiers::CONTROL)
        || is_key(event, KeyCode::Char('d'), KeyModifiers::CONTROL)
}
