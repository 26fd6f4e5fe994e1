//! Drawing the widget from [`App`] state.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{standard_layout, App, TuiPalette};

const STATUS_DOT: &str = "●";
const CURSOR: &str = "_";
const TAB_WIDTH: usize = 4;

pub fn render(app: &App, frame: &mut Frame) {
    let chunks = standard_layout(frame.area());

    render_header(app, frame, chunks[0]);
    render_body(app, frame, chunks[1]);
    render_footer(frame, chunks[2]);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(TuiPalette::border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let clock_text = app.clock_text();
    let clock_width = clock_text.chars().count() as u16 + 1;
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(clock_width)])
        .split(inner);

    let status = Line::from(vec![
        Span::styled(
            format!(" {} ", STATUS_DOT),
            ratatui::style::Style::default().fg(TuiPalette::status_color(app.status)),
        ),
        Span::styled(format!("STATUS: {}", app.status), TuiPalette::header_style()),
    ]);
    frame.render_widget(Paragraph::new(status), halves[0]);

    let clock = Paragraph::new(Span::styled(clock_text, TuiPalette::header_style()))
        .alignment(Alignment::Right);
    frame.render_widget(clock, halves[1]);
}

/// Snippets may span several rows. Rows are clipped, not wrapped, and only
/// the newest ones that fit are drawn.
fn render_body(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(TuiPalette::border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible = inner.height as usize;
    // Every buffer line is at least one row
    let mut rows: Vec<String> = app
        .buffer()
        .tail(visible)
        .flat_map(|text| text.split('\n'))
        .map(|row| expand_tabs(row.trim_end_matches('\r')))
        .collect();
    let overflow = rows.len().saturating_sub(visible);
    rows.drain(..overflow);
    let shown = rows.len();

    let lines: Vec<Line> = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let mut spans = vec![Span::styled(row, TuiPalette::code_style())];
            if i + 1 == shown {
                spans.push(Span::styled(CURSOR, TuiPalette::cursor_style()));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn expand_tabs(row: &str) -> String {
    let mut out = String::with_capacity(row.len());
    let mut column = 0;
    for c in row.chars() {
        if c == '\t' {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            out.push_str(&" ".repeat(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let text = format!(" NEVERA Terminal v{}", env!("CARGO_PKG_VERSION"));
    frame.render_widget(
        Paragraph::new(Span::styled(text, TuiPalette::muted_style())),
        area,
    );
}
