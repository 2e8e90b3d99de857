//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a history list on the left, the selected meme on the
//!   right, and a one-line status bar at the bottom.
//! * The image itself is never drawn; the detail pane shows its URL.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::observer::AttemptStatus;
use crate::poll::FetchReport;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [list_area, detail_area] = Layout::horizontal([
        Constraint::Percentage(40),
        Constraint::Percentage(60),
    ])
    .areas(main_area);

    draw_history(app, frame, list_area);
    draw_detail(app, frame, detail_area);
    draw_status_bar(app, frame, status_area);
}

/// Render the scrollable list of memes fetched this session.
fn draw_history(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .history
        .iter()
        .map(|report| {
            let line = Line::from(vec![
                Span::styled(
                    report.fetched_at.format("%H:%M:%S").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(&report.meme.title, Style::default().fg(Color::White)),
                Span::raw("  "),
                Span::styled(
                    format!("[{}]", report.meme.attribution),
                    Style::default().fg(Color::Cyan),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(list_items)
        .block(Block::default().title(" Memes ").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render the selected meme and the sources tried to get it.
fn draw_detail(app: &App, frame: &mut Frame, area: Rect) {
    let lines = match app.selected() {
        Some(report) => detail_lines(report),
        None => vec![Line::from(Span::styled(
            "No meme yet.",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let detail = Paragraph::new(lines)
        .block(Block::default().title(" Meme ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}

fn detail_lines(report: &FetchReport) -> Vec<Line<'_>> {
    let label = Style::default().fg(Color::DarkGray);
    let title_style = if report.meme.is_placeholder() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![
        Line::from(Span::styled(&report.meme.title, title_style)),
        Line::from(vec![
            Span::styled("from  ", label),
            Span::styled(&report.meme.attribution, Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("image ", label),
            Span::styled(&report.meme.image_url, Style::default().fg(Color::Blue)),
        ]),
        Line::from(vec![
            Span::styled("at    ", label),
            Span::raw(report.fetched_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        ]),
        Line::raw(""),
        Line::from(Span::styled("Sources tried:", label)),
    ];

    lines.extend(report.attempts.iter().map(|attempt| {
        let (mark, note) = match &attempt.status {
            AttemptStatus::Used { field } => (
                Span::styled("✔ ", Style::default().fg(Color::Green)),
                format!(" (used {field})"),
            ),
            AttemptStatus::Skipped { reason } => (
                Span::styled("✘ ", Style::default().fg(Color::Red)),
                format!(" ({reason})"),
            ),
        };
        Line::from(vec![
            mark,
            Span::raw(attempt.url.as_str()),
            Span::styled(note, label),
        ])
    }));

    lines
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} memes", app.history.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  r: new meme  ↑/↓: scroll  Home/End: jump"),
    ]));
    frame.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
