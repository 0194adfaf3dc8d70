pub mod form;
pub mod table;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use itertools::Itertools;

use crate::app::{App, AppState, MessageKind};
use crate::editor::PlanStatus;
use crate::pace::{format_hhmm, format_mmss};

const HORIZONTAL_MARGIN: u16 = 2;

pub fn draw(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(form::FORM_HEIGHT),
            Constraint::Length(3), // summary cards
            Constraint::Min(3),    // segments
            Constraint::Length(1), // message
            Constraint::Length(1), // key help
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled(
        "pacer · progressive pace planner",
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    form::render_form(app, f, chunks[1]);
    render_summary(app, f, chunks[2]);
    table::render_table(app, f, chunks[3]);
    render_message(app, f, chunks[4]);
    render_help(app, f, chunks[5]);
}

fn status_style(status: PlanStatus) -> Style {
    match status {
        PlanStatus::NoPlan => Style::default().add_modifier(Modifier::DIM),
        PlanStatus::Optimized => Style::default().fg(Color::Black).bg(Color::LightBlue),
        PlanStatus::ManuallyModified => Style::default().fg(Color::Black).bg(Color::Yellow),
    }
}

fn card<'a>(title: &'a str, value: String, border: Style) -> Paragraph<'a> {
    Paragraph::new(Span::styled(
        value,
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title),
    )
}

fn render_summary(app: &App, f: &mut Frame, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(area);

    let plain = Style::default();
    let (avg, target, estimated, drifted) = match app.shown_totals {
        Some(t) => (
            format!("{}/km", format_mmss(t.average_pace)),
            format_hhmm(t.target_time),
            format_hhmm(t.total_duration),
            t.drift_exceeded,
        ),
        None => ("--:--".into(), "--:--".into(), "--:--".into(), false),
    };
    let estimated_border = if drifted {
        Style::default().fg(Color::Yellow)
    } else {
        plain
    };

    f.render_widget(card("Avg pace", avg, plain), cols[0]);
    f.render_widget(card("Target", target, plain), cols[1]);
    f.render_widget(card("Estimated", estimated, estimated_border), cols[2]);

    let status = app.editor.status();
    let tag = Paragraph::new(Span::styled(format!(" {status} "), status_style(status)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(tag, cols[3]);
}

fn render_message(app: &App, f: &mut Frame, area: Rect) {
    let Some(msg) = &app.message else {
        return;
    };
    let style = match msg.kind {
        MessageKind::Info => Style::default().fg(Color::Green),
        MessageKind::Warning => Style::default().fg(Color::Yellow),
        MessageKind::Error => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    };
    f.render_widget(Paragraph::new(Span::styled(msg.text.as_str(), style)), area);
}

fn render_help(app: &App, f: &mut Frame, area: Rect) {
    let keys: &[(&str, &str)] = match app.state {
        AppState::Form => &[
            ("enter", "calculate"),
            ("tab", "next field"),
            ("p", "preset"),
            ("t", "table"),
            ("x", "reset"),
            ("esc", "quit"),
        ],
        AppState::Table => &[
            ("↑↓", "select"),
            ("enter", "edit pace"),
            ("r", "recompute"),
            ("f", "form"),
            ("x", "reset"),
            ("esc", "quit"),
        ],
        AppState::EditingPace => &[("enter", "apply"), ("esc", "cancel")],
    };
    let mut help = keys
        .iter()
        .map(|(key, action)| format!("({key}) {action}"))
        .join(" / ");
    if app.state == AppState::EditingPace {
        help = format!("type mm:ss / {help}");
    }

    let line = Line::from(Span::styled(
        help,
        Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
    ));
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
