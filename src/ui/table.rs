use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, AppState};
use crate::report::{present_rows, PlanRow};

/// Pure presenter for a single segment row
pub fn present_row(row: &PlanRow, editing: Option<&str>, invalid: bool) -> Row<'static> {
    let pace_cell = match editing {
        Some(buffer) => Cell::from(format!("{buffer}_")).style(
            Style::default()
                .fg(if invalid { Color::Red } else { Color::Cyan })
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ),
        None if invalid => Cell::from(row.pace.clone()).style(Style::default().fg(Color::Red)),
        None => Cell::from(row.pace.clone()),
    };

    Row::new(vec![
        Cell::from(row.id.to_string()),
        Cell::from(format!(
            "{:.2} ({:.2})",
            row.cumulative_distance, row.distance
        )),
        pace_cell,
        Cell::from(row.duration.clone()),
    ])
}

pub fn render_table(app: &App, f: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Segments");

    let Some(plan) = app.editor.plan() else {
        let hint = Paragraph::new(Span::styled(
            "Fill in distance and target time, then press enter",
            Style::default().add_modifier(Modifier::DIM),
        ))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(hint, area);
        return;
    };

    let rows: Vec<Row> = present_rows(plan.segments())
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let editing = (app.state == AppState::EditingPace && i == app.selected)
                .then_some(app.edit_buffer.as_str());
            present_row(row, editing, app.invalid_rows.contains(&i))
        })
        .collect();

    let header = Row::new(vec!["#", "km (segment)", "Pace /km", "Time"]).style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(if app.state == AppState::Form {
        Style::default()
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    });

    let mut state = TableState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(table, area, &mut state);
}
