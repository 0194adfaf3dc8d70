use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, AppState, FormField};

/// Borders plus one line per field.
pub const FORM_HEIGHT: u16 = FormField::ALL.len() as u16 + 2;

const MARKER: &str = "› ";

fn label_width() -> usize {
    FormField::ALL
        .iter()
        .map(|f| f.to_string().width())
        .max()
        .unwrap_or(0)
}

pub fn render_form(app: &App, f: &mut Frame, area: Rect) {
    let active = app.state == AppState::Form;
    let width = label_width();

    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|&field| {
            let focused = active && field == app.focus;
            let label = format!("{:<width$}", field.to_string());
            let value = app.form.field(field).to_string();

            let mut spans = vec![
                Span::raw(if focused { MARKER } else { "  " }),
                Span::styled(
                    label,
                    if focused {
                        Style::default().add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().add_modifier(Modifier::DIM)
                    },
                ),
                Span::raw(" : "),
                Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
            ];
            if field == FormField::Distance {
                if let Some(preset) = app.form.preset {
                    spans.push(Span::styled(
                        format!("  ({preset})"),
                        Style::default().fg(Color::Cyan),
                    ));
                }
            }
            Line::from(spans)
        })
        .collect();

    let border_style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Plan"),
    );
    f.render_widget(form, area);

    if active {
        let row = FormField::ALL
            .iter()
            .position(|x| *x == app.focus)
            .unwrap_or(0) as u16;
        let col = MARKER.width() + width + " : ".width() + app.form.field(app.focus).width();
        let x = area.x + 1 + col as u16;
        let y = area.y + 1 + row;
        if x < area.right() && y < area.bottom() {
            f.set_cursor_position(Position::new(x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_height_fits_all_fields() {
        assert_eq!(FORM_HEIGHT, 7);
    }

    #[test]
    fn test_label_width_is_longest_label() {
        assert_eq!(label_width(), "Distance (km)".len());
    }
}
