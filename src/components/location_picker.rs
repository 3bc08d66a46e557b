//! Location picker component
//!
//! World map with a single movable pin. Arrow keys nudge the pin (the
//! app mutates the coordinate held by the modal); Enter saves, Esc
//! discards. Latitude and longitude stay clamped to valid ranges
//! through `Coordinate::nudged`.

use crate::model::Coordinate;
use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution},
        Block, Borders, Clear, Paragraph,
    },
    Frame,
};

/// Pin step sizes in degrees
pub const NUDGE_FINE: f64 = 1.0;
pub const NUDGE_COARSE: f64 = 10.0;

/// Coordinate picker with a movable pin
pub struct LocationPickerDialog;

impl Default for LocationPickerDialog {
    fn default() -> Self {
        Self
    }
}

impl LocationPickerDialog {
    /// Draw the picker with the coordinate carried by the modal
    pub fn draw_with_coordinate(
        &self,
        frame: &mut Frame,
        area: Rect,
        coordinate: Coordinate,
    ) -> Result<()> {
        let margin = 3;
        let popup_area = Rect::new(
            margin,
            margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(popup_area);

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Pick Location ")
                    .title_style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .marker(Marker::Braille)
            .x_bounds([-180.0, 180.0])
            .y_bounds([-90.0, 90.0])
            .paint(|ctx| {
                ctx.draw(&Map {
                    resolution: MapResolution::High,
                    color: Color::DarkGray,
                });
                ctx.print(
                    coordinate.longitude,
                    coordinate.latitude,
                    Line::from(Span::styled(
                        "◉",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                );
            });

        frame.render_widget(canvas, chunks[0]);

        let status = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", coordinate),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                " ↑↓←→ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Move  "),
            Span::styled(
                " Shift ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Coarse  "),
            Span::styled(
                " Enter ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Save  "),
            Span::styled(
                " Esc ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Cancel"),
        ]));
        frame.render_widget(status, chunks[1]);

        Ok(())
    }
}
