//! Blocking progress overlay component
//!
//! Shown while an upload or a first favorites fetch is in flight. Every
//! key is consumed while it is on top, so the operation behind it can
//! never be re-triggered mid-flight.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Duration;

pub(crate) const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Blocking progress overlay
pub struct ProgressDialog;

impl Default for ProgressDialog {
    fn default() -> Self {
        Self
    }
}

impl ProgressDialog {
    /// Draw the overlay; the spinner frame advances with elapsed time
    pub fn draw_with_progress(
        &self,
        frame: &mut Frame,
        area: Rect,
        message: &str,
        elapsed: Duration,
    ) -> Result<()> {
        let popup_area = centered_popup(area, 40, 5);

        frame.render_widget(Clear, popup_area);

        let spinner = SPINNER_FRAMES[(elapsed.as_millis() / 100) as usize % SPINNER_FRAMES.len()];

        let content = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!("{} ", spinner),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(message.to_string(), Style::default().fg(Color::White)),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .alignment(ratatui::layout::Alignment::Center);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

impl Component for ProgressDialog {
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        // The overlay is blocking: no key reaches anything underneath
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing goes through draw_with_progress
        Ok(())
    }
}
