//! Blocking alert dialog component
//!
//! Single-button informational alert. Shown for validation failures,
//! failed uploads, and failed favorites fetches; dismissing it is the
//! only way past it.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Blocking informational alert
pub struct AlertDialog;

impl Default for AlertDialog {
    fn default() -> Self {
        Self
    }
}

impl AlertDialog {
    /// Draw the alert with the title and message carried by the modal
    pub fn draw_with_alert(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        message: &str,
    ) -> Result<()> {
        let popup_area = centered_popup(area, 50, 9);

        frame.render_widget(Clear, popup_area);

        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::White),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " Enter ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("Dismiss"),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(format!(" {} ", title))
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            )
            .alignment(ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

impl Component for AlertDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ConfirmModal),
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing goes through draw_with_alert, which takes the modal data
        Ok(())
    }
}
