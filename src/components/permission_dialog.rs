//! Location permission prompt component
//!
//! One-time prompt before the first device location lookup. The answer
//! is persisted; Esc leaves the decision unset so the prompt returns on
//! the next submission.

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

pub const PERMISSION_OPTIONS: [&str; 2] = ["Allow", "Don't Allow"];

/// Location permission prompt
pub struct PermissionDialog;

impl Default for PermissionDialog {
    fn default() -> Self {
        Self
    }
}

impl PermissionDialog {
    /// Draw the prompt with the selection carried by the modal
    pub fn draw_with_selection(
        &self,
        frame: &mut Frame,
        area: Rect,
        selected_index: usize,
    ) -> Result<()> {
        let popup_area = centered_popup(area, 52, 11);

        frame.render_widget(Clear, popup_area);

        let mut content = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Use your location?",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "New submissions are tagged with your position so",
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                "others can find the piece.",
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
        ];

        for (i, label) in PERMISSION_OPTIONS.iter().enumerate() {
            let selected = i == selected_index;
            let marker = if selected { "▶ " } else { "  " };
            let style = if selected {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            content.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(label.to_string(), style),
            ]));
        }

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Location ")
                    .title_style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .alignment(ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

impl Component for PermissionDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ModalDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ModalUp),
            KeyCode::Enter => Some(Action::ConfirmModal),
            KeyCode::Esc => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing goes through draw_with_selection
        Ok(())
    }
}
