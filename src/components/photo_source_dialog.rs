//! Photo source sheet component
//!
//! Offers the ways a photo can reach the form: the configured capture
//! command, the photo library browser, and removal of the current
//! photo. The option list is fixed when the sheet opens.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::PhotoSourceOption;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Photo source chooser sheet
pub struct PhotoSourceDialog;

impl Default for PhotoSourceDialog {
    fn default() -> Self {
        Self
    }
}

impl PhotoSourceDialog {
    /// Draw the sheet with the options carried by the modal
    pub fn draw_with_options(
        &self,
        frame: &mut Frame,
        area: Rect,
        options: &[PhotoSourceOption],
        selected_index: usize,
    ) -> Result<()> {
        let height = options.len() as u16 + 6;
        let popup_area = centered_popup(area, 44, height);

        frame.render_widget(Clear, popup_area);

        let mut content = vec![Line::from("")];
        for (i, option) in options.iter().enumerate() {
            let selected = i == selected_index;
            let marker = if selected { "▶ " } else { "  " };

            // Removal is the destructive choice; keep it visually apart
            let base = if *option == PhotoSourceOption::RemovePhoto {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::White)
            };
            let style = if selected {
                base.add_modifier(Modifier::BOLD)
            } else {
                base
            };

            content.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(option.label().to_string(), style),
            ]));
        }
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled(
                " Enter ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Select  "),
            Span::styled(
                " Esc ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Cancel"),
        ]));

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Add Photo ")
                    .title_style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .alignment(ratatui::layout::Alignment::Center);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

impl Component for PhotoSourceDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ModalDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ModalUp),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ConfirmModal),
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing goes through draw_with_options
        Ok(())
    }
}
