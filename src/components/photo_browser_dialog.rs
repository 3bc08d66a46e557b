//! Photo library browser component
//!
//! File picker over the configured photo directory. The file list is
//! read once when the browser opens; choosing a file hands it to the
//! photo service for decoding.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::path::{Path, PathBuf};

/// Photo library file picker
pub struct PhotoBrowserDialog;

impl Default for PhotoBrowserDialog {
    fn default() -> Self {
        Self
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

impl PhotoBrowserDialog {
    /// Draw the picker with the file list carried by the modal
    pub fn draw_with_files(
        &self,
        frame: &mut Frame,
        area: Rect,
        files: &[PathBuf],
        selected_index: usize,
    ) -> Result<()> {
        let margin = 4;
        let popup_area = Rect::new(
            margin,
            margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        frame.render_widget(Clear, popup_area);

        // Visible window: rows inside the border minus the help line
        let visible = popup_area.height.saturating_sub(3) as usize;
        let start = if selected_index >= visible {
            selected_index + 1 - visible
        } else {
            0
        };

        let mut content: Vec<Line> = Vec::new();
        if files.is_empty() {
            content.push(Line::from(""));
            content.push(Line::from(Span::styled(
                "  No photos found in the library directory.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (i, path) in files.iter().enumerate().skip(start).take(visible) {
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
                Span::styled(file_label(path), style),
            ]));
        }

        let title = format!(" Photo Library ({}) ", files.len());
        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title)
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        );

        frame.render_widget(paragraph, popup_area);

        // Help line pinned to the bottom row inside the border
        let help_area = Rect::new(
            popup_area.x + 2,
            popup_area.y + popup_area.height.saturating_sub(2),
            popup_area.width.saturating_sub(4),
            1,
        );
        let help = Paragraph::new(Line::from(vec![
            Span::styled(
                " j/k ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Move  "),
            Span::styled(
                " Enter ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Choose  "),
            Span::styled(
                " Esc ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Cancel"),
        ]));
        frame.render_widget(help, help_area);

        Ok(())
    }
}

impl Component for PhotoBrowserDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ModalDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ModalUp),
            KeyCode::Enter => Some(Action::ConfirmModal),
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing goes through draw_with_files
        Ok(())
    }
}
