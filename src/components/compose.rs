//! Compose component - Submission form screen
//!
//! Renders the form sections built by `ComposeForm` and owns the keys
//! that move between rows, edit the text fields, and hand off to the
//! photo and location flows.

use crate::action::Action;
use crate::component::Component;
use crate::model::compose::{group, ComposeForm, Field, PhotoAttachment, MAX_NOTE_CHARS};
use crate::model::content::ContentList;
use crate::model::submission::{Coordinate, SubmissionUpload};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// Compose component for the submission form
pub struct ComposeComponent {
    /// Form state; sections are regenerated from it after every change
    pub form: ComposeForm,
    /// Rendered section list with the row cursor
    pub list: ContentList<()>,
}

impl ComposeComponent {
    pub fn new(default_coordinate: Coordinate) -> Self {
        let mut component = Self {
            form: ComposeForm::new(default_coordinate),
            list: ContentList::new(),
        };
        component.rebuild();
        component
    }

    /// Drop all form state, ready for a fresh submission
    pub fn reset(&mut self, default_coordinate: Coordinate) {
        self.form = ComposeForm::new(default_coordinate);
        self.list = ContentList::new();
        self.rebuild();
    }

    /// Swap in the section sequence for the current form state
    fn rebuild(&mut self) {
        self.list.replace_sections(self.form.build_sections());
    }

    /// Group tag of the row under the cursor
    pub fn selected_group(&self) -> Option<&'static str> {
        self.list.selected_row().map(|row| row.group)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Form delegation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn attach_photo(&mut self, photo: PhotoAttachment) {
        self.form.attach_photo(photo);
        self.rebuild();
    }

    pub fn reset_photo(&mut self) {
        self.form.reset_photo();
        self.rebuild();
    }

    /// Returns false when the sample arrived too late to matter
    pub fn apply_location_sample(&mut self, coordinate: Coordinate) -> bool {
        let applied = self.form.apply_location_sample(coordinate);
        if applied {
            self.rebuild();
        }
        applied
    }

    pub fn set_manual_coordinate(&mut self, coordinate: Coordinate) {
        self.form.set_manual_coordinate(coordinate);
        self.rebuild();
    }

    pub fn has_photo(&self) -> bool {
        self.form.has_photo()
    }

    pub fn resolved_coordinate(&self) -> Coordinate {
        self.form.resolved_coordinate()
    }

    pub fn build_upload(&self) -> Result<SubmissionUpload, String> {
        self.form.build_upload()
    }
}

impl Component for ComposeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Field editing captures every key until committed or cancelled
        if self.form.editing().is_some() {
            match key.code {
                KeyCode::Enter => {
                    self.form.commit_edit();
                    self.rebuild();
                }
                KeyCode::Esc => {
                    self.form.cancel_edit();
                }
                KeyCode::Backspace => {
                    self.form.backspace();
                }
                KeyCode::Char(c) => {
                    self.form.input_char(c);
                }
                _ => {}
            }
            return Ok(None);
        }

        let action = match key.code {
            // Navigation
            KeyCode::Char('j') | KeyCode::Down => {
                self.list.select_next();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.list.select_previous();
                None
            }
            KeyCode::Char('g') => {
                self.list.select_first();
                None
            }
            KeyCode::Char('G') => {
                self.list.select_last();
                None
            }

            // Activate the row under the cursor
            KeyCode::Enter => match self.selected_group() {
                Some(group::PHOTO) => Some(Action::OpenPhotoSource),
                Some(group::MAP) | Some(group::UPDATE_LOCATION) => {
                    Some(Action::OpenLocationPicker)
                }
                Some(group::TITLE) => {
                    self.form.begin_edit(Field::Title);
                    None
                }
                Some(group::ARTIST) => {
                    self.form.begin_edit(Field::Artist);
                    None
                }
                Some(group::NOTE) => {
                    self.form.begin_edit(Field::Note);
                    None
                }
                _ => None,
            },

            // Submission
            KeyCode::Char('s') => Some(Action::ComposeSubmit),
            KeyCode::Esc => Some(Action::ComposeCancel),

            // Modals
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),

            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, _action: Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let content_area = chunks[0];
        let inner_width = content_area.width.saturating_sub(6) as usize;

        let mut lines: Vec<Line> = Vec::new();
        let cursor = self.list.cursor();
        let mut flat = 0usize;

        for section in self.list.sections() {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }

            if let Some(title) = &section.title {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("── {} ", title),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        "──────────────────────",
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
            }

            for row in &section.rows {
                let selected = cursor == Some(flat);
                let marker = if selected { "▶ " } else { "  " };

                let editing_this = matches!(
                    (row.group, self.form.editing()),
                    (group::TITLE, Some(Field::Title))
                        | (group::ARTIST, Some(Field::Artist))
                        | (group::NOTE, Some(Field::Note))
                );

                if editing_this {
                    let buffer = self.form.edit_buffer().unwrap_or("");

                    if row.group == group::NOTE {
                        // Wrap the buffer and keep the tail visible while typing
                        let parts = wrap_to_width(&format!("{}_", buffer), inner_width);
                        let tail_start = parts.len().saturating_sub(3);
                        for (i, part) in parts[tail_start..].iter().enumerate() {
                            let lead = if i == 0 {
                                vec![
                                    Span::styled(marker, Style::default().fg(Color::Cyan)),
                                    Span::styled("> ", Style::default().fg(Color::Cyan)),
                                ]
                            } else {
                                vec![Span::raw("  "), Span::raw("  ")]
                            };
                            let mut spans = lead;
                            spans.push(Span::styled(
                                part.clone(),
                                Style::default()
                                    .fg(Color::White)
                                    .add_modifier(Modifier::BOLD),
                            ));
                            lines.push(Line::from(spans));
                        }
                        lines.push(Line::from(Span::styled(
                            format!("    {}/{}", buffer.chars().count(), MAX_NOTE_CHARS),
                            Style::default().fg(Color::DarkGray),
                        )));
                    } else {
                        lines.push(Line::from(vec![
                            Span::styled(marker, Style::default().fg(Color::Cyan)),
                            Span::styled("> ", Style::default().fg(Color::Cyan)),
                            Span::styled(
                                format!("{}_", buffer),
                                Style::default()
                                    .fg(Color::White)
                                    .add_modifier(Modifier::BOLD),
                            ),
                        ]));
                    }
                } else {
                    let text = row.text.clone().unwrap_or_default();
                    let style = match row.group {
                        group::PHOTO if !self.form.has_photo() => {
                            Style::default().fg(Color::DarkGray)
                        }
                        group::UPDATE_LOCATION => Style::default().fg(Color::Cyan),
                        _ => Style::default().fg(Color::White),
                    };
                    let text_style = if selected {
                        style.add_modifier(Modifier::BOLD)
                    } else {
                        style
                    };
                    lines.push(Line::from(vec![
                        Span::styled(marker, Style::default().fg(Color::Cyan)),
                        Span::styled(text, text_style),
                    ]));
                }

                flat += 1;
            }

            if let Some(footer) = &section.footer {
                lines.push(Line::from(Span::styled(
                    format!("  {}", footer),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" New Submission ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(paragraph, content_area);

        render_help_bar(frame, chunks[1], self.form.editing().is_some());

        Ok(())
    }
}

/// Greedy wrap on display width, splitting at character boundaries
fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut parts = vec![String::new()];
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width && !parts.last().map(String::is_empty).unwrap_or(true) {
            parts.push(String::new());
            used = 0;
        }
        if let Some(last) = parts.last_mut() {
            last.push(c);
        }
        used += w;
    }
    parts
}

fn render_help_bar(frame: &mut Frame, area: Rect, editing: bool) {
    let help_spans = if editing {
        vec![
            Span::styled(
                " Enter ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Save "),
            Span::styled(
                " Esc ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Revert "),
            Span::styled("Type to edit", Style::default().fg(Color::DarkGray)),
        ]
    } else {
        vec![
            Span::styled(
                " j/k ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Move "),
            Span::styled(
                " Enter ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Edit/Choose "),
            Span::styled(
                " s ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Submit "),
            Span::styled(
                " Esc ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Back "),
            Span::styled(
                " ? ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Help"),
        ]
    };

    let paragraph = Paragraph::new(Line::from(help_spans));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn component() -> ComposeComponent {
        ComposeComponent::new(Coordinate::new(18.4655, -66.1057))
    }

    #[test]
    fn test_enter_on_photo_row_opens_source_sheet() {
        let mut compose = component();
        compose.list.select_group(group::PHOTO);

        let action = compose.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::OpenPhotoSource));
    }

    #[test]
    fn test_enter_on_location_rows_opens_picker() {
        let mut compose = component();

        compose.list.select_group(group::MAP);
        let action = compose.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::OpenLocationPicker));

        compose.list.select_group(group::UPDATE_LOCATION);
        let action = compose.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::OpenLocationPicker));
    }

    #[test]
    fn test_enter_on_text_row_starts_local_edit() {
        let mut compose = component();
        compose.list.select_group(group::TITLE);

        let action = compose.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, None);
        assert_eq!(compose.form.editing(), Some(Field::Title));

        // Keys now feed the buffer instead of emitting actions
        let action = compose.handle_key_event(key(KeyCode::Char('s'))).unwrap();
        assert_eq!(action, None);
        let action = compose.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, None);
        assert_eq!(compose.form.field_value(Field::Title), "s");
    }

    #[test]
    fn test_edit_esc_reverts() {
        let mut compose = component();
        compose.list.select_group(group::ARTIST);
        compose.handle_key_event(key(KeyCode::Enter)).unwrap();
        compose.handle_key_event(key(KeyCode::Char('x'))).unwrap();
        compose.handle_key_event(key(KeyCode::Esc)).unwrap();

        assert_eq!(compose.form.editing(), None);
        assert_eq!(compose.form.field_value(Field::Artist), "");
    }

    #[test]
    fn test_submit_and_cancel_keys() {
        let mut compose = component();

        let action = compose.handle_key_event(key(KeyCode::Char('s'))).unwrap();
        assert_eq!(action, Some(Action::ComposeSubmit));

        let action = compose.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(action, Some(Action::ComposeCancel));
    }

    #[test]
    fn test_reset_clears_form_and_cursor() {
        let mut compose = component();
        compose.list.select_group(group::NOTE);
        compose.handle_key_event(key(KeyCode::Enter)).unwrap();
        compose.handle_key_event(key(KeyCode::Char('z'))).unwrap();
        compose.handle_key_event(key(KeyCode::Enter)).unwrap();

        compose.reset(Coordinate::new(18.4655, -66.1057));
        assert_eq!(compose.form.field_value(Field::Note), "");
        assert_eq!(compose.selected_group(), Some(group::PHOTO));
    }

    #[test]
    fn test_wrap_to_width() {
        assert_eq!(wrap_to_width("abcdef", 3), vec!["abc", "def"]);
        assert_eq!(wrap_to_width("ab", 3), vec!["ab"]);
        assert_eq!(wrap_to_width("", 3), vec![""]);
    }
}
