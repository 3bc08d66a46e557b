//! Detail component - Submission detail screen
//!
//! Shows the metadata of one submission next to a terminal rendering of
//! its photo. The photo arrives asynchronously after the screen opens.

use crate::action::Action;
use crate::component::Component;
use crate::model::submission::{Submission, SubmissionStatus};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use image::RgbImage;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

/// Largest edge of the decoded preview, keeps redraw sampling cheap
const PREVIEW_MAX_EDGE: u32 = 200;

/// State of the async photo preview
pub enum PreviewState {
    /// The submission carries no photo URL
    Empty,
    /// Fetch in flight
    Loading,
    /// Decoded and downscaled, ready to sample
    Ready { image: RgbImage },
    /// Fetch or decode failed
    Failed,
}

/// Detail component for a single submission
pub struct DetailComponent {
    /// The submission being shown
    pub submission: Option<Submission>,
    /// Photo preview state
    pub preview: PreviewState,
    /// Scroll offset of the metadata panel
    scroll: usize,
}

impl Default for DetailComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailComponent {
    pub fn new() -> Self {
        Self {
            submission: None,
            preview: PreviewState::Empty,
            scroll: 0,
        }
    }

    /// Show a submission; the preview starts loading when it has a photo
    pub fn set_submission(&mut self, submission: Submission) {
        self.preview = if submission.image_url.is_some() || submission.thumb_url.is_some() {
            PreviewState::Loading
        } else {
            PreviewState::Empty
        };
        self.scroll = 0;
        self.submission = Some(submission);
    }

    /// Adopt the finished photo fetch
    pub fn set_preview_result(&mut self, result: Result<Vec<u8>, String>) {
        self.preview = match result {
            Ok(bytes) => match image::load_from_memory(&bytes) {
                Ok(decoded) => {
                    // Downscale once here, the draw loop only samples
                    let image = if decoded.width() > PREVIEW_MAX_EDGE
                        || decoded.height() > PREVIEW_MAX_EDGE
                    {
                        decoded
                            .thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE)
                            .to_rgb8()
                    } else {
                        decoded.to_rgb8()
                    };
                    PreviewState::Ready { image }
                }
                Err(_) => PreviewState::Failed,
            },
            Err(_) => PreviewState::Failed,
        };
    }

    /// Drop all detail state when leaving the screen
    pub fn clear(&mut self) {
        self.submission = None;
        self.preview = PreviewState::Empty;
        self.scroll = 0;
    }

    fn content_lines(&self) -> Vec<Line<'static>> {
        let Some(submission) = &self.submission else {
            return vec![Line::from("No submission selected")];
        };

        let status_color = match submission.status {
            SubmissionStatus::Pending => Color::Yellow,
            SubmissionStatus::Approved => Color::Green,
            SubmissionStatus::Rejected => Color::Red,
        };

        let mut lines = vec![
            Line::from(Span::styled(
                submission.display_title().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                submission.display_artist().to_string(),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Status:   ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    submission.status.label().to_string(),
                    Style::default().fg(status_color),
                ),
            ]),
            Line::from(vec![
                Span::styled("Added:    ", Style::default().fg(Color::Cyan)),
                Span::raw(submission.created_at.format("%Y-%m-%d %H:%M UTC").to_string()),
            ]),
            Line::from(vec![
                Span::styled("Location: ", Style::default().fg(Color::Cyan)),
                Span::raw(submission.coordinate.to_string()),
            ]),
        ];

        if let Some(note) = &submission.note {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Note:",
                Style::default().fg(Color::Cyan),
            )));
            lines.push(Line::from(note.clone()));
        }

        lines
    }
}

impl Component for DetailComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseDetail),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = (self.scroll + 1).min(self.content_lines().len().saturating_sub(1));
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll =
                    (self.scroll + 10).min(self.content_lines().len().saturating_sub(1));
                None
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                None
            }
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

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[0]);

        self.draw_metadata(frame, panels[0]);
        self.draw_preview(frame, panels[1]);
        render_help_bar(frame, chunks[1]);

        Ok(())
    }
}

impl DetailComponent {
    fn draw_metadata(&mut self, frame: &mut Frame, area: Rect) {
        let content = self.content_lines();
        let total = content.len();
        let visible_height = area.height.saturating_sub(2) as usize;

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Submission ")
                    .title_style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .wrap(Wrap { trim: true })
            .scroll((self.scroll as u16, 0));

        frame.render_widget(paragraph, area);

        // Render scrollbar if content exceeds visible area
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
    }

    fn draw_preview(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Photo ")
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match &self.preview {
            PreviewState::Ready { image } => render_half_blocks(frame, inner, image),
            PreviewState::Loading => render_placeholder(frame, inner, "Loading photo...", Color::DarkGray),
            PreviewState::Failed => {
                render_placeholder(frame, inner, "Photo unavailable", Color::Red)
            }
            PreviewState::Empty => render_placeholder(frame, inner, "No photo", Color::DarkGray),
        }
    }
}

fn render_placeholder(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    if area.height == 0 {
        return;
    }
    let y = area.y + area.height / 2;
    let line_area = Rect::new(area.x, y, area.width, 1);
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(color),
    )))
    .alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(paragraph, line_area);
}

/// Paint the image with upper-half-block cells, two pixel rows per cell
fn render_half_blocks(frame: &mut Frame, area: Rect, image: &RgbImage) {
    let (img_w, img_h) = image.dimensions();
    if img_w == 0 || img_h == 0 || area.width == 0 || area.height == 0 {
        return;
    }

    // Fit the pixel grid into the cell grid, one cell spans two pixel rows
    let max_cols = area.width as u32;
    let max_rows = area.height as u32;

    let mut rows = max_rows;
    let mut cols = (img_w * rows * 2) / img_h;
    if cols > max_cols {
        cols = max_cols;
        rows = ((img_h * cols) / img_w).div_ceil(2).min(max_rows);
    }
    let cols = cols.max(1);
    let rows = rows.max(1);

    let mut lines: Vec<Line> = Vec::with_capacity(rows as usize);
    for cy in 0..rows {
        let mut spans: Vec<Span> = Vec::with_capacity(cols as usize);
        for cx in 0..cols {
            let px = (cx * img_w / cols).min(img_w - 1);
            let top_y = ((cy * 2) * img_h / (rows * 2)).min(img_h - 1);
            let bottom_y = ((cy * 2 + 1) * img_h / (rows * 2)).min(img_h - 1);

            let top = image.get_pixel(px, top_y).0;
            let bottom = image.get_pixel(px, bottom_y).0;

            spans.push(Span::styled(
                "▀",
                Style::default()
                    .fg(Color::Rgb(top[0], top[1], top[2]))
                    .bg(Color::Rgb(bottom[0], bottom[1], bottom[2])),
            ));
        }
        lines.push(Line::from(spans));
    }

    // Center the block in the panel
    let x_offset = (area.width.saturating_sub(cols as u16)) / 2;
    let y_offset = (area.height.saturating_sub(rows as u16)) / 2;
    let target = Rect::new(
        area.x + x_offset,
        area.y + y_offset,
        cols as u16,
        rows as u16,
    );

    frame.render_widget(Paragraph::new(lines), target);
}

fn render_help_bar(frame: &mut Frame, area: Rect) {
    let help_spans = vec![
        Span::styled(
            " Esc/q ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Back "),
        Span::styled(
            " j/k ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Scroll "),
        Span::styled(
            " ? ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Help"),
    ];

    let paragraph = Paragraph::new(Line::from(help_spans));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::submission::Coordinate;
    use chrono::{TimeZone, Utc};

    fn submission(image_url: Option<&str>) -> Submission {
        Submission {
            id: 4,
            title: Some("Alley piece".to_string()),
            artist: None,
            note: Some("Behind the bakery".to_string()),
            coordinate: Coordinate::new(18.4655, -66.1057),
            status: SubmissionStatus::Approved,
            created_at: Utc.with_ymd_and_hms(2018, 4, 30, 12, 0, 0).unwrap(),
            image_url: image_url.map(String::from),
            thumb_url: None,
        }
    }

    fn tiny_png() -> Vec<u8> {
        // 2x2 image encoded through the same crate the decoder uses
        let mut image = RgbImage::new(2, 2);
        image.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        image.put_pixel(1, 1, image::Rgb([0, 0, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(image)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_preview_starts_loading_only_with_url() {
        let mut detail = DetailComponent::new();

        detail.set_submission(submission(Some("https://example.com/a.jpg")));
        assert!(matches!(detail.preview, PreviewState::Loading));

        detail.set_submission(submission(None));
        assert!(matches!(detail.preview, PreviewState::Empty));
    }

    #[test]
    fn test_preview_decodes_fetched_bytes() {
        let mut detail = DetailComponent::new();
        detail.set_submission(submission(Some("https://example.com/a.jpg")));

        detail.set_preview_result(Ok(tiny_png()));
        match &detail.preview {
            PreviewState::Ready { image } => {
                assert_eq!(image.dimensions(), (2, 2));
                assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0]);
            }
            _ => panic!("expected decoded preview"),
        }
    }

    #[test]
    fn test_preview_failure_paths() {
        let mut detail = DetailComponent::new();
        detail.set_submission(submission(Some("https://example.com/a.jpg")));

        detail.set_preview_result(Ok(vec![0x00, 0x01, 0x02]));
        assert!(matches!(detail.preview, PreviewState::Failed));

        detail.set_preview_result(Err("connection refused".to_string()));
        assert!(matches!(detail.preview, PreviewState::Failed));
    }

    #[test]
    fn test_clear_drops_state() {
        let mut detail = DetailComponent::new();
        detail.set_submission(submission(None));
        detail.clear();
        assert!(detail.submission.is_none());
        assert!(matches!(detail.preview, PreviewState::Empty));
    }

    #[test]
    fn test_close_keys() {
        let mut detail = DetailComponent::new();
        let key = |code| crossterm::event::KeyEvent::new(code, crossterm::event::KeyModifiers::NONE);

        let action = detail.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(action, Some(Action::CloseDetail));
        let action = detail.handle_key_event(key(KeyCode::Char('q'))).unwrap();
        assert_eq!(action, Some(Action::CloseDetail));
    }
}
