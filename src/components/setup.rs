//! Setup wizard component
//!
//! Interactive first-run configuration of mural-tui.

use crate::action::Action;
use crate::component::Component;
use crate::config::Config;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use regex::Regex;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://\S+$").expect("url pattern compiles"));

/// Setup wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Welcome,
    ServerUrl,
    PhotoDirectory,
    DefaultLocation,
    Confirm,
}

impl SetupStep {
    fn next(&self) -> Option<SetupStep> {
        match self {
            SetupStep::Welcome => Some(SetupStep::ServerUrl),
            SetupStep::ServerUrl => Some(SetupStep::PhotoDirectory),
            SetupStep::PhotoDirectory => Some(SetupStep::DefaultLocation),
            SetupStep::DefaultLocation => Some(SetupStep::Confirm),
            SetupStep::Confirm => None,
        }
    }

    fn prev(&self) -> Option<SetupStep> {
        match self {
            SetupStep::Welcome => None,
            SetupStep::ServerUrl => Some(SetupStep::Welcome),
            SetupStep::PhotoDirectory => Some(SetupStep::ServerUrl),
            SetupStep::DefaultLocation => Some(SetupStep::PhotoDirectory),
            SetupStep::Confirm => Some(SetupStep::DefaultLocation),
        }
    }

    fn title(&self) -> &str {
        match self {
            SetupStep::Welcome => "Welcome",
            SetupStep::ServerUrl => "Server URL",
            SetupStep::PhotoDirectory => "Photo Library",
            SetupStep::DefaultLocation => "Default Location",
            SetupStep::Confirm => "Confirm",
        }
    }

    fn step_number(&self) -> usize {
        match self {
            SetupStep::Welcome => 1,
            SetupStep::ServerUrl => 2,
            SetupStep::PhotoDirectory => 3,
            SetupStep::DefaultLocation => 4,
            SetupStep::Confirm => 5,
        }
    }
}

/// Setup wizard component
pub struct SetupComponent {
    /// Current step
    pub step: SetupStep,
    /// Config being built
    pub config: Config,
    /// Current input text
    pub input: String,
    /// Error message to display
    pub error: Option<String>,
    /// Whether setup is complete
    pub complete: bool,
}

impl Default for SetupComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupComponent {
    pub fn new() -> Self {
        Self {
            step: SetupStep::Welcome,
            config: Config::default(),
            input: String::new(),
            error: None,
            complete: false,
        }
    }

    /// Get the saved config if setup completed successfully
    pub fn get_config(&self) -> Option<&Config> {
        if self.complete {
            Some(&self.config)
        } else {
            None
        }
    }

    fn location_input(&self) -> String {
        format!(
            "{}, {}",
            self.config.default_latitude, self.config.default_longitude
        )
    }

    fn validate_current_step(&mut self) -> bool {
        self.error = None;

        match self.step {
            SetupStep::Welcome => true,
            SetupStep::ServerUrl => {
                let input = self.input.trim();
                if input.is_empty() {
                    self.error = Some("Server URL is required".to_string());
                    return false;
                }
                if !URL_PATTERN.is_match(input) {
                    self.error =
                        Some("URL must start with http:// or https://".to_string());
                    return false;
                }
                self.config.server_url = input.trim_end_matches('/').to_string();
                true
            }
            SetupStep::PhotoDirectory => {
                if self.input.is_empty() {
                    self.error = Some("Photo directory is required".to_string());
                    return false;
                }
                let path = std::path::PathBuf::from(&self.input);
                if !path.exists() {
                    self.error = Some(format!("Path does not exist: {}", self.input));
                    return false;
                }
                if !path.is_dir() {
                    self.error = Some("Path must be a directory".to_string());
                    return false;
                }
                self.config.photo_dir = self.input.clone();
                true
            }
            SetupStep::DefaultLocation => match parse_coordinate_input(&self.input) {
                Ok((latitude, longitude)) => {
                    self.config.default_latitude = latitude;
                    self.config.default_longitude = longitude;
                    true
                }
                Err(message) => {
                    self.error = Some(message);
                    false
                }
            },
            SetupStep::Confirm => true,
        }
    }

    fn advance_step(&mut self) {
        if self.validate_current_step() {
            if let Some(next) = self.step.next() {
                self.step = next;
                // Pre-populate input for next step
                self.input = match self.step {
                    SetupStep::ServerUrl => self.config.server_url.clone(),
                    SetupStep::PhotoDirectory => self.config.photo_dir.clone(),
                    SetupStep::DefaultLocation => self.location_input(),
                    _ => String::new(),
                };
            } else {
                // On confirm step, save the config
                self.save_config();
            }
        }
    }

    fn go_back(&mut self) {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
            self.error = None;
            // Restore input for previous step
            self.input = match self.step {
                SetupStep::Welcome | SetupStep::Confirm => String::new(),
                SetupStep::ServerUrl => self.config.server_url.clone(),
                SetupStep::PhotoDirectory => self.config.photo_dir.clone(),
                SetupStep::DefaultLocation => self.location_input(),
            };
        }
    }

    fn save_config(&mut self) {
        match self.config.save() {
            Ok(()) => {
                self.complete = true;
            }
            Err(e) => {
                self.error = Some(format!("Failed to save config: {}", e));
            }
        }
    }
}

/// Parse a "latitude, longitude" pair
fn parse_coordinate_input(input: &str) -> Result<(f64, f64), String> {
    let mut parts = input.split(',');
    let lat_text = parts.next().map(str::trim).unwrap_or("");
    let lon_text = parts.next().map(str::trim).unwrap_or("");
    if lon_text.is_empty() || parts.next().is_some() {
        return Err("Use the form: latitude, longitude".to_string());
    }

    let latitude: f64 = lat_text
        .parse()
        .map_err(|_| format!("Not a number: {}", lat_text))?;
    let longitude: f64 = lon_text
        .parse()
        .map_err(|_| format!("Not a number: {}", lon_text))?;

    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90".to_string());
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180".to_string());
    }

    Ok((latitude, longitude))
}

impl Component for SetupComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.step {
            SetupStep::Welcome => match key.code {
                KeyCode::Enter => {
                    self.advance_step();
                    Ok(None)
                }
                KeyCode::Esc => Ok(Some(Action::ForceQuit)),
                _ => Ok(None),
            },
            SetupStep::ServerUrl | SetupStep::PhotoDirectory | SetupStep::DefaultLocation => {
                match key.code {
                    KeyCode::Enter => {
                        self.advance_step();
                        Ok(None)
                    }
                    KeyCode::Esc => {
                        self.go_back();
                        Ok(None)
                    }
                    KeyCode::Backspace => {
                        self.input.pop();
                        self.error = None;
                        Ok(None)
                    }
                    KeyCode::Char(c) => {
                        self.input.push(c);
                        self.error = None;
                        Ok(None)
                    }
                    _ => Ok(None),
                }
            }
            SetupStep::Confirm => match key.code {
                KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.save_config();
                    if self.complete {
                        Ok(Some(Action::SetupConfirm))
                    } else {
                        Ok(None)
                    }
                }
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                    self.go_back();
                    Ok(None)
                }
                KeyCode::Backspace => {
                    self.go_back();
                    Ok(None)
                }
                _ => Ok(None),
            },
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        // Clear the screen
        frame.render_widget(Clear, area);
        let background = Block::default().style(Style::default().bg(Color::Reset));
        frame.render_widget(background, area);

        let margin = 4;
        let content_area = Rect::new(
            margin,
            margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(2), // Progress
                Constraint::Min(10),   // Content
                Constraint::Length(3), // Help
            ])
            .split(content_area);

        // Title
        let title = Paragraph::new(Line::from(vec![Span::styled(
            " mural-tui Setup ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        // Progress indicator
        let progress = format!(
            "Step {} of 5: {}",
            self.step.step_number(),
            self.step.title()
        );
        let progress_widget = Paragraph::new(Line::from(vec![Span::styled(
            progress,
            Style::default().fg(Color::DarkGray),
        )]));
        frame.render_widget(progress_widget, chunks[1]);

        // Content based on step
        self.draw_step_content(frame, chunks[2]);

        // Help bar
        let help_text = match self.step {
            SetupStep::Welcome => " Enter  Continue   Esc  Quit",
            SetupStep::ServerUrl | SetupStep::PhotoDirectory | SetupStep::DefaultLocation => {
                " Enter  Continue   Esc  Back   Type to edit"
            }
            SetupStep::Confirm => " Enter/y  Save & Continue   Esc/n  Go Back",
        };
        let help = Paragraph::new(Line::from(vec![Span::styled(
            help_text,
            Style::default().fg(Color::DarkGray),
        )]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);

        Ok(())
    }
}

impl SetupComponent {
    fn draw_step_content(&self, frame: &mut Frame, area: Rect) {
        match self.step {
            SetupStep::Welcome => self.draw_welcome(frame, area),
            SetupStep::ServerUrl => self.draw_server_url(frame, area),
            SetupStep::PhotoDirectory => self.draw_photo_directory(frame, area),
            SetupStep::DefaultLocation => self.draw_default_location(frame, area),
            SetupStep::Confirm => self.draw_confirm(frame, area),
        }
    }

    fn draw_welcome(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Welcome to mural-tui!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from("This wizard will connect mural-tui to a mural server."),
            Line::from(""),
            Line::from("You will need to provide:"),
            Line::from(vec![Span::styled(
                "  1. The URL of the submission server",
                Style::default().fg(Color::Cyan),
            )]),
            Line::from(vec![Span::styled(
                "  2. The directory holding your photos",
                Style::default().fg(Color::Cyan),
            )]),
            Line::from(vec![Span::styled(
                "  3. A fallback location for new submissions",
                Style::default().fg(Color::Cyan),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Press Enter to begin...",
                Style::default().fg(Color::Yellow),
            )]),
        ];

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Welcome ")
                .border_style(Style::default().fg(Color::Green)),
        );
        frame.render_widget(paragraph, area);
    }

    fn draw_server_url(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(""),
            Line::from("Enter the base URL of the mural server:"),
            Line::from("(e.g., https://mural.example.com)"),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{}_", &self.input),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if URL_PATTERN.is_match(self.input.trim()) {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![Span::styled(
                "✓ Looks like a URL",
                Style::default().fg(Color::Green),
            )]));
        }

        if let Some(ref error) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )]));
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Server URL ")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, area);
    }

    fn draw_photo_directory(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(""),
            Line::from("Enter the directory the photo browser should scan:"),
            Line::from("(e.g., ~/Pictures or /home/me/shots)"),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{}_", &self.input),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if !self.input.is_empty() {
            let path = std::path::Path::new(&self.input);
            if path.is_dir() {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![Span::styled(
                    "✓ Directory exists",
                    Style::default().fg(Color::Green),
                )]));
            }
        }

        if let Some(ref error) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )]));
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Photo Library ")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, area);
    }

    fn draw_default_location(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(""),
            Line::from("Enter the default coordinate for new submissions:"),
            Line::from("(Used when a photo carries no location and no fix arrives)"),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{}_", &self.input),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Format: latitude, longitude",
                Style::default().fg(Color::DarkGray),
            )]),
        ];

        if let Some(ref error) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )]));
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Default Location ")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, area);
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect) {
        let config_dir = Config::config_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.mural-tui".to_string());

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Review your configuration:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Server URL:       ", Style::default().fg(Color::Cyan)),
                Span::raw(self.config.server_url.clone()),
            ]),
            Line::from(vec![
                Span::styled("Photo Library:    ", Style::default().fg(Color::Cyan)),
                Span::raw(self.config.photo_dir.clone()),
            ]),
            Line::from(vec![
                Span::styled("Default Location: ", Style::default().fg(Color::Cyan)),
                Span::raw(self.location_input()),
            ]),
            Line::from(vec![
                Span::styled("Device ID:        ", Style::default().fg(Color::Cyan)),
                Span::raw(self.config.device_id.to_string()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "Config will be saved to: ",
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!("{}/config.json", config_dir)),
            ]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Press Enter or 'y' to save and continue...",
                Style::default().fg(Color::Yellow),
            )]),
        ];

        if let Some(ref error) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )]));
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm Configuration ")
                .border_style(Style::default().fg(Color::Green)),
        );
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_input_parsing() {
        assert_eq!(
            parse_coordinate_input("18.4655, -66.1057"),
            Ok((18.4655, -66.1057))
        );
        assert_eq!(parse_coordinate_input("0,0"), Ok((0.0, 0.0)));

        assert!(parse_coordinate_input("").is_err());
        assert!(parse_coordinate_input("18.4655").is_err());
        assert!(parse_coordinate_input("18.4655, -66.1057, 3").is_err());
        assert!(parse_coordinate_input("north, west").is_err());
        assert!(parse_coordinate_input("91, 0").is_err());
        assert!(parse_coordinate_input("0, 181").is_err());
    }

    #[test]
    fn test_url_validation() {
        let mut setup = SetupComponent::new();
        setup.step = SetupStep::ServerUrl;

        setup.input = "mural.example.com".to_string();
        assert!(!setup.validate_current_step());
        assert!(setup.error.is_some());

        setup.input = "https://mural.example.com/".to_string();
        assert!(setup.validate_current_step());
        // Trailing slash is dropped so path joins stay clean
        assert_eq!(setup.config.server_url, "https://mural.example.com");
    }

    #[test]
    fn test_welcome_prepopulates_location() {
        let mut setup = SetupComponent::new();
        setup.config.default_latitude = 40.0;
        setup.config.default_longitude = -73.5;

        setup.step = SetupStep::PhotoDirectory;
        setup.input = std::env::temp_dir().display().to_string();
        setup.advance_step();

        assert_eq!(setup.step, SetupStep::DefaultLocation);
        assert_eq!(setup.input, "40, -73.5");
    }
}
