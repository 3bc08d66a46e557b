//! Home component - Browse screen
//!
//! Displays the My Submissions / Favorites tabs with the fetched lists.
//! Owns tab state, the section lists, and list navigation.

use crate::action::Action;
use crate::component::Component;
use crate::components::calculate_main_layout;
use crate::components::progress_dialog::SPINNER_FRAMES;
use crate::model::content::{ContentList, ContentRow, ContentSection};
use crate::model::submission::{Submission, SubmissionStatus};
use crate::model::ui::Tab;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Home Component
// ═══════════════════════════════════════════════════════════════════════════════

/// Home component for the browse view
/// Owns the per-tab section lists and handles list interactions
pub struct HomeComponent {
    /// Current active tab
    pub active_tab: Tab,

    /// Section list for the My Submissions tab, payload is the submission id
    pub submissions: ContentList<u64>,

    /// Section list for the Favorites tab, payload is the submission id
    pub favorites: ContentList<u64>,

    /// Render-time selection state for the list widget
    pub list_state: ListState,
}

impl Default for HomeComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeComponent {
    pub fn new() -> Self {
        Self {
            active_tab: Tab::Submissions,
            submissions: ContentList::new(),
            favorites: ContentList::new(),
            list_state: ListState::default(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Section Building
    // ─────────────────────────────────────────────────────────────────────────

    /// Rebuild the My Submissions sections from a fresh fetch
    pub fn set_submissions(&mut self, items: &[Submission]) {
        self.submissions.replace_sections(build_sections(items));
    }

    /// Rebuild the Favorites sections from a fresh fetch
    pub fn set_favorites(&mut self, items: &[Submission]) {
        self.favorites.replace_sections(build_sections(items));
    }

    /// The section list behind the active tab
    pub fn active_list(&self) -> &ContentList<u64> {
        match self.active_tab {
            Tab::Submissions => &self.submissions,
            Tab::Favorites => &self.favorites,
        }
    }

    pub fn active_list_mut(&mut self) -> &mut ContentList<u64> {
        match self.active_tab {
            Tab::Submissions => &mut self.submissions,
            Tab::Favorites => &mut self.favorites,
        }
    }

    /// Id of the submission under the cursor
    pub fn selected_id(&self) -> Option<u64> {
        self.active_list().selected_row().and_then(|row| row.payload)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Switch to the next tab; each tab keeps its own cursor
    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        let current_index = tabs
            .iter()
            .position(|t| *t == self.active_tab)
            .unwrap_or(0);
        let next_index = (current_index + 1) % tabs.len();
        self.active_tab = tabs[next_index];
    }

    /// Switch to the previous tab
    pub fn previous_tab(&mut self) {
        let tabs = Tab::all();
        let current_index = tabs
            .iter()
            .position(|t| *t == self.active_tab)
            .unwrap_or(0);
        let prev_index = if current_index == 0 {
            tabs.len() - 1
        } else {
            current_index - 1
        };
        self.active_tab = tabs[prev_index];
    }
}

/// Build the single untitled section the browse lists use
fn build_sections(items: &[Submission]) -> Vec<ContentSection<u64>> {
    if items.is_empty() {
        return Vec::new();
    }

    let rows = items
        .iter()
        .map(|submission| {
            ContentRow::new("submission")
                .with_text(submission.display_title())
                .with_payload(submission.id)
        })
        .collect();

    vec![ContentSection::new(rows)]
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for HomeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            // Navigation
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('g') => Some(Action::FirstItem),
            KeyCode::Char('G') => Some(Action::LastItem),
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PrevTab),

            // Data
            KeyCode::Char('r') => Some(Action::Refresh),

            // Screens
            KeyCode::Enter => Some(Action::OpenDetail),
            KeyCode::Char('n') => Some(Action::OpenCompose),

            // Modals
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),

            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, _action: Action) -> Result<Option<Action>> {
        // Updates are handled by App, which calls the navigation methods
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_browse_screen which takes full context
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed for rendering the browse screen
pub struct BrowseRenderContext<'a> {
    pub submissions: &'a [Submission],
    pub favorites: &'a [Submission],
    pub status_message: Option<&'a str>,
    /// Elapsed time of a non-blocking fetch, drives the spinner
    pub fetch_elapsed: Option<Duration>,
    pub server_host: Option<&'a str>,
}

/// Draw the browse screen
pub fn draw_browse_screen(
    frame: &mut Frame,
    area: Rect,
    home: &mut HomeComponent,
    ctx: &BrowseRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area);

    render_tabs(frame, layout.tabs, home);
    render_submission_list(frame, layout.list, home, ctx);
    render_status_bar(frame, layout.status, ctx);
    render_help_bar(frame, layout.help);

    Ok(())
}

fn render_tabs(frame: &mut Frame, area: Rect, home: &HomeComponent) {
    let all_tabs = Tab::all();
    let titles: Vec<&str> = all_tabs.iter().map(|t| t.name()).collect();
    let selected = all_tabs
        .iter()
        .position(|t| *t == home.active_tab)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM))
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn status_marker(status: SubmissionStatus) -> Span<'static> {
    let color = match status {
        SubmissionStatus::Pending => Color::Yellow,
        SubmissionStatus::Approved => Color::Green,
        SubmissionStatus::Rejected => Color::Red,
    };
    Span::styled("● ", Style::default().fg(color))
}

fn render_submission_list(
    frame: &mut Frame,
    area: Rect,
    home: &mut HomeComponent,
    ctx: &BrowseRenderContext,
) {
    let source = match home.active_tab {
        Tab::Submissions => ctx.submissions,
        Tab::Favorites => ctx.favorites,
    };

    let list = home.active_list();
    let title = format!(" {} ({}) ", home.active_tab.name(), list.row_count());

    if list.is_empty() {
        let message = match home.active_tab {
            Tab::Submissions => "No submissions yet. Press n to add one.",
            Tab::Favorites => "No favorites yet.",
        };
        let empty = Paragraph::new(Line::from(Span::styled(
            format!("  {}", message),
            Style::default().fg(Color::DarkGray),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = list
        .sections()
        .iter()
        .flat_map(|section| section.rows.iter())
        .map(|row| {
            let submission = row
                .payload
                .and_then(|id| source.iter().find(|s| s.id == id));

            let spans = match submission {
                Some(submission) => vec![
                    status_marker(submission.status),
                    Span::styled(
                        submission.display_title().to_string(),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(
                        format!("  {}", submission.display_artist()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ],
                // Row without a backing record, render the bare text
                None => vec![Span::raw(row.text.clone().unwrap_or_default())],
            };

            ListItem::new(Line::from(spans))
        })
        .collect();

    let cursor = list.cursor();

    let list_widget = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    home.list_state.select(cursor);
    frame.render_stateful_widget(list_widget, area, &mut home.list_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &BrowseRenderContext) {
    let mut spans = vec![];

    // Server host badge
    if let Some(host) = ctx.server_host {
        spans.push(Span::styled(
            format!(" {} ", host),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    // Fetch spinner while a background refresh is running
    if let Some(elapsed) = ctx.fetch_elapsed {
        let spinner = SPINNER_FRAMES[(elapsed.as_millis() / 100) as usize % SPINNER_FRAMES.len()];
        spans.push(Span::styled(
            format!("{} Fetching ", spinner),
            Style::default().fg(Color::Cyan),
        ));
    }

    // Status message if present
    if let Some(status) = ctx.status_message {
        let used: usize = spans.iter().map(|s| s.content.width()).sum();
        let available = (area.width as usize).saturating_sub(used + 2);
        spans.push(Span::styled(
            format!(" {} ", truncate_to_width(status, available)),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans));
    frame.render_widget(paragraph, area);
}

/// Cut text down to the given display width, appending an ellipsis
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let mut result = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        result.push(c);
        used += w;
    }
    result.push('…');
    result
}

fn render_help_bar(frame: &mut Frame, area: Rect) {
    let help_spans = vec![
        Span::styled(
            " q ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Quit "),
        Span::styled(
            " n ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("New "),
        Span::styled(
            " Enter ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Detail "),
        Span::styled(
            " Tab ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Switch "),
        Span::styled(
            " r ",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Refresh "),
        Span::styled(
            " ? ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Help"),
    ];

    let paragraph =
        Paragraph::new(Line::from(help_spans)).alignment(ratatui::layout::Alignment::Left);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use crate::model::submission::Coordinate;

    fn submission(id: u64, title: &str) -> Submission {
        Submission {
            id,
            title: Some(title.to_string()),
            artist: None,
            note: None,
            coordinate: Coordinate::new(18.4655, -66.1057),
            status: SubmissionStatus::Pending,
            created_at: Utc.with_ymd_and_hms(2018, 4, 30, 12, 0, 0).unwrap(),
            image_url: None,
            thumb_url: None,
        }
    }

    #[test]
    fn test_tab_cycle() {
        let mut home = HomeComponent::new();
        assert_eq!(home.active_tab, Tab::Submissions);

        home.next_tab();
        assert_eq!(home.active_tab, Tab::Favorites);
        home.next_tab();
        assert_eq!(home.active_tab, Tab::Submissions);

        home.previous_tab();
        assert_eq!(home.active_tab, Tab::Favorites);
    }

    #[test]
    fn test_each_tab_keeps_its_cursor() {
        let mut home = HomeComponent::new();
        home.set_submissions(&[
            submission(1, "Tag wall"),
            submission(2, "Wheatpaste"),
            submission(3, "Stencil"),
        ]);
        home.set_favorites(&[submission(9, "Mosaic")]);

        home.active_list_mut().select_next();
        home.active_list_mut().select_next();
        assert_eq!(home.selected_id(), Some(3));

        home.next_tab();
        assert_eq!(home.selected_id(), Some(9));

        home.previous_tab();
        assert_eq!(home.selected_id(), Some(3));
    }

    #[test]
    fn test_wholesale_replacement_clamps_selection() {
        let mut home = HomeComponent::new();
        home.set_submissions(&[
            submission(1, "Tag wall"),
            submission(2, "Wheatpaste"),
            submission(3, "Stencil"),
        ]);
        home.active_list_mut().select_last();

        // The refetch returned fewer rows
        home.set_submissions(&[submission(1, "Tag wall")]);
        assert_eq!(home.selected_id(), Some(1));

        home.set_submissions(&[]);
        assert_eq!(home.selected_id(), None);
    }

    #[test]
    fn test_empty_fetch_produces_no_sections() {
        assert!(build_sections(&[]).is_empty());

        let sections = build_sections(&[submission(1, "Tag wall")]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].rows.len(), 1);
        assert_eq!(sections[0].rows[0].group, "submission");
        assert_eq!(sections[0].rows[0].payload, Some(1));
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 20), "short");
        assert_eq!(truncate_to_width("a longer message", 7), "a long…");
    }
}
