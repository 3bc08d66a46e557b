//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components. App owns
//! the modal stack, the collaborators (API client, analytics recorder, config),
//! and one background runner per kind of async work; worker results are polled
//! off on every tick and applied back into domain and component state.

use crate::action::Action;
use crate::component::Component;
use crate::components::location_picker::{NUDGE_COARSE, NUDGE_FINE};
use crate::components::permission_dialog::PERMISSION_OPTIONS;
use crate::components::{
    draw_browse_screen, AlertDialog, BrowseRenderContext, ComposeComponent, DetailComponent,
    HelpDialog, HomeComponent, LocationPickerDialog, PermissionDialog, PhotoBrowserDialog,
    PhotoSourceDialog, ProgressDialog, QuitDialog, SetupComponent, SplashComponent,
};
use crate::config::{Config, LocationPermission};
use crate::model::compose::PhotoAttachment;
use crate::model::domain::DomainState;
use crate::model::modal::{Modal, ModalStack, PhotoSourceOption};
use crate::model::submission::{Coordinate, Submission};
use crate::model::ui::{AppMode, Screen, Tab};
use crate::services::{self, AnalyticsEvent, ApiClient, LocalAnalytics, TaskRunner};
use anyhow::{anyhow, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use std::path::Path;
use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// Fetch Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Why a list fetch was started
///
/// An appearance fetch fires the first time a list comes into view and is
/// skipped once the list has loaded; a manual refresh always fetches. Only
/// the favorites first load shows the blocking overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchReason {
    Appearance,
    Manual,
}

/// Host part of the configured server URL, for the status bar badge
fn server_host(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }

    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);

    let host = without_scheme.split('/').next().unwrap_or(without_scheme);
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Current application mode
    pub mode: AppMode,

    /// Next mode to transition to after splash
    pub next_mode_after_splash: AppMode,

    /// Screen shown while in Running mode
    pub screen: Screen,

    /// Domain state (fetched submissions and favorites)
    pub domain: DomainState,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Status message to display in the browse status bar
    pub status_message: Option<String>,

    /// Current config
    pub config: Config,

    /// Client for the submission service
    pub api: ApiClient,

    /// Local analytics recorder
    pub analytics: LocalAnalytics,

    // ─────────────────────────────────────────────────────────────────────────
    // Background Runners (one slot per kind of work)
    // ─────────────────────────────────────────────────────────────────────────
    pub submissions_runner: TaskRunner<Result<Vec<Submission>, String>>,
    pub favorites_runner: TaskRunner<Result<Vec<Submission>, String>>,
    pub upload_runner: TaskRunner<Result<Submission, String>>,
    pub location_runner: TaskRunner<Result<Coordinate, String>>,
    pub photo_runner: TaskRunner<Result<PhotoAttachment, String>>,
    pub preview_runner: TaskRunner<Result<Vec<u8>, String>>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub splash: SplashComponent,
    pub home: HomeComponent,
    pub compose: ComposeComponent,
    pub detail: DetailComponent,
    pub setup: SetupComponent,
    pub quit_dialog: QuitDialog,
    pub alert_dialog: AlertDialog,
    pub progress_dialog: ProgressDialog,
    pub photo_source_dialog: PhotoSourceDialog,
    pub photo_browser_dialog: PhotoBrowserDialog,
    pub location_picker: LocationPickerDialog,
    pub permission_dialog: PermissionDialog,
    pub help_dialog: HelpDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create a new App instance
    ///
    /// A saved config means setup was completed on an earlier run; without
    /// one the splash hands off to the setup wizard instead.
    pub fn new() -> Result<App> {
        match Config::load() {
            Some(config) => Self::create_app(AppMode::Running, config),
            None => Self::create_app(AppMode::Setup, Config::default()),
        }
    }

    fn create_app(next_mode: AppMode, config: Config) -> Result<App> {
        let api = ApiClient::new(&config.server_url, config.device_id)
            .map_err(|message| anyhow!("Could not build the API client: {}", message))?;

        Ok(App {
            mode: AppMode::Splash,
            next_mode_after_splash: next_mode,
            screen: Screen::Browse,
            domain: DomainState::new(),
            modals: ModalStack::new(),
            should_quit: false,
            status_message: None,
            api,
            analytics: LocalAnalytics::new(),
            // Runners
            submissions_runner: TaskRunner::new(),
            favorites_runner: TaskRunner::new(),
            upload_runner: TaskRunner::new(),
            location_runner: TaskRunner::new(),
            photo_runner: TaskRunner::new(),
            preview_runner: TaskRunner::new(),
            // Components
            splash: SplashComponent::new(),
            home: HomeComponent::new(),
            compose: ComposeComponent::new(config.default_coordinate()),
            detail: DetailComponent::new(),
            setup: SetupComponent::new(),
            quit_dialog: QuitDialog,
            alert_dialog: AlertDialog,
            progress_dialog: ProgressDialog,
            photo_source_dialog: PhotoSourceDialog,
            photo_browser_dialog: PhotoBrowserDialog,
            location_picker: LocationPickerDialog,
            permission_dialog: PermissionDialog,
            help_dialog: HelpDialog::default(),
            config,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.splash.init()?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Ctrl-C quits from anywhere, including over a blocking overlay
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        match self.mode {
            AppMode::Splash => self.splash.handle_key_event(key),
            AppMode::Setup => self.setup.handle_key_event(key),
            AppMode::Running => {
                if let Some(modal) = self.modals.top().cloned() {
                    self.handle_modal_key_event(&modal, key)
                } else {
                    match self.screen {
                        Screen::Browse => self.home.handle_key_event(key),
                        Screen::Compose => self.compose.handle_key_event(key),
                        Screen::Detail => self.detail.handle_key_event(key),
                    }
                }
            }
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                if self.mode == AppMode::Splash && self.splash.is_complete() {
                    return Ok(Some(Action::SplashComplete));
                }
                return self.poll_background_tasks();
            }
            Action::SplashComplete => {
                self.mode = self.next_mode_after_splash;
                if self.mode == AppMode::Running {
                    self.start_fetch(self.home.active_tab, FetchReason::Appearance);
                }
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Browse Navigation (delegate to HomeComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::NextItem => self.home.active_list_mut().select_next(),
            Action::PrevItem => self.home.active_list_mut().select_previous(),
            Action::FirstItem => self.home.active_list_mut().select_first(),
            Action::LastItem => self.home.active_list_mut().select_last(),
            Action::NextTab => {
                self.home.next_tab();
                self.status_message = None;
                self.start_fetch(self.home.active_tab, FetchReason::Appearance);
            }
            Action::PrevTab => {
                self.home.previous_tab();
                self.status_message = None;
                self.start_fetch(self.home.active_tab, FetchReason::Appearance);
            }
            Action::Refresh => {
                self.status_message = None;
                self.start_fetch(self.home.active_tab, FetchReason::Manual);
            }

            // ─────────────────────────────────────────────────────────────────
            // Detail Screen
            // ─────────────────────────────────────────────────────────────────
            Action::OpenDetail => {
                let source = match self.home.active_tab {
                    Tab::Submissions => &self.domain.submissions,
                    Tab::Favorites => &self.domain.favorites,
                };
                let selected = self
                    .home
                    .selected_id()
                    .and_then(|id| source.iter().find(|s| s.id == id).cloned());

                if let Some(submission) = selected {
                    let preview_url = submission
                        .image_url
                        .clone()
                        .or_else(|| submission.thumb_url.clone());

                    self.detail.set_submission(submission);
                    self.screen = Screen::Detail;

                    if let Some(url) = preview_url {
                        let api = self.api.clone();
                        self.preview_runner.clear();
                        self.preview_runner.spawn(move || api.fetch_image(&url));
                    }
                }
            }
            Action::CloseDetail => {
                self.screen = Screen::Browse;
                self.detail.clear();
                // A preview still in flight would land on a cleared screen
                self.preview_runner.clear();
            }

            // ─────────────────────────────────────────────────────────────────
            // Compose Flow
            // ─────────────────────────────────────────────────────────────────
            Action::OpenCompose => {
                self.compose.reset(self.config.default_coordinate());
                self.screen = Screen::Compose;

                match self.config.location_permission {
                    LocationPermission::Unset => {
                        self.modals
                            .push(Modal::LocationPermission { selected_index: 0 });
                    }
                    LocationPermission::Authorized => {
                        return Ok(Some(Action::RequestLocation));
                    }
                    LocationPermission::Denied => {}
                }
            }
            Action::ComposeSubmit => match self.compose.build_upload() {
                Ok(upload) => {
                    self.modals.push(Modal::Progress {
                        message: "Uploading submission...".to_string(),
                    });
                    let api = self.api.clone();
                    self.upload_runner.spawn(move || api.upload(&upload));
                }
                Err(message) => {
                    self.modals.push(Modal::Alert {
                        title: "Missing Photo".to_string(),
                        message,
                    });
                }
            },
            Action::ComposeCancel => {
                self.screen = Screen::Browse;
                self.location_runner.clear();
            }
            Action::ComposeComplete => {
                self.screen = Screen::Browse;
                self.location_runner.clear();
                self.start_fetch(Tab::Submissions, FetchReason::Manual);
            }

            // ─────────────────────────────────────────────────────────────────
            // Photo Attachment
            // ─────────────────────────────────────────────────────────────────
            Action::OpenPhotoSource => {
                let mut options = Vec::new();
                if self.config.camera_available() {
                    options.push(PhotoSourceOption::Camera);
                }
                options.push(PhotoSourceOption::Library);
                if self.compose.has_photo() {
                    options.push(PhotoSourceOption::RemovePhoto);
                }
                self.modals.push(Modal::PhotoSource {
                    options,
                    selected_index: 0,
                });
            }
            Action::OpenPhotoBrowser => {
                match services::list_photos(Path::new(&self.config.photo_dir)) {
                    Ok(files) => {
                        self.modals.push(Modal::PhotoBrowser {
                            files,
                            selected_index: 0,
                        });
                    }
                    Err(message) => {
                        self.modals.push(Modal::Alert {
                            title: "Photo Library".to_string(),
                            message,
                        });
                    }
                }
            }
            Action::CapturePhoto => {
                // The camera option is only offered when a command is configured
                if let Some(command) = self.config.capture_command.clone() {
                    self.modals.push(Modal::Progress {
                        message: "Capturing photo...".to_string(),
                    });
                    self.photo_runner
                        .spawn(move || services::capture_photo(&command));
                }
            }
            Action::ResetPhoto => {
                self.compose.reset_photo();
                self.analytics.record(AnalyticsEvent::SubmissionResetPhoto);
            }

            // ─────────────────────────────────────────────────────────────────
            // Location
            // ─────────────────────────────────────────────────────────────────
            Action::OpenLocationPicker => {
                self.modals.push(Modal::LocationPicker {
                    coordinate: self.compose.resolved_coordinate(),
                });
            }
            Action::SaveLocation(coordinate) => {
                self.compose.set_manual_coordinate(coordinate);
                self.analytics
                    .record(AnalyticsEvent::SubmissionUpdateLocation);
                self.modals.pop();
            }
            Action::RequestLocation => {
                if !self.location_runner.is_busy() {
                    self.location_runner.spawn(services::current_location);
                }
            }
            Action::LocationPermissionGranted => {
                self.config.location_permission = LocationPermission::Authorized;
                let _ = self.config.save();
                if matches!(self.modals.top(), Some(Modal::LocationPermission { .. })) {
                    self.modals.pop();
                }
                return Ok(Some(Action::RequestLocation));
            }
            Action::LocationPermissionDenied => {
                self.config.location_permission = LocationPermission::Denied;
                let _ = self.config.save();
                if matches!(self.modals.top(), Some(Modal::LocationPermission { .. })) {
                    self.modals.pop();
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help { scroll_offset: 0 });
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => {
                if let Some(modal) = self.modals.top().cloned() {
                    match modal {
                        Modal::QuitConfirm => {
                            self.should_quit = true;
                        }
                        Modal::Alert { .. } => {
                            self.modals.pop();
                        }
                        Modal::PhotoSource {
                            options,
                            selected_index,
                        } => {
                            self.modals.pop();
                            if let Some(option) = options.get(selected_index) {
                                let follow_up = match option {
                                    PhotoSourceOption::Camera => Action::CapturePhoto,
                                    PhotoSourceOption::Library => Action::OpenPhotoBrowser,
                                    PhotoSourceOption::RemovePhoto => Action::ResetPhoto,
                                };
                                return Ok(Some(follow_up));
                            }
                        }
                        Modal::PhotoBrowser {
                            files,
                            selected_index,
                        } => {
                            self.modals.pop();
                            if let Some(path) = files.get(selected_index).cloned() {
                                self.modals.push(Modal::Progress {
                                    message: "Loading photo...".to_string(),
                                });
                                self.photo_runner
                                    .spawn(move || services::load_photo(&path));
                            }
                        }
                        Modal::LocationPermission { selected_index } => {
                            let follow_up = if selected_index == 0 {
                                Action::LocationPermissionGranted
                            } else {
                                Action::LocationPermissionDenied
                            };
                            return Ok(Some(follow_up));
                        }
                        _ => {}
                    }
                }
            }
            Action::ModalUp => match self.modals.top_mut() {
                Some(Modal::PhotoSource { selected_index, .. })
                | Some(Modal::PhotoBrowser { selected_index, .. })
                | Some(Modal::LocationPermission { selected_index }) => {
                    *selected_index = selected_index.saturating_sub(1);
                }
                _ => {}
            },
            Action::ModalDown => match self.modals.top_mut() {
                Some(Modal::PhotoSource {
                    options,
                    selected_index,
                }) => {
                    let max = options.len().saturating_sub(1);
                    if *selected_index < max {
                        *selected_index += 1;
                    }
                }
                Some(Modal::PhotoBrowser {
                    files,
                    selected_index,
                }) => {
                    let max = files.len().saturating_sub(1);
                    if *selected_index < max {
                        *selected_index += 1;
                    }
                }
                Some(Modal::LocationPermission { selected_index }) => {
                    if *selected_index < PERMISSION_OPTIONS.len() - 1 {
                        *selected_index += 1;
                    }
                }
                _ => {}
            },

            // ─────────────────────────────────────────────────────────────────
            // Setup
            // ─────────────────────────────────────────────────────────────────
            Action::SetupConfirm => {
                // Setup complete, adopt the config and switch to Running mode
                if let Some(config) = self.setup.get_config().cloned() {
                    match ApiClient::new(&config.server_url, config.device_id) {
                        Ok(api) => {
                            self.api = api;
                            self.compose.reset(config.default_coordinate());
                            self.config = config;
                            self.mode = AppMode::Running;
                            self.start_fetch(self.home.active_tab, FetchReason::Appearance);
                        }
                        Err(message) => {
                            self.setup.error = Some(message);
                        }
                    }
                }
            }
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.mode {
            AppMode::Splash => self.splash.draw(frame, area)?,
            AppMode::Setup => self.setup.draw(frame, area)?,
            AppMode::Running => {
                match self.screen {
                    Screen::Browse => {
                        let ctx = BrowseRenderContext {
                            submissions: &self.domain.submissions,
                            favorites: &self.domain.favorites,
                            status_message: self.status_message.as_deref(),
                            fetch_elapsed: match self.home.active_tab {
                                Tab::Submissions => self.submissions_runner.elapsed(),
                                Tab::Favorites => self.favorites_runner.elapsed(),
                            },
                            server_host: server_host(&self.config.server_url),
                        };
                        draw_browse_screen(frame, area, &mut self.home, &ctx)?;
                    }
                    Screen::Compose => self.compose.draw(frame, area)?,
                    Screen::Detail => self.detail.draw(frame, area)?,
                }

                // Draw modal overlay if active
                if let Some(modal) = self.modals.top().cloned() {
                    self.draw_modal(frame, area, &modal)?;
                }
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Alert { .. } => self.alert_dialog.handle_key_event(key),
            Modal::Progress { .. } => {
                // Blocking: nothing gets through until the worker reports back
                Ok(None)
            }
            Modal::PhotoSource { .. } => self.photo_source_dialog.handle_key_event(key),
            Modal::PhotoBrowser { .. } => self.photo_browser_dialog.handle_key_event(key),
            Modal::LocationPermission { .. } => self.permission_dialog.handle_key_event(key),
            Modal::LocationPicker { coordinate } => {
                let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
                    NUDGE_COARSE
                } else {
                    NUDGE_FINE
                };
                let action = match key.code {
                    KeyCode::Esc => Some(Action::CloseModal),
                    KeyCode::Enter => Some(Action::SaveLocation(*coordinate)),
                    KeyCode::Up => {
                        if let Some(Modal::LocationPicker { coordinate }) = self.modals.top_mut() {
                            *coordinate = coordinate.nudged(step, 0.0);
                        }
                        None
                    }
                    KeyCode::Down => {
                        if let Some(Modal::LocationPicker { coordinate }) = self.modals.top_mut() {
                            *coordinate = coordinate.nudged(-step, 0.0);
                        }
                        None
                    }
                    KeyCode::Left => {
                        if let Some(Modal::LocationPicker { coordinate }) = self.modals.top_mut() {
                            *coordinate = coordinate.nudged(0.0, -step);
                        }
                        None
                    }
                    KeyCode::Right => {
                        if let Some(Modal::LocationPicker { coordinate }) = self.modals.top_mut() {
                            *coordinate = coordinate.nudged(0.0, step);
                        }
                        None
                    }
                    _ => None,
                };
                Ok(action)
            }
            Modal::Help { .. } => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::Alert { title, message } => {
                self.alert_dialog
                    .draw_with_alert(frame, area, title, message)?;
            }
            Modal::Progress { message } => {
                let elapsed = self.progress_elapsed();
                self.progress_dialog
                    .draw_with_progress(frame, area, message, elapsed)?;
            }
            Modal::PhotoSource {
                options,
                selected_index,
            } => {
                self.photo_source_dialog
                    .draw_with_options(frame, area, options, *selected_index)?;
            }
            Modal::PhotoBrowser {
                files,
                selected_index,
            } => {
                self.photo_browser_dialog
                    .draw_with_files(frame, area, files, *selected_index)?;
            }
            Modal::LocationPermission { selected_index } => {
                self.permission_dialog
                    .draw_with_selection(frame, area, *selected_index)?;
            }
            Modal::LocationPicker { coordinate } => {
                self.location_picker
                    .draw_with_coordinate(frame, area, *coordinate)?;
            }
            Modal::Help { .. } => self.help_dialog.draw(frame, area)?,
        }
        Ok(())
    }

    /// Elapsed time of the task the progress overlay is tracking
    fn progress_elapsed(&self) -> Duration {
        self.upload_runner
            .elapsed()
            .or_else(|| self.photo_runner.elapsed())
            .or_else(|| self.favorites_runner.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Start a list fetch for a tab
    ///
    /// Appearance fetches fire only until the list has loaded once this
    /// session; manual refreshes always fetch. A fetch already in flight is
    /// left alone. The favorites first load pushes the blocking overlay, every
    /// other fetch only drives the status bar spinner.
    fn start_fetch(&mut self, tab: Tab, reason: FetchReason) {
        match tab {
            Tab::Submissions => {
                if reason == FetchReason::Appearance && self.domain.submissions_fetched {
                    return;
                }
                if self.submissions_runner.is_busy() {
                    return;
                }
                let api = self.api.clone();
                self.submissions_runner.spawn(move || api.my_submissions());
            }
            Tab::Favorites => {
                if reason == FetchReason::Appearance && self.domain.favorites_fetched {
                    return;
                }
                if self.favorites_runner.is_busy() {
                    return;
                }
                if reason == FetchReason::Appearance {
                    self.modals.push(Modal::Progress {
                        message: "Loading favorites...".to_string(),
                    });
                }
                let api = self.api.clone();
                self.favorites_runner.spawn(move || api.favorites());
            }
        }
    }

    /// Poll every runner and apply whatever results have arrived
    fn poll_background_tasks(&mut self) -> Result<Option<Action>> {
        if let Some(result) = self.submissions_runner.poll() {
            self.apply_submissions_result(result);
        }
        if let Some(result) = self.favorites_runner.poll() {
            self.apply_favorites_result(result);
        }
        if let Some(result) = self.location_runner.poll() {
            self.apply_location_result(result);
        }
        if let Some(result) = self.photo_runner.poll() {
            self.apply_photo_result(result);
        }
        if let Some(result) = self.preview_runner.poll() {
            self.detail.set_preview_result(result);
        }
        if let Some(result) = self.upload_runner.poll() {
            return Ok(self.apply_upload_result(result));
        }
        Ok(None)
    }

    /// Remove the progress overlay, even when an alert has stacked on top
    fn remove_progress(&mut self) {
        let mut kept = Vec::new();
        while let Some(modal) = self.modals.pop() {
            if matches!(modal, Modal::Progress { .. }) {
                break;
            }
            kept.push(modal);
        }
        while let Some(modal) = kept.pop() {
            self.modals.push(modal);
        }
    }

    /// My Submissions fetch result: failure is silent on screen and only
    /// leaves an analytics record, the intentional asymmetry with favorites
    fn apply_submissions_result(&mut self, result: Result<Vec<Submission>, String>) {
        match result {
            Ok(items) => {
                self.domain.submissions = items;
                self.domain.submissions_fetched = true;
                self.home.set_submissions(&self.domain.submissions);
            }
            Err(message) => {
                self.analytics
                    .record_detail(AnalyticsEvent::FetchFailed, message);
            }
        }
    }

    /// Favorites fetch result: failure always alerts; the previous list,
    /// possibly empty, stays displayed either way
    fn apply_favorites_result(&mut self, result: Result<Vec<Submission>, String>) {
        // The first-load overlay only ever exists on the browse screen
        if self.screen == Screen::Browse {
            self.remove_progress();
        }

        match result {
            Ok(items) => {
                self.domain.favorites = items;
                self.domain.favorites_fetched = true;
                self.home.set_favorites(&self.domain.favorites);
            }
            Err(message) => {
                self.modals.push(Modal::Alert {
                    title: "Fetch Failed".to_string(),
                    message,
                });
            }
        }
    }

    /// Upload result: success hands a completion action back to the main
    /// loop; failure keeps the form intact for a retry
    fn apply_upload_result(&mut self, result: Result<Submission, String>) -> Option<Action> {
        if self.screen == Screen::Compose {
            self.remove_progress();
        }

        match result {
            Ok(submission) => {
                self.analytics.record(AnalyticsEvent::SubmissionSuccess);
                self.status_message =
                    Some(format!("Submitted \"{}\"", submission.display_title()));
                Some(Action::ComposeComplete)
            }
            Err(_) => {
                self.modals.push(Modal::Alert {
                    title: "Upload Failed".to_string(),
                    message: "Submission failed. Please try again.".to_string(),
                });
                None
            }
        }
    }

    /// One-shot location sample: dropped when the form is no longer showing
    fn apply_location_result(&mut self, result: Result<Coordinate, String>) {
        if self.screen != Screen::Compose {
            return;
        }
        // Lookup failure is silent; the default coordinate stands in
        if let Ok(coordinate) = result {
            self.compose.apply_location_sample(coordinate);
        }
    }

    /// Photo load or capture result
    fn apply_photo_result(&mut self, result: Result<PhotoAttachment, String>) {
        if self.screen == Screen::Compose {
            self.remove_progress();
        }

        match result {
            Ok(photo) => self.compose.attach_photo(photo),
            Err(message) => {
                self.modals.push(Modal::Alert {
                    title: "Photo".to_string(),
                    message,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::submission::SubmissionStatus;
    use chrono::Utc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample_submission(id: u64, title: &str) -> Submission {
        Submission {
            id,
            title: Some(title.to_string()),
            artist: None,
            note: None,
            coordinate: Coordinate::new(18.4655, -66.1057),
            status: SubmissionStatus::Pending,
            created_at: Utc::now(),
            image_url: None,
            thumb_url: None,
        }
    }

    /// App in Running mode with an unreachable server and a throwaway
    /// analytics log; the TempDir must outlive the test body
    fn test_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            server_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        let mut app = App::create_app(AppMode::Running, config).unwrap();
        app.mode = AppMode::Running;
        app.analytics = LocalAnalytics::with_path(dir.path().join("events.log"));
        (app, dir)
    }

    fn read_events(dir: &tempfile::TempDir) -> String {
        std::fs::read_to_string(dir.path().join("events.log")).unwrap_or_default()
    }

    #[test]
    fn test_favorites_failure_always_alerts_and_keeps_list() {
        let (mut app, _dir) = test_app();
        app.domain.favorites = vec![sample_submission(9, "Kept")];
        app.home.set_favorites(&app.domain.favorites);

        app.apply_favorites_result(Err("connection refused".to_string()));

        assert!(matches!(app.modals.top(), Some(Modal::Alert { .. })));
        assert_eq!(app.domain.favorites.len(), 1);
        assert_eq!(app.domain.favorites[0].id, 9);
    }

    #[test]
    fn test_submissions_failure_is_silent_but_recorded() {
        let (mut app, dir) = test_app();
        app.domain.submissions = vec![sample_submission(1, "Kept")];
        app.home.set_submissions(&app.domain.submissions);

        app.apply_submissions_result(Err("connection refused".to_string()));

        assert!(app.modals.is_empty());
        assert_eq!(app.domain.submissions.len(), 1);
        let log = read_events(&dir);
        assert!(log.contains("fetch_failed"));
        assert!(log.contains("connection refused"));
    }

    #[test]
    fn test_fetch_success_replaces_list_wholesale() {
        let (mut app, _dir) = test_app();
        app.domain.submissions = vec![
            sample_submission(1, "Old"),
            sample_submission(2, "Older"),
        ];
        app.home.set_submissions(&app.domain.submissions);

        app.apply_submissions_result(Ok(vec![sample_submission(7, "New")]));

        assert_eq!(app.domain.submissions.len(), 1);
        assert_eq!(app.domain.submissions[0].id, 7);
        assert!(app.domain.submissions_fetched);
        assert_eq!(app.home.selected_id(), Some(7));
    }

    #[test]
    fn test_favorites_first_appearance_shows_overlay_once() {
        let (mut app, _dir) = test_app();

        app.update(Action::NextTab).unwrap();
        assert_eq!(app.home.active_tab, Tab::Favorites);
        assert!(app.favorites_runner.is_busy());
        assert!(matches!(app.modals.top(), Some(Modal::Progress { .. })));

        app.apply_favorites_result(Ok(Vec::new()));
        assert!(app.modals.is_empty());
        assert!(app.domain.favorites_fetched);

        // Later appearances of a loaded list fetch nothing
        app.update(Action::PrevTab).unwrap();
        app.update(Action::NextTab).unwrap();
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_manual_refresh_never_shows_overlay() {
        let (mut app, _dir) = test_app();
        app.home.active_tab = Tab::Favorites;

        app.update(Action::Refresh).unwrap();

        assert!(app.favorites_runner.is_busy());
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_upload_success_completes_compose_and_refetches() {
        let (mut app, dir) = test_app();
        app.screen = Screen::Compose;
        app.modals.push(Modal::Progress {
            message: "Uploading submission...".to_string(),
        });

        let follow_up = app.apply_upload_result(Ok(sample_submission(4, "Tag")));

        assert_eq!(follow_up, Some(Action::ComposeComplete));
        assert!(app.modals.is_empty());
        assert!(read_events(&dir).contains("submission_success"));

        let next = app.update(Action::ComposeComplete).unwrap();
        assert_eq!(next, None);
        assert_eq!(app.screen, Screen::Browse);
        assert!(app.submissions_runner.is_busy());
    }

    #[test]
    fn test_upload_failure_keeps_form_for_retry() {
        let (mut app, _dir) = test_app();
        app.screen = Screen::Compose;
        app.compose.set_manual_coordinate(Coordinate::new(40.0, -73.0));
        app.modals.push(Modal::Progress {
            message: "Uploading submission...".to_string(),
        });

        let follow_up = app.apply_upload_result(Err("server error".to_string()));

        assert_eq!(follow_up, None);
        assert_eq!(app.screen, Screen::Compose);
        assert!(matches!(app.modals.top(), Some(Modal::Alert { .. })));
        assert_eq!(
            app.compose.resolved_coordinate(),
            Coordinate::new(40.0, -73.0)
        );
    }

    #[test]
    fn test_submit_without_photo_never_uploads() {
        let (mut app, _dir) = test_app();
        app.config.location_permission = LocationPermission::Denied;
        app.update(Action::OpenCompose).unwrap();

        app.update(Action::ComposeSubmit).unwrap();

        assert!(matches!(app.modals.top(), Some(Modal::Alert { .. })));
        assert!(!app.upload_runner.is_busy());
        assert_eq!(app.screen, Screen::Compose);
    }

    #[test]
    fn test_location_permission_flow() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("HOME", dir.path());

        let (mut app, _adir) = test_app();
        app.update(Action::OpenCompose).unwrap();
        assert!(matches!(
            app.modals.top(),
            Some(Modal::LocationPermission { .. })
        ));

        let confirm = app.update(Action::ConfirmModal).unwrap();
        assert_eq!(confirm, Some(Action::LocationPermissionGranted));
        let next = app.update(Action::LocationPermissionGranted).unwrap();
        assert_eq!(next, Some(Action::RequestLocation));
        assert!(app.modals.is_empty());
        assert_eq!(app.config.location_permission, LocationPermission::Authorized);

        // Denying persists too, and the prompt never comes back
        let (mut app, _adir) = test_app();
        app.update(Action::OpenCompose).unwrap();
        app.update(Action::ModalDown).unwrap();
        let confirm = app.update(Action::ConfirmModal).unwrap();
        assert_eq!(confirm, Some(Action::LocationPermissionDenied));
        let next = app.update(Action::LocationPermissionDenied).unwrap();
        assert_eq!(next, None);
        assert_eq!(app.config.location_permission, LocationPermission::Denied);

        app.update(Action::ComposeCancel).unwrap();
        app.update(Action::OpenCompose).unwrap();
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_location_sample_applies_only_while_composing() {
        let (mut app, _dir) = test_app();
        app.config.location_permission = LocationPermission::Denied;

        app.update(Action::OpenCompose).unwrap();
        app.apply_location_result(Ok(Coordinate::new(40.0, -73.0)));
        assert_eq!(
            app.compose.resolved_coordinate(),
            Coordinate::new(40.0, -73.0)
        );

        // A sample landing after the form is gone is dropped
        app.update(Action::ComposeCancel).unwrap();
        app.update(Action::OpenCompose).unwrap();
        app.update(Action::ComposeCancel).unwrap();
        assert_eq!(app.screen, Screen::Browse);
        app.apply_location_result(Ok(Coordinate::new(51.0, 0.0)));
        assert_eq!(
            app.compose.resolved_coordinate(),
            app.config.default_coordinate()
        );
    }

    #[test]
    fn test_open_and_close_detail() {
        let (mut app, _dir) = test_app();
        let mut submission = sample_submission(5, "Wall");
        submission.image_url = Some("http://127.0.0.1:9/five.jpg".to_string());
        app.apply_submissions_result(Ok(vec![submission]));

        app.update(Action::OpenDetail).unwrap();
        assert_eq!(app.screen, Screen::Detail);
        assert!(app.detail.submission.is_some());
        assert!(app.preview_runner.is_busy());

        app.update(Action::CloseDetail).unwrap();
        assert_eq!(app.screen, Screen::Browse);
        assert!(app.detail.submission.is_none());
        assert!(!app.preview_runner.is_busy());
    }

    #[test]
    fn test_confirm_photo_source_dispatches_selection() {
        let (mut app, _dir) = test_app();
        app.screen = Screen::Compose;
        app.modals.push(Modal::PhotoSource {
            options: vec![PhotoSourceOption::Library, PhotoSourceOption::RemovePhoto],
            selected_index: 1,
        });

        let follow_up = app.update(Action::ConfirmModal).unwrap();

        assert_eq!(follow_up, Some(Action::ResetPhoto));
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_modal_navigation_clamps_at_both_ends() {
        let (mut app, _dir) = test_app();
        app.modals.push(Modal::LocationPermission { selected_index: 0 });

        app.update(Action::ModalUp).unwrap();
        assert_eq!(
            app.modals.top(),
            Some(&Modal::LocationPermission { selected_index: 0 })
        );

        app.update(Action::ModalDown).unwrap();
        app.update(Action::ModalDown).unwrap();
        assert_eq!(
            app.modals.top(),
            Some(&Modal::LocationPermission { selected_index: 1 })
        );
    }

    #[test]
    fn test_location_picker_nudges_and_saves() {
        let (mut app, _dir) = test_app();
        app.screen = Screen::Compose;
        app.modals.push(Modal::LocationPicker {
            coordinate: Coordinate::new(10.0, 20.0),
        });

        assert_eq!(app.handle_key_event(key(KeyCode::Up)).unwrap(), None);
        let shifted = KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT);
        assert_eq!(app.handle_key_event(shifted).unwrap(), None);
        assert_eq!(
            app.modals.top(),
            Some(&Modal::LocationPicker {
                coordinate: Coordinate::new(11.0, 30.0)
            })
        );

        let saved = app.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            saved,
            Some(Action::SaveLocation(Coordinate::new(11.0, 30.0)))
        );
        app.update(Action::SaveLocation(Coordinate::new(11.0, 30.0)))
            .unwrap();
        assert!(app.modals.is_empty());
        assert_eq!(
            app.compose.resolved_coordinate(),
            Coordinate::new(11.0, 30.0)
        );
    }

    #[test]
    fn test_progress_blocks_keys_but_not_ctrl_c() {
        let (mut app, _dir) = test_app();
        app.modals.push(Modal::Progress {
            message: "Uploading submission...".to_string(),
        });

        assert_eq!(app.handle_key_event(key(KeyCode::Char('q'))).unwrap(), None);
        assert_eq!(app.handle_key_event(key(KeyCode::Esc)).unwrap(), None);

        let interrupt = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            app.handle_key_event(interrupt).unwrap(),
            Some(Action::ForceQuit)
        );
        app.update(Action::ForceQuit).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_setup_confirm_enters_running_mode() {
        let (mut app, _dir) = test_app();
        app.mode = AppMode::Setup;
        app.setup.config.server_url = "http://127.0.0.1:9".to_string();
        app.setup.complete = true;

        app.update(Action::SetupConfirm).unwrap();

        assert_eq!(app.mode, AppMode::Running);
        assert!(app.submissions_runner.is_busy());
    }
}
