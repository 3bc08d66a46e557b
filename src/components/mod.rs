//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod alert_dialog;
pub mod compose;
pub mod detail;
pub mod help_dialog;
pub mod home;
pub mod layout;
pub mod location_picker;
pub mod permission_dialog;
pub mod photo_browser_dialog;
pub mod photo_source_dialog;
pub mod progress_dialog;
pub mod quit_dialog;
pub mod setup;
pub mod splash;

pub use alert_dialog::AlertDialog;
pub use compose::ComposeComponent;
pub use detail::{DetailComponent, PreviewState};
pub use help_dialog::HelpDialog;
pub use home::{draw_browse_screen, BrowseRenderContext, HomeComponent};
pub use layout::{calculate_main_layout, centered_popup};
pub use location_picker::LocationPickerDialog;
pub use permission_dialog::PermissionDialog;
pub use photo_browser_dialog::PhotoBrowserDialog;
pub use photo_source_dialog::PhotoSourceDialog;
pub use progress_dialog::ProgressDialog;
pub use quit_dialog::QuitDialog;
pub use setup::SetupComponent;
pub use splash::SplashComponent;
