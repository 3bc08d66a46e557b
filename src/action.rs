//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::submission::Coordinate;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for animations/updates
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,
    /// Transition from splash to main app
    SplashComplete,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move to next item in list
    NextItem,
    /// Move to previous item in list
    PrevItem,
    /// Jump to first item
    FirstItem,
    /// Jump to last item
    LastItem,
    /// Move to next tab
    NextTab,
    /// Move to previous tab
    PrevTab,

    // ─────────────────────────────────────────────────────────────────────────
    // Browse Screen
    // ─────────────────────────────────────────────────────────────────────────
    /// Fetch the active tab's collection from the service
    Refresh,
    /// Open the detail screen for the selected submission
    OpenDetail,
    /// Return from the detail screen
    CloseDetail,
    /// Open the submission form
    OpenCompose,

    // ─────────────────────────────────────────────────────────────────────────
    // Submission Form
    // ─────────────────────────────────────────────────────────────────────────
    /// Open the photo source sheet
    OpenPhotoSource,
    /// Open the photo library browser
    OpenPhotoBrowser,
    /// Run the configured capture command
    CapturePhoto,
    /// Remove the attached photo and its coordinate
    ResetPhoto,
    /// Open the coordinate picker
    OpenLocationPicker,
    /// Adopt a coordinate chosen in the picker
    SaveLocation(Coordinate),
    /// Start the one-shot device location lookup
    RequestLocation,
    /// Location permission prompt answered with allow
    LocationPermissionGranted,
    /// Location permission prompt answered with deny
    LocationPermissionDenied,
    /// Validate the form and start the upload
    ComposeSubmit,
    /// Abandon the form without submitting
    ComposeCancel,
    /// Upload finished successfully; leave the form
    ComposeComplete,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,
    /// Navigate up in modal (e.g., previous option)
    ModalUp,
    /// Navigate down in modal (e.g., next option)
    ModalDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Setup Wizard
    // ─────────────────────────────────────────────────────────────────────────
    /// Confirm setup configuration
    SetupConfirm,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::SplashComplete => write!(f, "SplashComplete"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::FirstItem => write!(f, "FirstItem"),
            Action::LastItem => write!(f, "LastItem"),
            Action::NextTab => write!(f, "NextTab"),
            Action::PrevTab => write!(f, "PrevTab"),
            Action::Refresh => write!(f, "Refresh"),
            Action::OpenDetail => write!(f, "OpenDetail"),
            Action::CloseDetail => write!(f, "CloseDetail"),
            Action::OpenCompose => write!(f, "OpenCompose"),
            Action::OpenPhotoSource => write!(f, "OpenPhotoSource"),
            Action::OpenPhotoBrowser => write!(f, "OpenPhotoBrowser"),
            Action::CapturePhoto => write!(f, "CapturePhoto"),
            Action::ResetPhoto => write!(f, "ResetPhoto"),
            Action::OpenLocationPicker => write!(f, "OpenLocationPicker"),
            Action::SaveLocation(c) => write!(f, "SaveLocation({})", c),
            Action::RequestLocation => write!(f, "RequestLocation"),
            Action::LocationPermissionGranted => write!(f, "LocationPermissionGranted"),
            Action::LocationPermissionDenied => write!(f, "LocationPermissionDenied"),
            Action::ComposeSubmit => write!(f, "ComposeSubmit"),
            Action::ComposeCancel => write!(f, "ComposeCancel"),
            Action::ComposeComplete => write!(f, "ComposeComplete"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
            Action::SetupConfirm => write!(f, "SetupConfirm"),
        }
    }
}
