//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `DomainState` - Fetched submissions and favorites
//! - `ComposeForm` - Upload form state
//! - `ContentList` - Row/section model driving the list screens
//! - `ModalStack` - Modal overlay management

pub mod compose;
pub mod content;
pub mod domain;
pub mod modal;
pub mod submission;
pub mod ui;

// Re-export commonly used types
pub use compose::{ComposeForm, PhotoAttachment};
pub use content::{ContentList, ContentRow, ContentSection};
pub use modal::{Modal, ModalStack, PhotoSourceOption};
pub use submission::{Coordinate, Submission, SubmissionStatus, SubmissionUpload};
pub use ui::{AppMode, Screen, Tab};
