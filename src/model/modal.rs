//! Modal stack for managing overlays
//!
//! Replaces per-overlay boolean flags with an enum-based stack. Only the
//! top modal is drawn and receives input, which is what makes the
//! progress overlay blocking: while it is on top, no other action can
//! fire. Modals underneath keep their state and reappear when the top
//! one is popped.

use super::submission::Coordinate;
use std::path::PathBuf;

/// Choices offered by the photo source sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSourceOption {
    Camera,
    Library,
    RemovePhoto,
}

impl PhotoSourceOption {
    pub fn label(&self) -> &str {
        match self {
            PhotoSourceOption::Camera => "Take Photo",
            PhotoSourceOption::Library => "Choose from Library",
            PhotoSourceOption::RemovePhoto => "Remove Photo",
        }
    }
}

/// A modal overlay displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Photo source sheet; options are fixed when the sheet opens
    PhotoSource {
        options: Vec<PhotoSourceOption>,
        selected_index: usize,
    },
    /// File picker over the configured photo directory
    PhotoBrowser {
        files: Vec<PathBuf>,
        selected_index: usize,
    },
    /// One-time device location permission prompt
    LocationPermission { selected_index: usize },
    /// Coordinate pick with a movable pin
    LocationPicker { coordinate: Coordinate },
    /// Blocking informational alert
    Alert { title: String, message: String },
    /// Blocking progress overlay shown while a request is in flight
    Progress { message: String },
    /// Help dialog showing all keyboard shortcuts
    Help { scroll_offset: usize },
}

/// A stack of modal overlays
///
/// Only the top modal is drawn and receives input; the rest wait
/// underneath until it is popped.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    /// Create a new empty modal stack
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Push a modal onto the stack
    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    /// Pop the top modal from the stack
    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    /// Get a reference to the top modal without removing it
    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    /// Get a mutable reference to the top modal
    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.stack.last_mut()
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::QuitConfirm);
        assert!(stack.top().is_some());

        stack.push(Modal::Help { scroll_offset: 0 });

        let top = stack.pop();
        assert_eq!(top, Some(Modal::Help { scroll_offset: 0 }));

        let top = stack.pop();
        assert_eq!(top, Some(Modal::QuitConfirm));
        assert!(stack.top().is_none());
    }

    #[test]
    fn test_modal_stack_top() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::QuitConfirm);
        assert_eq!(stack.top(), Some(&Modal::QuitConfirm));

        stack.push(Modal::LocationPermission { selected_index: 0 });
        assert_eq!(
            stack.top(),
            Some(&Modal::LocationPermission { selected_index: 0 })
        );
    }

    #[test]
    fn test_modal_stack_top_mut() {
        let mut stack = ModalStack::new();
        stack.push(Modal::LocationPicker {
            coordinate: Coordinate::new(37.0, -122.0),
        });

        if let Some(Modal::LocationPicker { coordinate }) = stack.top_mut() {
            *coordinate = coordinate.nudged(1.0, 0.0);
        }

        assert_eq!(
            stack.top(),
            Some(&Modal::LocationPicker {
                coordinate: Coordinate::new(38.0, -122.0)
            })
        );
    }
}
