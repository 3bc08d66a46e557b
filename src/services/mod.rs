//! External service interactions
//!
//! This module contains services for interacting with external systems:
//! - The submission service HTTP API
//! - Photo loading, capture, and preparation
//! - Photo library directory scanning
//! - Device location lookup
//! - Local analytics recording
//! - Background task execution

pub mod analytics;
pub mod api;
pub mod library;
pub mod location;
pub mod photo;
pub mod task;

pub use analytics::{AnalyticsEvent, LocalAnalytics};
pub use api::ApiClient;
pub use library::list_photos;
pub use location::current_location;
pub use photo::{capture_photo, load_photo};
pub use task::TaskRunner;
