//! Data models for street-art submissions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
        .clamped()
    }

    /// Clamp into the valid coordinate space
    pub fn clamped(self) -> Self {
        Self {
            latitude: self.latitude.clamp(-90.0, 90.0),
            longitude: self.longitude.clamp(-180.0, 180.0),
        }
    }

    /// Offset by the given deltas, staying inside the valid space
    pub fn nudged(self, dlat: f64, dlon: f64) -> Self {
        Self {
            latitude: self.latitude + dlat,
            longitude: self.longitude + dlon,
        }
        .clamped()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Moderation state of a submission, as reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn label(&self) -> &str {
        match self {
            SubmissionStatus::Pending => "Pending Review",
            SubmissionStatus::Approved => "Approved",
            SubmissionStatus::Rejected => "Rejected",
        }
    }
}

/// A street-art record fetched from the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub thumb_url: Option<String>,
}

impl Submission {
    /// Title for list rows, falling back to a placeholder
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    /// Artist line for list rows
    pub fn display_artist(&self) -> &str {
        self.artist.as_deref().unwrap_or("Unknown artist")
    }
}

/// Transient value packaged from the form at submit time
///
/// Built fresh for each submit attempt and dropped once the request
/// completes or fails. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionUpload {
    /// JPEG-encoded photo bytes
    pub image: Vec<u8>,
    pub coordinate: Coordinate,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub note: Option<String>,
}

/// Collapse a free-text field to its meaningful content
///
/// Surrounding whitespace is trimmed; a field that is empty after
/// trimming is treated as absent.
pub fn normalize_field(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_field_trims_and_collapses() {
        assert_eq!(normalize_field("  Mural  "), Some("Mural".to_string()));
        assert_eq!(normalize_field("Mural"), Some("Mural".to_string()));
        assert_eq!(normalize_field(""), None);
        assert_eq!(normalize_field("   "), None);
        assert_eq!(normalize_field(" \t\n "), None);
    }

    #[test]
    fn test_coordinate_clamping() {
        let c = Coordinate::new(95.0, -200.0);
        assert_eq!(c.latitude, 90.0);
        assert_eq!(c.longitude, -180.0);

        let c = Coordinate::new(37.0, -122.0);
        assert_eq!(c.latitude, 37.0);
        assert_eq!(c.longitude, -122.0);
    }

    #[test]
    fn test_coordinate_nudge_stays_in_range() {
        let c = Coordinate::new(89.5, 179.5).nudged(1.0, 1.0);
        assert_eq!(c.latitude, 90.0);
        assert_eq!(c.longitude, 180.0);

        let c = Coordinate::new(0.0, 0.0).nudged(-2.5, 5.0);
        assert_eq!(c.latitude, -2.5);
        assert_eq!(c.longitude, 5.0);
    }

    #[test]
    fn test_coordinate_display() {
        let c = Coordinate::new(37.0, -122.0);
        assert_eq!(c.to_string(), "37.0000, -122.0000");
    }

    #[test]
    fn test_submission_deserializes_sparse_fields() {
        let json = r#"{
            "id": 7,
            "coordinate": {"latitude": 37.0, "longitude": -122.0},
            "created_at": "2018-04-30T12:00:00Z"
        }"#;

        let submission: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.id, 7);
        assert_eq!(submission.title, None);
        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert_eq!(submission.display_title(), "Untitled");
        assert_eq!(submission.display_artist(), "Unknown artist");
    }

    #[test]
    fn test_submission_status_parsing() {
        let status: SubmissionStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(status, SubmissionStatus::Approved);
        assert_eq!(status.label(), "Approved");
    }
}
