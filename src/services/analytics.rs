//! Local analytics sink
//!
//! Fire-and-forget named events appended as JSON lines under the config
//! directory. Recording must never interrupt the user, so every failure
//! here is swallowed.

use crate::config::Config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsEvent {
    SubmissionSuccess,
    SubmissionUpdateLocation,
    SubmissionResetPhoto,
    FetchFailed,
}

#[derive(Debug, Serialize, Deserialize)]
struct EventRecord {
    event: AnalyticsEvent,
    at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

/// Append-only event recorder
pub struct LocalAnalytics {
    path: Option<PathBuf>,
}

impl Default for LocalAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalAnalytics {
    pub fn new() -> Self {
        Self {
            path: Config::config_dir().map(|dir| dir.join("events.log")),
        }
    }

    /// Recorder writing to an explicit file, for tests
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Record a named event
    pub fn record(&self, event: AnalyticsEvent) {
        self.write(event, None);
    }

    /// Record a named event with a free-text detail line
    pub fn record_detail(&self, event: AnalyticsEvent, detail: impl Into<String>) {
        self.write(event, Some(detail.into()));
    }

    fn write(&self, event: AnalyticsEvent, detail: Option<String>) {
        let Some(path) = &self.path else {
            return;
        };

        let record = EventRecord {
            event,
            at: Utc::now(),
            detail,
        };
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_append_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.log");
        let analytics = LocalAnalytics::with_path(path.clone());

        analytics.record(AnalyticsEvent::SubmissionSuccess);
        analytics.record_detail(AnalyticsEvent::FetchFailed, "submissions failed: timeout");

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: EventRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.event, AnalyticsEvent::SubmissionSuccess);
        assert_eq!(first.detail, None);

        let second: EventRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.event, AnalyticsEvent::FetchFailed);
        assert_eq!(second.detail.as_deref(), Some("submissions failed: timeout"));
    }

    #[test]
    fn test_event_names_are_snake_case() {
        let json = serde_json::to_string(&AnalyticsEvent::SubmissionUpdateLocation).unwrap();
        assert_eq!(json, "\"submission_update_location\"");

        let json = serde_json::to_string(&AnalyticsEvent::SubmissionResetPhoto).unwrap();
        assert_eq!(json, "\"submission_reset_photo\"");
    }

    #[test]
    fn test_recording_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("events.log");
        let analytics = LocalAnalytics::with_path(path.clone());

        analytics.record(AnalyticsEvent::SubmissionResetPhoto);
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_sink_is_silent() {
        // Opening a directory as a file fails; the recorder shrugs
        let dir = tempfile::tempdir().unwrap();
        let analytics = LocalAnalytics::with_path(dir.path().to_path_buf());
        analytics.record(AnalyticsEvent::SubmissionSuccess);
    }
}
