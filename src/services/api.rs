//! HTTP client for the submission service
//!
//! All methods block and are only ever called from background task
//! threads; results come back to the main sequence through the task
//! runner channels.

use crate::model::submission::{Submission, SubmissionUpload};
use reqwest::blocking::multipart;
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

const USER_AGENT: &str = concat!("mural-tui/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Mural submission API
///
/// Cheap to clone; clones share the underlying connection pool, so each
/// worker thread gets its own handle.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::blocking::Client,
    base_url: String,
    device_id: String,
}

impl ApiClient {
    pub fn new(base_url: &str, device_id: Uuid) -> Result<Self, String> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            device_id: device_id.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Upload a new submission as a multipart form
    ///
    /// Optional fields are omitted from the form entirely rather than
    /// sent empty.
    pub fn upload(&self, upload: &SubmissionUpload) -> Result<Submission, String> {
        let image = multipart::Part::bytes(upload.image.clone())
            .file_name("photo.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| format!("Failed to build image part: {}", e))?;

        let mut form = multipart::Form::new()
            .part("image", image)
            .text("latitude", upload.coordinate.latitude.to_string())
            .text("longitude", upload.coordinate.longitude.to_string());

        if let Some(title) = &upload.title {
            form = form.text("title", title.clone());
        }
        if let Some(artist) = &upload.artist {
            form = form.text("artist", artist.clone());
        }
        if let Some(note) = &upload.note {
            form = form.text("note", note.clone());
        }

        let response = self
            .client
            .post(self.endpoint("api/submissions"))
            .header("X-Device-Id", &self.device_id)
            .multipart(form)
            .send()
            .map_err(|e| format!("Upload failed: {}", e))?;

        Self::parse_json(response)
    }

    /// Fetch the user's favorited submissions
    pub fn favorites(&self) -> Result<Vec<Submission>, String> {
        self.get_json("api/favorites")
    }

    /// Fetch the user's own submissions
    pub fn my_submissions(&self) -> Result<Vec<Submission>, String> {
        self.get_json("api/submissions")
    }

    /// Fetch raw image bytes from an absolute URL
    pub fn fetch_image(&self, url: &str) -> Result<Vec<u8>, String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| format!("Image fetch failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Server returned {}", status));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| format!("Image fetch failed: {}", e))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let response = self
            .client
            .get(self.endpoint(path))
            .header("X-Device-Id", &self.device_id)
            .send()
            .map_err(|e| format!("Request failed: {}", e))?;

        Self::parse_json(response)
    }

    fn parse_json<T: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T, String> {
        let status = response.status();
        if !status.is_success() {
            return Err(format!("Server returned {}", status));
        }

        response
            .json::<T>()
            .map_err(|e| format!("Invalid server response: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_cleanly() {
        let client = ApiClient::new("https://mural.example.com/", Uuid::new_v4()).unwrap();
        assert_eq!(
            client.endpoint("api/favorites"),
            "https://mural.example.com/api/favorites"
        );
        assert_eq!(
            client.endpoint("/api/submissions"),
            "https://mural.example.com/api/submissions"
        );
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let client = ApiClient::new("https://mural.example.com", Uuid::new_v4()).unwrap();
        assert_eq!(
            client.endpoint("api/favorites"),
            "https://mural.example.com/api/favorites"
        );
    }
}
