use crate::model::submission::Coordinate;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Stored decision from the device location permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationPermission {
    /// Never asked; the prompt is shown on first use
    #[default]
    Unset,
    Authorized,
    Denied,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the submission service
    pub server_url: String,
    /// Stable identity sent with every API request
    pub device_id: Uuid,
    /// Directory scanned by the photo browser
    pub photo_dir: String,
    /// External command that captures a photo to the path given as its
    /// last argument; camera support is "available" when set
    #[serde(default)]
    pub capture_command: Option<String>,
    /// Fallback coordinate when no photo location was resolved
    pub default_latitude: f64,
    pub default_longitude: f64,
    #[serde(default)]
    pub location_permission: LocationPermission,
}

impl Default for Config {
    fn default() -> Self {
        let photo_dir = env::var("HOME")
            .map(|home| format!("{}/Pictures", home))
            .unwrap_or_else(|_| "Pictures".to_string());

        Self {
            server_url: String::new(),
            device_id: Uuid::new_v4(),
            photo_dir,
            capture_command: None,
            default_latitude: 18.4655,
            default_longitude: -66.1057,
            location_permission: LocationPermission::Unset,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".mural-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn default_coordinate(&self) -> Coordinate {
        Coordinate::new(self.default_latitude, self.default_longitude)
    }

    /// Camera availability in the source sheet
    pub fn camera_available(&self) -> bool {
        self.capture_command
            .as_deref()
            .is_some_and(|cmd| !cmd.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_availability() {
        let mut config = Config::default();
        assert!(!config.camera_available());

        config.capture_command = Some("  ".to_string());
        assert!(!config.camera_available());

        config.capture_command = Some("imagesnap".to_string());
        assert!(config.camera_available());
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config {
            server_url: "https://mural.example.com".to_string(),
            ..Config::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.server_url, config.server_url);
        assert_eq!(parsed.device_id, config.device_id);
        assert_eq!(parsed.location_permission, LocationPermission::Unset);
    }

    #[test]
    fn test_permission_survives_missing_field() {
        // Configs written before the permission prompt existed
        let json = r#"{
            "server_url": "https://mural.example.com",
            "device_id": "6f7f9a4e-52d4-4d1d-9a0e-1c2b3d4e5f60",
            "photo_dir": "/tmp/photos",
            "default_latitude": 18.4655,
            "default_longitude": -66.1057
        }"#;

        let parsed: Config = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.location_permission, LocationPermission::Unset);
        assert!(parsed.capture_command.is_none());
    }
}
