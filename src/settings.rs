//! User settings stored as settings.json in the app data directory

use crate::constants::{QUOTES_ENDPOINT, REMOTE_FETCH_LIMIT, REQUEST_TIMEOUT_SECS, SYNC_INTERVAL_SECS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Server sync
    pub remote_endpoint: String,
    pub fetch_limit: usize,
    pub sync_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub auto_sync: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            remote_endpoint: QUOTES_ENDPOINT.to_string(),
            fetch_limit: REMOTE_FETCH_LIMIT,
            sync_interval_secs: SYNC_INTERVAL_SECS,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            auto_sync: true,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    /// Poll interval, never below one second
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load(temp.path());
        assert_eq!(settings.remote_endpoint, QUOTES_ENDPOINT);
        assert_eq!(settings.sync_interval(), Duration::from_secs(30));
        assert!(settings.auto_sync);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("settings.json"),
            r#"{"auto_sync": false, "fetch_limit": 2}"#,
        )
        .unwrap();

        let settings = Settings::load(temp.path());
        assert!(!settings.auto_sync);
        assert_eq!(settings.fetch_limit, 2);
        assert_eq!(settings.request_timeout_secs, REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let settings = Settings {
            window_w: Some(640.0),
            sync_interval_secs: 0,
            ..Default::default()
        };
        settings.save(temp.path());

        let loaded = Settings::load(temp.path());
        assert_eq!(loaded.window_w, Some(640.0));
        assert_eq!(loaded.sync_interval(), Duration::from_secs(1));
    }
}
