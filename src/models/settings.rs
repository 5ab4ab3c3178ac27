//! Settings Models
//!
//! Application configuration and settings data structures.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVICE_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Application configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the drawing/materials service
    #[serde(default = "default_service_base_url")]
    pub service_base_url: String,
    /// Ceiling for every outbound request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Backend-side output folder. When set, generated drawings are kept on
    /// the service and addressed by real paths.
    #[serde(default)]
    pub project_folder: Option<String>,
    /// Where downloaded files are written. Defaults to the platform download dir.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

fn default_service_base_url() -> String {
    DEFAULT_SERVICE_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_base_url: default_service_base_url(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            project_folder: None,
            download_dir: None,
        }
    }
}

/// Settings update request (partial update)
///
/// An empty string for `project_folder` clears it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub service_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub project_folder: Option<String>,
    pub download_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(url) = update.service_base_url {
            self.service_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = update.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(folder) = update.project_folder {
            let folder = folder.trim();
            self.project_folder = if folder.is_empty() {
                None
            } else {
                Some(folder.to_string())
            };
        }
        if let Some(dir) = update.download_dir {
            self.download_dir = Some(dir);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.service_base_url.starts_with("http://")
            || self.service_base_url.starts_with("https://"))
        {
            return Err(format!(
                "Invalid service_base_url: {}. Must start with http:// or https://",
                self.service_base_url
            ));
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(format!(
                "request_timeout_secs must be between 1 and {}",
                MAX_REQUEST_TIMEOUT_SECS
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
