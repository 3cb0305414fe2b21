//! Client configuration loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::{ProjectDirs, UserDirs};
use serde::Deserialize;

use crate::settings::Settings;
use crate::{Result, SeekError};

/// Backend address used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "seek.toml";

/// Client configuration
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the search backend
    pub endpoint: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Quiet period before a search-as-you-type query is sent
    pub debounce_ms: u64,
    /// Where downloaded files are saved
    pub download_dir: PathBuf,
    /// Directory for rolling log files; stderr only when unset
    pub log_dir: Option<PathBuf>,
    /// Initial search facets
    pub settings: Settings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let download_dir = UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 30,
            debounce_ms: 100,
            download_dir,
            log_dir: None,
            settings: Settings::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the platform config directory, or return
    /// defaults if no config file exists there.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from an explicit file.
    ///
    /// # Errors
    /// Returns error if the file can't be read or isn't valid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SeekError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: ClientConfig = toml::from_str(&text).map_err(|e| {
            SeekError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Platform config file location, e.g. `~/.config/seek/seek.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "seek").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
