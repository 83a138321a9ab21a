use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::journal::ServiceConfig;

/// Environment variable that overrides the service URL
pub const SERVICE_URL_ENV: &str = "CHECKIN_SERVICE_URL";

/// Application settings, read from `config.json` in the platform config dir
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the journal service lives
    pub service_url: String,

    /// Per-request timeout in seconds. Unset means no timeout.
    pub request_timeout_secs: Option<u64>,

    /// How long a toast stays on screen
    pub toast_lifetime_secs: f64,

    pub dark_mode: bool,

    /// Initial window size
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8000".to_string(),
            request_timeout_secs: None,
            toast_lifetime_secs: 5.0,
            dark_mode: true,
            window_width: 900.0,
            window_height: 760.0,
        }
    }
}

impl AppConfig {
    /// Platform location of the config file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "checkin").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) => Self::load_from(&path)?,
            None => {
                debug!("No config directory on this platform, using defaults");
                Self::default()
            }
        };
        config.apply_env(std::env::var(SERVICE_URL_ENV).ok());
        Ok(config)
    }

    /// Read a config file. A missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn apply_env(&mut self, service_url: Option<String>) {
        if let Some(url) = service_url.filter(|url| !url.trim().is_empty()) {
            debug!("{} overrides service URL", SERVICE_URL_ENV);
            self.service_url = url.trim().to_string();
        }
    }

    pub fn service(&self) -> ServiceConfig {
        ServiceConfig {
            base_url: self.service_url.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}
