use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::idle::DEFAULT_IDLE_THRESHOLD_MS;

pub const DEFAULT_COLLECTOR_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub collector_base_url: String,
    pub idle_threshold_ms: u64,
    pub tick_rate_ms: u64,
    pub request_timeout_ms: u64,
    pub telemetry_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            collector_base_url: DEFAULT_COLLECTOR_URL.to_string(),
            idle_threshold_ms: DEFAULT_IDLE_THRESHOLD_MS,
            tick_rate_ms: 100,
            request_timeout_ms: 2000,
            telemetry_enabled: true,
        }
    }
}

impl Config {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "formpilot") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("formpilot_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or malformed files yield the defaults
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "ignoring malformed config");
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

/// Default location of the diagnostic log file
pub fn default_log_path() -> PathBuf {
    ProjectDirs::from("", "", "formpilot")
        .map(|pd| pd.data_local_dir().join("formpilot.log"))
        .unwrap_or_else(|| PathBuf::from("formpilot.log"))
}
