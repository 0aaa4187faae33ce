//! Monitor configuration: defaults, an optional `ron` file, then CLI overrides.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use monitor_client::ClientSettings;
use monitor_core::{Backoff, FormDefaults, PollPolicy};
use monitor_logging::monitor_info;
use serde::{Deserialize, Serialize};

use crate::cli::GlobalArgs;

pub const DEFAULT_CONFIG_FILE: &str = "translate-monitor.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BackoffConfig {
    Fixed,
    Exponential { factor: f64, max_interval_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub max_attempts: Option<u32>,
    pub backoff: BackoffConfig,
    pub request_timeout_ms: Option<u64>,
    pub connect_timeout_ms: u64,
    pub default_source_language: String,
    pub default_target_language: String,
    pub download_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        let form = FormDefaults::default();
        Self {
            server_url: client.base_url,
            poll_interval_ms: PollPolicy::default().interval.as_millis() as u64,
            max_attempts: None,
            backoff: BackoffConfig::Fixed,
            request_timeout_ms: None,
            connect_timeout_ms: client.connect_timeout.as_millis() as u64,
            default_source_language: form.source_language,
            default_target_language: form.target_language,
            download_dir: PathBuf::from("downloads"),
            log_file: PathBuf::from("translate-monitor.log"),
        }
    }
}

impl MonitorConfig {
    /// Loads `explicit`, or `./translate-monitor.ron` if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(explicit, Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Loads `explicit`, or `default_path` if it exists.
    ///
    /// A missing default file yields the built-in defaults; a missing explicit
    /// file is an error.
    pub fn load_from(explicit: Option<&Path>, default_path: &Path) -> Result<Self, ConfigError> {
        let path = explicit.unwrap_or(default_path).to_path_buf();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        let config = Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.clone(),
            message,
        })?;
        monitor_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        ron::from_str(content).map_err(|err| err.to_string())
    }

    pub fn apply_overrides(&mut self, args: &GlobalArgs) {
        if let Some(server) = &args.server {
            self.server_url = server.clone();
        }
        if let Some(interval_ms) = args.interval_ms {
            self.poll_interval_ms = interval_ms;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::Invalid(
                "max_attempts must be at least 1 when set".to_string(),
            ));
        }
        if let BackoffConfig::Exponential { factor, .. } = self.backoff {
            if !factor.is_finite() || factor < 1.0 {
                return Err(ConfigError::Invalid(format!(
                    "backoff factor must be a finite number >= 1.0, got {factor}"
                )));
            }
        }
        Ok(())
    }

    pub fn poll_policy(&self) -> PollPolicy {
        let backoff = match self.backoff {
            BackoffConfig::Fixed => Backoff::Fixed,
            BackoffConfig::Exponential {
                factor,
                max_interval_ms,
            } => Backoff::Exponential {
                factor,
                max_interval: Duration::from_millis(max_interval_ms),
            },
        };
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.max_attempts,
            backoff,
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.server_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn form_defaults(&self) -> FormDefaults {
        FormDefaults {
            source_language: self.default_source_language.clone(),
            target_language: self.default_target_language.clone(),
        }
    }
}
