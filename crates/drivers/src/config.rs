use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use meme_studio_domain::StyleStrength;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_ENV_VAR: &str = "MEME_STUDIO_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog_path: String,
    pub state_path: String,
    /// Partition key for persisted style state, like a browser origin.
    pub origin: String,
    pub api_base_url: String,
    pub http_timeout_secs: u64,
    pub stylize_timeout_secs: u64,
    pub default_strength: f32,
    pub style_threads: Option<usize>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: "catalog.sqlite3".to_string(),
            state_path: "state.sqlite3".to_string(),
            origin: "http://localhost:5000".to_string(),
            api_base_url: "http://localhost:5000".to_string(),
            http_timeout_secs: 30,
            stylize_timeout_secs: 120,
            default_strength: 1.0,
            style_threads: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `explicit`, else the file named by `MEME_STUDIO_CONFIG`, else
    /// falls back to defaults. Missing keys take their default value.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
        let Some(path) = path else {
            return Ok(Self::default());
        };

        debug!("loading config from {}", path.display());
        let json = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse { path, source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strength()?;
        if self.stylize_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "stylize_timeout_secs must be positive".to_string(),
            ));
        }
        if self.origin.trim().is_empty() {
            return Err(ConfigError::Invalid("origin must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn strength(&self) -> Result<StyleStrength, ConfigError> {
        StyleStrength::new(self.default_strength)
            .map_err(|error| ConfigError::Invalid(error.to_string()))
    }

    pub fn stylize_timeout(&self) -> Duration {
        Duration::from_secs(self.stylize_timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
