//! Configuration loading and validation for AZCC.
//!
//! Settings are resolved once at startup from two layers:
//!
//! 1. An optional TOML file (`~/.azcc/config.toml`, or the path in `AZCC_CONFIG`)
//! 2. Environment variables, which override the file
//!
//! The API key and endpoint are mandatory; without them no request can be
//! built, so resolution fails and the process must not continue.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const ENV_HISTORY_FILE: &str = "AZCC_HISTORY_FILE";
pub const ENV_MAX_HISTORY: &str = "AZCC_MAX_HISTORY";
pub const ENV_TEMPERATURE: &str = "AZCC_TEMPERATURE";
pub const ENV_CONFIG_FILE: &str = "AZCC_CONFIG";

/// The resolved, read-only configuration.
#[derive(Clone, Serialize)]
pub struct AppConfig {
    /// Azure OpenAI API key
    pub api_key: String,

    /// Azure OpenAI resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,

    /// Deployment name to send requests to
    pub deployment: String,

    /// REST API version query parameter
    pub api_version: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Where conversation history is persisted
    pub history_file: PathBuf,

    /// Maximum number of turns kept in the history file
    pub max_history: usize,
}

fn default_deployment() -> String {
    "gpt-4".into()
}
fn default_api_version() -> String {
    "2023-05-15".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_history() -> usize {
    10
}
fn default_history_file() -> PathBuf {
    home_dir().join(".azcc_history")
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("temperature", &self.temperature)
            .field("history_file", &self.history_file)
            .field("max_history", &self.max_history)
            .finish()
    }
}

/// The optional file layer. Every field may be omitted.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_history: Option<usize>,
}

impl std::fmt::Debug for FileConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("temperature", &self.temperature)
            .field("history_file", &self.history_file)
            .field("max_history", &self.max_history)
            .finish()
    }
}

impl FileConfig {
    /// Load the file layer from `path`. A missing file is an empty layer.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file found at {}, using environment only", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl AppConfig {
    /// Resolve configuration from the process environment and the config file.
    pub fn load() -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();
        let file_path = env(ENV_CONFIG_FILE)
            .filter(|p| !p.trim().is_empty())
            .map(|p| expand_home(&p))
            .unwrap_or_else(Self::default_config_path);
        let file = FileConfig::load_from(&file_path)?;
        Self::resolve(file, env)
    }

    /// Resolve configuration from a file layer and an environment lookup.
    ///
    /// Environment values win over file values; empty strings count as unset.
    pub fn resolve<F>(file: FileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = env(ENV_API_KEY).or(file.api_key).filter(|v| !v.trim().is_empty());
        let endpoint = env(ENV_ENDPOINT).or(file.endpoint).filter(|v| !v.trim().is_empty());

        let (api_key, endpoint) = match (api_key, endpoint) {
            (Some(key), Some(endpoint)) => (key, endpoint.trim().to_string()),
            (key, endpoint) => {
                let mut missing = Vec::new();
                if key.is_none() {
                    missing.push(ENV_API_KEY);
                }
                if endpoint.is_none() {
                    missing.push(ENV_ENDPOINT);
                }
                return Err(ConfigError::MissingCredentials(missing.join(", ")));
            }
        };

        let temperature = match env(ENV_TEMPERATURE) {
            Some(raw) => parse_value(ENV_TEMPERATURE, &raw)?,
            None => file.temperature.unwrap_or_else(default_temperature),
        };

        let max_history = match env(ENV_MAX_HISTORY) {
            Some(raw) => parse_value(ENV_MAX_HISTORY, &raw)?,
            None => file.max_history.unwrap_or_else(default_max_history),
        };

        let history_file = env(ENV_HISTORY_FILE)
            .or(file.history_file)
            .map(|p| expand_home(&p))
            .unwrap_or_else(default_history_file);

        let config = Self {
            api_key,
            endpoint,
            deployment: env(ENV_DEPLOYMENT)
                .or(file.deployment)
                .unwrap_or_else(default_deployment),
            api_version: env(ENV_API_VERSION)
                .or(file.api_version)
                .unwrap_or_else(default_api_version),
            temperature,
            history_file,
            max_history,
        };

        config.validate()?;
        tracing::debug!(config = ?config, "Configuration resolved");
        Ok(config)
    }

    /// Get the configuration directory path (`~/.azcc`).
    pub fn config_dir() -> PathBuf {
        home_dir().join(".azcc")
    }

    /// Default location of the optional config file.
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_history == 0 {
            return Err(ConfigError::ValidationError(
                "max_history must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Get the user's home directory.
fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Azure OpenAI API credentials not found (missing: {0})")]
    MissingCredentials(String),

    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
