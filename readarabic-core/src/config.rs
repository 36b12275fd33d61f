//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "readarabic.yml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Main configuration struct matching readarabic.yml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub subscription: SubscriptionConfig,

    #[serde(default)]
    pub google: GoogleConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    String::from("https://www.readarabic.io")
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Session, dictionary and legacy translations live here
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".readarabic")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    #[serde(default)]
    pub monthly_plan_id: Option<String>,

    #[serde(default)]
    pub annual_plan_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleConfig {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub redirect_uri: Option<String>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Like `from_file`, but a missing file yields the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self {
                config_path: Some(path.to_path_buf()),
                ..Self::default()
            });
        }
        Self::from_file(path)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        // An empty document parses to unit; treat it as all defaults
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "api.base_url",
                reason: format!("expected an http(s) URL, got {:?}", self.api.base_url),
            });
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "api.timeout_secs",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Get the data directory, resolved relative to config file
    pub fn data_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.data_dir)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// API base URL without a trailing slash
    pub fn api_base_url(&self) -> String {
        normalize_api_url(&self.api.base_url)
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(parent) = self.config_path.as_deref().and_then(Path::parent) {
            parent.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Get a nested config value using dotted path (e.g., "api.base_url")
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["api", "base_url"] => Some(self.api.base_url.clone()),
            ["api", "timeout_secs"] => Some(self.api.timeout_secs.to_string()),
            ["paths", "data_dir"] => Some(self.data_dir().display().to_string()),
            ["subscription", "monthly_plan_id"] => self.subscription.monthly_plan_id.clone(),
            ["subscription", "annual_plan_id"] => self.subscription.annual_plan_id.clone(),
            ["google", "client_id"] => self.google.client_id.clone(),
            ["google", "redirect_uri"] => self.google.redirect_uri.clone(),
            _ => None,
        }
    }
}

/// Strip whitespace and trailing slashes from an API root
pub fn normalize_api_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://www.readarabic.io");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.data_dir(), PathBuf::from(".readarabic"));
        assert!(config.subscription.monthly_plan_id.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "api:\n  base_url: http://localhost:5000/\nsubscription:\n  annual_plan_id: P-2\n",
        )
        .unwrap();
        assert_eq!(config.api_base_url(), "http://localhost:5000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.get("subscription.annual_plan_id"), Some("P-2".into()));
        assert_eq!(config.get("subscription.monthly_plan_id"), None);
    }

    #[test]
    fn test_get_nested_value() {
        let config = Config::from_yaml("api:\n  timeout_secs: 5\ngoogle:\n  client_id: abc\n").unwrap();
        assert_eq!(config.get("api.timeout_secs"), Some("5".into()));
        assert_eq!(config.get("google.client_id"), Some("abc".into()));
        assert_eq!(config.get("nonexistent.key"), None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Config::from_yaml("api:\n  base_url: ftp://x\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "api.base_url", .. }));
        let err = Config::from_yaml("api:\n  timeout_secs: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "api.timeout_secs", .. }));
    }

    #[test]
    fn test_data_dir_is_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "paths:\n  data_dir: state\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.data_dir(), dir.path().join("state"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.yml")).unwrap();
        assert_eq!(config.data_dir(), dir.path().join(".readarabic"));
    }
}
