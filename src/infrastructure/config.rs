//! Configuration infrastructure
//!
//! Contains configuration loading and management for ranking list crawls.
//!
//! Values are layered in this order, later layers winning:
//! 1. Built-in defaults (see [`defaults`])
//! 2. Optional config file, format chosen by extension
//! 3. Environment variables prefixed `ANIME_HARVESTER__`
//!    (`ANIME_HARVESTER__CRAWL__MAX_PAGES=20`)

#![allow(clippy::uninlined_format_args)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::info;

use crate::domain::crawl_state::check_crawl_preconditions;
use crate::infrastructure::http_client::HttpClientConfig;
use crate::infrastructure::parsing::ListingSelectors;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },

    #[error("Config file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Could not determine the user config directory")]
    NoConfigDir,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub crawl: CrawlConfig,
    pub http: HttpClientConfig,
    pub selectors: ListingSelectors,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

/// Crawl bounds and pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Upper bound on pages fetched in one crawl
    pub max_pages: u32,

    /// Pause before every fetch except the first, in seconds
    pub pause_seconds: f64,

    /// First listing page; its scheme and path also form the base for next links
    pub start_url: String,

    /// Ask the observer to clear its display between pages
    pub suppress_interactive_output: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for the log file. Defaults to `logs/` next to the executable.
    pub log_dir: Option<PathBuf>,

    pub file_name: String,
}

/// Where crawl results go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dataset_path: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: defaults::MAX_PAGES,
            pause_seconds: defaults::PAUSE_SECONDS,
            start_url: defaults::START_URL.to_string(),
            suppress_interactive_output: defaults::SUPPRESS_INTERACTIVE_OUTPUT,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(defaults::DATASET_PATH),
        }
    }
}

impl CrawlConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_crawl_preconditions(self.max_pages, self.pause_seconds, &self.start_url)
            .map_err(|message| ConfigError::Validation { message })
    }
}

impl AppConfig {
    /// Validate every section that has constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.crawl.validate()?;

        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                message: "http.timeout_seconds must be greater than 0".to_string(),
            });
        }

        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "http.user_agent must not be empty".to_string(),
            });
        }

        if self.output.dataset_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation {
                message: "output.dataset_path must not be empty".to_string(),
            });
        }

        if !self.logging.console_output && !self.logging.file_output {
            return Err(ConfigError::Validation {
                message: "logging needs console_output or file_output".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration manager for loading and saving settings
#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(defaults::APP_DIR_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Manager for the default config file location
    pub fn new() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_dir()?.join(defaults::CONFIG_FILE_NAME);
        Ok(Self { config_path })
    }

    /// Manager for an explicit config file
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration: defaults, then the file if present, then the environment
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(self.config_path.as_path()).required(false))
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        if self.config_path.exists() {
            info!("Loaded configuration from: {:?}", self.config_path);
        } else {
            info!("No configuration file at {:?}, using defaults", self.config_path);
        }
        Ok(config)
    }

    /// Save configuration to file as pretty JSON
    pub async fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let content = serde_json::to_string_pretty(config)?;

        fs::write(&self.config_path, content)
            .await
            .map_err(|source| ConfigError::Io {
                path: self.config_path.clone(),
                source,
            })?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Write the defaults when no config file exists yet, otherwise load it
    pub async fn initialize_on_first_run(&self) -> Result<AppConfig, ConfigError> {
        if self.config_path.exists() {
            return self.load_config();
        }

        info!("🎉 First run detected - initializing default configuration");
        let default_config = AppConfig::default();
        self.save_config(&default_config).await?;
        info!("✅ Initial configuration setup completed");
        Ok(default_config)
    }
}

/// Default configuration values
pub mod defaults {
    /// Default maximum pages to crawl
    pub const MAX_PAGES: u32 = 400;

    /// Default pause between page fetches in seconds
    pub const PAUSE_SECONDS: f64 = 6.0;

    /// Default first listing page
    pub const START_URL: &str = "https://myanimelist.net/topanime.php";

    pub const SUPPRESS_INTERACTIVE_OUTPUT: bool = true;

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    pub const USER_AGENT: &str = concat!("anime-rank-harvester/", env!("CARGO_PKG_VERSION"));

    pub const DATASET_PATH: &str = "anime_dataset.csv";

    // Logging
    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_FILE_NAME: &str = "anime-rank-harvester.log";

    // Locations
    pub const APP_DIR_NAME: &str = "anime-rank-harvester";
    pub const CONFIG_FILE_NAME: &str = "config.json";
    pub const ENV_PREFIX: &str = "ANIME_HARVESTER";
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.crawl.max_pages, 400);
        assert!((config.crawl.pause_seconds - 6.0).abs() < f64::EPSILON);
        assert_eq!(config.output.dataset_path, PathBuf::from("anime_dataset.csv"));
    }

    #[test]
    fn test_zero_pages_fails_validation() {
        let mut config = AppConfig::default();
        config.crawl.max_pages = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("absent.json"));
        let config = manager.load_config().unwrap();
        assert_eq!(config.crawl.start_url, defaults::START_URL);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "crawl": { "max_pages": 3, "pause_seconds": 0.5 } }"#).unwrap();

        let config = ConfigManager::with_path(&path).load_config().unwrap();
        assert_eq!(config.crawl.max_pages, 3);
        assert!((config.crawl.pause_seconds - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.crawl.start_url, defaults::START_URL);
        assert_eq!(config.selectors, ListingSelectors::default());
    }

    #[tokio::test]
    async fn test_first_run_writes_defaults_then_loads_them() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join("config.json"));

        let created = manager.initialize_on_first_run().await.unwrap();
        assert!(manager.config_path().exists());

        let loaded = manager.initialize_on_first_run().await.unwrap();
        assert_eq!(created, loaded);
    }
}
