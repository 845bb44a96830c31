//! Configuration management for the anime-sheets tools.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::Backoff;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Spreadsheet merge settings
    #[serde(default)]
    pub merge: MergeConfig,

    /// Retry settings
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Spreadsheet merge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Folder holding the workbooks to merge (relative to data directory or absolute)
    pub input_dir: String,

    /// Merged workbook path (relative to data directory or absolute)
    pub output_file: String,
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts before giving up
    pub max_attempts: u32,

    /// Time unit of the backoff, in milliseconds
    pub base_delay_ms: u64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            input_dir: "example_data".to_string(),
            output_file: "combined_sheets.xlsx".to_string(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay_ms: 1000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: true,
                json_format: false,
            },
            merge: MergeConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.logging.log_dir)
    }

    /// Get the folder whose workbooks get merged
    pub fn merge_input_dir(&self) -> PathBuf {
        self.resolve(&self.merge.input_dir)
    }

    /// Get the merged workbook path
    pub fn merge_output_file(&self) -> PathBuf {
        self.resolve(&self.merge.output_file)
    }

    /// Build the backoff policy from the retry settings
    pub fn backoff(&self) -> Backoff {
        Backoff {
            max_attempts: self.retry.max_attempts,
            base_delay: Duration::from_millis(self.retry.base_delay_ms),
        }
    }

    fn resolve(&self, value: &str) -> PathBuf {
        let path = Path::new(value);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir().join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.root_dir, "data");
        assert_eq!(config.merge.input_dir, "example_data");
        assert_eq!(config.retry.max_attempts, 10);
        assert_eq!(config.retry.base_delay_ms, 1000);
    }

    #[test]
    fn test_save_and_load_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let mut original_config = Config::default();
        original_config.merge.output_file = "merged.xlsx".to_string();
        original_config.save(&config_path)?;

        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path)?;
        assert_eq!(loaded_config.data.root_dir, original_config.data.root_dir);
        assert_eq!(loaded_config.merge.output_file, "merged.xlsx");

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        // Should return default config without error
        assert_eq!(config.data.root_dir, "data");
    }

    #[test]
    fn test_missing_sections_use_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[data]
root_dir = "/srv/anime"

[logging]
log_dir = "logs"
default_level = "debug"
console = true
file = false
json_format = false
"#,
        )?;

        let config = Config::from_file(&config_path)?;
        assert_eq!(config.logging.default_level, "debug");
        assert_eq!(config.retry.max_attempts, 10);
        assert_eq!(
            config.merge_input_dir(),
            PathBuf::from("/srv/anime/example_data")
        );

        Ok(())
    }

    #[test]
    fn test_path_resolution() {
        let mut config = Config::default();

        assert!(config.log_dir().ends_with("data/logs"));
        assert!(config.merge_output_file().ends_with("data/combined_sheets.xlsx"));

        config.merge.output_file = "/tmp/out.xlsx".to_string();
        assert_eq!(config.merge_output_file(), PathBuf::from("/tmp/out.xlsx"));
    }

    #[test]
    fn test_backoff_from_config() {
        let mut config = Config::default();
        config.retry.base_delay_ms = 5;
        config.retry.max_attempts = 3;

        let backoff = config.backoff();
        assert_eq!(backoff.max_attempts, 3);
        assert_eq!(backoff.base_delay, Duration::from_millis(5));
    }
}
