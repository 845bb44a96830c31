//! Logging setup: console output plus a daily rolling log file.

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log directory path
    pub log_dir: PathBuf,
    /// Component name, used as the log file prefix
    pub component: String,
    pub level: Level,
    pub console: bool,
    pub file: bool,
    /// Write the log file as JSON lines
    pub json_format: bool,
}

impl LogConfig {
    /// Settings from the `[logging]` section; `verbose` forces DEBUG
    pub fn from_config(config: &Config, component: &str, verbose: bool) -> Self {
        let level = if verbose {
            Level::DEBUG
        } else {
            parse_level(&config.logging.default_level)
        };

        Self {
            log_dir: config.log_dir(),
            component: component.to_string(),
            level,
            console: config.logging.console,
            file: config.logging.file,
            json_format: config.logging.json_format,
        }
    }

    /// Filter used when `RUST_LOG` is not set
    fn directive(&self) -> String {
        format!(
            "shared={level},anime_sheets={level},umya_spreadsheet=warn",
            level = self.level
        )
    }
}

/// Parse a level name from the config file, falling back to INFO
pub fn parse_level(name: &str) -> Level {
    name.parse().unwrap_or(Level::INFO)
}

/// Install the global subscriber
pub fn init(config: &LogConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directive()));

    let mut layers = Vec::new();

    if config.console {
        layers.push(fmt::layer().with_target(true).boxed());
    }

    if config.file {
        std::fs::create_dir_all(&config.log_dir).with_context(|| {
            format!("Failed to create log directory: {}", config.log_dir.display())
        })?;
        let appender = tracing_appender::rolling::daily(&config.log_dir, &config.component);

        let layer = if config.json_format {
            fmt::layer().json().with_writer(appender).boxed()
        } else {
            fmt::layer().with_ansi(false).with_writer(appender).boxed()
        };
        layers.push(layer);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        component = %config.component,
        log_dir = %config.log_dir.display(),
        "Logging initialized"
    );

    Ok(())
}
