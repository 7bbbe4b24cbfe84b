//! # Logging Configuration
//!
//! Configuration for the logging subsystem.
//! Supports environment variables and programmatic configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Boxed subscriber returned by [`LoggingConfig::build`].
pub type BoxedSubscriber = Box<dyn tracing::Subscriber + Send + Sync>;

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The level string is not a valid filter directive.
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// The rejected filter.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// The log file path has no file name component.
    #[error("Invalid log file path: {0}")]
    InvalidLogFile(String),

    /// A global subscriber was already installed.
    #[error(transparent)]
    AlreadyInitialized(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Logging configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Log level or filter directive
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format (json, pretty, compact)
    #[serde(default = "default_format")]
    pub format: String,

    /// Optional log file path, rotated hourly
    #[serde(default)]
    pub log_file: Option<String>,

    /// Environment (development, testing, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_level() -> String { "info".to_string() }

fn default_format() -> String { "compact".to_string() }

fn default_environment() -> String { "development".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level:       default_level(),
            format:      default_format(),
            log_file:    None,
            environment: default_environment(),
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables, falling back to the arguments.
    pub fn from_env(level: &str, format: &str, log_file: Option<&str>) -> Self {
        Self {
            level:       std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
            format:      std::env::var("HACKFORGE_LOG_FORMAT").unwrap_or_else(|_| format.to_string()),
            log_file:    std::env::var("HACKFORGE_LOG_FILE")
                .ok()
                .or(log_file.map(|s| s.to_string())),
            environment: std::env::var("HACKFORGE_ENV").unwrap_or_else(|_| default_environment()),
        }
    }

    fn filter(&self) -> Result<EnvFilter, LoggingError> {
        EnvFilter::try_new(&self.level).map_err(|e| {
            LoggingError::InvalidFilter {
                filter: self.level.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// Build the tracing subscriber from this configuration.
    ///
    /// Unknown formats fall back to JSON.
    pub fn build(&self) -> Result<(BoxedSubscriber, Option<WorkerGuard>), LoggingError> {
        let filter = self.filter()?;

        match self.format.as_str() {
            "pretty" => {
                let layer = fmt::layer()
                    .pretty()
                    .with_timer(fmt::time::UtcTime::rfc_3339());
                Ok((Box::new(Registry::default().with(filter).with(layer)), None))
            },
            "compact" => {
                let layer = fmt::layer()
                    .compact()
                    .with_timer(fmt::time::UtcTime::rfc_3339());
                Ok((Box::new(Registry::default().with(filter).with(layer)), None))
            },
            _ => self.build_json_subscriber(filter),
        }
    }

    /// Build a JSON subscriber for production logging, optionally teeing to a file.
    fn build_json_subscriber(&self, filter: EnvFilter) -> Result<(BoxedSubscriber, Option<WorkerGuard>), LoggingError> {
        let stdout_layer = fmt::layer()
            .json()
            .with_timer(fmt::time::UtcTime::rfc_3339());

        let Some(ref log_file) = self.log_file
        else {
            return Ok((
                Box::new(Registry::default().with(filter).with(stdout_layer)),
                None,
            ));
        };

        let path = Path::new(log_file);
        let file_name = path
            .file_name()
            .ok_or_else(|| LoggingError::InvalidLogFile(log_file.clone()))?;
        let directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let file_appender = tracing_appender::rolling::hourly(directory, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let file_layer = fmt::layer().json().with_writer(non_blocking);

        Ok((
            Box::new(
                Registry::default()
                    .with(filter)
                    .with(stdout_layer)
                    .with(file_layer),
            ),
            Some(guard),
        ))
    }
}
