//! Tracing subscriber initialization
//!
//! Logs go to stderr so command output on stdout stays machine-readable.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid log format: {s}. Use 'text' or 'json'")),
        }
    }
}

/// Configuration for logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level filter (e.g., "info", "application=debug,sqlx=warn")
    ///
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Text or JSON output
    #[serde(default)]
    pub log_format: LogFormat,

    /// Include the event target in each line
    #[serde(default)]
    pub with_target: bool,
}

fn default_log_filter() -> String {
    "warn,application=info,infrastructure=info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            log_format: LogFormat::default(),
            with_target: false,
        }
    }
}

/// Install the global subscriber
///
/// Fails if a global subscriber has already been set.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .map_err(|e| TelemetryError::Filter(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log_format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.with_target),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(config.with_target),
            )
            .try_init(),
    }
    .map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(format = %config.log_format, "Telemetry initialized");
    Ok(())
}

/// Error type for telemetry initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter directive could not be parsed
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// Failed to initialize tracing subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}
