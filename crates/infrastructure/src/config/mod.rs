//! Application configuration
//!
//! Loaded from an optional `reviewdesk.toml` overlaid by `REVIEWDESK_*`
//! environment variables, with `__` separating nested keys
//! (e.g. `REVIEWDESK_REVIEW__CAPACITY_POLICY=hard`).

mod database;
mod meetings;
mod review;

use std::{collections::HashSet, path::Path};

use domain::Meeting;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use database::DatabaseConfig;
pub use meetings::MeetingConfig;
pub use review::ReviewConfig;

use crate::telemetry::TelemetryConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Errors raised while loading or checking configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The sources could not be read or deserialized
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    /// A configured meeting is inconsistent
    #[error("Invalid meeting {id}: {reason}")]
    InvalidMeeting { id: u64, reason: String },

    /// Two configured meetings share an id
    #[error("Duplicate meeting id {0}")]
    DuplicateMeeting(u64),

    /// The configuration could not be rendered
    #[error("Failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Review workflow settings
    #[serde(default)]
    pub review: ReviewConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Committee meetings to provision
    #[serde(default)]
    pub meetings: Vec<MeetingConfig>,
}

impl AppConfig {
    /// Load configuration from `reviewdesk.toml` (if present) and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (required) or the default one
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("reviewdesk").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            // Override with environment variables (e.g., REVIEWDESK_DATABASE__PATH)
            .add_source(
                config::Environment::with_prefix("REVIEWDESK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        debug!(meetings = config.meetings.len(), "Configuration loaded");
        Ok(config)
    }

    /// Parse configuration from a TOML string, without environment overrides
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.meetings().map(|_| ())
    }

    /// Configured meetings as domain values
    pub fn meetings(&self) -> Result<Vec<Meeting>, ConfigError> {
        let mut seen = HashSet::new();
        self.meetings
            .iter()
            .map(|meeting| {
                if !seen.insert(meeting.id) {
                    return Err(ConfigError::DuplicateMeeting(meeting.id));
                }
                meeting.to_meeting()
            })
            .collect()
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
