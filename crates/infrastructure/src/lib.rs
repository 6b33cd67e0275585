//! Infrastructure layer - Adapters for external systems
//!
//! Implements the store ports defined in the application layer and provides
//! configuration loading and telemetry setup.

pub mod config;
pub mod persistence;
pub mod telemetry;

pub use config::{AppConfig, ConfigError, DatabaseConfig, MeetingConfig, ReviewConfig};
pub use persistence::{
    InMemoryMeetingStore, InMemoryReviewItemStore, SqliteMeetingStore, SqliteReviewItemStore,
    StateDb, StateDbConfig, StateDbError,
};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
