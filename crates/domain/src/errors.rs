//! Domain-level errors

use thiserror::Error;

use crate::value_objects::{MeetingId, ReviewMethod, ReviewStatus};

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Required user input is missing or malformed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// The item is not in a status that allows the requested transition
    #[error("Invalid transition from status '{from}'")]
    InvalidTransition { from: ReviewStatus },

    /// The meeting lane has no remaining slots
    #[error("Meeting {meeting_id} has no remaining {method} capacity (limit {limit})")]
    CapacityExceeded {
        meeting_id: MeetingId,
        method: ReviewMethod,
        limit: u32,
    },
}

impl DomainError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}
