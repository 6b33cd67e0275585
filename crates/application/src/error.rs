//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error (validation, invalid transition, capacity)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A referenced item or meeting does not exist
    ///
    /// Indicates a data-integrity problem rather than bad user input.
    #[error("Unknown {entity_type} reference: {id}")]
    UnknownReference { entity_type: String, id: String },

    /// Another writer changed the same record and retries were exhausted
    #[error("Concurrent modification: {0}")]
    Conflict(String),

    /// Backing store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Create an unknown reference error
    pub fn unknown(entity_type: impl Into<String>, id: impl ToString) -> Self {
        Self::UnknownReference {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Missing or invalid user input; the caller should re-prompt
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Domain(DomainError::ValidationError(_)))
    }

    /// A lane was already at quota under hard enforcement
    pub const fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::Domain(DomainError::CapacityExceeded { .. }))
    }

    /// The item was not pending
    pub const fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::Domain(DomainError::InvalidTransition { .. }))
    }

    /// Dangling item or meeting reference
    pub const fn is_integrity(&self) -> bool {
        matches!(self, Self::UnknownReference { .. })
    }

    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::Storage(_))
    }
}
