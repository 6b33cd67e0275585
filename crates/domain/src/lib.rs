//! Domain layer for ReviewDesk
//!
//! Contains the review workflow entities, value objects, meeting selection
//! rules and domain errors. This layer has no I/O and defines the ubiquitous
//! language of the approval workflow.

pub mod commands;
pub mod entities;
pub mod errors;
pub mod meeting_selection;
pub mod value_objects;

pub use commands::{ReviewCommand, require_comment};
pub use entities::*;
pub use errors::DomainError;
pub use meeting_selection::{select_default, sorted_by_date};
pub use value_objects::*;
