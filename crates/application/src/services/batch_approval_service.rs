//! Batch approval service - Applies one decision to many selected items
//!
//! Each selected item goes through the same path as a single-item
//! decision. Items that are no longer pending are skipped, and a failure on
//! one item does not stop the rest of the batch.

use std::{collections::HashSet, sync::Arc};

use domain::{CapacityWarning, DomainError, ItemId, ReviewCommand};
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::review_service::ReviewService;
use crate::error::ApplicationError;

/// An item the batch could not decide
#[derive(Debug, Serialize)]
pub struct BatchFailure {
    /// The item
    pub item_id: ItemId,
    /// Why it failed
    #[serde(serialize_with = "serialize_error")]
    pub error: ApplicationError,
}

fn serialize_error<S: serde::Serializer>(
    error: &ApplicationError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Summary of a batch run
#[derive(Debug, Default, Serialize)]
pub struct BatchOutcome {
    /// Items that transitioned
    pub mutated: Vec<ItemId>,
    /// Items left alone because they were not pending
    pub skipped: Vec<ItemId>,
    /// Items whose transition failed
    pub failed: Vec<BatchFailure>,
    /// Over-quota warnings raised by soft-enforced approvals
    pub warnings: Vec<CapacityWarning>,
}

impl BatchOutcome {
    /// Number of items that transitioned
    pub fn mutated_count(&self) -> usize {
        self.mutated.len()
    }

    /// Number of items skipped
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Number of items that failed
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Whether every selected item was either mutated or skipped
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Applies a shared decision to a selection of items
#[derive(Debug, Clone)]
pub struct BatchApprovalService {
    reviews: Arc<ReviewService>,
}

impl BatchApprovalService {
    /// Create a batch service on top of the single-item workflow
    pub const fn new(reviews: Arc<ReviewService>) -> Self {
        Self { reviews }
    }

    /// Apply `command` to every selected item
    ///
    /// Items are evaluated independently: a failure on one item is recorded
    /// in [`BatchOutcome::failed`] and the batch moves on. The command is
    /// validated once; if that fails, every pending item fails with the same
    /// error and nothing is written. Duplicate ids are applied once, in
    /// first-seen order.
    #[instrument(
        skip(self, selected),
        fields(
            command = command.name(),
            target = %command.target_status(),
            selected = selected.len()
        )
    )]
    pub async fn apply_to_selection(
        &self,
        selected: &[ItemId],
        actor: &str,
        command: &ReviewCommand,
    ) -> BatchOutcome {
        let mut seen = HashSet::new();
        let mut outcome = BatchOutcome::default();
        let invalid = command.validate().err();
        if let Some(error) = &invalid {
            warn!(error = %error, "Batch command is invalid");
        }

        for id in selected.iter().filter(|id| seen.insert(**id)) {
            match self.reviews.get(id).await {
                Ok(item) if !item.is_pending() => {
                    info!(item_id = %id, status = %item.status(), "Skipping item that is not pending");
                    outcome.skipped.push(*id);
                    continue;
                },
                Ok(_) => {},
                Err(error) => {
                    warn!(item_id = %id, error = %error, "Batch item failed");
                    outcome.failed.push(BatchFailure { item_id: *id, error });
                    continue;
                },
            }

            if let Some(error) = &invalid {
                outcome.failed.push(BatchFailure {
                    item_id: *id,
                    error: error.clone().into(),
                });
                continue;
            }

            match self.reviews.apply(id, actor, command).await {
                Ok(transition) => {
                    outcome.warnings.extend(transition.capacity_warning());
                    outcome.mutated.push(*id);
                },
                Err(ApplicationError::Domain(DomainError::InvalidTransition { from })) => {
                    info!(item_id = %id, status = %from, "Item left pending during batch, skipping");
                    outcome.skipped.push(*id);
                },
                Err(error) => {
                    warn!(item_id = %id, error = %error, "Batch item failed");
                    outcome.failed.push(BatchFailure { item_id: *id, error });
                },
            }
        }

        info!(
            mutated = outcome.mutated_count(),
            skipped = outcome.skipped_count(),
            failed = outcome.failed_count(),
            "Batch decision applied"
        );
        outcome
    }
}
