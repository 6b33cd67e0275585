//! Review workflow configuration.

use application::{CapacityPolicy, DEFAULT_RESERVATION_RETRIES};
use serde::{Deserialize, Serialize};

/// Review workflow settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Whether a full meeting lane blocks approval ("soft" or "hard")
    #[serde(default)]
    pub capacity_policy: CapacityPolicy,

    /// Retries when a meeting counter changes under a reservation
    #[serde(default = "default_reservation_retries")]
    pub reservation_retries: u32,

    /// Actor recorded when none is given on the command line
    #[serde(default = "default_actor")]
    pub default_actor: String,
}

const fn default_reservation_retries() -> u32 {
    DEFAULT_RESERVATION_RETRIES
}

fn default_actor() -> String {
    "reviewer".to_string()
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            capacity_policy: CapacityPolicy::default(),
            reservation_retries: default_reservation_retries(),
            default_actor: default_actor(),
        }
    }
}
