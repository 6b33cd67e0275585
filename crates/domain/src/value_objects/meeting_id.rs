//! Committee meeting identifier
//!
//! Meetings are provisioned from configuration, so their identifiers are the
//! numeric keys an administrator writes there rather than generated UUIDs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a scheduled committee meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(u64);

impl MeetingId {
    /// Wrap a raw meeting number
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw meeting number
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MeetingId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for MeetingId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}
