//! Kinds of entities that pass through review

use std::fmt;

use serde::{Deserialize, Serialize};

/// What sort of entity a reviewable item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Research project submitted for ethics review
    #[default]
    Project,
    /// Periodic tracking report on an approved project
    TrackingReport,
    /// Equipment booking request
    EquipmentBooking,
    /// Reagent purchase or usage request
    ReagentRequest,
}

impl ItemKind {
    /// Stable machine name, matching the serde representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::TrackingReport => "tracking_report",
            Self::EquipmentBooking => "equipment_booking",
            Self::ReagentRequest => "reagent_request",
        }
    }

    /// Human-readable label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::TrackingReport => "Tracking report",
            Self::EquipmentBooking => "Equipment booking",
            Self::ReagentRequest => "Reagent request",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "project" => Ok(Self::Project),
            "tracking_report" | "tracking" => Ok(Self::TrackingReport),
            "equipment_booking" | "equipment" => Ok(Self::EquipmentBooking),
            "reagent_request" | "reagent" => Ok(Self::ReagentRequest),
            other => Err(format!("Unknown item kind: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_aliases() {
        assert_eq!("equipment".parse::<ItemKind>().unwrap(), ItemKind::EquipmentBooking);
        assert_eq!("reagent-request".parse::<ItemKind>().unwrap(), ItemKind::ReagentRequest);
        assert_eq!("tracking".parse::<ItemKind>().unwrap(), ItemKind::TrackingReport);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!("invoice".parse::<ItemKind>().is_err());
    }
}
