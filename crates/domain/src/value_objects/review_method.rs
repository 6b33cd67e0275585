//! Review routing lanes

use std::fmt;

use serde::{Deserialize, Serialize};

use super::MeetingId;

/// Lane an approved item is routed through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewMethod {
    /// Lighter-weight review without full committee deliberation
    Quick,
    /// Full deliberation at a scheduled committee session
    Meeting,
}

impl ReviewMethod {
    /// Stable machine-readable name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Meeting => "meeting",
        }
    }

    /// Human-readable label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Quick => "Quick review",
            Self::Meeting => "Meeting review",
        }
    }
}

impl fmt::Display for ReviewMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReviewMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "meeting" => Ok(Self::Meeting),
            other => Err(format!(
                "Invalid review method: {other}. Use 'quick' or 'meeting'"
            )),
        }
    }
}

/// Lane and meeting an approved item was assigned to
///
/// An item either has no routing (not yet approved in this cycle) or has
/// both a method and a meeting; the two are never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewRouting {
    /// Review lane
    pub method: ReviewMethod,
    /// Meeting the item was routed through
    pub meeting_id: MeetingId,
}

impl ReviewRouting {
    /// Create a routing assignment
    pub const fn new(method: ReviewMethod, meeting_id: MeetingId) -> Self {
        Self { method, meeting_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_methods_case_insensitively() {
        assert_eq!("Quick".parse::<ReviewMethod>().unwrap(), ReviewMethod::Quick);
        assert_eq!(
            " meeting ".parse::<ReviewMethod>().unwrap(),
            ReviewMethod::Meeting
        );
    }

    #[test]
    fn unset_is_not_a_method() {
        let err = "unset".parse::<ReviewMethod>().unwrap_err();
        assert!(err.contains("unset"));
    }

    #[test]
    fn routing_serialization() {
        let routing = ReviewRouting::new(ReviewMethod::Quick, MeetingId::new(2));
        let json = serde_json::to_string(&routing).unwrap();
        assert_eq!(json, r#"{"method":"quick","meeting_id":2}"#);
    }
}
