//! Disruption inputs supplied by the delay-detection collaborator.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::LineId;

/// Why a line is being avoided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisruptionReason {
    Delay,
    Suspension,
    Congestion,
}

impl DisruptionReason {
    /// Severity rank, higher is more severe.
    ///
    /// A suspended line cannot be ridden at all; a delayed one is slow;
    /// a congested one is merely unpleasant.
    pub fn severity(self) -> u8 {
        match self {
            DisruptionReason::Suspension => 2,
            DisruptionReason::Delay => 1,
            DisruptionReason::Congestion => 0,
        }
    }

    /// Wire name (e.g., "SUSPENSION").
    pub fn as_str(self) -> &'static str {
        match self {
            DisruptionReason::Delay => "DELAY",
            DisruptionReason::Suspension => "SUSPENSION",
            DisruptionReason::Congestion => "CONGESTION",
        }
    }
}

impl fmt::Display for DisruptionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One disrupted line, as reported on a single query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disruption {
    pub line_id: LineId,
    pub reason: DisruptionReason,
}

impl Disruption {
    pub fn new(line_id: LineId, reason: DisruptionReason) -> Self {
        Self { line_id, reason }
    }
}
