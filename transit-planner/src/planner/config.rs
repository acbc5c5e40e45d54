//! Options for the alternative-route search.

use serde::{Deserialize, Serialize};

use crate::graph::MAX_TRANSFER_PENALTY_MINUTES;

/// Options that can't be searched with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid options: transfer penalty of {minutes} minutes exceeds {max}")]
pub struct InvalidOptions {
    pub minutes: u32,
    pub max: u32,
}

/// Caller-tunable parameters for one alternative-route query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlternativeRouteOptions {
    /// Maximum number of alternatives to return.
    pub max_alternatives: usize,

    /// Transfer penalty for this query (minutes).
    /// `None` uses the penalty the graph was built with.
    pub transfer_penalty_minutes: Option<u32>,

    /// Alternatives slower than the original by more than this are not
    /// offered. `None` means no cap.
    pub max_time_difference_minutes: Option<u32>,

    /// Maximum number of node expansions across the whole search.
    /// When exhausted, the alternatives found so far are returned.
    pub max_expansions: usize,
}

impl AlternativeRouteOptions {
    /// Create options with the given alternative count and defaults elsewhere.
    pub fn new(max_alternatives: usize) -> Self {
        Self {
            max_alternatives,
            ..Self::default()
        }
    }

    /// Override the transfer penalty.
    pub fn with_transfer_penalty(mut self, minutes: u32) -> Self {
        self.transfer_penalty_minutes = Some(minutes);
        self
    }

    /// Cap the extra time an alternative may take.
    pub fn with_max_time_difference(mut self, minutes: u32) -> Self {
        self.max_time_difference_minutes = Some(minutes);
        self
    }

    /// Set the node expansion budget.
    pub fn with_max_expansions(mut self, expansions: usize) -> Self {
        self.max_expansions = expansions;
        self
    }

    /// Check the options are usable.
    pub fn validate(&self) -> Result<(), InvalidOptions> {
        match self.transfer_penalty_minutes {
            Some(minutes) if minutes > MAX_TRANSFER_PENALTY_MINUTES => Err(InvalidOptions {
                minutes,
                max: MAX_TRANSFER_PENALTY_MINUTES,
            }),
            _ => Ok(()),
        }
    }

    /// Limit the alternative count and expansion budget to `limits`.
    pub fn capped(mut self, limits: &AlternativeRouteOptions) -> Self {
        self.max_alternatives = self.max_alternatives.min(limits.max_alternatives);
        self.max_expansions = self.max_expansions.min(limits.max_expansions);
        self
    }
}

impl Default for AlternativeRouteOptions {
    fn default() -> Self {
        Self {
            max_alternatives: 3,
            transfer_penalty_minutes: None,
            max_time_difference_minutes: None,
            max_expansions: 20_000,
        }
    }
}
