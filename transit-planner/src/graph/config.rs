//! Build-time configuration for the network graph.

/// Longest ride between adjacent stations accepted in a catalog (minutes).
pub const MAX_HOP_MINUTES: u32 = 24 * 60;

/// Largest transfer penalty accepted (minutes).
pub const MAX_TRANSFER_PENALTY_MINUTES: u32 = 24 * 60;

/// Weights applied when a catalog doesn't say otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    /// Ride time for a hop on a line without per-hop travel times (minutes).
    pub default_hop_minutes: u32,

    /// Cost of changing lines at a station (minutes).
    /// Non-zero so that routes don't change lines for no gain.
    pub transfer_penalty_minutes: u32,
}

impl GraphConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(default_hop_minutes: u32, transfer_penalty_minutes: u32) -> Self {
        Self {
            default_hop_minutes,
            transfer_penalty_minutes,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            default_hop_minutes: 2,
            transfer_penalty_minutes: 5,
        }
    }
}
