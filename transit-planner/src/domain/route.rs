//! Route value objects.
//!
//! A `Route` is what the planner hands back to callers: an ordered chain of
//! `Segment`s, one per line ridden, with derived totals. An
//! `AlternativeRoute` is a route proposed in place of one that uses a
//! disrupted line.

use serde::{Deserialize, Serialize};

use super::{DisruptionReason, DomainError, LineId, StationId};

/// One line ridden between two stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub from_station_id: StationId,
    pub from_station_name: String,
    pub to_station_id: StationId,
    pub to_station_name: String,
    pub line_id: LineId,
    pub line_name: String,
    /// True when this segment was boarded after a line change.
    pub is_transfer: bool,
    /// Ride time only; transfer penalties are accounted on the route.
    pub duration_minutes: u32,
    /// Number of hops ridden.
    pub stop_count: u32,
}

/// A complete route from origin to destination.
///
/// # Invariants
///
/// - At least one segment
/// - Consecutive segments connect (destination of one = origin of next)
/// - `total_minutes` = sum of segment durations plus one transfer penalty
///   per transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    from: StationId,
    to: StationId,
    segments: Vec<Segment>,
    line_ids: Vec<LineId>,
    total_minutes: u32,
    transfer_count: u32,
    transfer_penalty_minutes: u32,
}

impl Route {
    /// Constructs a route from segments, deriving its totals.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the segment list is empty or does not chain.
    pub fn new(segments: Vec<Segment>, transfer_penalty_minutes: u32) -> Result<Self, DomainError> {
        let (first, last) = match (segments.first(), segments.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(DomainError::EmptyRoute),
        };

        for pair in segments.windows(2) {
            if pair[0].to_station_id != pair[1].from_station_id {
                return Err(DomainError::SegmentsNotConnected(
                    pair[0].to_station_id.clone(),
                    pair[1].from_station_id.clone(),
                ));
            }
        }

        let mut line_ids: Vec<LineId> = Vec::new();
        for segment in &segments {
            if !line_ids.contains(&segment.line_id) {
                line_ids.push(segment.line_id.clone());
            }
        }

        let transfer_count = segments.iter().filter(|s| s.is_transfer).count() as u32;
        let total_minutes = segments
            .iter()
            .fold(0u32, |total, s| total.saturating_add(s.duration_minutes))
            .saturating_add(transfer_penalty_minutes.saturating_mul(transfer_count));

        Ok(Self {
            from: first.from_station_id.clone(),
            to: last.to_station_id.clone(),
            line_ids,
            total_minutes,
            transfer_count,
            transfer_penalty_minutes,
            segments,
        })
    }

    pub fn from(&self) -> &StationId {
        &self.from
    }

    pub fn to(&self) -> &StationId {
        &self.to
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Distinct lines used, in order of first use.
    pub fn line_ids(&self) -> &[LineId] {
        &self.line_ids
    }

    /// Total travel time including transfer penalties.
    pub fn total_minutes(&self) -> u32 {
        self.total_minutes
    }

    pub fn transfer_count(&self) -> u32 {
        self.transfer_count
    }

    /// Penalty charged per transfer when this route was planned.
    pub fn transfer_penalty_minutes(&self) -> u32 {
        self.transfer_penalty_minutes
    }

    /// Returns true if any segment rides the given line.
    pub fn uses_line(&self, line: &LineId) -> bool {
        self.line_ids.contains(line)
    }

    /// Line of each segment, in riding order. Used as the final tie-break
    /// when ranking routes.
    pub fn line_sequence(&self) -> Vec<&LineId> {
        self.segments.iter().map(|s| &s.line_id).collect()
    }
}

/// A route proposed to avoid disrupted lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeRoute {
    pub route: Route,
    /// Extra minutes compared with the original route. Never negative.
    pub time_difference_minutes: u32,
    pub reason: DisruptionReason,
    /// Lines this alternative was computed to avoid.
    pub avoided_line_ids: Vec<LineId>,
}
