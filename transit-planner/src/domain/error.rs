//! Domain error types.
//!
//! `TopologyError` is raised when a catalog cannot be turned into a graph;
//! `RouteError` names the reasons a route query has no answer; `DomainError`
//! covers value objects that fail their own invariants.

use super::{LineId, StationId};

/// The supplied catalog is internally inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// A line's sequence names a station that is not in the catalog
    #[error("invalid topology: line {line} references unknown station {station}")]
    UnknownStation { line: LineId, station: StationId },

    /// A station claims a line that is not in the catalog
    #[error("invalid topology: station {station} claims unknown line {line}")]
    UnknownLine { station: StationId, line: LineId },

    /// A station claims a line whose sequence does not contain it
    #[error("invalid topology: station {station} claims line {line}, which does not serve it")]
    MembershipMismatch { station: StationId, line: LineId },

    /// A line needs at least two stations to have a ride edge
    #[error("invalid topology: line {0} has fewer than 2 stations")]
    TooFewStations(LineId),

    /// A station appears twice in one line's sequence
    #[error("invalid topology: station {station} appears more than once on line {line}")]
    RepeatedStation { line: LineId, station: StationId },

    /// Two stations share an id
    #[error("invalid topology: duplicate station id {0}")]
    DuplicateStation(StationId),

    /// Two lines share an id
    #[error("invalid topology: duplicate line id {0}")]
    DuplicateLine(LineId),

    /// Per-hop travel times don't match the number of hops
    #[error("invalid topology: line {line} has {hops} hops but {times} travel times")]
    TravelTimeCount {
        line: LineId,
        hops: usize,
        times: usize,
    },

    /// A ride edge must take time
    #[error("invalid topology: line {line} has a zero-minute hop at {station}")]
    ZeroTravelTime { line: LineId, station: StationId },

    /// A hop longer than any real ride
    #[error("invalid topology: line {line} has a {minutes}-minute hop at {station} (max {max})")]
    TravelTimeTooLong {
        line: LineId,
        station: StationId,
        minutes: u32,
        max: u32,
    },

    /// The configured transfer penalty is out of range
    #[error("invalid topology: transfer penalty of {minutes} minutes exceeds {max}")]
    TransferPenaltyTooLarge { minutes: u32, max: u32 },
}

/// Why a route query has no route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The station id is not in the graph
    #[error("unknown station: {0}")]
    InvalidStation(String),

    /// Origin and destination are the same station
    #[error("origin and destination are the same station")]
    SameStation,

    /// The graph has no path between the stations
    #[error("no path from {from} to {to}")]
    NoPath { from: StationId, to: StationId },
}

impl RouteError {
    /// Stable machine-readable code (e.g., "NO_PATH").
    pub fn code(&self) -> &'static str {
        match self {
            RouteError::InvalidStation(_) => "INVALID_STATION",
            RouteError::SameStation => "SAME_STATION",
            RouteError::NoPath { .. } => "NO_PATH",
        }
    }
}

/// A value object failed its own invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Route has no segments
    #[error("route must have at least one segment")]
    EmptyRoute,

    /// Consecutive segments don't connect
    #[error("segments do not connect: {0} then {1}")]
    SegmentsNotConnected(StationId, StationId),

    /// A search path whose links don't join its nodes
    #[error("path has {nodes} nodes but {links} links")]
    MalformedPath { nodes: usize, links: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    fn line(s: &str) -> LineId {
        LineId::parse(s).unwrap()
    }

    #[test]
    fn topology_error_display() {
        let err = TopologyError::UnknownStation {
            line: line("1"),
            station: station("S9"),
        };
        assert_eq!(
            err.to_string(),
            "invalid topology: line 1 references unknown station S9"
        );

        let err = TopologyError::TooFewStations(line("7"));
        assert_eq!(
            err.to_string(),
            "invalid topology: line 7 has fewer than 2 stations"
        );

        let err = TopologyError::TravelTimeCount {
            line: line("1"),
            hops: 2,
            times: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid topology: line 1 has 2 hops but 3 travel times"
        );
    }

    #[test]
    fn route_error_codes() {
        assert_eq!(
            RouteError::InvalidStation("X".into()).code(),
            "INVALID_STATION"
        );
        assert_eq!(RouteError::SameStation.code(), "SAME_STATION");
        let err = RouteError::NoPath {
            from: station("A"),
            to: station("B"),
        };
        assert_eq!(err.code(), "NO_PATH");
        assert_eq!(err.to_string(), "no path from A to B");
    }

    #[test]
    fn domain_error_display() {
        assert_eq!(
            DomainError::EmptyRoute.to_string(),
            "route must have at least one segment"
        );
        let err = DomainError::SegmentsNotConnected(station("A"), station("B"));
        assert_eq!(err.to_string(), "segments do not connect: A then B");
    }
}
