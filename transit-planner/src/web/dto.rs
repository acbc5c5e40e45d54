//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AlternativeRoute, Disruption, LineId, Route};
use crate::graph::Graph;
use crate::planner::{AlternativeRouteOptions, AlternativeSearch};

/// Query string for a route request.
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    /// Origin station id
    pub from: String,

    /// Destination station id
    pub to: String,
}

/// Request for alternatives around disrupted lines.
#[derive(Debug, Deserialize)]
pub struct AlternativesRequest {
    /// Origin station id
    pub from: String,

    /// Destination station id
    pub to: String,

    /// Current disruptions. Every listed line is avoided.
    #[serde(default)]
    pub disruptions: Vec<Disruption>,

    /// Search options; omitted fields take their defaults
    #[serde(default)]
    pub options: Option<AlternativeRouteOptions>,
}

/// Alternatives and the route they replace.
#[derive(Debug, Serialize)]
pub struct AlternativesResponse {
    /// Disrupted lines the original route rides
    pub affected: Vec<LineId>,

    /// Fastest route ignoring disruptions, if any
    pub original: Option<Route>,

    /// Alternatives, best first
    pub alternatives: Vec<AlternativeRoute>,

    /// The search ran out of budget; more alternatives may exist
    pub truncated: bool,
}

impl AlternativesResponse {
    pub fn from_search(search: AlternativeSearch) -> Self {
        Self {
            affected: search.affected_line_ids,
            original: search.original,
            alternatives: search.alternatives,
            truncated: search.stats.budget_exceeded,
        }
    }
}

/// Summary of the graph currently serving queries.
#[derive(Debug, Serialize)]
pub struct GraphInfo {
    pub stations: usize,
    pub lines: usize,
    pub ride_edges: usize,
    pub transfer_edges: usize,

    /// Penalty charged per transfer (minutes)
    pub transfer_penalty_minutes: u32,

    /// Hop time used where a line has no travel times (minutes)
    pub default_hop_minutes: u32,

    /// When this graph was built
    pub built_at: DateTime<Utc>,
}

impl GraphInfo {
    pub fn from_graph(graph: &Graph) -> Self {
        Self {
            stations: graph.stations().len(),
            lines: graph.lines().len(),
            ride_edges: graph.ride_edges().len(),
            transfer_edges: graph.transfer_edges().len(),
            transfer_penalty_minutes: graph.transfer_penalty_minutes(),
            default_hop_minutes: graph.config().default_hop_minutes,
            built_at: graph.built_at(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,

    /// Machine-readable code (e.g., "NO_PATH")
    pub code: String,
}
