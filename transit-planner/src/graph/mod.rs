//! In-memory network graph.
//!
//! The search graph's nodes are line-local occupancies of a station: a
//! traveller "on line L at station S" is a different node from one "on line
//! M at station S". Ride links join adjacent stations on one line; transfer
//! links join the nodes of one station. A `Graph` is immutable once built
//! and is shared between queries behind an `Arc`.

mod builder;
mod config;
mod view;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{Line, LineId, Station, StationId};

pub use builder::build_graph;
pub use config::{GraphConfig, MAX_HOP_MINUTES, MAX_TRANSFER_PENALTY_MINUTES};
pub use view::GraphView;

/// Index of a station in the graph's station table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationIdx(pub usize);

/// Index of a line in the graph's line table.
///
/// Lines are stored sorted by id, so comparing indices compares ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineIdx(pub usize);

/// Index of a `(station, line)` search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub usize);

/// A search node: being on `line` at `station`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub station: StationIdx,
    pub line: LineIdx,
}

/// How one node reaches an adjacent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LinkKind {
    /// One hop on the node's line.
    Ride { minutes: u32 },
    /// A change of line within a station.
    Transfer,
}

/// A directed adjacency entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub to: NodeIdx,
    pub kind: LinkKind,
}

/// One station-to-station hop on a single line. Undirected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideEdge {
    pub station_a: StationId,
    pub station_b: StationId,
    pub line_id: LineId,
    pub travel_time_minutes: u32,
}

/// A change between two lines at one station. Undirected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEdge {
    pub station_id: StationId,
    pub line_a: LineId,
    pub line_b: LineId,
    pub penalty_minutes: u32,
}

/// The network graph.
///
/// Construct with [`build_graph`]. Nothing mutates a graph after it is
/// built; a topology change produces a new one.
#[derive(Debug)]
pub struct Graph {
    stations: Vec<Station>,
    lines: Vec<Line>,
    station_index: HashMap<StationId, StationIdx>,
    line_index: HashMap<LineId, LineIdx>,
    nodes: Vec<Node>,
    /// Nodes at each station, ordered by line.
    station_nodes: Vec<Vec<NodeIdx>>,
    adjacency: Vec<Vec<Link>>,
    ride_edges: Vec<RideEdge>,
    transfer_edges: Vec<TransferEdge>,
    config: GraphConfig,
    built_at: DateTime<Utc>,
}

impl Graph {
    /// Look up a station index by id.
    pub fn station_idx(&self, id: &str) -> Option<StationIdx> {
        let id = StationId::parse(id).ok()?;
        self.station_index.get(&id).copied()
    }

    /// Look up a line index by id.
    pub fn line_idx(&self, id: &LineId) -> Option<LineIdx> {
        self.line_index.get(id).copied()
    }

    /// Look up a station by id.
    pub fn station(&self, id: &StationId) -> Option<&Station> {
        self.station_index.get(id).map(|idx| &self.stations[idx.0])
    }

    /// Look up a line by id.
    pub fn line(&self, id: &LineId) -> Option<&Line> {
        self.line_index.get(id).map(|idx| &self.lines[idx.0])
    }

    pub fn station_at(&self, idx: StationIdx) -> &Station {
        &self.stations[idx.0]
    }

    pub fn line_at(&self, idx: LineIdx) -> &Line {
        &self.lines[idx.0]
    }

    pub fn node(&self, idx: NodeIdx) -> Node {
        self.nodes[idx.0]
    }

    /// All nodes at a station, one per line serving it.
    pub fn nodes_at(&self, station: StationIdx) -> &[NodeIdx] {
        &self.station_nodes[station.0]
    }

    /// The node for being on `line` at `station`, if the line serves it.
    pub fn node_at(&self, station: StationIdx, line: LineIdx) -> Option<NodeIdx> {
        self.station_nodes[station.0]
            .iter()
            .copied()
            .find(|n| self.nodes[n.0].line == line)
    }

    /// Outgoing links of a node.
    pub fn links(&self, node: NodeIdx) -> &[Link] {
        &self.adjacency[node.0]
    }

    /// Lines serving a station, in id order.
    pub fn lines_at(&self, station: &StationId) -> Vec<&LineId> {
        match self.station_index.get(station) {
            Some(idx) => self.station_nodes[idx.0]
                .iter()
                .map(|n| &self.lines[self.nodes[n.0].line.0].id)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Lines, sorted by id.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn ride_edges(&self) -> &[RideEdge] {
        &self.ride_edges
    }

    pub fn transfer_edges(&self) -> &[TransferEdge] {
        &self.transfer_edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Transfer penalty the graph was built with.
    pub fn transfer_penalty_minutes(&self) -> u32 {
        self.config.transfer_penalty_minutes
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// When this graph was built.
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn lookups() {
        let graph = two_line_network();

        assert!(graph.station_idx("S1").is_some());
        assert!(graph.station_idx("nope").is_none());
        assert!(graph.station_idx("").is_none());
        assert_eq!(graph.station(&station_id("S2")).unwrap().name, "Station S2");
        assert_eq!(graph.line(&line_id("2")).unwrap().name, "Line 2");
        assert!(graph.line(&line_id("9")).is_none());
    }

    #[test]
    fn lines_at_station() {
        let graph = two_line_network();

        let at_s2: Vec<&str> = graph
            .lines_at(&station_id("S2"))
            .into_iter()
            .map(|l| l.as_str())
            .collect();
        assert_eq!(at_s2, vec!["1", "2"]);

        let at_s4: Vec<&str> = graph
            .lines_at(&station_id("S4"))
            .into_iter()
            .map(|l| l.as_str())
            .collect();
        assert_eq!(at_s4, vec!["2"]);

        assert!(graph.lines_at(&station_id("S9")).is_empty());
    }

    #[test]
    fn one_node_per_station_line() {
        let graph = two_line_network();
        // S1:1, S2:1,2, S3:1,2, S4:2
        assert_eq!(graph.node_count(), 6);
    }

    #[test]
    fn records_build_settings() {
        let graph = two_line_network();
        assert_eq!(graph.transfer_penalty_minutes(), 3);
        assert_eq!(graph.config().default_hop_minutes, 2);
        assert!(graph.built_at() <= chrono::Utc::now());
    }
}
