//! Transfer-aware shortest-path search.
//!
//! Dijkstra over `(station, line)` nodes. A virtual super-source reaches
//! every node of the origin station at zero cost and the search stops at the
//! first settled node of the destination station, which plays the part of
//! a zero-cost super-sink.
//!
//! Paths are compared by [`Label`]: total minutes, then number of transfer
//! edges, then the sequence of lines ridden (line indices order the same
//! way as line ids). Two paths reaching the same node with equal minutes
//! and transfers have line sequences of equal length ending in the same
//! line, so extending both by one link never swaps their order, and the
//! search stays exact under this composite order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use tracing::debug;

use crate::domain::{Route, RouteError};
use crate::graph::{Graph, GraphView, LineIdx, LinkKind, NodeIdx, StationIdx};

use super::rank::to_public_route;

/// Cost of a (partial) path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Label {
    /// Ride time plus transfer penalties.
    pub minutes: u32,
    /// Transfer edges traversed.
    pub transfers: u32,
    /// Lines ridden, one entry per line change.
    pub lines: Vec<LineIdx>,
}

impl Label {
    fn seed(line: LineIdx) -> Self {
        Self {
            minutes: 0,
            transfers: 0,
            lines: vec![line],
        }
    }

    fn ride(&self, minutes: u32) -> Self {
        Self {
            minutes: self.minutes.saturating_add(minutes),
            transfers: self.transfers,
            lines: self.lines.clone(),
        }
    }

    fn transfer(&self, penalty: u32, onto: LineIdx) -> Self {
        let mut lines = self.lines.clone();
        lines.push(onto);
        Self {
            minutes: self.minutes.saturating_add(penalty),
            transfers: self.transfers.saturating_add(1),
            lines,
        }
    }
}

/// A path through the search graph.
///
/// Orders by its label first, so a sorted set of paths yields them
/// cheapest-first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Path {
    /// Label of the whole path.
    pub label: Label,
    pub nodes: Vec<NodeIdx>,
    /// Label of the prefix ending at each node.
    pub labels: Vec<Label>,
    /// `links[i]` joins `nodes[i]` to `nodes[i + 1]`.
    pub links: Vec<LinkKind>,
    /// Penalty per transfer the path was costed with.
    pub transfer_penalty_minutes: u32,
}

impl Path {
    /// Total minutes including transfer penalties.
    pub fn minutes(&self) -> u32 {
        self.label.minutes
    }
}

/// Where a search starts.
#[derive(Debug, Clone)]
pub enum Origin {
    /// Every node of a station, at zero cost.
    Station(StationIdx),
    /// A single node, already carrying the cost of a path to it.
    Node { node: NodeIdx, label: Label },
}

/// Restrictions layered over a view for a single search.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    /// Links that may not be taken. `None` as the source is the
    /// super-source.
    pub banned_links: HashSet<(Option<NodeIdx>, NodeIdx)>,
    /// Nodes that may not be entered at all.
    pub banned_nodes: HashSet<NodeIdx>,
    /// Stations that may not be entered by a ride.
    pub banned_stations: HashSet<StationIdx>,
}

/// The search ran out of node expansions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("search budget of {0} expansions exceeded")]
pub struct BudgetExceeded(pub usize);

/// A node-expansion allowance shared by a sequence of searches.
#[derive(Debug, Clone)]
pub struct Budget {
    limit: usize,
    used: usize,
}

impl Budget {
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    /// Expansions spent so far.
    pub fn used(&self) -> usize {
        self.used
    }

    fn spend(&mut self) -> Result<(), BudgetExceeded> {
        if self.used >= self.limit {
            return Err(BudgetExceeded(self.limit));
        }
        self.used += 1;
        Ok(())
    }
}

/// Find the cheapest path from `origin` to any node of `target`.
///
/// Returns `Ok(None)` when the target is unreachable and
/// `Err(BudgetExceeded)` if the budget runs out first.
pub fn shortest_path(
    view: &GraphView<'_>,
    origin: &Origin,
    target: StationIdx,
    constraints: &Constraints,
    budget: &mut Budget,
) -> Result<Option<Path>, BudgetExceeded> {
    let graph = view.graph();
    let n = graph.node_count();

    // Boarding any line at the origin is free, so changing line there is
    // never useful.
    let origin_station = match origin {
        Origin::Station(station) => Some(*station),
        Origin::Node { .. } => None,
    };

    // Each call owns its frontier; nothing is shared between searches.
    let mut best: Vec<Option<Label>> = vec![None; n];
    let mut prev: Vec<Option<(NodeIdx, LinkKind)>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap: BinaryHeap<Reverse<(Label, NodeIdx)>> = BinaryHeap::new();

    match origin {
        Origin::Station(station) => {
            for &node in graph.nodes_at(*station) {
                if constraints.banned_links.contains(&(None, node)) {
                    continue;
                }
                let label = Label::seed(graph.node(node).line);
                best[node.0] = Some(label.clone());
                heap.push(Reverse((label, node)));
            }
        }
        Origin::Node { node, label } => {
            best[node.0] = Some(label.clone());
            heap.push(Reverse((label.clone(), *node)));
        }
    }

    while let Some(Reverse((label, node))) = heap.pop() {
        if settled[node.0] {
            continue;
        }
        settled[node.0] = true;
        budget.spend()?;

        let here = graph.node(node);
        if here.station == target {
            let path = reconstruct(node, label, &best, &prev, view.transfer_penalty_minutes());
            return Ok(Some(path));
        }

        for (link, cost) in view.links(node) {
            let next = link.to;
            if settled[next.0]
                || constraints.banned_nodes.contains(&next)
                || constraints.banned_links.contains(&(Some(node), next))
            {
                continue;
            }

            let next_node = graph.node(next);
            let candidate = match link.kind {
                LinkKind::Ride { .. } => {
                    if constraints.banned_stations.contains(&next_node.station) {
                        continue;
                    }
                    label.ride(cost)
                }
                LinkKind::Transfer => {
                    if origin_station == Some(here.station) {
                        continue;
                    }
                    label.transfer(cost, next_node.line)
                }
            };

            let improves = match &best[next.0] {
                Some(existing) => candidate < *existing,
                None => true,
            };
            if improves {
                best[next.0] = Some(candidate.clone());
                prev[next.0] = Some((node, link.kind));
                heap.push(Reverse((candidate, next)));
            }
        }
    }

    Ok(None)
}

/// Walk predecessor pointers back from `end`.
fn reconstruct(
    end: NodeIdx,
    label: Label,
    best: &[Option<Label>],
    prev: &[Option<(NodeIdx, LinkKind)>],
    transfer_penalty_minutes: u32,
) -> Path {
    let mut nodes = vec![end];
    let mut links = Vec::new();
    let mut current = end;
    while let Some((before, kind)) = prev[current.0] {
        links.push(kind);
        nodes.push(before);
        current = before;
    }
    nodes.reverse();
    links.reverse();

    // Every node on the path is settled, so it has a label.
    let labels = nodes.iter().filter_map(|n| best[n.0].clone()).collect();

    Path {
        label,
        nodes,
        labels,
        links,
        transfer_penalty_minutes,
    }
}

/// Resolve and check a pair of station ids.
pub(crate) fn resolve_stations(
    graph: &Graph,
    from: &str,
    to: &str,
) -> Result<(StationIdx, StationIdx), RouteError> {
    let from_idx = graph
        .station_idx(from)
        .ok_or_else(|| RouteError::InvalidStation(from.to_string()))?;
    let to_idx = graph
        .station_idx(to)
        .ok_or_else(|| RouteError::InvalidStation(to.to_string()))?;
    if from_idx == to_idx {
        return Err(RouteError::SameStation);
    }
    Ok((from_idx, to_idx))
}

/// Fastest path between two distinct stations over a view.
pub(crate) fn fastest_path(view: &GraphView<'_>, from: StationIdx, to: StationIdx) -> Option<Path> {
    let mut budget = Budget::unlimited();
    shortest_path(
        view,
        &Origin::Station(from),
        to,
        &Constraints::default(),
        &mut budget,
    )
    .ok()
    .flatten()
}

/// Plan the fastest route, charging `transfer_penalty_minutes` per transfer.
pub(crate) fn plan_route(
    graph: &Graph,
    from: StationIdx,
    to: StationIdx,
    transfer_penalty_minutes: u32,
) -> Option<(Route, Path)> {
    let view = GraphView::full(graph, transfer_penalty_minutes);
    let path = fastest_path(&view, from, to)?;
    let route = to_public_route(graph, &path).ok()?;
    Some((route, path))
}

/// Fastest route between two stations.
///
/// # Errors
///
/// - [`RouteError::InvalidStation`] if either id is not in the graph
/// - [`RouteError::SameStation`] if `from == to`
/// - [`RouteError::NoPath`] if the stations aren't connected
pub fn try_calculate_route(graph: &Graph, from: &str, to: &str) -> Result<Route, RouteError> {
    let (from_idx, to_idx) = resolve_stations(graph, from, to)?;
    plan_route(graph, from_idx, to_idx, graph.transfer_penalty_minutes())
        .map(|(route, _)| route)
        .ok_or_else(|| RouteError::NoPath {
            from: graph.station_at(from_idx).id.clone(),
            to: graph.station_at(to_idx).id.clone(),
        })
}

/// Fastest route between two stations, or `None` if there is none.
///
/// Never panics on bad input; the reason for a `None` is logged at debug
/// level. Use [`try_calculate_route`] to inspect it.
pub fn calculate_route(graph: &Graph, from: &str, to: &str) -> Option<Route> {
    match try_calculate_route(graph, from, to) {
        Ok(route) => Some(route),
        Err(e) => {
            debug!(from, to, code = e.code(), "No route: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Line, Segment};
    use crate::graph::fixtures::*;
    use crate::graph::{GraphConfig, build_graph};

    fn hops(route: &Route) -> Vec<(&str, &str, &str, bool, u32)> {
        route
            .segments()
            .iter()
            .map(|s: &Segment| {
                (
                    s.from_station_id.as_str(),
                    s.to_station_id.as_str(),
                    s.line_id.as_str(),
                    s.is_transfer,
                    s.duration_minutes,
                )
            })
            .collect()
    }

    #[test]
    fn direct_route_on_one_line() {
        let graph = two_line_network();
        let route = calculate_route(&graph, "S1", "S3").unwrap();

        assert_eq!(hops(&route), vec![("S1", "S3", "1", false, 10)]);
        assert_eq!(route.total_minutes(), 10);
        assert_eq!(route.transfer_count(), 0);
        assert_eq!(route.segments()[0].stop_count, 2);
    }

    #[test]
    fn route_with_transfer() {
        let graph = two_line_network();
        let route = calculate_route(&graph, "S1", "S4").unwrap();

        assert_eq!(
            hops(&route),
            vec![("S1", "S2", "1", false, 5), ("S2", "S4", "2", true, 4)]
        );
        assert_eq!(route.transfer_count(), 1);
        assert_eq!(route.total_minutes(), 5 + 3 + 4);
    }

    #[test]
    fn reverse_direction_costs_the_same() {
        let graph = two_line_network();
        let there = calculate_route(&graph, "S1", "S4").unwrap();
        let back = calculate_route(&graph, "S4", "S1").unwrap();

        assert_eq!(there.total_minutes(), back.total_minutes());
        assert_eq!(back.from().as_str(), "S4");
        assert_eq!(back.to().as_str(), "S1");
    }

    #[test]
    fn same_station_is_none() {
        let graph = two_line_network();
        assert!(calculate_route(&graph, "S1", "S1").is_none());
        assert_eq!(
            try_calculate_route(&graph, "S1", "S1"),
            Err(RouteError::SameStation)
        );
    }

    #[test]
    fn unknown_station_is_none() {
        let graph = two_line_network();
        assert!(calculate_route(&graph, "unknown", "S1").is_none());
        assert_eq!(
            try_calculate_route(&graph, "S1", "unknown"),
            Err(RouteError::InvalidStation("unknown".into()))
        );
        assert!(calculate_route(&graph, "has space", "S1").is_none());
    }

    #[test]
    fn disconnected_is_no_path() {
        let lines = vec![line("1", &["A", "B"], 2), line("2", &["C", "D"], 2)];
        let stations = ["A", "B", "C", "D"].map(station).to_vec();
        let graph = build_graph(&lines, &stations, &GraphConfig::default()).unwrap();

        assert_eq!(
            try_calculate_route(&graph, "A", "D"),
            Err(RouteError::NoPath {
                from: station_id("A"),
                to: station_id("D"),
            })
        );
    }

    #[test]
    fn prefers_fewer_transfers_on_equal_time() {
        // Line "1": A-B-C at 3+3. Lines "2" (A-B) and "3" (B-C) at 3 each
        // with a zero transfer penalty also take 6 minutes, but change line.
        let lines = vec![
            line("1", &["A", "B", "C"], 3),
            Line::new(line_id("2"), "Line 2", vec![station_id("A"), station_id("B")])
                .with_travel_times(vec![3]),
            Line::new(line_id("3"), "Line 3", vec![station_id("B"), station_id("C")])
                .with_travel_times(vec![3]),
        ];
        let stations = ["A", "B", "C"].map(station).to_vec();
        let graph = build_graph(&lines, &stations, &GraphConfig::new(2, 0)).unwrap();

        let route = calculate_route(&graph, "A", "C").unwrap();
        assert_eq!(route.total_minutes(), 6);
        assert_eq!(route.transfer_count(), 0);
        assert_eq!(route.line_ids(), &[line_id("1")]);
    }

    #[test]
    fn prefers_smaller_line_ids_on_full_tie() {
        // Two parallel lines with identical times.
        let lines = vec![line("b", &["A", "B"], 4), line("a", &["A", "B"], 4)];
        let stations = ["A", "B"].map(station).to_vec();
        let graph = build_graph(&lines, &stations, &GraphConfig::default()).unwrap();

        let route = calculate_route(&graph, "A", "B").unwrap();
        assert_eq!(route.line_ids(), &[line_id("a")]);
    }

    #[test]
    fn transfer_penalty_can_outweigh_a_shortcut() {
        // Direct: A-B-C-D on "1" at 4/hop = 12. The shortcut via "2" (B-D
        // in 2) costs 4 + p + 2.
        let lines = vec![line("1", &["A", "B", "C", "D"], 4), line("2", &["B", "D"], 2)];
        let stations = ["A", "B", "C", "D"].map(station).to_vec();

        let cheap = build_graph(&lines, &stations, &GraphConfig::new(2, 3)).unwrap();
        let route = calculate_route(&cheap, "A", "D").unwrap();
        assert_eq!(route.total_minutes(), 9);
        assert_eq!(route.transfer_count(), 1);

        let dear = build_graph(&lines, &stations, &GraphConfig::new(2, 10)).unwrap();
        let route = calculate_route(&dear, "A", "D").unwrap();
        assert_eq!(route.total_minutes(), 12);
        assert_eq!(route.transfer_count(), 0);
    }

    #[test]
    fn label_costs_saturate() {
        let label = Label {
            minutes: u32::MAX - 1,
            transfers: 0,
            lines: vec![LineIdx(0)],
        };
        assert_eq!(label.ride(5).minutes, u32::MAX);

        let changed = label.transfer(u32::MAX, LineIdx(1));
        assert_eq!(changed.minutes, u32::MAX);
        assert_eq!(changed.transfers, 1);
        assert_eq!(changed.lines, vec![LineIdx(0), LineIdx(1)]);
    }

    #[test]
    fn longest_accepted_hops_route() {
        let lines = vec![line("1", &["A", "B", "C"], crate::graph::MAX_HOP_MINUTES)];
        let stations = ["A", "B", "C"].map(station).to_vec();
        let graph = build_graph(&lines, &stations, &GraphConfig::default()).unwrap();

        let route = calculate_route(&graph, "A", "C").unwrap();
        assert_eq!(route.total_minutes(), 2 * crate::graph::MAX_HOP_MINUTES);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let graph = lattice_network();
        let first = calculate_route(&graph, "A", "F");
        let second = calculate_route(&graph, "A", "F");
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn budget_stops_search() {
        let graph = lattice_network();
        let view = GraphView::full(&graph, 1);
        let from = graph.station_idx("A").unwrap();
        let to = graph.station_idx("F").unwrap();

        let mut budget = Budget::new(1);
        let result = shortest_path(
            &view,
            &Origin::Station(from),
            to,
            &Constraints::default(),
            &mut budget,
        );
        assert_eq!(result, Err(BudgetExceeded(1)));
    }

    #[test]
    fn banned_first_link_forces_other_line() {
        let graph = shared_origin_network();
        let view = GraphView::full(&graph, 3);
        let from = graph.station_idx("S1").unwrap();
        let to = graph.station_idx("S3").unwrap();

        let line_1 = graph.line_idx(&line_id("1")).unwrap();
        let seed_on_1 = graph.node_at(from, line_1).unwrap();

        let mut constraints = Constraints::default();
        constraints.banned_links.insert((None, seed_on_1));

        let path = shortest_path(
            &view,
            &Origin::Station(from),
            to,
            &constraints,
            &mut Budget::unlimited(),
        )
        .unwrap()
        .unwrap();

        let route = to_public_route(&graph, &path).unwrap();
        assert_eq!(route.line_ids(), &[line_id("2")]);
        assert_eq!(route.total_minutes(), 12);
    }

    #[test]
    fn path_labels_track_prefixes() {
        let graph = two_line_network();
        let view = GraphView::full(&graph, 3);
        let from = graph.station_idx("S1").unwrap();
        let to = graph.station_idx("S4").unwrap();

        let path = fastest_path(&view, from, to).unwrap();
        assert_eq!(path.labels.len(), path.nodes.len());
        assert_eq!(path.links.len(), path.nodes.len() - 1);
        assert_eq!(path.labels.first().map(|l| l.minutes), Some(0));
        assert_eq!(path.labels.last(), Some(&path.label));
        assert_eq!(path.minutes(), 12);
    }
}
