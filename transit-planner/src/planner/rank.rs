//! Route formatting and alternative ranking.
//!
//! Turns search paths over `(station, line)` nodes into the public
//! `Route` shape, and orders alternatives for presentation.

use crate::domain::{AlternativeRoute, DisruptionReason, DomainError, LineId, Route, Segment};
use crate::graph::{Graph, LineIdx, LinkKind, StationIdx};

use super::solver::Path;

/// A segment being accumulated from consecutive rides on one line.
struct OpenSegment {
    from: StationIdx,
    to: StationIdx,
    line: LineIdx,
    minutes: u32,
    stops: u32,
    is_transfer: bool,
}

impl OpenSegment {
    fn finish(self, graph: &Graph) -> Segment {
        let from = graph.station_at(self.from);
        let to = graph.station_at(self.to);
        let line = graph.line_at(self.line);
        Segment {
            from_station_id: from.id.clone(),
            from_station_name: from.name.clone(),
            to_station_id: to.id.clone(),
            to_station_name: to.name.clone(),
            line_id: line.id.clone(),
            line_name: line.name.clone(),
            is_transfer: self.is_transfer,
            duration_minutes: self.minutes,
            stop_count: self.stops,
        }
    }
}

/// Convert a search path into a public route.
///
/// Consecutive rides on one line become one segment; the segment boarded
/// right after a transfer is flagged `is_transfer`. Segments keep the
/// path's order.
///
/// # Errors
///
/// Returns `Err` if the path contains no ride at all, or if its links
/// don't join its nodes.
pub fn to_public_route(graph: &Graph, path: &Path) -> Result<Route, DomainError> {
    let in_graph = path.nodes.iter().all(|n| n.0 < graph.node_count());
    if path.links.len() + 1 != path.nodes.len() || !in_graph {
        return Err(DomainError::MalformedPath {
            nodes: path.nodes.len(),
            links: path.links.len(),
        });
    }

    let mut segments: Vec<Segment> = Vec::new();
    let mut open: Option<OpenSegment> = None;
    let mut changed_line = false;

    for (i, link) in path.links.iter().enumerate() {
        match *link {
            LinkKind::Ride { minutes } => {
                let here = graph.node(path.nodes[i]);
                let next = graph.node(path.nodes[i + 1]);
                let segment = open.get_or_insert_with(|| OpenSegment {
                    from: here.station,
                    to: here.station,
                    line: here.line,
                    minutes: 0,
                    stops: 0,
                    // A change of line before the first ride isn't a transfer
                    // from the rider's point of view.
                    is_transfer: changed_line && !segments.is_empty(),
                });
                segment.to = next.station;
                segment.minutes += minutes;
                segment.stops += 1;
                changed_line = false;
            }
            LinkKind::Transfer => {
                if let Some(segment) = open.take() {
                    segments.push(segment.finish(graph));
                }
                changed_line = true;
            }
        }
    }
    if let Some(segment) = open.take() {
        segments.push(segment.finish(graph));
    }

    Route::new(segments, path.transfer_penalty_minutes)
}

/// Convert a search path into an alternative to a route taking
/// `original_minutes`.
pub fn to_public_alternative(
    graph: &Graph,
    path: &Path,
    original_minutes: u32,
    reason: DisruptionReason,
    avoided_line_ids: &[LineId],
) -> Result<AlternativeRoute, DomainError> {
    let route = to_public_route(graph, path)?;
    Ok(AlternativeRoute {
        time_difference_minutes: route.total_minutes().saturating_sub(original_minutes),
        route,
        reason,
        avoided_line_ids: avoided_line_ids.to_vec(),
    })
}

/// Rank alternatives and keep the best `max`.
///
/// Alternatives are ranked by:
/// 1. Extra time (less is better)
/// 2. Number of transfers (fewer is better)
/// 3. Lines ridden, compared as a sequence of ids
pub fn rank_alternatives(mut alternatives: Vec<AlternativeRoute>, max: usize) -> Vec<AlternativeRoute> {
    alternatives.sort_by(|a, b| {
        a.time_difference_minutes
            .cmp(&b.time_difference_minutes)
            .then_with(|| a.route.transfer_count().cmp(&b.route.transfer_count()))
            .then_with(|| a.route.line_sequence().cmp(&b.route.line_sequence()))
    });
    alternatives.truncate(max);
    alternatives
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::fixtures::*;
    use crate::graph::NodeIdx;
    use crate::planner::solver::Label;

    /// Build a path by hand from (station, line) steps.
    fn path(graph: &Graph, steps: &[(&str, &str)], penalty: u32) -> Path {
        let nodes: Vec<NodeIdx> = steps
            .iter()
            .map(|(station, line)| {
                let s = graph.station_idx(station).unwrap();
                let l = graph.line_idx(&line_id(line)).unwrap();
                graph.node_at(s, l).unwrap()
            })
            .collect();

        let links = nodes
            .windows(2)
            .map(|pair| {
                graph
                    .links(pair[0])
                    .iter()
                    .find(|link| link.to == pair[1])
                    .unwrap()
                    .kind
            })
            .collect();

        let label = Label {
            minutes: 0,
            transfers: 0,
            lines: vec![],
        };
        Path {
            labels: vec![label.clone(); nodes.len()],
            label,
            nodes,
            links,
            transfer_penalty_minutes: penalty,
        }
    }

    #[test]
    fn merges_hops_on_one_line() {
        let graph = two_line_network();
        let p = path(&graph, &[("S1", "1"), ("S2", "1"), ("S3", "1")], 3);

        let route = to_public_route(&graph, &p).unwrap();
        assert_eq!(route.segments().len(), 1);

        let segment = &route.segments()[0];
        assert_eq!(segment.from_station_id.as_str(), "S1");
        assert_eq!(segment.from_station_name, "Station S1");
        assert_eq!(segment.to_station_id.as_str(), "S3");
        assert_eq!(segment.line_name, "Line 1");
        assert_eq!(segment.duration_minutes, 10);
        assert_eq!(segment.stop_count, 2);
        assert!(!segment.is_transfer);
    }

    #[test]
    fn splits_at_transfer() {
        let graph = two_line_network();
        let p = path(
            &graph,
            &[("S1", "1"), ("S2", "1"), ("S2", "2"), ("S4", "2"), ("S3", "2")],
            3,
        );

        let route = to_public_route(&graph, &p).unwrap();
        let segments = route.segments();
        assert_eq!(segments.len(), 2);
        assert!(!segments[0].is_transfer);
        assert!(segments[1].is_transfer);
        assert_eq!(segments[1].from_station_id.as_str(), "S2");
        assert_eq!(segments[1].duration_minutes, 8);
        assert_eq!(route.total_minutes(), 5 + 3 + 8);
    }

    #[test]
    fn leading_transfer_is_not_flagged() {
        let graph = two_line_network();
        let p = path(&graph, &[("S2", "1"), ("S2", "2"), ("S4", "2")], 3);

        let route = to_public_route(&graph, &p).unwrap();
        assert_eq!(route.segments().len(), 1);
        assert!(!route.segments()[0].is_transfer);
        assert_eq!(route.transfer_count(), 0);
    }

    #[test]
    fn path_without_rides_is_rejected() {
        let graph = two_line_network();
        let p = path(&graph, &[("S2", "1"), ("S2", "2")], 3);
        assert_eq!(to_public_route(&graph, &p), Err(DomainError::EmptyRoute));
    }

    #[test]
    fn mismatched_links_rejected() {
        let graph = two_line_network();
        let mut p = path(&graph, &[("S1", "1"), ("S2", "1"), ("S3", "1")], 3);
        p.links.push(LinkKind::Ride { minutes: 5 });

        assert_eq!(
            to_public_route(&graph, &p),
            Err(DomainError::MalformedPath { nodes: 3, links: 3 })
        );

        p.nodes.clear();
        assert!(to_public_route(&graph, &p).is_err());
    }

    #[test]
    fn node_outside_graph_rejected() {
        let graph = two_line_network();
        let mut p = path(&graph, &[("S1", "1"), ("S2", "1")], 3);
        p.nodes[1] = NodeIdx(graph.node_count());

        assert!(matches!(
            to_public_route(&graph, &p),
            Err(DomainError::MalformedPath { .. })
        ));
    }

    #[test]
    fn alternative_time_difference() {
        let graph = shared_origin_network();
        let p = path(&graph, &[("S1", "2"), ("S2", "2"), ("S4", "2"), ("S3", "2")], 3);

        let alt = to_public_alternative(
            &graph,
            &p,
            10,
            DisruptionReason::Suspension,
            &[line_id("1")],
        )
        .unwrap();
        assert_eq!(alt.route.total_minutes(), 12);
        assert_eq!(alt.time_difference_minutes, 2);
        assert_eq!(alt.reason, DisruptionReason::Suspension);
        assert_eq!(alt.avoided_line_ids, vec![line_id("1")]);
    }

    fn alternative(graph: &Graph, steps: &[(&str, &str)], original: u32) -> AlternativeRoute {
        let p = path(graph, steps, 1);
        to_public_alternative(graph, &p, original, DisruptionReason::Delay, &[]).unwrap()
    }

    #[test]
    fn ranks_by_time_then_transfers_then_lines() {
        let graph = lattice_network();
        // G direct: A-D-E-F, 12 minutes, no transfers.
        let slow = alternative(&graph, &[("A", "G"), ("D", "G"), ("E", "G"), ("F", "G")], 0);
        // R direct: A-B-C-F, 9 minutes.
        let fast = alternative(&graph, &[("A", "R"), ("B", "R"), ("C", "R"), ("F", "R")], 0);
        // R to B, Y to E, G to F: 3 + 1 + 2 + 1 + 4 = 11 minutes, two transfers.
        let mixed = alternative(
            &graph,
            &[
                ("A", "R"),
                ("B", "R"),
                ("B", "Y"),
                ("E", "Y"),
                ("E", "G"),
                ("F", "G"),
            ],
            0,
        );
        // G to D, P to C, R to F: 4 + 1 + 2 + 1 + 3 = 11 minutes, two transfers.
        let other_mixed = alternative(
            &graph,
            &[
                ("A", "G"),
                ("D", "G"),
                ("D", "P"),
                ("C", "P"),
                ("C", "R"),
                ("F", "R"),
            ],
            0,
        );

        let ranked = rank_alternatives(
            vec![slow.clone(), mixed.clone(), other_mixed.clone(), fast.clone()],
            10,
        );
        let minutes: Vec<u32> = ranked.iter().map(|a| a.time_difference_minutes).collect();
        assert_eq!(minutes, vec![9, 11, 11, 12]);

        // Equal time and transfers: G,P,R sorts before R,Y,G.
        assert_eq!(ranked[1], other_mixed);
        assert_eq!(ranked[2], mixed);
    }

    #[test]
    fn truncates_to_max() {
        let graph = lattice_network();
        let a = alternative(&graph, &[("A", "R"), ("B", "R")], 0);
        let b = alternative(&graph, &[("A", "G"), ("D", "G")], 0);

        let ranked = rank_alternatives(vec![b, a.clone()], 1);
        assert_eq!(ranked, vec![a]);
        assert!(rank_alternatives(vec![], 3).is_empty());
    }
}
