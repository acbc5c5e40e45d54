//! Alternative routes around disrupted lines.
//!
//! When the fastest route rides a blocked line, the search removes the ride
//! edges of every blocked line and runs Yen's k-shortest-paths over what is
//! left, using the solver's Dijkstra as the shortest-path primitive.
//! Candidates come out in non-decreasing cost order, which lets the search
//! stop at the first one over the caller's time cap.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, trace, warn};

use crate::domain::{AlternativeRoute, Disruption, DisruptionReason, LineId, Route};
use crate::graph::{Graph, GraphView, LinkKind, NodeIdx, StationIdx};

use super::config::AlternativeRouteOptions;
use super::rank::{rank_alternatives, to_public_alternative};
use super::solver::{
    Budget, BudgetExceeded, Constraints, Origin, Path, plan_route, resolve_stations,
    shortest_path,
};

/// Work done by one alternative-route search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Line-filtered views built. Zero when the original route avoids
    /// every blocked line.
    pub views_built: usize,
    /// Candidate paths taken from the k-shortest-paths search.
    pub paths_examined: usize,
    /// Node expansions across every shortest-path search.
    pub expansions: usize,
    /// The expansion budget ran out before the search finished.
    pub budget_exceeded: bool,
}

/// Result of an alternative-route search.
#[derive(Debug, Clone, Default)]
pub struct AlternativeSearch {
    /// Fastest route ignoring disruptions, if there is one.
    pub original: Option<Route>,
    /// Blocked lines the original route rides.
    pub affected_line_ids: Vec<LineId>,
    /// Alternatives, best first.
    pub alternatives: Vec<AlternativeRoute>,
    pub stats: SearchStats,
}

/// Alternatives to the fastest route that avoid `blocked_line_ids`.
///
/// Returns an empty list when the fastest route doesn't use a blocked line,
/// when no route avoids them, or when either station is unknown.
pub fn find_alternative_routes(
    graph: &Graph,
    from: &str,
    to: &str,
    blocked_line_ids: &[LineId],
    reason: DisruptionReason,
    options: &AlternativeRouteOptions,
) -> Vec<AlternativeRoute> {
    search_alternatives(graph, from, to, blocked_line_ids, reason, options).alternatives
}

/// As [`find_alternative_routes`], also reporting the original route and
/// search statistics.
pub fn search_alternatives(
    graph: &Graph,
    from: &str,
    to: &str,
    blocked_line_ids: &[LineId],
    reason: DisruptionReason,
    options: &AlternativeRouteOptions,
) -> AlternativeSearch {
    match original_route(graph, from, to, options) {
        Some(original) => search_around(graph, original, blocked_line_ids, reason, options),
        None => AlternativeSearch::default(),
    }
}

/// Alternatives given a live disruption list.
///
/// Every disrupted line is avoided. The reason attached to the alternatives
/// is the most severe one among disruptions on lines the original route
/// rides; if it rides none of them, no search is done.
pub fn search_for_disruptions(
    graph: &Graph,
    from: &str,
    to: &str,
    disruptions: &[Disruption],
    options: &AlternativeRouteOptions,
) -> AlternativeSearch {
    let Some(original) = original_route(graph, from, to, options) else {
        return AlternativeSearch::default();
    };

    let mut blocked: Vec<LineId> = Vec::new();
    for disruption in disruptions {
        if !blocked.contains(&disruption.line_id) {
            blocked.push(disruption.line_id.clone());
        }
    }

    let reason = disruptions
        .iter()
        .filter(|d| original.route.uses_line(&d.line_id))
        .map(|d| d.reason)
        .max_by_key(|r| r.severity());

    match reason {
        Some(reason) => search_around(graph, original, &blocked, reason, options),
        None => AlternativeSearch {
            original: Some(original.route),
            ..AlternativeSearch::default()
        },
    }
}

/// The fastest route and the path it came from.
struct Original {
    from: StationIdx,
    to: StationIdx,
    route: Route,
    path: Path,
}

fn original_route(
    graph: &Graph,
    from: &str,
    to: &str,
    options: &AlternativeRouteOptions,
) -> Option<Original> {
    if let Err(e) = options.validate() {
        debug!(from, to, "No alternatives: {}", e);
        return None;
    }

    let (from_idx, to_idx) = match resolve_stations(graph, from, to) {
        Ok(pair) => pair,
        Err(e) => {
            debug!(from, to, code = e.code(), "No alternatives: {}", e);
            return None;
        }
    };

    let penalty = options
        .transfer_penalty_minutes
        .unwrap_or(graph.transfer_penalty_minutes());
    let Some((route, path)) = plan_route(graph, from_idx, to_idx, penalty) else {
        debug!(from, to, "No alternatives: no route at all");
        return None;
    };

    Some(Original {
        from: from_idx,
        to: to_idx,
        route,
        path,
    })
}

fn search_around(
    graph: &Graph,
    original: Original,
    blocked: &[LineId],
    reason: DisruptionReason,
    options: &AlternativeRouteOptions,
) -> AlternativeSearch {
    let affected: Vec<LineId> = original
        .route
        .line_ids()
        .iter()
        .filter(|line| blocked.contains(line))
        .cloned()
        .collect();

    let mut result = AlternativeSearch {
        original: Some(original.route.clone()),
        affected_line_ids: affected,
        ..AlternativeSearch::default()
    };

    if result.affected_line_ids.is_empty() {
        debug!(
            from = %original.route.from(),
            to = %original.route.to(),
            "Route avoids every blocked line"
        );
        return result;
    }

    let view = GraphView::without_lines(graph, blocked, original.path.transfer_penalty_minutes);
    result.stats.views_built += 1;

    let original_minutes = original.route.total_minutes();
    let mut paths = KShortestPaths::new(&view, original.from, original.to, options.max_expansions);
    let mut found: Vec<AlternativeRoute> = Vec::new();

    while found.len() < options.max_alternatives {
        let path = match paths.next_path() {
            Ok(Some(path)) => path,
            Ok(None) => break,
            Err(e) => {
                warn!(
                    from = %original.route.from(),
                    to = %original.route.to(),
                    found = found.len(),
                    "Alternative search stopped: {}",
                    e
                );
                result.stats.budget_exceeded = true;
                break;
            }
        };

        let extra = path.minutes().saturating_sub(original_minutes);
        if let Some(cap) = options.max_time_difference_minutes
            && extra > cap
        {
            debug!(extra, cap, "Next candidate exceeds time cap");
            break;
        }
        result.stats.paths_examined += 1;

        if !is_well_formed(graph, &path) {
            trace!(nodes = path.nodes.len(), "Skipping path with redundant transfers");
            continue;
        }
        let Ok(alternative) =
            to_public_alternative(graph, &path, original_minutes, reason, blocked)
        else {
            continue;
        };
        if alternative.route.line_ids().iter().any(|l| blocked.contains(l)) {
            continue;
        }
        if alternative.route.segments() == original.route.segments() {
            continue;
        }
        found.push(alternative);
    }

    result.stats.expansions = paths.expansions();
    result.alternatives = rank_alternatives(found, options.max_alternatives);

    debug!(
        from = %original.route.from(),
        to = %original.route.to(),
        alternatives = result.alternatives.len(),
        expansions = result.stats.expansions,
        "Alternative search complete"
    );

    result
}

/// A path a rider would actually take: starts and ends with a ride, never
/// changes line twice in a row, and never comes back to a station it left.
fn is_well_formed(graph: &Graph, path: &Path) -> bool {
    let is_ride = |link: Option<&LinkKind>| matches!(link, Some(LinkKind::Ride { .. }));
    if !is_ride(path.links.first()) || !is_ride(path.links.last()) {
        return false;
    }

    let double_transfer = path
        .links
        .windows(2)
        .any(|pair| pair[0] == LinkKind::Transfer && pair[1] == LinkKind::Transfer);
    if double_transfer {
        return false;
    }

    let mut visited = HashSet::new();
    let mut current = None;
    for node in &path.nodes {
        let station = graph.node(*node).station;
        if current != Some(station) {
            if !visited.insert(station) {
                return false;
            }
            current = Some(station);
        }
    }
    true
}

/// Yen's k-shortest-paths, yielding one path per call.
struct KShortestPaths<'v, 'g> {
    view: &'v GraphView<'g>,
    from: StationIdx,
    to: StationIdx,
    budget: Budget,
    /// Paths already yielded, in order.
    accepted: Vec<Path>,
    /// Paths found but not yet yielded, cheapest first.
    candidates: BTreeSet<Path>,
    seen: HashSet<Vec<NodeIdx>>,
    started: bool,
}

impl<'v, 'g> KShortestPaths<'v, 'g> {
    fn new(
        view: &'v GraphView<'g>,
        from: StationIdx,
        to: StationIdx,
        max_expansions: usize,
    ) -> Self {
        Self {
            view,
            from,
            to,
            budget: Budget::new(max_expansions),
            accepted: Vec::new(),
            candidates: BTreeSet::new(),
            seen: HashSet::new(),
            started: false,
        }
    }

    fn expansions(&self) -> usize {
        self.budget.used()
    }

    /// The next cheapest path, or `None` once there are no more.
    fn next_path(&mut self) -> Result<Option<Path>, BudgetExceeded> {
        if !self.started {
            self.started = true;
            let first = shortest_path(
                self.view,
                &Origin::Station(self.from),
                self.to,
                &Constraints::default(),
                &mut self.budget,
            )?;
            if let Some(first) = first {
                self.offer(first);
            }
        } else if let Some(last) = self.accepted.last().cloned() {
            self.branch_from(&last)?;
        }

        let Some(next) = self.candidates.pop_first() else {
            return Ok(None);
        };
        self.accepted.push(next.clone());
        Ok(Some(next))
    }

    fn offer(&mut self, path: Path) {
        if self.seen.insert(path.nodes.clone()) {
            self.candidates.insert(path);
        }
    }

    /// Add the spur paths that deviate from `path`.
    ///
    /// For each prefix of `path` (the root), search from the root's last
    /// node with the root's other nodes removed, and with every link that
    /// an accepted path sharing this root took next banned.
    fn branch_from(&mut self, path: &Path) -> Result<(), BudgetExceeded> {
        let graph = self.view.graph();

        for root_len in 0..path.nodes.len() {
            let root = &path.nodes[..root_len];
            let mut constraints = Constraints::default();

            for other in &self.accepted {
                if other.nodes.len() > root_len && other.nodes[..root_len] == *root {
                    let source = root_len.checked_sub(1).map(|i| other.nodes[i]);
                    constraints
                        .banned_links
                        .insert((source, other.nodes[root_len]));
                }
            }

            let origin = match root_len.checked_sub(1) {
                None => Origin::Station(self.from),
                Some(spur) => {
                    constraints.banned_nodes.extend(root[..spur].iter().copied());
                    constraints
                        .banned_stations
                        .extend(root.iter().map(|n| graph.node(*n).station));
                    Origin::Node {
                        node: root[spur],
                        label: path.labels[spur].clone(),
                    }
                }
            };

            trace!(root_len, banned = constraints.banned_links.len(), "Spur search");
            let spur = shortest_path(self.view, &origin, self.to, &constraints, &mut self.budget)?;
            if let Some(spur) = spur {
                self.offer(join(path, root_len, spur));
            }
        }

        Ok(())
    }
}

/// Splice a spur path onto the first `root_len` nodes of `path`.
///
/// The spur starts at the root's last node and already carries the root's
/// cost in its labels.
fn join(path: &Path, root_len: usize, spur: Path) -> Path {
    let Some(keep) = root_len.checked_sub(1) else {
        return spur;
    };

    let mut nodes = path.nodes[..keep].to_vec();
    nodes.extend(spur.nodes);
    let mut labels = path.labels[..keep].to_vec();
    labels.extend(spur.labels);
    let mut links = path.links[..keep].to_vec();
    links.extend(spur.links);

    Path {
        label: spur.label,
        nodes,
        labels,
        links,
        transfer_penalty_minutes: spur.transfer_penalty_minutes,
    }
}
