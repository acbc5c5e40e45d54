//! Query-time views over a graph.

use crate::domain::LineId;

use super::{Graph, LineIdx, Link, LinkKind, NodeIdx};

/// A read-only view of a graph as one query sees it.
///
/// The view fixes the transfer penalty for the query and may hide the ride
/// edges of blocked lines. Transfer edges are never hidden; a transfer onto
/// a blocked line leads to a node with no rides out of it.
#[derive(Debug, Clone)]
pub struct GraphView<'g> {
    graph: &'g Graph,
    blocked: Vec<bool>,
    transfer_penalty_minutes: u32,
}

impl<'g> GraphView<'g> {
    /// A view of the whole graph.
    pub fn full(graph: &'g Graph, transfer_penalty_minutes: u32) -> Self {
        Self {
            graph,
            blocked: vec![false; graph.lines().len()],
            transfer_penalty_minutes,
        }
    }

    /// A view with every ride edge on `blocked` lines removed.
    ///
    /// Ids that aren't lines of this graph are ignored.
    pub fn without_lines(
        graph: &'g Graph,
        blocked: &[LineId],
        transfer_penalty_minutes: u32,
    ) -> Self {
        let mut view = Self::full(graph, transfer_penalty_minutes);
        for id in blocked {
            if let Some(idx) = graph.line_idx(id) {
                view.blocked[idx.0] = true;
            }
        }
        view
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn transfer_penalty_minutes(&self) -> u32 {
        self.transfer_penalty_minutes
    }

    pub fn is_blocked(&self, line: LineIdx) -> bool {
        self.blocked[line.0]
    }

    /// Usable links out of `node` with their cost in minutes.
    pub fn links(&self, node: NodeIdx) -> impl Iterator<Item = (Link, u32)> + '_ {
        let line = self.graph.node(node).line;
        let blocked = self.is_blocked(line);
        self.graph
            .links(node)
            .iter()
            .filter_map(move |link| match link.kind {
                LinkKind::Ride { .. } if blocked => None,
                LinkKind::Ride { minutes } => Some((*link, minutes)),
                LinkKind::Transfer => Some((*link, self.transfer_penalty_minutes)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::fixtures::*;

    #[test]
    fn full_view_keeps_every_link() {
        let graph = two_line_network();
        let view = GraphView::full(&graph, 3);

        for i in 0..graph.node_count() {
            let node = NodeIdx(i);
            assert_eq!(view.links(node).count(), graph.links(node).len());
        }
    }

    #[test]
    fn blocked_line_loses_rides_but_keeps_transfers() {
        let graph = two_line_network();
        let view = GraphView::without_lines(&graph, &[line_id("1")], 3);

        let s2 = graph.station_idx("S2").unwrap();
        let line_1 = graph.line_idx(&line_id("1")).unwrap();
        let on_line_1 = graph.node_at(s2, line_1).unwrap();

        let links: Vec<(Link, u32)> = view.links(on_line_1).collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].0.kind, LinkKind::Transfer);
        assert_eq!(links[0].1, 3);
    }

    #[test]
    fn transfer_cost_follows_view_penalty() {
        let graph = two_line_network();
        let view = GraphView::full(&graph, 11);

        let s2 = graph.station_idx("S2").unwrap();
        let node = graph.nodes_at(s2)[0];
        let transfer_cost = view
            .links(node)
            .find(|(link, _)| link.kind == LinkKind::Transfer)
            .map(|(_, cost)| cost);
        assert_eq!(transfer_cost, Some(11));
    }

    #[test]
    fn unknown_blocked_ids_ignored() {
        let graph = two_line_network();
        let view = GraphView::without_lines(&graph, &[line_id("99")], 3);
        assert!((0..graph.lines().len()).all(|i| !view.is_blocked(LineIdx(i))));
    }
}
