//! Shared, swappable access to the current network graph.
//!
//! Queries take a snapshot of the graph (an `Arc` clone) and run without
//! holding any lock. A rebuild constructs the new graph first and only then
//! takes the write lock to swap it in, so a query always sees one complete
//! graph, old or new.

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::domain::{
    AlternativeRoute, Disruption, DisruptionReason, Line, LineId, Route, RouteError, Station,
    TopologyError,
};
use crate::graph::{Graph, GraphConfig, build_graph};
use crate::planner::{self, AlternativeRouteOptions, AlternativeSearch};

/// Route planning over a graph that can be replaced at runtime.
#[derive(Debug)]
pub struct RouteEngine {
    graph: RwLock<Arc<Graph>>,
    config: GraphConfig,
}

impl RouteEngine {
    /// Serve queries from an already-built graph.
    ///
    /// Rebuilds use the configuration `graph` was built with.
    pub fn new(graph: Graph) -> Self {
        let config = graph.config().clone();
        Self {
            graph: RwLock::new(Arc::new(graph)),
            config,
        }
    }

    /// Build the initial graph from a catalog.
    pub fn from_catalog(catalog: &Catalog, config: GraphConfig) -> Result<Self, TopologyError> {
        let graph = build_graph(&catalog.lines, &catalog.stations, &config)?;
        info!(
            stations = graph.stations().len(),
            lines = graph.lines().len(),
            "Graph built"
        );
        Ok(Self {
            graph: RwLock::new(Arc::new(graph)),
            config,
        })
    }

    /// The graph currently serving queries.
    pub fn graph(&self) -> Arc<Graph> {
        // The lock only guards a pointer swap, so a poisoned lock still
        // holds a complete graph.
        match self.graph.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// See [`planner::calculate_route`].
    pub fn calculate_route(&self, from: &str, to: &str) -> Option<Route> {
        planner::calculate_route(&self.graph(), from, to)
    }

    /// See [`planner::try_calculate_route`].
    pub fn try_calculate_route(&self, from: &str, to: &str) -> Result<Route, RouteError> {
        planner::try_calculate_route(&self.graph(), from, to)
    }

    /// See [`planner::find_alternative_routes`].
    pub fn find_alternative_routes(
        &self,
        from: &str,
        to: &str,
        blocked_line_ids: &[LineId],
        reason: DisruptionReason,
        options: &AlternativeRouteOptions,
    ) -> Vec<AlternativeRoute> {
        planner::find_alternative_routes(&self.graph(), from, to, blocked_line_ids, reason, options)
    }

    /// See [`planner::search_alternatives`].
    pub fn search_alternatives(
        &self,
        from: &str,
        to: &str,
        blocked_line_ids: &[LineId],
        reason: DisruptionReason,
        options: &AlternativeRouteOptions,
    ) -> AlternativeSearch {
        planner::search_alternatives(&self.graph(), from, to, blocked_line_ids, reason, options)
    }

    /// Alternatives avoiding every disrupted line.
    ///
    /// See [`planner::search_for_disruptions`] for how the reason is chosen.
    pub fn alternatives_for_disruptions(
        &self,
        from: &str,
        to: &str,
        disruptions: &[Disruption],
        options: &AlternativeRouteOptions,
    ) -> Vec<AlternativeRoute> {
        self.search_disruptions(from, to, disruptions, options)
            .alternatives
    }

    /// As [`Self::alternatives_for_disruptions`], with the original route
    /// and search statistics.
    pub fn search_disruptions(
        &self,
        from: &str,
        to: &str,
        disruptions: &[Disruption],
        options: &AlternativeRouteOptions,
    ) -> AlternativeSearch {
        planner::search_for_disruptions(&self.graph(), from, to, disruptions, options)
    }

    /// Replace the graph with one built from a new catalog.
    ///
    /// On error the current graph keeps serving.
    pub fn rebuild_graph(&self, lines: &[Line], stations: &[Station]) -> Result<(), TopologyError> {
        let graph = match build_graph(lines, stations, &self.config) {
            Ok(graph) => Arc::new(graph),
            Err(e) => {
                warn!(error = %e, "Rebuild rejected; keeping current graph");
                return Err(e);
            }
        };

        let (station_count, line_count) = (graph.stations().len(), graph.lines().len());
        match self.graph.write() {
            Ok(mut guard) => *guard = graph,
            Err(poisoned) => *poisoned.into_inner() = graph,
        }
        info!(stations = station_count, lines = line_count, "Graph swapped");
        Ok(())
    }
}
