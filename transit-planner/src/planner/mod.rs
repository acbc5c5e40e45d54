//! Route planning over a network graph.
//!
//! [`calculate_route`] answers "what is the fastest way from A to B?",
//! charging a penalty for every change of line. [`find_alternative_routes`]
//! answers "and if these lines are disrupted?" by searching the graph with
//! the disrupted lines' rides removed.

mod alternatives;
mod config;
mod rank;
mod solver;

pub use alternatives::{
    AlternativeSearch, SearchStats, find_alternative_routes, search_alternatives,
    search_for_disruptions,
};
pub use config::{AlternativeRouteOptions, InvalidOptions};
pub use rank::{rank_alternatives, to_public_alternative, to_public_route};
pub(crate) use solver::resolve_stations;
pub use solver::{
    Budget, BudgetExceeded, Constraints, Label, Origin, Path, calculate_route, shortest_path,
    try_calculate_route,
};
