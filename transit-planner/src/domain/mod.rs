//! Domain types for the transit route planner.
//!
//! This module contains the catalog inputs (stations, lines, disruptions)
//! and the route value objects handed back to callers. Identifier types
//! enforce their invariants at construction time.

mod disruption;
mod error;
mod ids;
mod route;
mod station;

pub use disruption::{Disruption, DisruptionReason};
pub use error::{DomainError, RouteError, TopologyError};
pub use ids::{InvalidId, LineId, StationId};
pub use route::{AlternativeRoute, Route, Segment};
pub use station::{Line, Station};
