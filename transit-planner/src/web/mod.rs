//! Web layer for the transit route planner.
//!
//! Provides JSON endpoints for route queries, disruption alternatives and
//! graph rebuilds.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
