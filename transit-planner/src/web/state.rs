//! Application state for the web layer.

use std::sync::Arc;

use crate::engine::RouteEngine;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Route engine holding the current graph
    pub engine: Arc<RouteEngine>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(engine: RouteEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
