//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::domain::{Route, RouteError, TopologyError};
use crate::planner::{self, AlternativeRouteOptions, InvalidOptions, resolve_stations};

use super::dto::*;
use super::state::AppState;

/// Most alternatives one request may ask for.
const MAX_ALTERNATIVES_PER_REQUEST: usize = 10;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/graph", get(graph_info).post(rebuild_graph))
        .route("/api/route", get(plan_route))
        .route("/api/alternatives", post(alternatives))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Describe the graph currently serving queries.
async fn graph_info(State(state): State<AppState>) -> Json<GraphInfo> {
    Json(GraphInfo::from_graph(&state.engine.graph()))
}

/// Fastest route between two stations.
async fn plan_route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<Route>, AppError> {
    let route = state.engine.try_calculate_route(&query.from, &query.to)?;
    Ok(Json(route))
}

/// Alternatives avoiding the disrupted lines.
///
/// Unknown or identical stations are rejected up front; a pair with no
/// route at all gets an empty response. The search runs on the blocking
/// pool with its size held to the server's limits.
async fn alternatives(
    State(state): State<AppState>,
    Json(mut req): Json<AlternativesRequest>,
) -> Result<Json<AlternativesResponse>, AppError> {
    let graph = state.engine.graph();
    resolve_stations(&graph, &req.from, &req.to)?;
    let options = request_options(req.options.take())?;

    let (search, req) = tokio::task::spawn_blocking(move || {
        let search =
            planner::search_for_disruptions(&graph, &req.from, &req.to, &req.disruptions, &options);
        (search, req)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("alternative search failed: {e}"),
    })?;
    debug!(
        from = %req.from,
        to = %req.to,
        disruptions = req.disruptions.len(),
        alternatives = search.alternatives.len(),
        "Alternatives served"
    );

    Ok(Json(AlternativesResponse::from_search(search)))
}

/// Validate caller options and hold them to the server's search limits.
fn request_options(
    options: Option<AlternativeRouteOptions>,
) -> Result<AlternativeRouteOptions, AppError> {
    let options = options.unwrap_or_default();
    options.validate()?;
    let limits = AlternativeRouteOptions::new(MAX_ALTERNATIVES_PER_REQUEST);
    Ok(options.capped(&limits))
}

/// Replace the graph from a new catalog.
async fn rebuild_graph(
    State(state): State<AppState>,
    Json(catalog): Json<Catalog>,
) -> Result<StatusCode, AppError> {
    state
        .engine
        .rebuild_graph(&catalog.lines, &catalog.stations)?;
    info!(
        stations = catalog.stations.len(),
        lines = catalog.lines.len(),
        "Catalog accepted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String, code: &'static str },
    NotFound { message: String, code: &'static str },
    Unprocessable { message: String, code: &'static str },
    Internal { message: String },
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        let code = e.code();
        match &e {
            RouteError::InvalidStation(_) | RouteError::SameStation => AppError::BadRequest {
                message: e.to_string(),
                code,
            },
            RouteError::NoPath { .. } => AppError::NotFound {
                message: e.to_string(),
                code,
            },
        }
    }
}

impl From<InvalidOptions> for AppError {
    fn from(e: InvalidOptions) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
            code: "INVALID_OPTIONS",
        }
    }
}

impl From<TopologyError> for AppError {
    fn from(e: TopologyError) -> Self {
        AppError::Unprocessable {
            message: e.to_string(),
            code: "INVALID_TOPOLOGY",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, code) = match self {
            AppError::BadRequest { message, code } => (StatusCode::BAD_REQUEST, message, code),
            AppError::NotFound { message, code } => (StatusCode::NOT_FOUND, message, code),
            AppError::Unprocessable { message, code } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message, code)
            }
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, "INTERNAL")
            }
        };

        warn!(status = %status, code, "{}", message);

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
        });
        (status, body).into_response()
    }
}
