use std::net::SocketAddr;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_planner::catalog::Catalog;
use transit_planner::engine::RouteEngine;
use transit_planner::graph::GraphConfig;
use transit_planner::web::{AppState, create_router};

const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Read a numeric setting, falling back to `default` when unset.
fn env_u32(name: &str, default: u32) -> Result<u32, String> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e| format!("{name}={value:?} is not a number of minutes: {e}")),
        Err(_) => Ok(default),
    }
}

fn graph_config() -> Result<GraphConfig, String> {
    let defaults = GraphConfig::default();
    Ok(GraphConfig::new(
        env_u32("TRANSIT_HOP_MINUTES", defaults.default_hop_minutes)?,
        env_u32(
            "TRANSIT_TRANSFER_PENALTY_MINUTES",
            defaults.transfer_penalty_minutes,
        )?,
    ))
}

async fn run() -> Result<(), String> {
    let catalog_path = std::env::var("TRANSIT_CATALOG")
        .map_err(|_| "TRANSIT_CATALOG must name a catalog JSON file".to_string())?;
    let bind = std::env::var("TRANSIT_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| format!("TRANSIT_BIND={bind:?} is not a socket address: {e}"))?;
    let config = graph_config()?;

    let catalog = Catalog::load(&catalog_path).map_err(|e| e.to_string())?;
    info!(
        path = %catalog_path,
        stations = catalog.stations.len(),
        lines = catalog.lines.len(),
        "Catalog loaded"
    );

    let engine = RouteEngine::from_catalog(&catalog, config).map_err(|e| e.to_string())?;
    let app = create_router(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("failed to bind {addr}: {e}"))?;
    info!("Transit planner listening on http://{addr}");
    info!("  GET  /health           - Health check");
    info!("  GET  /api/graph        - Current graph summary");
    info!("  POST /api/graph        - Replace the graph from a catalog");
    info!("  GET  /api/route        - Fastest route (?from=&to=)");
    info!("  POST /api/alternatives - Alternatives around disruptions");

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("server error: {e}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("transit_planner=info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
