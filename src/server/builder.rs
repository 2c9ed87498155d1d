//! Server startup and shutdown

use crate::config::Config;
use crate::core::LoggingPipeline;
use crate::server::server::HttpServer;
use crate::server::state::AppState;
use crate::utils::error::Result;
use tracing::{info, warn};

/// Build the pipeline, serve, then drain the sinks
///
/// The drain runs even when the server stops with an error.
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting scopelog demo server");

    let pipeline = LoggingPipeline::from_config(config.pipeline.clone()).await?;
    let state = AppState::new(config.clone(), pipeline.clone());
    let server = HttpServer::new(&config, state);

    info!("API endpoints:");
    info!("   GET  /health   - Health check and sink statistics");
    info!("   POST /checkout - Place an order");

    let served = server.start().await;

    let report = pipeline.shutdown().await;
    if !report.completed {
        warn!(lost = report.lost, "Shutdown deadline passed before every sink drained");
    }

    served
}
