//! Node Advisor - rightsizing service for cluster node groups
//!
//! Loads the instance catalog and an inventory snapshot, then serves
//! analyses, history and catalog lookups over HTTP.

use advisor_lib::{
    health::{components, HealthRegistry},
    observability::{AdvisorMetrics, StructuredLogger},
    Analyzer, Catalog, JsonFileHistoryStore, SnapshotProvider,
};
use anyhow::{Context, Result};
use node_advisor::{api, config::ServiceConfig};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const ADVISOR_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting node-advisor");

    let config = ServiceConfig::load()?;
    info!(
        port = config.port,
        snapshot_path = %config.snapshot_path.display(),
        history_path = %config.history_path.display(),
        "Advisor configured"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register_all().await;

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_json_file(path)
            .with_context(|| format!("Failed to load catalog {:?}", path))?,
        None => Catalog::builtin(),
    };

    // A missing snapshot leaves the service up but not ready
    let provider = match SnapshotProvider::load(&config.snapshot_path).await {
        Ok(provider) => provider,
        Err(e) => {
            warn!(error = %format!("{:#}", e), "Inventory snapshot unavailable");
            health_registry
                .set_unhealthy(components::INVENTORY, format!("{:#}", e))
                .await;
            health_registry
                .set_unhealthy(components::METRICS_SOURCE, "No snapshot loaded")
                .await;
            SnapshotProvider::default()
        }
    };
    let provider = Arc::new(provider);

    let history = Arc::new(JsonFileHistoryStore::with_limit(
        &config.history_path,
        config.engine.history_limit,
    ));

    let metrics = AdvisorMetrics::new();
    let logger = StructuredLogger::new("node-advisor");
    logger.log_startup(ADVISOR_VERSION, catalog.version(), catalog.len());

    let analyzer = Analyzer::new(
        Arc::new(catalog),
        config.engine.clone(),
        provider.clone(),
        provider,
        history,
    )
    .with_logger(logger.clone());

    let app_state = Arc::new(api::AppState::new(
        analyzer,
        health_registry.clone(),
        metrics,
    ));

    health_registry.set_ready(true).await;

    let api_handle = tokio::spawn(api::serve(config.port, app_state));

    tokio::select! {
        result = api_handle => {
            result.context("API server task panicked")??;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            logger.log_shutdown("SIGINT received");
        }
    }

    info!("Shutting down");
    Ok(())
}
