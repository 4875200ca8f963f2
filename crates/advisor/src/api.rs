//! HTTP API for analyses, history, the catalog, health checks and metrics

use advisor_lib::{
    analyzer::{AnalysisError, AnalysisRecord, Analyzer},
    health::{components, ComponentStatus, HealthRegistry},
    history::{HistoryError, HistoryMap},
    observability::{render_metrics, AdvisorMetrics},
    Category, ClusterInfo, InstanceSpec, TemporalClass,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

pub use advisor_lib::config::DEFAULT_LOOKBACK_HOURS;

const SERVICE_NAME: &str = "node-advisor";

const LOOKBACK_OPTIONS: &[(&str, u32)] = &[
    ("Last 1 hour", 1),
    ("Last 3 hours", 3),
    ("Last 6 hours", 6),
    ("Last 12 hours", 12),
    ("Last 24 hours", 24),
    ("Last 3 days", 72),
    ("Last 7 days", 168),
    ("Last 14 days", 336),
];

/// Shared application state
pub struct AppState {
    pub analyzer: Analyzer,
    pub health_registry: HealthRegistry,
    pub metrics: AdvisorMetrics,
}

impl AppState {
    pub fn new(analyzer: Analyzer, health_registry: HealthRegistry, metrics: AdvisorMetrics) -> Self {
        Self {
            analyzer,
            health_registry,
            metrics,
        }
    }
}

/// Response envelope shared by every `/api` route
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Failed request rendered as an error envelope
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope::<()> {
            success: false,
            data: None,
            error: Some(self.message),
            message: None,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::ClusterNotFound(_) => Self::not_found(e.to_string()),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<HistoryError> for ApiError {
    fn from(e: HistoryError) -> Self {
        Self::internal(e.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::internal(format!("{:#}", e))
    }
}

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Result<impl IntoResponse, ApiError> {
    let buffer = render_metrics()?;

    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    ))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: ComponentStatus,
    pub service: String,
    pub catalog_version: String,
}

async fn api_health(State(state): State<Arc<AppState>>) -> Json<ServiceHealth> {
    let health = state.health_registry.health().await;
    Json(ServiceHealth {
        status: health.status,
        service: SERVICE_NAME.to_string(),
        catalog_version: state.analyzer.catalog().version().to_string(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LookbackOption {
    pub label: String,
    pub hours: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LookbackOptions {
    pub options: Vec<LookbackOption>,
    pub default_hours: u32,
}

async fn lookback_options() -> Json<Envelope<LookbackOptions>> {
    let options = LOOKBACK_OPTIONS
        .iter()
        .map(|(label, hours)| LookbackOption {
            label: label.to_string(),
            hours: *hours,
        })
        .collect();

    Json(Envelope::ok(LookbackOptions {
        options,
        default_hours: DEFAULT_LOOKBACK_HOURS,
    }))
}

/// Clusters split by temporal class, longest running first
#[derive(Debug, Serialize, Deserialize)]
pub struct ClusterListing {
    pub transient: Vec<ClusterInfo>,
    pub long_running: Vec<ClusterInfo>,
    pub total_count: usize,
    pub transient_count: usize,
    pub long_running_count: usize,
}

impl ClusterListing {
    pub fn from_clusters(clusters: Vec<ClusterInfo>) -> Self {
        let total_count = clusters.len();
        let (mut transient, mut long_running): (Vec<_>, Vec<_>) = clusters
            .into_iter()
            .partition(|c| c.cluster_type == TemporalClass::Transient);

        for group in [&mut transient, &mut long_running] {
            group.sort_by(|a, b| {
                b.runtime_hours
                    .partial_cmp(&a.runtime_hours)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        Self {
            transient_count: transient.len(),
            long_running_count: long_running.len(),
            total_count,
            transient,
            long_running,
        }
    }
}

async fn list_clusters(State(state): State<Arc<AppState>>) -> ApiResult<ClusterListing> {
    let clusters = match state.analyzer.inventory().list_clusters().await {
        Ok(clusters) => clusters,
        Err(e) => {
            state
                .health_registry
                .set_degraded(components::INVENTORY, format!("{:#}", e))
                .await;
            return Err(e.into());
        }
    };
    state.health_registry.set_healthy(components::INVENTORY).await;

    Ok(Json(Envelope::ok(ClusterListing::from_clusters(clusters))))
}

async fn get_cluster(
    State(state): State<Arc<AppState>>,
    Path(cluster_id): Path<String>,
) -> ApiResult<ClusterInfo> {
    let cluster = match state.analyzer.inventory().get_cluster(&cluster_id).await {
        Ok(cluster) => cluster,
        Err(e) => {
            state
                .health_registry
                .set_degraded(components::INVENTORY, format!("{:#}", e))
                .await;
            return Err(e.into());
        }
    };
    state.health_registry.set_healthy(components::INVENTORY).await;

    let cluster =
        cluster.ok_or_else(|| ApiError::not_found(format!("Cluster {} not found", cluster_id)))?;

    Ok(Json(Envelope::ok(cluster)))
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub lookback_hours: Option<u32>,
}

async fn analyze_cluster(
    State(state): State<Arc<AppState>>,
    Path(cluster_id): Path<String>,
    Query(query): Query<AnalyzeRequest>,
    body: Option<Json<AnalyzeRequest>>,
) -> ApiResult<AnalysisRecord> {
    let lookback_hours = body
        .and_then(|Json(b)| b.lookback_hours)
        .filter(|h| *h > 0)
        .or(query.lookback_hours.filter(|h| *h > 0))
        .unwrap_or(DEFAULT_LOOKBACK_HOURS);

    info!(cluster_id = %cluster_id, lookback_hours = lookback_hours, "Analysis requested");

    match state
        .analyzer
        .analyze_cluster_outcome(&cluster_id, Some(lookback_hours))
        .await
    {
        Ok(outcome) => {
            let registry = &state.health_registry;
            registry.set_healthy(components::INVENTORY).await;
            registry.set_healthy(components::METRICS_SOURCE).await;
            match &outcome.history_error {
                Some(e) => {
                    warn!(
                        component = components::HISTORY_STORE,
                        error = %e,
                        "Analysis not persisted"
                    );
                    registry
                        .set_degraded(components::HISTORY_STORE, e.to_string())
                        .await;
                }
                None => registry.set_healthy(components::HISTORY_STORE).await,
            }
            Ok(Json(Envelope::ok(outcome.record)))
        }
        Err(e) => {
            let component = match &e {
                AnalysisError::Inventory(_) => Some(components::INVENTORY),
                AnalysisError::Metrics { .. } => Some(components::METRICS_SOURCE),
                AnalysisError::History(_) => Some(components::HISTORY_STORE),
                AnalysisError::ClusterNotFound(_) => None,
            };
            if let Some(component) = component {
                warn!(component = component, error = %e, "Analysis failed on collaborator");
                state
                    .health_registry
                    .set_degraded(component, e.to_string())
                    .await;
            }
            Err(e.into())
        }
    }
}

async fn latest_analysis(
    State(state): State<Arc<AppState>>,
    Path(cluster_id): Path<String>,
) -> ApiResult<Option<AnalysisRecord>> {
    let latest = state.analyzer.history().latest(&cluster_id)?;

    let envelope = match latest {
        Some(record) => Envelope::ok(Some(record)),
        None => Envelope::ok(None).with_message("No analysis available for this cluster"),
    };

    Ok(Json(envelope))
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub cluster_id: Option<String>,
}

async fn analysis_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<HistoryMap> {
    let history = state.analyzer.history().all(query.cluster_id.as_deref())?;
    Ok(Json(Envelope::ok(history)))
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub family: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogListing {
    pub version: String,
    pub count: usize,
    pub families: Vec<String>,
    pub categories: Vec<Category>,
    pub instances: Vec<InstanceSpec>,
}

async fn list_catalog(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> ApiResult<CatalogListing> {
    let catalog = state.analyzer.catalog();

    let category = query
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e))?;

    let instances: Vec<InstanceSpec> = match (query.family.as_deref(), category) {
        (Some(family), category) => catalog
            .by_family(family)
            .into_iter()
            .filter(|spec| category.map_or(true, |c| spec.category == c))
            .cloned()
            .collect(),
        (None, Some(category)) => catalog.by_category(category).into_iter().cloned().collect(),
        (None, None) => catalog.iter().cloned().collect(),
    };

    Ok(Json(Envelope::ok(CatalogListing {
        version: catalog.version().to_string(),
        count: instances.len(),
        families: catalog.families().into_iter().map(String::from).collect(),
        categories: catalog.categories(),
        instances,
    })))
}

async fn get_instance_type(
    State(state): State<Arc<AppState>>,
    Path(instance_type): Path<String>,
) -> ApiResult<InstanceSpec> {
    let spec = state
        .analyzer
        .catalog()
        .get(&instance_type)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("Instance type {} not found", instance_type)))?;

    Ok(Json(Envelope::ok(spec)))
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/health", get(api_health))
        .route("/api/config/lookback-options", get(lookback_options))
        .route("/api/clusters", get(list_clusters))
        .route("/api/clusters/:cluster_id", get(get_cluster))
        .route("/api/clusters/:cluster_id/analyze", post(analyze_cluster))
        .route("/api/clusters/:cluster_id/analysis", get(latest_analysis))
        .route("/api/analysis/history", get(analysis_history))
        .route("/api/catalog", get(list_catalog))
        .route("/api/catalog/:instance_type", get(get_instance_type))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
