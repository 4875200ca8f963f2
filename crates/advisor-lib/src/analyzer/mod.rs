//! Cluster analysis orchestration
//!
//! Fetches a cluster from the inventory, summarizes each worker group's
//! utilization over the lookback window, runs the classifiers and the
//! recommendation engine, and appends the resulting record to history.

mod record;

#[cfg(test)]
mod tests;

pub use record::{AnalysisPeriod, AnalysisRecord, GroupAnalysis, GroupMetricsReport};

use crate::catalog::Catalog;
use crate::classify::{calculate_confidence, determine_sizing_status, determine_workload_profile};
use crate::config::{EngineConfig, LookbackDefaults, DEFAULT_LOOKBACK_HOURS};
use crate::history::{HistoryError, HistoryStore};
use crate::models::{round_to, ClusterInfo, GroupMetrics, GroupRole, NodeGroup, TemporalClass};
use crate::observability::{AdvisorMetrics, StructuredLogger};
use crate::providers::{InventoryProvider, MetricsProvider};
use crate::recommendation::{GroupContext, RecommendationEngine};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

const TASK_METRICS_UNAVAILABLE: &str = "Task node metrics unavailable - nodes scale frequently \
     and EC2 only retains 3 hours of metrics data.";

/// Errors surfaced to the caller of an analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Cluster {0} not found")]
    ClusterNotFound(String),

    #[error("Inventory lookup failed: {0:#}")]
    Inventory(anyhow::Error),

    #[error("Metrics retrieval failed for group {group_id}: {error:#}")]
    Metrics {
        group_id: String,
        error: anyhow::Error,
    },

    #[error(transparent)]
    History(#[from] HistoryError),
}

impl AnalysisError {
    /// Short label used for failure metrics
    pub fn reason(&self) -> &'static str {
        match self {
            AnalysisError::ClusterNotFound(_) => "not_found",
            AnalysisError::Inventory(_) => "inventory",
            AnalysisError::Metrics { .. } => "metrics",
            AnalysisError::History(_) => "history",
        }
    }
}

/// Start of the metrics window and the lookback to record as requested
///
/// The window never reaches back before the cluster was created. A missing or
/// zero request sizes the window by the cluster's temporal class default but
/// is recorded as [`DEFAULT_LOOKBACK_HOURS`].
pub fn lookback_window(
    cluster: &ClusterInfo,
    requested_hours: Option<u32>,
    defaults: &LookbackDefaults,
    now: DateTime<Utc>,
) -> (DateTime<Utc>, u32) {
    let requested = requested_hours.filter(|h| *h > 0);
    let window_hours = requested.unwrap_or_else(|| defaults.for_class(cluster.cluster_type));

    let start = cluster
        .created_time
        .max(now - Duration::hours(i64::from(window_hours)))
        .min(now);

    (start, requested.unwrap_or(DEFAULT_LOOKBACK_HOURS))
}

/// Warning attached to groups with missing or partial metrics
fn metrics_warning(class: TemporalClass, role: GroupRole, metrics: &GroupMetrics) -> Option<String> {
    let scaling_task_group = class == TemporalClass::LongRunning && role == GroupRole::Task;

    if !metrics.metrics_available() {
        return scaling_task_group.then(|| TASK_METRICS_UNAVAILABLE.to_string());
    }

    if metrics.partial() {
        let coverage = format!(
            "Partial metrics available ({}/{} instances).",
            metrics.instances_with_metrics, metrics.instance_count
        );
        return Some(if scaling_task_group {
            format!("{} Some task nodes may have scaled recently.", coverage)
        } else {
            coverage
        });
    }

    None
}

/// A completed analysis
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub record: AnalysisRecord,
    /// History write failure tolerated because history is best effort
    pub history_error: Option<HistoryError>,
}

/// Runs cluster analyses against injected collaborators
pub struct Analyzer {
    catalog: Arc<Catalog>,
    config: EngineConfig,
    inventory: Arc<dyn InventoryProvider>,
    metrics_source: Arc<dyn MetricsProvider>,
    history: Arc<dyn HistoryStore>,
    metrics: AdvisorMetrics,
    logger: StructuredLogger,
}

impl Analyzer {
    pub fn new(
        catalog: Arc<Catalog>,
        config: EngineConfig,
        inventory: Arc<dyn InventoryProvider>,
        metrics_source: Arc<dyn MetricsProvider>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            catalog,
            config,
            inventory,
            metrics_source,
            history,
            metrics: AdvisorMetrics::new(),
            logger: StructuredLogger::new("node-advisor"),
        }
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn inventory(&self) -> &Arc<dyn InventoryProvider> {
        &self.inventory
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    /// Analyze a cluster over the requested lookback, ending now
    pub async fn analyze_cluster(
        &self,
        cluster_id: &str,
        lookback_hours: Option<u32>,
    ) -> Result<AnalysisRecord, AnalysisError> {
        self.analyze_cluster_at(cluster_id, lookback_hours, Utc::now())
            .await
    }

    /// Analyze a cluster with an explicit end of the metrics window
    pub async fn analyze_cluster_at(
        &self,
        cluster_id: &str,
        lookback_hours: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<AnalysisRecord, AnalysisError> {
        self.analyze_cluster_outcome_at(cluster_id, lookback_hours, now)
            .await
            .map(|outcome| outcome.record)
    }

    /// Like [`Analyzer::analyze_cluster`], also reporting a tolerated history failure
    pub async fn analyze_cluster_outcome(
        &self,
        cluster_id: &str,
        lookback_hours: Option<u32>,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        self.analyze_cluster_outcome_at(cluster_id, lookback_hours, Utc::now())
            .await
    }

    pub async fn analyze_cluster_outcome_at(
        &self,
        cluster_id: &str,
        lookback_hours: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let started = Instant::now();
        let result = self.run(cluster_id, lookback_hours, now).await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(outcome) => {
                self.metrics.observe_analysis_latency(elapsed);
                self.metrics.record_analysis(&outcome.record);
                self.logger.log_analysis_completed(&outcome.record, elapsed);
            }
            Err(e) => {
                self.metrics.inc_analyses_failed(e.reason());
                warn!(cluster_id = %cluster_id, error = %e, "Cluster analysis failed");
            }
        }

        result
    }

    async fn run(
        &self,
        cluster_id: &str,
        lookback_hours: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let cluster = self
            .inventory
            .get_cluster(cluster_id)
            .await
            .map_err(AnalysisError::Inventory)?
            .ok_or_else(|| AnalysisError::ClusterNotFound(cluster_id.to_string()))?;

        let (start, requested_hours) =
            lookback_window(&cluster, lookback_hours, &self.config.lookback, now);
        let actual_hours = (now - start).num_milliseconds() as f64 / 3_600_000.0;

        debug!(
            cluster_id = %cluster.id,
            start = %start,
            requested_hours = requested_hours,
            "Analyzing cluster"
        );

        let mut node_analyses = BTreeMap::new();
        for group in cluster.instance_groups.iter().filter(|g| g.role.is_analyzed()) {
            let metrics = self
                .metrics_source
                .group_metrics(&group.node_ids, start)
                .await
                .map_err(|error| AnalysisError::Metrics {
                    group_id: group.id.clone(),
                    error,
                })?;

            let analysis = self.analyze_group(&cluster, group, metrics);

            if !analysis.metrics_available {
                self.logger.log_group_metrics_unavailable(
                    &cluster.id,
                    group.role.as_str(),
                    analysis.instance_count,
                    analysis.metrics_warning.as_deref(),
                );
            }

            let mut key = group.role.to_string();
            if node_analyses.contains_key(&key) {
                key = format!("{}-{}", group.role, group.id);
            }
            node_analyses.insert(key, analysis);
        }

        let total_hourly: f64 = node_analyses
            .values()
            .map(GroupAnalysis::best_hourly_savings)
            .sum();

        let record = AnalysisRecord {
            cluster_id: cluster.id.clone(),
            cluster_name: cluster.name.clone(),
            cluster_type: cluster.cluster_type,
            runtime_hours: cluster.runtime_hours,
            analyzed_at: now,
            lookback_hours: round_to(actual_hours, 1),
            requested_lookback_hours: requested_hours,
            analysis_period: AnalysisPeriod { start, end: now },
            node_analyses,
            total_potential_hourly_savings: round_to(total_hourly, 4),
            total_potential_monthly_savings: round_to(
                total_hourly * self.config.hours_per_month,
                2,
            ),
        };

        let history_error = match self.history.append(&record.cluster_id, record.clone()) {
            Ok(()) => None,
            Err(e) => {
                self.metrics.inc_history_write_errors();
                self.logger.log_history_write_failed(
                    &record.cluster_id,
                    &e,
                    !self.config.history_best_effort,
                );
                if !self.config.history_best_effort {
                    return Err(e.into());
                }
                Some(e)
            }
        };

        Ok(AnalysisOutcome {
            record,
            history_error,
        })
    }

    /// Classify one group and generate its recommendations
    ///
    /// Groups without any reporting node carry only their raw metrics.
    pub fn analyze_group(
        &self,
        cluster: &ClusterInfo,
        group: &NodeGroup,
        metrics: GroupMetrics,
    ) -> GroupAnalysis {
        let instance_count = group.effective_node_count();
        let spec = self.catalog.get(&group.instance_type).cloned();
        let current_hourly_cost = round_to(
            spec.as_ref().map_or(0.0, |s| s.hourly_price) * f64::from(instance_count),
            4,
        );

        let metrics_available = metrics.metrics_available();
        let partial_metrics = metrics.partial();
        let metrics_warning = metrics_warning(cluster.cluster_type, group.role, &metrics);

        let mut analysis = GroupAnalysis {
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            group_type: group.role,
            instance_type: group.instance_type.clone(),
            instance_count,
            instance_specs: spec,
            current_hourly_cost,
            metrics: GroupMetricsReport {
                cpu: metrics.cpu.clone(),
                memory: metrics.memory.clone(),
                instances_analyzed: metrics.instances_with_metrics,
                total_instances: metrics.instance_count,
            },
            metrics_available,
            partial_metrics,
            metrics_warning,
            workload_profile: None,
            sizing_status: None,
            confidence: None,
            recommendations: None,
        };

        if !metrics_available {
            return analysis;
        }

        let workload_profile = determine_workload_profile(&metrics, &self.config.workload);
        let sizing_status = determine_sizing_status(&metrics, &self.config.thresholds);

        analysis.confidence = Some(calculate_confidence(
            &metrics,
            cluster.cluster_type,
            &self.config.expected_datapoints,
        ));
        analysis.recommendations = RecommendationEngine::new(&self.catalog, &self.config)
            .generate(GroupContext {
                instance_type: &group.instance_type,
                node_count: instance_count,
                metrics: &metrics,
                workload_profile,
                sizing_status,
            });
        analysis.workload_profile = Some(workload_profile);
        analysis.sizing_status = Some(sizing_status);

        analysis
    }
}
