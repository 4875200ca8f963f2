//! Observability infrastructure for the node advisor
//!
//! Provides:
//! - Prometheus metrics (analysis latency, outcomes, surfaced recommendations, savings)
//! - Structured JSON logging with tracing

use crate::analyzer::AnalysisRecord;
use prometheus::{
    register_gauge, register_histogram, register_int_counter, register_int_counter_vec, Encoder,
    Gauge, Histogram, IntCounter, IntCounterVec, TextEncoder,
};
use std::fmt::Display;
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for analysis latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<AdvisorMetricsInner> = OnceLock::new();

struct AdvisorMetricsInner {
    analysis_latency_seconds: Histogram,
    analyses_completed: IntCounter,
    analyses_failed: IntCounterVec,
    groups_skipped: IntCounterVec,
    recommendations_surfaced: IntCounterVec,
    history_write_errors: IntCounter,
    potential_monthly_savings: Gauge,
}

impl AdvisorMetricsInner {
    fn new() -> Self {
        Self {
            analysis_latency_seconds: register_histogram!(
                "node_advisor_analysis_latency_seconds",
                "Time spent analyzing a cluster end to end",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register analysis_latency_seconds"),

            analyses_completed: register_int_counter!(
                "node_advisor_analyses_completed_total",
                "Total number of completed cluster analyses"
            )
            .expect("Failed to register analyses_completed"),

            analyses_failed: register_int_counter_vec!(
                "node_advisor_analyses_failed_total",
                "Total number of failed cluster analyses",
                &["reason"]
            )
            .expect("Failed to register analyses_failed"),

            groups_skipped: register_int_counter_vec!(
                "node_advisor_groups_skipped_total",
                "Node groups left unclassified because no node reported metrics",
                &["group_type"]
            )
            .expect("Failed to register groups_skipped"),

            recommendations_surfaced: register_int_counter_vec!(
                "node_advisor_recommendations_surfaced_total",
                "Best recommendations surfaced, by winning slot",
                &["slot"]
            )
            .expect("Failed to register recommendations_surfaced"),

            history_write_errors: register_int_counter!(
                "node_advisor_history_write_errors_total",
                "Total number of failed history store writes"
            )
            .expect("Failed to register history_write_errors"),

            potential_monthly_savings: register_gauge!(
                "node_advisor_last_potential_monthly_savings",
                "Potential monthly savings of the most recent analysis"
            )
            .expect("Failed to register potential_monthly_savings"),
        }
    }
}

/// Advisor metrics for Prometheus exposition
///
/// A lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct AdvisorMetrics {
    _private: (),
}

impl Default for AdvisorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AdvisorMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(AdvisorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &AdvisorMetricsInner {
        GLOBAL_METRICS.get_or_init(AdvisorMetricsInner::new)
    }

    pub fn observe_analysis_latency(&self, duration_secs: f64) {
        self.inner().analysis_latency_seconds.observe(duration_secs);
    }

    /// Record a completed analysis and its headline savings
    pub fn record_analysis(&self, record: &AnalysisRecord) {
        let inner = self.inner();
        inner.analyses_completed.inc();
        inner
            .potential_monthly_savings
            .set(record.total_potential_monthly_savings);

        for group in record.node_analyses.values() {
            if !group.metrics_available {
                inner
                    .groups_skipped
                    .with_label_values(&[group.group_type.as_str()])
                    .inc();
            }
            if let Some(slot) = group.recommendations.as_ref().and_then(|r| r.best_slot()) {
                inner
                    .recommendations_surfaced
                    .with_label_values(&[slot.as_str()])
                    .inc();
            }
        }
    }

    pub fn inc_analyses_failed(&self, reason: &str) {
        self.inner()
            .analyses_failed
            .with_label_values(&[reason])
            .inc();
    }

    pub fn inc_history_write_errors(&self) {
        self.inner().history_write_errors.inc();
    }
}

/// Encode the default registry in the Prometheus text format
pub fn render_metrics() -> anyhow::Result<Vec<u8>> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok(buffer)
}

/// Structured logger for advisor events
///
/// Emits consistently named events so analyses and failures can be
/// followed across log aggregation.
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Log advisor startup
    pub fn log_startup(&self, version: &str, catalog_version: &str, catalog_size: usize) {
        info!(
            event = "advisor_started",
            service = %self.service,
            advisor_version = %version,
            catalog_version = %catalog_version,
            catalog_size = catalog_size,
            "Node advisor started"
        );
    }

    /// Log advisor shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "advisor_shutdown",
            service = %self.service,
            reason = %reason,
            "Node advisor shutting down"
        );
    }

    /// Log a completed cluster analysis
    pub fn log_analysis_completed(&self, record: &AnalysisRecord, duration_secs: f64) {
        info!(
            event = "analysis_completed",
            service = %self.service,
            cluster_id = %record.cluster_id,
            cluster_type = %record.cluster_type,
            lookback_hours = record.lookback_hours,
            groups = record.node_analyses.len(),
            recommendations = record.recommendation_count(),
            potential_hourly_savings = record.total_potential_hourly_savings,
            potential_monthly_savings = record.total_potential_monthly_savings,
            duration_secs = duration_secs,
            "Cluster analysis completed"
        );
    }

    /// Log a node group that reported no metrics
    pub fn log_group_metrics_unavailable(
        &self,
        cluster_id: &str,
        group_type: &str,
        instance_count: u32,
        warning: Option<&str>,
    ) {
        warn!(
            event = "group_metrics_unavailable",
            service = %self.service,
            cluster_id = %cluster_id,
            group_type = %group_type,
            instance_count = instance_count,
            warning = ?warning,
            "No metrics for node group, skipping classification"
        );
    }

    /// Log a failed history write
    pub fn log_history_write_failed(&self, cluster_id: &str, error: &dyn Display, fatal: bool) {
        warn!(
            event = "history_write_failed",
            service = %self.service,
            cluster_id = %cluster_id,
            error = %error,
            fatal = fatal,
            "Failed to persist analysis history"
        );
    }
}
