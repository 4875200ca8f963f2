//! Persisted analysis shapes

use crate::classify::{Confidence, SizingStatus, WorkloadProfile};
use crate::models::{Category, GroupRole, InstanceSpec, MetricSummary, TemporalClass};
use crate::recommendation::RecommendationSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Instance spec as older history files store it, without its own identifier
#[derive(Deserialize)]
struct StoredInstanceSpec {
    #[serde(default, alias = "type")]
    identifier: String,
    vcpus: u32,
    memory_gb: f64,
    #[serde(alias = "price")]
    hourly_price: f64,
    family: String,
    generation: u32,
    category: Category,
}

fn deserialize_instance_specs<'de, D>(deserializer: D) -> Result<Option<InstanceSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = Option::<StoredInstanceSpec>::deserialize(deserializer)?;
    Ok(stored.map(|s| InstanceSpec {
        identifier: s.identifier,
        vcpus: s.vcpus,
        memory_gb: s.memory_gb,
        hourly_price: s.hourly_price,
        family: s.family,
        generation: s.generation,
        category: s.category,
    }))
}

/// Metrics window an analysis covered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Raw utilization echoed for a group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupMetricsReport {
    pub cpu: MetricSummary,
    pub memory: MetricSummary,
    pub instances_analyzed: u32,
    pub total_instances: u32,
}

/// Analysis of one node group
///
/// Classification and recommendation fields are absent when no node of the
/// group reported metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAnalysis {
    pub group_id: String,
    pub group_name: String,
    pub group_type: GroupRole,
    pub instance_type: String,
    pub instance_count: u32,
    /// Identifier may be blank when read back from an older history file
    #[serde(default, deserialize_with = "deserialize_instance_specs")]
    pub instance_specs: Option<InstanceSpec>,
    pub current_hourly_cost: f64,
    pub metrics: GroupMetricsReport,
    pub metrics_available: bool,
    pub partial_metrics: bool,
    pub metrics_warning: Option<String>,
    pub workload_profile: Option<WorkloadProfile>,
    pub sizing_status: Option<SizingStatus>,
    pub confidence: Option<Confidence>,
    pub recommendations: Option<RecommendationSet>,
}

impl GroupAnalysis {
    /// Hourly savings of the best recommendation, zero when there is none
    pub fn best_hourly_savings(&self) -> f64 {
        self.recommendations
            .as_ref()
            .map(RecommendationSet::best_hourly_savings)
            .unwrap_or(0.0)
    }

    pub fn has_recommendation(&self) -> bool {
        self.recommendations
            .as_ref()
            .is_some_and(|r| r.best_recommendation.is_some())
    }
}

/// One completed cluster analysis, immutable once stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub cluster_id: String,
    pub cluster_name: String,
    pub cluster_type: TemporalClass,
    pub runtime_hours: f64,
    pub analyzed_at: DateTime<Utc>,
    /// Hours actually covered, never more than the cluster's age
    pub lookback_hours: f64,
    pub requested_lookback_hours: u32,
    pub analysis_period: AnalysisPeriod,
    /// Keyed by group type
    pub node_analyses: BTreeMap<String, GroupAnalysis>,
    pub total_potential_hourly_savings: f64,
    pub total_potential_monthly_savings: f64,
}

impl AnalysisRecord {
    /// Number of groups with a surfaced recommendation
    pub fn recommendation_count(&self) -> usize {
        self.node_analyses
            .values()
            .filter(|g| g.has_recommendation())
            .count()
    }

    /// Names specs stored without an identifier after their group's type
    pub(crate) fn restore_spec_identifiers(&mut self) {
        for group in self.node_analyses.values_mut() {
            if let Some(spec) = group.instance_specs.as_mut() {
                if spec.identifier.is_empty() {
                    spec.identifier = group.instance_type.clone();
                }
            }
        }
    }
}
