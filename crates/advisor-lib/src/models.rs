//! Core data models for the node advisor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hardware category of an instance type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Compute,
    Memory,
    Storage,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Compute => "compute",
            Category::Memory => "memory",
            Category::Storage => "storage",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "general" => Ok(Category::General),
            "compute" => Ok(Category::Compute),
            "memory" => Ok(Category::Memory),
            "storage" => Ok(Category::Storage),
            other => Err(format!("unknown instance category: {}", other)),
        }
    }
}

/// Specification and on-demand price of a node type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSpec {
    #[serde(alias = "type")]
    pub identifier: String,
    pub vcpus: u32,
    pub memory_gb: f64,
    /// On-demand price per node hour
    #[serde(alias = "price")]
    pub hourly_price: f64,
    pub family: String,
    pub generation: u32,
    pub category: Category,
}

/// Summarized utilization for one metric across a node group
///
/// Percent values are in the 0-100 range. Absent values are kept as `None`
/// for reporting and read as zero for comparisons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    #[serde(default)]
    pub average: Option<f64>,
    #[serde(default)]
    pub p95: Option<f64>,
    /// Sustained peak, distinct from the raw p95
    #[serde(default)]
    pub effective_peak: Option<f64>,
    #[serde(default)]
    pub peak_type: Option<String>,
    #[serde(default)]
    pub effective_peak_percentile: Option<String>,
    #[serde(default)]
    pub is_spike: bool,
    #[serde(default)]
    pub duration_at_p95_minutes: f64,
    #[serde(default)]
    pub datapoints: u64,
}

impl MetricSummary {
    pub fn average_or_zero(&self) -> f64 {
        or_zero(self.average)
    }

    pub fn p95_or_zero(&self) -> f64 {
        or_zero(self.p95)
    }

    /// Effective peak, falling back to p95 when absent or zero
    pub fn effective_peak_or_p95(&self) -> f64 {
        let peak = or_zero(self.effective_peak);
        if peak > 0.0 {
            peak
        } else {
            self.p95_or_zero()
        }
    }
}

/// Reads an optional measurement, mapping absent and non-finite values to zero
pub(crate) fn or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Metrics for a group of identically-typed nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    pub cpu: MetricSummary,
    pub memory: MetricSummary,
    /// Total nodes in the group
    pub instance_count: u32,
    /// Nodes for which any datapoint existed
    pub instances_with_metrics: u32,
}

impl GroupMetrics {
    /// Empty metrics for a group where no node reported data
    pub fn unavailable(instance_count: u32) -> Self {
        Self {
            instance_count,
            ..Default::default()
        }
    }

    pub fn metrics_available(&self) -> bool {
        self.instances_with_metrics > 0
    }

    pub fn partial(&self) -> bool {
        self.instances_with_metrics > 0 && self.instances_with_metrics < self.instance_count
    }
}

/// Lifetime class of a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemporalClass {
    Transient,
    LongRunning,
}

impl TemporalClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemporalClass::Transient => "TRANSIENT",
            TemporalClass::LongRunning => "LONG_RUNNING",
        }
    }
}

impl fmt::Display for TemporalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a node group within a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupRole {
    Master,
    Core,
    Task,
}

impl GroupRole {
    /// Only worker groups are sized
    pub fn is_analyzed(&self) -> bool {
        matches!(self, GroupRole::Core | GroupRole::Task)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupRole::Master => "MASTER",
            GroupRole::Core => "CORE",
            GroupRole::Task => "TASK",
        }
    }
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node group as reported by the inventory provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGroup {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub role: GroupRole,
    pub instance_type: String,
    #[serde(default)]
    pub requested_count: u32,
    #[serde(default)]
    pub running_count: u32,
    #[serde(default)]
    pub node_ids: Vec<String>,
}

impl NodeGroup {
    /// Running nodes, falling back to known members and then the requested size
    pub fn effective_node_count(&self) -> u32 {
        if self.running_count > 0 {
            self.running_count
        } else if !self.node_ids.is_empty() {
            self.node_ids.len() as u32
        } else {
            self.requested_count
        }
    }
}

/// Cluster topology as reported by the inventory provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub id: String,
    pub name: String,
    pub cluster_type: TemporalClass,
    pub created_time: DateTime<Utc>,
    pub runtime_hours: f64,
    #[serde(default)]
    pub instance_groups: Vec<NodeGroup>,
}

/// Rounds to a fixed number of decimal places
///
/// Rounds the exact binary value, so a product such as `610.645` that is
/// stored just below the midpoint goes down.
pub(crate) fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", places, value).parse().unwrap_or(value)
}
