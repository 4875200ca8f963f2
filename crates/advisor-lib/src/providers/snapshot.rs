//! File-backed inventory and metrics from a captured snapshot

use super::{async_trait, InventoryProvider, MetricsProvider};
use crate::models::{ClusterInfo, GroupMetrics, MetricSummary};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Per-node utilization summaries as captured by an exporter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetrics {
    #[serde(default)]
    pub cpu: MetricSummary,
    #[serde(default)]
    pub memory: MetricSummary,
    /// End of the capture window; data older than the lookback start is ignored
    #[serde(default)]
    pub collected_at: Option<DateTime<Utc>>,
}

impl NodeMetrics {
    fn has_data(&self) -> bool {
        self.cpu.datapoints > 0 || self.memory.datapoints > 0
    }
}

/// On-disk snapshot shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub clusters: Vec<ClusterInfo>,
    /// Keyed by node identifier
    #[serde(default)]
    pub node_metrics: HashMap<String, NodeMetrics>,
}

/// Serves both collaborator traits from an in-memory [`Snapshot`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotProvider {
    snapshot: Snapshot,
}

impl SnapshotProvider {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot from a JSON file
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot {:?}", path))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot {:?}", path))?;

        info!(
            path = %path.display(),
            clusters = snapshot.clusters.len(),
            nodes = snapshot.node_metrics.len(),
            "Loaded inventory snapshot"
        );

        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

#[async_trait]
impl InventoryProvider for SnapshotProvider {
    async fn list_clusters(&self) -> Result<Vec<ClusterInfo>> {
        Ok(self.snapshot.clusters.clone())
    }

    async fn get_cluster(&self, cluster_id: &str) -> Result<Option<ClusterInfo>> {
        Ok(self
            .snapshot
            .clusters
            .iter()
            .find(|c| c.id == cluster_id)
            .cloned())
    }
}

#[async_trait]
impl MetricsProvider for SnapshotProvider {
    async fn group_metrics(
        &self,
        node_ids: &[String],
        start: DateTime<Utc>,
    ) -> Result<GroupMetrics> {
        let nodes: Vec<&NodeMetrics> = node_ids
            .iter()
            .filter_map(|id| self.snapshot.node_metrics.get(id))
            .filter(|node| node.collected_at.map_or(true, |at| at >= start))
            .collect();

        let metrics = aggregate_nodes(node_ids.len(), &nodes);

        debug!(
            nodes = node_ids.len(),
            covered = metrics.instances_with_metrics,
            start = %start,
            "Aggregated snapshot metrics"
        );

        Ok(metrics)
    }
}

/// Combine per-node summaries into one group summary
///
/// A node counts as covered when it has any datapoints. Averages are the mean
/// over covered nodes, p95 is the maximum, and the peak fields come from the
/// covered node with the highest effective peak.
pub fn aggregate_nodes(instance_count: usize, nodes: &[&NodeMetrics]) -> GroupMetrics {
    let covered: Vec<&NodeMetrics> = nodes.iter().copied().filter(|n| n.has_data()).collect();
    let instance_count = u32::try_from(instance_count).unwrap_or(u32::MAX);

    if covered.is_empty() {
        return GroupMetrics::unavailable(instance_count);
    }

    let instances_with_metrics = u32::try_from(covered.len())
        .unwrap_or(u32::MAX)
        .min(instance_count);

    GroupMetrics {
        cpu: aggregate_metric(covered.iter().map(|n| &n.cpu)),
        memory: aggregate_metric(covered.iter().map(|n| &n.memory)),
        instance_count,
        instances_with_metrics,
    }
}

fn aggregate_metric<'a>(summaries: impl Iterator<Item = &'a MetricSummary> + Clone) -> MetricSummary {
    let averages: Vec<f64> = summaries.clone().filter_map(|s| s.average).collect();
    let average = (!averages.is_empty()).then(|| averages.iter().sum::<f64>() / averages.len() as f64);

    let p95 = summaries
        .clone()
        .filter_map(|s| s.p95)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));

    let datapoints = summaries.clone().map(|s| s.datapoints).sum();

    let peak_node = summaries
        .filter(|s| s.p95.is_some() || s.effective_peak.is_some())
        .max_by(|a, b| {
            a.effective_peak_or_p95()
                .partial_cmp(&b.effective_peak_or_p95())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    match peak_node {
        Some(peak) => MetricSummary {
            average,
            p95,
            effective_peak: peak.effective_peak,
            peak_type: peak.peak_type.clone(),
            effective_peak_percentile: peak.effective_peak_percentile.clone(),
            is_spike: peak.is_spike,
            duration_at_p95_minutes: peak.duration_at_p95_minutes,
            datapoints,
        },
        None => MetricSummary {
            average,
            p95,
            datapoints,
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupRole, NodeGroup, TemporalClass};
    use chrono::Duration;
    use std::io::Write;

    fn summary(average: f64, p95: f64, peak: f64, datapoints: u64) -> MetricSummary {
        MetricSummary {
            average: Some(average),
            p95: Some(p95),
            effective_peak: Some(peak),
            peak_type: Some("sustained".to_string()),
            effective_peak_percentile: Some("P95".to_string()),
            is_spike: false,
            duration_at_p95_minutes: 30.0,
            datapoints,
        }
    }

    fn node(cpu: MetricSummary, memory: MetricSummary) -> NodeMetrics {
        NodeMetrics {
            cpu,
            memory,
            collected_at: None,
        }
    }

    fn snapshot() -> Snapshot {
        let mut node_metrics = HashMap::new();
        node_metrics.insert(
            "i-1".to_string(),
            node(summary(10.0, 20.0, 18.0, 24), summary(30.0, 40.0, 38.0, 24)),
        );
        node_metrics.insert(
            "i-2".to_string(),
            node(summary(20.0, 30.0, 25.0, 24), summary(10.0, 20.0, 15.0, 24)),
        );

        Snapshot {
            clusters: vec![ClusterInfo {
                id: "j-ABC".to_string(),
                name: "etl".to_string(),
                cluster_type: TemporalClass::Transient,
                created_time: Utc::now() - Duration::hours(2),
                runtime_hours: 2.0,
                instance_groups: vec![NodeGroup {
                    id: "ig-core".to_string(),
                    name: "Core".to_string(),
                    role: GroupRole::Core,
                    instance_type: "m5.xlarge".to_string(),
                    requested_count: 3,
                    running_count: 3,
                    node_ids: vec!["i-1".into(), "i-2".into(), "i-3".into()],
                }],
            }],
            node_metrics,
        }
    }

    #[test]
    fn test_aggregate_over_covered_nodes() {
        let snap = snapshot();
        let nodes: Vec<&NodeMetrics> = snap.node_metrics.values().collect();
        let metrics = aggregate_nodes(3, &nodes);

        assert_eq!(metrics.instance_count, 3);
        assert_eq!(metrics.instances_with_metrics, 2);
        assert!(metrics.partial());

        assert_eq!(metrics.cpu.average, Some(15.0));
        assert_eq!(metrics.cpu.p95, Some(30.0));
        assert_eq!(metrics.cpu.effective_peak, Some(25.0));
        assert_eq!(metrics.cpu.datapoints, 48);

        assert_eq!(metrics.memory.average, Some(20.0));
        assert_eq!(metrics.memory.p95, Some(40.0));
        assert_eq!(metrics.memory.effective_peak, Some(38.0));
    }

    #[test]
    fn test_nodes_without_datapoints_are_uncovered() {
        let empty = node(MetricSummary::default(), MetricSummary::default());
        let metrics = aggregate_nodes(2, &[&empty]);

        assert!(!metrics.metrics_available());
        assert_eq!(metrics.instance_count, 2);
        assert_eq!(metrics.cpu.average, None);
    }

    #[test]
    fn test_peak_node_without_effective_peak_uses_p95() {
        let mut spiky = summary(5.0, 90.0, 0.0, 10);
        spiky.effective_peak = None;
        spiky.is_spike = true;
        let a = node(spiky, summary(5.0, 5.0, 5.0, 10));
        let b = node(summary(5.0, 40.0, 40.0, 10), summary(5.0, 5.0, 5.0, 10));

        let metrics = aggregate_nodes(2, &[&a, &b]);

        assert!(metrics.cpu.is_spike);
        assert_eq!(metrics.cpu.effective_peak, None);
        assert_eq!(metrics.cpu.effective_peak_or_p95(), 90.0);
    }

    #[tokio::test]
    async fn test_provider_lookups() {
        let provider = SnapshotProvider::new(snapshot());

        assert_eq!(provider.list_clusters().await.unwrap().len(), 1);
        assert!(provider.get_cluster("j-ABC").await.unwrap().is_some());
        assert!(provider.get_cluster("j-MISSING").await.unwrap().is_none());

        let ids = vec!["i-1".to_string(), "i-2".to_string(), "i-3".to_string()];
        let metrics = provider
            .group_metrics(&ids, Utc::now() - Duration::hours(4))
            .await
            .unwrap();
        assert_eq!(metrics.instances_with_metrics, 2);
        assert_eq!(metrics.instance_count, 3);
    }

    #[tokio::test]
    async fn test_stale_nodes_are_excluded() {
        let mut snap = snapshot();
        if let Some(n) = snap.node_metrics.get_mut("i-1") {
            n.collected_at = Some(Utc::now() - Duration::hours(10));
        }
        let provider = SnapshotProvider::new(snap);

        let ids = vec!["i-1".to_string(), "i-2".to_string()];
        let metrics = provider
            .group_metrics(&ids, Utc::now() - Duration::hours(4))
            .await
            .unwrap();

        assert_eq!(metrics.instances_with_metrics, 1);
        assert_eq!(metrics.cpu.average, Some(20.0));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&snapshot()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let provider = SnapshotProvider::load(file.path()).await.unwrap();
        assert_eq!(provider.snapshot().clusters[0].id, "j-ABC");
        assert_eq!(provider.snapshot().node_metrics.len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let result = SnapshotProvider::load(Path::new("/nonexistent/snapshot.json")).await;
        assert!(result.is_err());
    }
}
