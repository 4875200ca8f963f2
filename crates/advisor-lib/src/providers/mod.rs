//! Collaborators that feed the analyzer
//!
//! The analyzer never talks to a cloud API directly. Cluster topology comes
//! from an [`InventoryProvider`] and per-group utilization summaries from a
//! [`MetricsProvider`]; both are async so real implementations can own their
//! network timeout and retry policy.

mod snapshot;

pub use snapshot::{aggregate_nodes, NodeMetrics, Snapshot, SnapshotProvider};

use crate::models::{ClusterInfo, GroupMetrics};
use anyhow::Result;
use chrono::{DateTime, Utc};

pub use async_trait::async_trait;

/// Source of cluster identity and node-group topology
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    /// List all clusters known to the provider
    async fn list_clusters(&self) -> Result<Vec<ClusterInfo>>;

    /// Look up a single cluster, `None` when it does not exist
    async fn get_cluster(&self, cluster_id: &str) -> Result<Option<ClusterInfo>>;
}

/// Source of summarized utilization for a set of nodes
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Summarize CPU and memory for `node_ids` from `start` until now
    ///
    /// `instance_count` of the result equals `node_ids.len()`.
    async fn group_metrics(&self, node_ids: &[String], start: DateTime<Utc>)
        -> Result<GroupMetrics>;
}
