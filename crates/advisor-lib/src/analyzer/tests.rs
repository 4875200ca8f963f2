//! Orchestrator tests against snapshot and failing collaborators

use super::*;
use crate::classify::{ConfidenceLevel, SizingStatus};
use crate::history::InMemoryHistoryStore;
use crate::models::MetricSummary;
use crate::providers::{async_trait, NodeMetrics, Snapshot, SnapshotProvider};
use crate::recommendation::CandidateSlot;
use anyhow::anyhow;
use chrono::TimeZone;
use std::collections::HashMap;
use std::sync::Mutex;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn summary(average: f64, peak: f64, datapoints: u64) -> MetricSummary {
    MetricSummary {
        average: Some(average),
        p95: Some(peak),
        effective_peak: Some(peak),
        peak_type: Some("sustained".to_string()),
        effective_peak_percentile: Some("P95".to_string()),
        is_spike: false,
        duration_at_p95_minutes: 60.0,
        datapoints,
    }
}

fn group(id: &str, role: GroupRole, instance_type: &str, nodes: &[&str]) -> NodeGroup {
    NodeGroup {
        id: id.to_string(),
        name: format!("{} group", role),
        role,
        instance_type: instance_type.to_string(),
        requested_count: nodes.len() as u32,
        running_count: nodes.len() as u32,
        node_ids: nodes.iter().map(|n| n.to_string()).collect(),
    }
}

fn cluster(id: &str, class: TemporalClass, age_hours: i64, groups: Vec<NodeGroup>) -> ClusterInfo {
    ClusterInfo {
        id: id.to_string(),
        name: format!("{}-name", id),
        cluster_type: class,
        created_time: fixed_now() - Duration::hours(age_hours),
        runtime_hours: age_hours as f64,
        instance_groups: groups,
    }
}

/// Core nodes matching the m5.4xlarge downsizing scenario
fn scenario_nodes() -> HashMap<String, NodeMetrics> {
    ["i-core-1", "i-core-2", "i-core-3"]
        .into_iter()
        .map(|id| {
            (
                id.to_string(),
                NodeMetrics {
                    cpu: summary(15.0, 20.0, 576),
                    memory: summary(10.0, 18.0, 576),
                    collected_at: None,
                },
            )
        })
        .collect()
}

fn scenario_cluster() -> ClusterInfo {
    cluster(
        "j-LONG",
        TemporalClass::LongRunning,
        240,
        vec![
            group("ig-master", GroupRole::Master, "m5.xlarge", &["i-master"]),
            group(
                "ig-core",
                GroupRole::Core,
                "m5.4xlarge",
                &["i-core-1", "i-core-2", "i-core-3"],
            ),
            group("ig-task", GroupRole::Task, "c6g.2xlarge", &["i-task-1", "i-task-2"]),
        ],
    )
}

fn analyzer_with(
    snapshot: Snapshot,
    history: Arc<dyn HistoryStore>,
    config: EngineConfig,
) -> Analyzer {
    let provider = Arc::new(SnapshotProvider::new(snapshot));
    Analyzer::new(
        Arc::new(Catalog::builtin()),
        config,
        provider.clone(),
        provider,
        history,
    )
}

fn scenario_analyzer() -> (Analyzer, Arc<InMemoryHistoryStore>) {
    let history = Arc::new(InMemoryHistoryStore::new());
    let analyzer = analyzer_with(
        Snapshot {
            clusters: vec![scenario_cluster()],
            node_metrics: scenario_nodes(),
        },
        history.clone(),
        EngineConfig::default(),
    );
    (analyzer, history)
}

struct FailingInventory;

#[async_trait]
impl InventoryProvider for FailingInventory {
    async fn list_clusters(&self) -> anyhow::Result<Vec<ClusterInfo>> {
        Err(anyhow!("inventory offline"))
    }

    async fn get_cluster(&self, _cluster_id: &str) -> anyhow::Result<Option<ClusterInfo>> {
        Err(anyhow!("inventory offline"))
    }
}

/// Records the window start of every request and reports no data
#[derive(Default)]
struct RecordingMetrics {
    starts: Mutex<Vec<DateTime<Utc>>>,
    fail: bool,
}

#[async_trait]
impl MetricsProvider for RecordingMetrics {
    async fn group_metrics(
        &self,
        node_ids: &[String],
        start: DateTime<Utc>,
    ) -> anyhow::Result<GroupMetrics> {
        if self.fail {
            return Err(anyhow!("metrics backend timed out"));
        }
        self.starts.lock().unwrap().push(start);
        Ok(GroupMetrics::unavailable(node_ids.len() as u32))
    }
}

struct BrokenHistory;

impl HistoryStore for BrokenHistory {
    fn append(&self, _cluster_id: &str, _record: AnalysisRecord) -> Result<(), HistoryError> {
        Err(HistoryError::LockPoisoned)
    }

    fn latest(&self, _cluster_id: &str) -> Result<Option<AnalysisRecord>, HistoryError> {
        Ok(None)
    }

    fn all(&self, _cluster_id: Option<&str>) -> Result<crate::history::HistoryMap, HistoryError> {
        Ok(Default::default())
    }
}

mod scenario_tests {
    use super::*;

    #[tokio::test]
    async fn test_long_running_cluster_analysis() {
        let (analyzer, history) = scenario_analyzer();

        let record = analyzer
            .analyze_cluster_at("j-LONG", Some(72), fixed_now())
            .await
            .unwrap();

        assert_eq!(record.cluster_name, "j-LONG-name");
        assert_eq!(record.lookback_hours, 72.0);
        assert_eq!(record.requested_lookback_hours, 72);
        assert_eq!(record.analysis_period.end, fixed_now());
        assert_eq!(
            record.node_analyses.keys().collect::<Vec<_>>(),
            vec!["CORE", "TASK"]
        );

        let core = &record.node_analyses["CORE"];
        assert_eq!(core.instance_count, 3);
        assert_eq!(core.current_hourly_cost, 2.304);
        assert!(core.metrics_available);
        assert!(!core.partial_metrics);
        assert!(core.metrics_warning.is_none());
        assert_eq!(core.metrics.instances_analyzed, 3);
        assert_eq!(core.sizing_status, Some(SizingStatus::HeavilyOversized));
        assert_eq!(core.confidence.as_ref().unwrap().level, ConfidenceLevel::High);

        let recs = core.recommendations.as_ref().unwrap();
        assert_eq!(recs.best_slot(), Some(CandidateSlot::CrossFamily));
        assert_eq!(
            recs.best_recommendation.as_ref().unwrap().instance_type,
            "m6g.xlarge"
        );

        let task = &record.node_analyses["TASK"];
        assert!(!task.metrics_available);
        assert_eq!(task.metrics_warning.as_deref(), Some(TASK_METRICS_UNAVAILABLE));
        assert!(task.sizing_status.is_none());
        assert!(task.workload_profile.is_none());
        assert!(task.confidence.is_none());
        assert!(task.recommendations.is_none());
        assert_eq!(task.current_hourly_cost, 0.544);

        assert_eq!(record.total_potential_hourly_savings, 1.842);
        assert_eq!(record.total_potential_monthly_savings, 1344.66);
        assert_eq!(record.recommendation_count(), 1);

        assert_eq!(history.latest("j-LONG").unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_unknown_instance_type_still_classifies() {
        let mut snapshot = Snapshot {
            clusters: vec![scenario_cluster()],
            node_metrics: scenario_nodes(),
        };
        snapshot.clusters[0].instance_groups[1].instance_type = "z9.mega".to_string();
        let analyzer = analyzer_with(
            snapshot,
            Arc::new(InMemoryHistoryStore::new()),
            EngineConfig::default(),
        );

        let record = analyzer
            .analyze_cluster_at("j-LONG", None, fixed_now())
            .await
            .unwrap();
        let core = &record.node_analyses["CORE"];

        assert_eq!(core.current_hourly_cost, 0.0);
        assert!(core.instance_specs.is_none());
        assert!(core.recommendations.is_none());
        assert_eq!(core.sizing_status, Some(SizingStatus::HeavilyOversized));
        assert_eq!(record.total_potential_hourly_savings, 0.0);
    }

    #[tokio::test]
    async fn test_partial_task_metrics_warning() {
        let mut nodes = scenario_nodes();
        nodes.insert(
            "i-task-1".to_string(),
            NodeMetrics {
                cpu: summary(50.0, 60.0, 10),
                memory: summary(40.0, 50.0, 10),
                collected_at: None,
            },
        );
        let analyzer = analyzer_with(
            Snapshot {
                clusters: vec![scenario_cluster()],
                node_metrics: nodes,
            },
            Arc::new(InMemoryHistoryStore::new()),
            EngineConfig::default(),
        );

        let record = analyzer
            .analyze_cluster_at("j-LONG", Some(72), fixed_now())
            .await
            .unwrap();
        let task = &record.node_analyses["TASK"];

        assert!(task.partial_metrics);
        assert_eq!(
            task.metrics_warning.as_deref(),
            Some("Partial metrics available (1/2 instances). Some task nodes may have scaled recently.")
        );
        assert!(task.sizing_status.is_some());
        assert_eq!(task.confidence.as_ref().unwrap().level, ConfidenceLevel::Low);
    }

    #[tokio::test]
    async fn test_duplicate_group_types_are_disambiguated() {
        let mut cluster = scenario_cluster();
        cluster
            .instance_groups
            .push(group("ig-task-spot", GroupRole::Task, "m5.xlarge", &["i-spot-1"]));
        let analyzer = analyzer_with(
            Snapshot {
                clusters: vec![cluster],
                node_metrics: scenario_nodes(),
            },
            Arc::new(InMemoryHistoryStore::new()),
            EngineConfig::default(),
        );

        let record = analyzer
            .analyze_cluster_at("j-LONG", None, fixed_now())
            .await
            .unwrap();

        assert!(record.node_analyses.contains_key("TASK"));
        assert!(record.node_analyses.contains_key("TASK-ig-task-spot"));
        assert_eq!(record.node_analyses["TASK"].group_id, "ig-task");
    }

    #[tokio::test]
    async fn test_node_count_falls_back_to_members() {
        let (analyzer, _) = scenario_analyzer();
        let cluster = scenario_cluster();
        let mut core = cluster.instance_groups[1].clone();
        core.running_count = 0;
        core.requested_count = 7;

        let analysis = analyzer.analyze_group(&cluster, &core, GroupMetrics::unavailable(3));
        assert_eq!(analysis.instance_count, 3);
        assert_eq!(analysis.current_hourly_cost, 2.304);

        core.node_ids.clear();
        let analysis = analyzer.analyze_group(&cluster, &core, GroupMetrics::unavailable(0));
        assert_eq!(analysis.instance_count, 7);
    }
}

mod lookback_tests {
    use super::*;

    fn recording_analyzer(cluster: ClusterInfo) -> (Analyzer, Arc<RecordingMetrics>) {
        let inventory = Arc::new(SnapshotProvider::new(Snapshot {
            clusters: vec![cluster],
            node_metrics: HashMap::new(),
        }));
        let metrics = Arc::new(RecordingMetrics::default());
        let analyzer = Analyzer::new(
            Arc::new(Catalog::builtin()),
            EngineConfig::default(),
            inventory,
            metrics.clone(),
            Arc::new(InMemoryHistoryStore::new()),
        );
        (analyzer, metrics)
    }

    #[tokio::test]
    async fn test_window_is_clamped_to_cluster_creation() {
        let young = cluster(
            "j-YOUNG",
            TemporalClass::LongRunning,
            2,
            vec![group("ig-core", GroupRole::Core, "m5.xlarge", &["i-1"])],
        );
        let created = young.created_time;
        let (analyzer, metrics) = recording_analyzer(young);

        let record = analyzer
            .analyze_cluster_at("j-YOUNG", Some(72), fixed_now())
            .await
            .unwrap();

        assert_eq!(record.lookback_hours, 2.0);
        assert_eq!(record.requested_lookback_hours, 72);
        assert_eq!(record.analysis_period.start, created);
        assert_eq!(*metrics.starts.lock().unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_transient_default_lookback() {
        let transient = cluster(
            "j-ETL",
            TemporalClass::Transient,
            10,
            vec![group("ig-core", GroupRole::Core, "m5.xlarge", &["i-1"])],
        );
        let (analyzer, metrics) = recording_analyzer(transient);

        let record = analyzer
            .analyze_cluster_at("j-ETL", None, fixed_now())
            .await
            .unwrap();

        assert_eq!(record.lookback_hours, 4.0);
        assert_eq!(record.requested_lookback_hours, 72);
        assert_eq!(
            metrics.starts.lock().unwrap()[0],
            fixed_now() - Duration::hours(4)
        );
    }

    #[test]
    fn test_zero_request_uses_class_default() {
        let c = cluster("j-1", TemporalClass::LongRunning, 500, vec![]);
        let (start, hours) = lookback_window(&c, Some(0), &LookbackDefaults::default(), fixed_now());

        assert_eq!(hours, 72);
        assert_eq!(start, fixed_now() - Duration::hours(72));
    }

    #[test]
    fn test_absent_request_recorded_as_default() {
        let c = cluster("j-1", TemporalClass::Transient, 10, vec![]);
        let (start, hours) = lookback_window(&c, None, &LookbackDefaults::default(), fixed_now());

        assert_eq!(hours, DEFAULT_LOOKBACK_HOURS);
        assert_eq!(start, fixed_now() - Duration::hours(4));

        let (_, explicit) = lookback_window(&c, Some(6), &LookbackDefaults::default(), fixed_now());
        assert_eq!(explicit, 6);
    }

    #[test]
    fn test_future_creation_time_yields_empty_window() {
        let mut c = cluster("j-1", TemporalClass::Transient, 0, vec![]);
        c.created_time = fixed_now() + Duration::hours(1);
        let (start, _) = lookback_window(&c, Some(6), &LookbackDefaults::default(), fixed_now());

        assert_eq!(start, fixed_now());
    }
}

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_cluster() {
        let (analyzer, _) = scenario_analyzer();
        let err = analyzer.analyze_cluster("j-NOPE", None).await.unwrap_err();

        assert!(matches!(err, AnalysisError::ClusterNotFound(ref id) if id == "j-NOPE"));
        assert_eq!(err.reason(), "not_found");
    }

    #[tokio::test]
    async fn test_inventory_failure_is_surfaced() {
        let analyzer = Analyzer::new(
            Arc::new(Catalog::builtin()),
            EngineConfig::default(),
            Arc::new(FailingInventory),
            Arc::new(RecordingMetrics::default()),
            Arc::new(InMemoryHistoryStore::new()),
        );

        let err = analyzer.analyze_cluster("j-LONG", None).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Inventory(_)));
        assert!(err.to_string().contains("inventory offline"));
    }

    #[tokio::test]
    async fn test_metrics_failure_names_group() {
        let inventory = Arc::new(SnapshotProvider::new(Snapshot {
            clusters: vec![scenario_cluster()],
            node_metrics: HashMap::new(),
        }));
        let history = Arc::new(InMemoryHistoryStore::new());
        let analyzer = Analyzer::new(
            Arc::new(Catalog::builtin()),
            EngineConfig::default(),
            inventory,
            Arc::new(RecordingMetrics {
                fail: true,
                ..Default::default()
            }),
            history.clone(),
        );

        let err = analyzer.analyze_cluster("j-LONG", None).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Metrics { ref group_id, .. } if group_id == "ig-core"));
        assert!(history.latest("j-LONG").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_failure_is_best_effort_by_default() {
        let analyzer = analyzer_with(
            Snapshot {
                clusters: vec![scenario_cluster()],
                node_metrics: scenario_nodes(),
            },
            Arc::new(BrokenHistory),
            EngineConfig::default(),
        );

        let record = analyzer.analyze_cluster("j-LONG", None).await.unwrap();
        assert_eq!(record.cluster_id, "j-LONG");

        let outcome = analyzer.analyze_cluster_outcome("j-LONG", None).await.unwrap();
        assert_eq!(outcome.record.cluster_id, "j-LONG");
        assert!(matches!(outcome.history_error, Some(HistoryError::LockPoisoned)));
    }

    #[tokio::test]
    async fn test_outcome_without_history_error() {
        let (analyzer, history) = scenario_analyzer();

        let outcome = analyzer.analyze_cluster_outcome("j-LONG", None).await.unwrap();
        assert!(outcome.history_error.is_none());
        assert_eq!(history.latest("j-LONG").unwrap(), Some(outcome.record));
    }

    #[tokio::test]
    async fn test_history_failure_can_be_fatal() {
        let analyzer = analyzer_with(
            Snapshot {
                clusters: vec![scenario_cluster()],
                node_metrics: scenario_nodes(),
            },
            Arc::new(BrokenHistory),
            EngineConfig {
                history_best_effort: false,
                ..Default::default()
            },
        );

        let err = analyzer.analyze_cluster("j-LONG", None).await.unwrap_err();
        assert!(matches!(err, AnalysisError::History(HistoryError::LockPoisoned)));
    }
}
