//! Node rightsizing library for managed big-data clusters
//!
//! This crate provides the core functionality for:
//! - A versioned catalog of node types with price-ordered search
//! - Sizing, workload and confidence classification of node groups
//! - Cost-saving recommendations with a deterministic best pick
//! - Cluster analysis orchestration over pluggable collaborators
//! - Bounded analysis history
//! - Health checks and observability

pub mod analyzer;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod health;
pub mod history;
pub mod models;
pub mod observability;
pub mod providers;
pub mod recommendation;
pub mod savings;

pub use analyzer::{AnalysisError, AnalysisOutcome, AnalysisRecord, Analyzer, GroupAnalysis};
pub use catalog::Catalog;
pub use config::EngineConfig;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use history::{HistoryError, HistoryStore, InMemoryHistoryStore, JsonFileHistoryStore};
pub use models::*;
pub use observability::{AdvisorMetrics, StructuredLogger};
pub use providers::{InventoryProvider, MetricsProvider, SnapshotProvider};
pub use recommendation::{RecommendationEngine, RecommendationSet};
pub use savings::{calculate_savings, Savings};
