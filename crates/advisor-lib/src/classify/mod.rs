//! Utilization classifiers
//!
//! Pure functions over a group's metric summary:
//! - Sizing status (how oversized the group is)
//! - Workload profile (CPU-bound, memory-bound or balanced)
//! - Confidence in the classification given the data volume and coverage

mod confidence;
mod sizing;
mod workload;

pub use confidence::{calculate_confidence, Confidence, ConfidenceLevel};
pub use sizing::{determine_sizing_status, SizingStatus, StatusColor};
pub use workload::{determine_workload_profile, profile_utilization, WorkloadProfile};
