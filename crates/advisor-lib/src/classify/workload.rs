//! Workload shape profiling

use crate::config::WorkloadThresholds;
use crate::models::{Category, GroupMetrics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dominant resource of a workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadProfile {
    CpuHeavy,
    MemoryHeavy,
    Balanced,
    Unknown,
}

impl WorkloadProfile {
    /// Instance category best aligned with this workload
    pub fn preferred_category(&self) -> Category {
        match self {
            WorkloadProfile::CpuHeavy => Category::Compute,
            WorkloadProfile::MemoryHeavy => Category::Memory,
            WorkloadProfile::Balanced | WorkloadProfile::Unknown => Category::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadProfile::CpuHeavy => "cpu_heavy",
            WorkloadProfile::MemoryHeavy => "memory_heavy",
            WorkloadProfile::Balanced => "balanced",
            WorkloadProfile::Unknown => "unknown",
        }
    }
}

impl fmt::Display for WorkloadProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile a group using the higher of average and p95 for each metric
pub fn determine_workload_profile(
    metrics: &GroupMetrics,
    thresholds: &WorkloadThresholds,
) -> WorkloadProfile {
    let cpu_util = metrics.cpu.average_or_zero().max(metrics.cpu.p95_or_zero());
    let mem_util = metrics
        .memory
        .average_or_zero()
        .max(metrics.memory.p95_or_zero());

    profile_utilization(cpu_util, mem_util, thresholds)
}

/// Profile from CPU and memory utilization percentages
pub fn profile_utilization(
    cpu_util: f64,
    mem_util: f64,
    thresholds: &WorkloadThresholds,
) -> WorkloadProfile {
    if cpu_util == 0.0 && mem_util == 0.0 {
        return WorkloadProfile::Unknown;
    }

    let ratio = if mem_util > 0.0 {
        cpu_util / mem_util
    } else {
        f64::INFINITY
    };

    if ratio > thresholds.cpu_heavy_ratio {
        WorkloadProfile::CpuHeavy
    } else if ratio < thresholds.memory_heavy_ratio {
        WorkloadProfile::MemoryHeavy
    } else {
        WorkloadProfile::Balanced
    }
}
