//! Engine configuration
//!
//! Every threshold the classifiers and the recommendation engine use lives
//! here so it can be overridden from a config file or the environment.

use crate::models::TemporalClass;
use serde::{Deserialize, Serialize};

/// Default headroom added on top of the effective peak (20%)
pub const DEFAULT_HEADROOM_PERCENT: f64 = 20.0;

/// Average hours in a month used for cost projection
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Lookback recorded as requested when a caller names none
pub const DEFAULT_LOOKBACK_HOURS: u32 = 72;

/// Default number of analyses retained per cluster
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Upper bounds for one sizing tier; both must hold strictly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBounds {
    pub avg_max: f64,
    pub peak_max: f64,
}

impl TierBounds {
    pub const fn new(avg_max: f64, peak_max: f64) -> Self {
        Self { avg_max, peak_max }
    }

    pub fn contains(&self, avg: f64, peak: f64) -> bool {
        avg < self.avg_max && peak < self.peak_max
    }
}

/// Ordered sizing tiers, each more permissive than the previous one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingThresholds {
    pub heavily_oversized: TierBounds,
    pub moderately_oversized: TierBounds,
    pub right_sized: TierBounds,
}

impl Default for SizingThresholds {
    fn default() -> Self {
        Self {
            heavily_oversized: TierBounds::new(25.0, 35.0),
            moderately_oversized: TierBounds::new(50.0, 60.0),
            right_sized: TierBounds::new(70.0, 80.0),
        }
    }
}

/// CPU/memory ratio bounds for workload profiling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadThresholds {
    /// Ratio above which a workload is CPU-heavy
    pub cpu_heavy_ratio: f64,
    /// Ratio below which a workload is memory-heavy
    pub memory_heavy_ratio: f64,
}

impl Default for WorkloadThresholds {
    fn default() -> Self {
        Self {
            cpu_heavy_ratio: 1.5,
            memory_heavy_ratio: 0.67,
        }
    }
}

/// Datapoints expected for full confidence, CPU and memory combined
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectedDatapoints {
    /// ~4 hours at 5-minute resolution, two metrics
    pub transient: u64,
    /// ~3 days at 5-minute resolution, two metrics
    pub long_running: u64,
}

impl ExpectedDatapoints {
    pub fn for_class(&self, class: TemporalClass) -> u64 {
        match class {
            TemporalClass::Transient => self.transient,
            TemporalClass::LongRunning => self.long_running,
        }
    }
}

impl Default for ExpectedDatapoints {
    fn default() -> Self {
        Self {
            transient: 48 * 2,
            long_running: 864 * 2,
        }
    }
}

/// Default metric lookback per cluster class, in hours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookbackDefaults {
    pub transient_hours: u32,
    pub long_running_hours: u32,
}

impl LookbackDefaults {
    pub fn for_class(&self, class: TemporalClass) -> u32 {
        match class {
            TemporalClass::Transient => self.transient_hours,
            TemporalClass::LongRunning => self.long_running_hours,
        }
    }
}

impl Default for LookbackDefaults {
    fn default() -> Self {
        Self {
            transient_hours: 4,
            long_running_hours: DEFAULT_LOOKBACK_HOURS,
        }
    }
}

/// Configuration consumed by the analysis engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub thresholds: SizingThresholds,
    /// Safety margin over the effective peak, in percent
    pub headroom_percent: f64,
    pub expected_datapoints: ExpectedDatapoints,
    pub workload: WorkloadThresholds,
    pub hours_per_month: f64,
    /// Analyses retained per cluster in the history store
    pub history_limit: usize,
    pub lookback: LookbackDefaults,
    /// Log and continue when the history store cannot be written
    pub history_best_effort: bool,
}

impl EngineConfig {
    pub fn headroom_multiplier(&self) -> f64 {
        1.0 + self.headroom_percent / 100.0
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: SizingThresholds::default(),
            headroom_percent: DEFAULT_HEADROOM_PERCENT,
            expected_datapoints: ExpectedDatapoints::default(),
            workload: WorkloadThresholds::default(),
            hours_per_month: HOURS_PER_MONTH,
            history_limit: DEFAULT_HISTORY_LIMIT,
            lookback: LookbackDefaults::default(),
            history_best_effort: true,
        }
    }
}
