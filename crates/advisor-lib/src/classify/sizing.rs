//! Sizing status classification

use crate::config::SizingThresholds;
use crate::models::GroupMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How well a node group's size matches its observed load
///
/// Serialized as an object carrying the status key together with its label,
/// description, display color and downsizing aggressiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "SizingStatusRecord", try_from = "SizingStatusRecord")]
pub enum SizingStatus {
    HeavilyOversized,
    ModeratelyOversized,
    RightSized,
    Undersized,
}

/// Display priority of a sizing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Danger,
    Warning,
    Success,
    Info,
}

impl SizingStatus {
    pub fn key(&self) -> &'static str {
        match self {
            SizingStatus::HeavilyOversized => "heavily_oversized",
            SizingStatus::ModeratelyOversized => "moderately_oversized",
            SizingStatus::RightSized => "right_sized",
            SizingStatus::Undersized => "undersized",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizingStatus::HeavilyOversized => "Heavily Oversized",
            SizingStatus::ModeratelyOversized => "Moderately Oversized",
            SizingStatus::RightSized => "Right-Sized",
            SizingStatus::Undersized => "Potentially Undersized",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SizingStatus::HeavilyOversized => "Instance is significantly larger than needed",
            SizingStatus::ModeratelyOversized => "Instance is larger than needed",
            SizingStatus::RightSized => "Instance size matches workload requirements",
            SizingStatus::Undersized => "Instance may need more resources",
        }
    }

    pub fn color(&self) -> StatusColor {
        match self {
            SizingStatus::HeavilyOversized => StatusColor::Danger,
            SizingStatus::ModeratelyOversized => StatusColor::Warning,
            SizingStatus::RightSized => StatusColor::Success,
            SizingStatus::Undersized => StatusColor::Info,
        }
    }

    /// Recommended downsizing steps; negative means grow
    pub fn downsizing_levels(&self) -> i8 {
        match self {
            SizingStatus::HeavilyOversized => 2,
            SizingStatus::ModeratelyOversized => 1,
            SizingStatus::RightSized => 0,
            SizingStatus::Undersized => -1,
        }
    }

    pub fn is_oversized(&self) -> bool {
        self.downsizing_levels() > 0
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "heavily_oversized" => Some(SizingStatus::HeavilyOversized),
            "moderately_oversized" => Some(SizingStatus::ModeratelyOversized),
            "right_sized" => Some(SizingStatus::RightSized),
            "undersized" => Some(SizingStatus::Undersized),
            _ => None,
        }
    }
}

impl fmt::Display for SizingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Serialize, Deserialize)]
struct SizingStatusRecord {
    status: String,
    label: String,
    description: String,
    color: StatusColor,
    downsizing_levels: i8,
}

impl From<SizingStatus> for SizingStatusRecord {
    fn from(status: SizingStatus) -> Self {
        Self {
            status: status.key().to_string(),
            label: status.label().to_string(),
            description: status.description().to_string(),
            color: status.color(),
            downsizing_levels: status.downsizing_levels(),
        }
    }
}

impl TryFrom<SizingStatusRecord> for SizingStatus {
    type Error = String;

    fn try_from(record: SizingStatusRecord) -> Result<Self, Self::Error> {
        SizingStatus::from_key(&record.status)
            .ok_or_else(|| format!("unknown sizing status: {}", record.status))
    }
}

/// Classify a group by the higher of its CPU and memory utilization
///
/// Returns the first tier whose average and peak bounds both hold strictly,
/// or `Undersized` when none does.
pub fn determine_sizing_status(metrics: &GroupMetrics, thresholds: &SizingThresholds) -> SizingStatus {
    let effective_avg = metrics
        .cpu
        .average_or_zero()
        .max(metrics.memory.average_or_zero());
    let effective_peak = metrics
        .cpu
        .effective_peak_or_p95()
        .max(metrics.memory.effective_peak_or_p95());

    let tiers = [
        (&thresholds.heavily_oversized, SizingStatus::HeavilyOversized),
        (&thresholds.moderately_oversized, SizingStatus::ModeratelyOversized),
        (&thresholds.right_sized, SizingStatus::RightSized),
    ];

    tiers
        .iter()
        .find(|(bounds, _)| bounds.contains(effective_avg, effective_peak))
        .map(|(_, status)| *status)
        .unwrap_or(SizingStatus::Undersized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TierBounds;
    use crate::models::MetricSummary;

    fn metrics(cpu_avg: f64, cpu_peak: f64, mem_avg: f64, mem_peak: f64) -> GroupMetrics {
        GroupMetrics {
            cpu: MetricSummary {
                average: Some(cpu_avg),
                p95: Some(cpu_peak),
                effective_peak: Some(cpu_peak),
                datapoints: 10,
                ..Default::default()
            },
            memory: MetricSummary {
                average: Some(mem_avg),
                p95: Some(mem_peak),
                effective_peak: Some(mem_peak),
                datapoints: 10,
                ..Default::default()
            },
            instance_count: 1,
            instances_with_metrics: 1,
        }
    }

    fn classify(m: &GroupMetrics) -> SizingStatus {
        determine_sizing_status(m, &SizingThresholds::default())
    }

    #[test]
    fn test_heavily_oversized() {
        assert_eq!(classify(&metrics(15.0, 20.0, 10.0, 18.0)), SizingStatus::HeavilyOversized);
        assert_eq!(classify(&metrics(24.99, 34.99, 0.0, 0.0)), SizingStatus::HeavilyOversized);
    }

    #[test]
    fn test_boundaries_are_strict() {
        assert_eq!(classify(&metrics(25.0, 30.0, 0.0, 0.0)), SizingStatus::ModeratelyOversized);
        assert_eq!(classify(&metrics(10.0, 35.0, 0.0, 0.0)), SizingStatus::ModeratelyOversized);
        assert_eq!(classify(&metrics(50.0, 55.0, 0.0, 0.0)), SizingStatus::RightSized);
        assert_eq!(classify(&metrics(69.0, 80.0, 0.0, 0.0)), SizingStatus::Undersized);
    }

    #[test]
    fn test_higher_metric_wins() {
        // Memory drives the classification even with idle CPU
        assert_eq!(classify(&metrics(5.0, 8.0, 45.0, 55.0)), SizingStatus::ModeratelyOversized);
        assert_eq!(classify(&metrics(5.0, 8.0, 65.0, 75.0)), SizingStatus::RightSized);
    }

    #[test]
    fn test_uses_p95_when_effective_peak_missing() {
        let mut m = metrics(10.0, 0.0, 10.0, 0.0);
        m.cpu.effective_peak = None;
        m.cpu.p95 = Some(90.0);
        assert_eq!(classify(&m), SizingStatus::Undersized);
    }

    #[test]
    fn test_empty_metrics_are_heavily_oversized() {
        assert_eq!(classify(&GroupMetrics::default()), SizingStatus::HeavilyOversized);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = SizingThresholds {
            heavily_oversized: TierBounds::new(10.0, 15.0),
            ..Default::default()
        };
        let m = metrics(15.0, 20.0, 10.0, 18.0);
        assert_eq!(
            determine_sizing_status(&m, &thresholds),
            SizingStatus::ModeratelyOversized
        );
    }

    #[test]
    fn test_status_attributes() {
        assert_eq!(SizingStatus::HeavilyOversized.downsizing_levels(), 2);
        assert_eq!(SizingStatus::Undersized.downsizing_levels(), -1);
        assert_eq!(SizingStatus::RightSized.color(), StatusColor::Success);
        assert!(SizingStatus::ModeratelyOversized.is_oversized());
        assert!(!SizingStatus::RightSized.is_oversized());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(SizingStatus::ModeratelyOversized).unwrap();
        assert_eq!(json["status"], "moderately_oversized");
        assert_eq!(json["label"], "Moderately Oversized");
        assert_eq!(json["color"], "warning");
        assert_eq!(json["downsizing_levels"], 1);

        let back: SizingStatus = serde_json::from_value(json).unwrap();
        assert_eq!(back, SizingStatus::ModeratelyOversized);
    }
}
