//! Confidence scoring based on data volume and instance coverage

use crate::config::ExpectedDatapoints;
use crate::models::{round_to, GroupMetrics, TemporalClass};
use serde::{Deserialize, Serialize};

const DATA_WEIGHT: f64 = 0.6;
const COVERAGE_WEIGHT: f64 = 0.4;

const HIGH_CONFIDENCE: f64 = 0.8;
const MEDIUM_CONFIDENCE: f64 = 0.5;

/// Coarse confidence bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

/// Confidence in a group's classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub level: ConfidenceLevel,
    /// Weighted score in [0, 1], rounded to 2 decimals
    pub score: f64,
    pub data_score: f64,
    pub coverage_score: f64,
    /// Why the score is degraded, or a single affirmative note; never empty
    pub reasons: Vec<String>,
}

/// Score confidence from datapoint volume and instance coverage
pub fn calculate_confidence(
    metrics: &GroupMetrics,
    class: TemporalClass,
    expected: &ExpectedDatapoints,
) -> Confidence {
    let coverage_score = if metrics.instance_count > 0 {
        f64::from(metrics.instances_with_metrics) / f64::from(metrics.instance_count)
    } else {
        0.0
    };

    let total_datapoints = metrics.cpu.datapoints.saturating_add(metrics.memory.datapoints);
    let expected_datapoints = expected.for_class(class);
    let data_score = if expected_datapoints > 0 {
        (total_datapoints as f64 / expected_datapoints as f64).min(1.0)
    } else {
        0.0
    };

    let score = DATA_WEIGHT * data_score + COVERAGE_WEIGHT * coverage_score;

    let level = if score >= HIGH_CONFIDENCE {
        ConfidenceLevel::High
    } else if score >= MEDIUM_CONFIDENCE {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    };

    let mut reasons = Vec::new();
    if data_score < 0.5 {
        reasons.push("Limited metric data available".to_string());
    }
    if coverage_score < 1.0 {
        reasons.push(format!(
            "Metrics from {}/{} instances",
            metrics.instances_with_metrics, metrics.instance_count
        ));
    }
    if reasons.is_empty() {
        reasons.push("Sufficient data for analysis".to_string());
    }

    Confidence {
        level,
        score: round_to(score, 2),
        data_score: round_to(data_score, 2),
        coverage_score: round_to(coverage_score, 2),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricSummary;

    fn metrics(cpu_dp: u64, mem_dp: u64, covered: u32, total: u32) -> GroupMetrics {
        GroupMetrics {
            cpu: MetricSummary {
                datapoints: cpu_dp,
                ..Default::default()
            },
            memory: MetricSummary {
                datapoints: mem_dp,
                ..Default::default()
            },
            instance_count: total,
            instances_with_metrics: covered,
        }
    }

    fn score(m: &GroupMetrics, class: TemporalClass) -> Confidence {
        calculate_confidence(m, class, &ExpectedDatapoints::default())
    }

    #[test]
    fn test_zero_everything_is_low() {
        let confidence = score(&metrics(0, 0, 0, 0), TemporalClass::Transient);

        assert_eq!(confidence.score, 0.0);
        assert_eq!(confidence.level, ConfidenceLevel::Low);
        assert_eq!(confidence.reasons.len(), 2);
        assert_eq!(confidence.reasons[0], "Limited metric data available");
        assert_eq!(confidence.reasons[1], "Metrics from 0/0 instances");
    }

    #[test]
    fn test_full_data_is_high() {
        let confidence = score(&metrics(48, 48, 3, 3), TemporalClass::Transient);

        assert_eq!(confidence.level, ConfidenceLevel::High);
        assert_eq!(confidence.score, 1.0);
        assert_eq!(confidence.reasons, vec!["Sufficient data for analysis".to_string()]);
    }

    #[test]
    fn test_data_score_is_capped() {
        let confidence = score(&metrics(5000, 5000, 1, 1), TemporalClass::LongRunning);
        assert_eq!(confidence.data_score, 1.0);
    }

    #[test]
    fn test_long_running_expects_more_data() {
        let transient = score(&metrics(48, 48, 2, 2), TemporalClass::Transient);
        let long_running = score(&metrics(48, 48, 2, 2), TemporalClass::LongRunning);

        assert_eq!(transient.level, ConfidenceLevel::High);
        // 96 / 1728 = 0.056 -> 0.6 * 0.056 + 0.4 = 0.43
        assert_eq!(long_running.level, ConfidenceLevel::Low);
        assert_eq!(long_running.score, 0.43);
        assert_eq!(long_running.reasons, vec!["Limited metric data available".to_string()]);
    }

    #[test]
    fn test_partial_coverage_is_medium() {
        let confidence = score(&metrics(48, 48, 1, 4), TemporalClass::Transient);

        // 0.6 + 0.4 * 0.25 = 0.7
        assert_eq!(confidence.level, ConfidenceLevel::Medium);
        assert_eq!(confidence.coverage_score, 0.25);
        assert_eq!(confidence.reasons, vec!["Metrics from 1/4 instances".to_string()]);
    }

    #[test]
    fn test_monotonic_in_datapoints_and_coverage() {
        let mut previous = -1.0;
        for dp in (0..=120).step_by(12) {
            let current = score(&metrics(dp, dp, 2, 4), TemporalClass::Transient).score;
            assert!(current >= previous);
            previous = current;
        }

        let mut previous = -1.0;
        for covered in 0..=4 {
            let current = score(&metrics(30, 30, covered, 4), TemporalClass::Transient).score;
            assert!(current >= previous);
            previous = current;
        }
    }
}
