//! Recommendation output types

use crate::classify::WorkloadProfile;
use crate::models::{Category, InstanceSpec, MetricSummary};
use crate::savings::Savings;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the operator should do with a node group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationAction {
    #[serde(rename = "none")]
    NoAction,
    ConsiderUpsizing,
    Downsize,
    OptimalForWorkload,
}

impl fmt::Display for RecommendationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendationAction::NoAction => write!(f, "none"),
            RecommendationAction::ConsiderUpsizing => write!(f, "consider_upsizing"),
            RecommendationAction::Downsize => write!(f, "downsize"),
            RecommendationAction::OptimalForWorkload => write!(f, "optimal_for_workload"),
        }
    }
}

/// Which search strategy produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSlot {
    SameFamily,
    CrossFamily,
    CategoryOptimized,
    CheaperAlternative,
}

impl CandidateSlot {
    /// Fixed priority order used to break savings ties
    pub const PRIORITY: [CandidateSlot; 4] = [
        CandidateSlot::SameFamily,
        CandidateSlot::CrossFamily,
        CandidateSlot::CategoryOptimized,
        CandidateSlot::CheaperAlternative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateSlot::SameFamily => "same_family",
            CandidateSlot::CrossFamily => "cross_family",
            CandidateSlot::CategoryOptimized => "category_optimized",
            CandidateSlot::CheaperAlternative => "cheaper_alternative",
        }
    }
}

/// A proposed replacement node type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationCandidate {
    pub instance_type: String,
    pub vcpus: u32,
    pub memory_gb: f64,
    pub price_per_hour: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload_profile: Option<WorkloadProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub savings: Option<Savings>,
}

impl RecommendationCandidate {
    pub(crate) fn from_spec(spec: &InstanceSpec, savings: Option<Savings>) -> Self {
        Self {
            instance_type: spec.identifier.clone(),
            vcpus: spec.vcpus,
            memory_gb: spec.memory_gb,
            price_per_hour: spec.hourly_price,
            family: Some(spec.family.clone()),
            category: Some(spec.category),
            workload_profile: None,
            note: None,
            savings,
        }
    }

    /// Hourly savings when positive, otherwise `None`
    pub fn positive_hourly_savings(&self) -> Option<f64> {
        self.savings
            .filter(|s| s.is_positive())
            .map(|s| s.hourly_savings)
    }
}

/// Peak inputs used to size a recommendation, per metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakDetail {
    pub p95: Option<f64>,
    pub effective_peak: f64,
    pub peak_type: String,
    pub percentile_used: String,
    pub is_spike: bool,
    pub duration_at_p95_minutes: f64,
}

impl PeakDetail {
    pub(crate) fn from_summary(summary: &MetricSummary) -> Self {
        Self {
            p95: summary.p95,
            effective_peak: summary.effective_peak_or_p95(),
            peak_type: summary
                .peak_type
                .clone()
                .unwrap_or_else(|| "sustained".to_string()),
            percentile_used: summary
                .effective_peak_percentile
                .clone()
                .unwrap_or_else(|| "P95".to_string()),
            is_spike: summary.is_spike,
            duration_at_p95_minutes: summary.duration_at_p95_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakAnalysis {
    pub cpu: PeakDetail,
    pub memory: PeakDetail,
}

/// Candidate replacements for one node group and the chosen best one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub action: RecommendationAction,
    pub reason: String,
    #[serde(default)]
    pub required_vcpus: Option<f64>,
    #[serde(default)]
    pub required_memory_gb: Option<f64>,
    #[serde(default)]
    pub same_family: Option<RecommendationCandidate>,
    #[serde(default)]
    pub same_family_note: Option<String>,
    #[serde(default)]
    pub cross_family: Option<RecommendationCandidate>,
    #[serde(default)]
    pub category_optimized: Option<RecommendationCandidate>,
    #[serde(default)]
    pub cheaper_alternative: Option<RecommendationCandidate>,
    #[serde(default)]
    pub best_recommendation: Option<RecommendationCandidate>,
    #[serde(default)]
    pub peak_analysis: Option<PeakAnalysis>,
}

impl RecommendationSet {
    /// A set with no candidates and no search performed
    pub(crate) fn without_search(action: RecommendationAction, reason: impl Into<String>) -> Self {
        Self {
            action,
            reason: reason.into(),
            required_vcpus: None,
            required_memory_gb: None,
            same_family: None,
            same_family_note: None,
            cross_family: None,
            category_optimized: None,
            cheaper_alternative: None,
            best_recommendation: None,
            peak_analysis: None,
        }
    }

    pub fn slot(&self, slot: CandidateSlot) -> Option<&RecommendationCandidate> {
        match slot {
            CandidateSlot::SameFamily => self.same_family.as_ref(),
            CandidateSlot::CrossFamily => self.cross_family.as_ref(),
            CandidateSlot::CategoryOptimized => self.category_optimized.as_ref(),
            CandidateSlot::CheaperAlternative => self.cheaper_alternative.as_ref(),
        }
    }

    /// Slot holding the best recommendation, first in priority order on ties
    pub fn best_slot(&self) -> Option<CandidateSlot> {
        let best = self.best_recommendation.as_ref()?;
        CandidateSlot::PRIORITY
            .into_iter()
            .find(|slot| self.slot(*slot) == Some(best))
    }

    /// Hourly savings of the best recommendation, zero when absent
    pub fn best_hourly_savings(&self) -> f64 {
        self.best_recommendation
            .as_ref()
            .and_then(|c| c.savings)
            .map(|s| s.hourly_savings)
            .unwrap_or(0.0)
    }

    /// Number of populated candidate slots
    pub fn candidate_count(&self) -> usize {
        CandidateSlot::PRIORITY
            .into_iter()
            .filter(|slot| self.slot(*slot).is_some())
            .count()
    }
}
