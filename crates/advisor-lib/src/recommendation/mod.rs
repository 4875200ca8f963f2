//! Recommendation engine
//!
//! Turns a group's classification into concrete replacement candidates:
//! - Sizes the requirement from effective peaks plus headroom
//! - Searches same-family, cheapest-overall and workload-aligned categories
//! - Looks for a cheaper peer at the current size
//! - Picks the candidate with the highest positive hourly savings

mod types;


pub use types::{
    CandidateSlot, PeakAnalysis, PeakDetail, RecommendationAction, RecommendationCandidate,
    RecommendationSet,
};

use crate::catalog::Catalog;
use crate::classify::{SizingStatus, WorkloadProfile};
use crate::config::EngineConfig;
use crate::models::{round_to, GroupMetrics, InstanceSpec};
use crate::savings::{calculate_savings_with_hours, Savings};
use tracing::debug;

/// Minimum vCPUs a recommendation may target
const MIN_REQUIRED_VCPUS: f64 = 1.0;

/// Minimum memory a recommendation may target
const MIN_REQUIRED_MEMORY_GB: f64 = 2.0;

/// Inputs describing the node group being sized
#[derive(Debug, Clone, Copy)]
pub struct GroupContext<'a> {
    pub instance_type: &'a str,
    pub node_count: u32,
    pub metrics: &'a GroupMetrics,
    pub workload_profile: WorkloadProfile,
    pub sizing_status: SizingStatus,
}

/// Generates replacement candidates against a shared catalog
pub struct RecommendationEngine<'a> {
    catalog: &'a Catalog,
    config: &'a EngineConfig,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Build the recommendation set for a group
    ///
    /// Returns `None` when the current instance type is not in the catalog.
    pub fn generate(&self, group: GroupContext<'_>) -> Option<RecommendationSet> {
        let current = self.catalog.get(group.instance_type)?;

        match group.sizing_status {
            SizingStatus::RightSized => {
                return Some(RecommendationSet::without_search(
                    RecommendationAction::NoAction,
                    group.sizing_status.description(),
                ))
            }
            SizingStatus::Undersized => {
                return Some(RecommendationSet::without_search(
                    RecommendationAction::ConsiderUpsizing,
                    group.sizing_status.description(),
                ))
            }
            SizingStatus::HeavilyOversized | SizingStatus::ModeratelyOversized => {}
        }

        Some(self.search(current, group))
    }

    fn search(&self, current: &InstanceSpec, group: GroupContext<'_>) -> RecommendationSet {
        let cpu_peak = group.metrics.cpu.effective_peak_or_p95();
        let mem_peak = group.metrics.memory.effective_peak_or_p95();
        let headroom = self.config.headroom_multiplier();

        let required_vcpus =
            (f64::from(current.vcpus) * cpu_peak / 100.0 * headroom).max(MIN_REQUIRED_VCPUS);
        let required_memory_gb =
            (current.memory_gb * mem_peak / 100.0 * headroom).max(MIN_REQUIRED_MEMORY_GB);

        let preferred_category = group.workload_profile.preferred_category();
        let suitable = self.catalog.find_suitable(
            required_vcpus,
            required_memory_gb,
            Some(&current.identifier),
            Some(preferred_category),
        );

        let mut set = RecommendationSet {
            action: RecommendationAction::Downsize,
            reason: format!("{} - can reduce instance size", group.sizing_status.label()),
            required_vcpus: Some(round_to(required_vcpus, 1)),
            required_memory_gb: Some(round_to(required_memory_gb, 1)),
            same_family: None,
            same_family_note: None,
            cross_family: None,
            category_optimized: None,
            cheaper_alternative: None,
            best_recommendation: None,
            peak_analysis: Some(PeakAnalysis {
                cpu: PeakDetail::from_summary(&group.metrics.cpu),
                memory: PeakDetail::from_summary(&group.metrics.memory),
            }),
        };

        if let Some(spec) = suitable.same_family {
            if spec.identifier != current.identifier {
                let mut candidate =
                    RecommendationCandidate::from_spec(spec, self.savings(current, spec, group));
                candidate.family = None;
                candidate.category = None;
                set.same_family = Some(candidate);
            } else {
                set.same_family_note = Some(format!(
                    "No smaller {} instance can meet the required {} GB memory with {}% headroom. \
                     Current size is optimal for this family.",
                    current.family,
                    round_to(required_memory_gb, 1),
                    self.config.headroom_percent
                ));
            }
        }

        if let Some(spec) = suitable.cross_family {
            set.cross_family = self.positive_candidate(current, spec, group);
        }

        // Peers at the current size, e.g. an older generation of the same class
        if let Some(spec) = self.catalog.find_cheaper_alternative(
            &current.identifier,
            f64::from(current.vcpus),
            current.memory_gb,
        ) {
            set.cheaper_alternative = self
                .positive_candidate(current, spec, group)
                .map(|mut candidate| {
                    candidate.note =
                        Some("Same specs, different family - potential cost savings".to_string());
                    candidate
                });
        }

        // Only a duplicate of the cross-family pick is suppressed
        if let Some(spec) = suitable.category_optimized {
            if suitable.cross_family != Some(spec) {
                set.category_optimized = self
                    .positive_candidate(current, spec, group)
                    .map(|mut candidate| {
                        candidate.workload_profile = Some(group.workload_profile);
                        candidate
                    });
            }
        }

        set.best_recommendation = select_best(&set).cloned();

        if set.best_recommendation.is_none() {
            if set.same_family_note.is_some() {
                set.action = RecommendationAction::OptimalForWorkload;
                set.reason = format!(
                    "{} by utilization, but current instance is the smallest in the {} family \
                     that meets memory requirements. Consider if peak usage patterns justify \
                     current sizing.",
                    group.sizing_status.label(),
                    current.family
                );
            } else {
                set.action = RecommendationAction::NoAction;
                set.reason =
                    "No cost-saving alternatives found that meet workload requirements.".to_string();
            }
        }

        debug!(
            instance_type = %current.identifier,
            required_vcpus = required_vcpus,
            required_memory_gb = required_memory_gb,
            preferred_category = %preferred_category,
            candidates = set.candidate_count(),
            action = %set.action,
            "Generated recommendations"
        );

        set
    }

    /// Candidate for a different type, kept only when it saves money
    fn positive_candidate(
        &self,
        current: &InstanceSpec,
        spec: &InstanceSpec,
        group: GroupContext<'_>,
    ) -> Option<RecommendationCandidate> {
        if spec.identifier == current.identifier {
            return None;
        }
        let savings = self.savings(current, spec, group)?;
        savings
            .is_positive()
            .then(|| RecommendationCandidate::from_spec(spec, Some(savings)))
    }

    fn savings(
        &self,
        current: &InstanceSpec,
        spec: &InstanceSpec,
        group: GroupContext<'_>,
    ) -> Option<Savings> {
        calculate_savings_with_hours(
            self.catalog,
            &current.identifier,
            &spec.identifier,
            group.node_count,
            self.config.hours_per_month,
        )
    }
}

/// Candidate with the strictly greatest positive hourly savings
///
/// Slots are visited in priority order, so the earlier slot wins a tie.
pub fn select_best(set: &RecommendationSet) -> Option<&RecommendationCandidate> {
    let mut best: Option<(&RecommendationCandidate, f64)> = None;

    for slot in CandidateSlot::PRIORITY {
        let Some(candidate) = set.slot(slot) else {
            continue;
        };
        let Some(hourly) = candidate.positive_hourly_savings() else {
            continue;
        };
        if best.map_or(true, |(_, best_hourly)| hourly > best_hourly) {
            best = Some((candidate, hourly));
        }
    }

    best.map(|(candidate, _)| candidate)
}
