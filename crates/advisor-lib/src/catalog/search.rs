//! Resource-constrained catalog search

use super::{sorted_by_price, Catalog};
use crate::models::{Category, InstanceSpec};
use std::cmp::Ordering;

/// Cheapest qualifying instance per selection strategy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuitableInstances<'a> {
    /// Cheapest in the current type's family
    pub same_family: Option<&'a InstanceSpec>,
    /// Cheapest overall
    pub cross_family: Option<&'a InstanceSpec>,
    /// Cheapest in the preferred category
    pub category_optimized: Option<&'a InstanceSpec>,
}

impl Catalog {
    /// Find the cheapest instances meeting the required vCPU and memory minimums
    ///
    /// `same_family` is `None` when the current type is unknown or no member
    /// of its family qualifies.
    pub fn find_suitable(
        &self,
        required_vcpus: f64,
        required_memory_gb: f64,
        current_type: Option<&str>,
        preferred_category: Option<Category>,
    ) -> SuitableInstances<'_> {
        let suitable = sorted_by_price(self.iter().filter(|spec| {
            f64::from(spec.vcpus) >= required_vcpus && spec.memory_gb >= required_memory_gb
        }));

        let current_family = current_type
            .and_then(|t| self.get(t))
            .map(|spec| spec.family.as_str());

        SuitableInstances {
            same_family: current_family.and_then(|family| {
                suitable.iter().copied().find(|spec| spec.family == family)
            }),
            cross_family: suitable.first().copied(),
            category_optimized: preferred_category.and_then(|category| {
                suitable.iter().copied().find(|spec| spec.category == category)
            }),
        }
    }

    /// Find a cheaper instance in the current category with at least the given specs
    ///
    /// Picks the largest absolute saving, then the smallest overshoot of the
    /// minimums. Recovers same-size options such as an older generation.
    pub fn find_cheaper_alternative(
        &self,
        current_type: &str,
        min_vcpus: f64,
        min_memory_gb: f64,
    ) -> Option<&InstanceSpec> {
        let current = self.get(current_type)?;

        let mut candidates: Vec<(&InstanceSpec, f64, f64)> = self
            .iter()
            .filter(|spec| spec.identifier != current.identifier)
            .filter(|spec| f64::from(spec.vcpus) >= min_vcpus && spec.memory_gb >= min_memory_gb)
            .filter(|spec| spec.category == current.category)
            .filter(|spec| spec.hourly_price < current.hourly_price)
            .map(|spec| {
                let savings = current.hourly_price - spec.hourly_price;
                let overshoot = ratio(f64::from(spec.vcpus), min_vcpus)
                    + ratio(spec.memory_gb, min_memory_gb);
                (spec, savings, overshoot)
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal))
        });

        candidates.first().map(|(spec, _, _)| *spec)
    }
}

fn ratio(value: f64, minimum: f64) -> f64 {
    if minimum > 0.0 {
        value / minimum
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(
        identifier: &str,
        vcpus: u32,
        memory_gb: f64,
        price: f64,
        category: Category,
    ) -> InstanceSpec {
        InstanceSpec {
            identifier: identifier.to_string(),
            vcpus,
            memory_gb,
            hourly_price: price,
            family: identifier.split('.').next().unwrap_or_default().to_string(),
            generation: 5,
            category,
        }
    }

    #[test]
    fn test_find_suitable_for_downsized_m5() {
        let catalog = Catalog::builtin();
        let result = catalog.find_suitable(3.84, 13.824, Some("m5.4xlarge"), Some(Category::General));

        assert_eq!(result.same_family.unwrap().identifier, "m5.xlarge");
        assert_eq!(result.cross_family.unwrap().identifier, "m6g.xlarge");
        assert_eq!(result.category_optimized.unwrap().identifier, "m6g.xlarge");
    }

    #[test]
    fn test_find_suitable_compute_preference() {
        let catalog = Catalog::builtin();
        let result = catalog.find_suitable(7.0, 10.0, Some("m5.4xlarge"), Some(Category::Compute));

        assert_eq!(result.same_family.unwrap().identifier, "m5.2xlarge");
        assert_eq!(result.category_optimized.unwrap().identifier, "c6g.2xlarge");
    }

    #[test]
    fn test_find_suitable_unknown_current_type() {
        let catalog = Catalog::builtin();
        let result = catalog.find_suitable(2.0, 4.0, Some("z9.mega"), None);

        assert!(result.same_family.is_none());
        assert!(result.cross_family.is_some());
        assert!(result.category_optimized.is_none());
    }

    #[test]
    fn test_find_suitable_nothing_qualifies() {
        let catalog = Catalog::builtin();
        let result = catalog.find_suitable(1000.0, 4.0, Some("m5.large"), Some(Category::General));
        assert_eq!(result, SuitableInstances::default());
    }

    #[test]
    fn test_find_suitable_ties_keep_catalog_order() {
        let catalog = Catalog::new(
            "ties",
            vec![
                spec("b1.large", 2, 8.0, 0.1, Category::General),
                spec("a1.large", 2, 8.0, 0.1, Category::General),
            ],
        )
        .unwrap();

        let result = catalog.find_suitable(1.0, 2.0, None, None);
        assert_eq!(result.cross_family.unwrap().identifier, "b1.large");
    }

    #[test]
    fn test_cheaper_alternative_same_size() {
        let catalog = Catalog::builtin();
        let alt = catalog
            .find_cheaper_alternative("r7g.4xlarge", 16.0, 128.0)
            .unwrap();

        // r5a.4xlarge is not cheaper than r6g.4xlarge; r6g wins on savings
        assert_eq!(alt.identifier, "r6g.4xlarge");
        assert_eq!(alt.category, Category::Memory);
    }

    #[test]
    fn test_cheaper_alternative_prefers_smallest_overshoot_on_equal_savings() {
        let catalog = Catalog::new(
            "overshoot",
            vec![
                spec("cur.xlarge", 4, 16.0, 1.0, Category::General),
                spec("big.xlarge", 8, 32.0, 0.5, Category::General),
                spec("fit.xlarge", 4, 16.0, 0.5, Category::General),
            ],
        )
        .unwrap();

        let alt = catalog.find_cheaper_alternative("cur.xlarge", 4.0, 16.0).unwrap();
        assert_eq!(alt.identifier, "fit.xlarge");
    }

    #[test]
    fn test_cheaper_alternative_respects_category() {
        let catalog = Catalog::new(
            "category",
            vec![
                spec("cur.xlarge", 4, 16.0, 1.0, Category::General),
                spec("cmp.xlarge", 4, 16.0, 0.2, Category::Compute),
            ],
        )
        .unwrap();

        assert!(catalog.find_cheaper_alternative("cur.xlarge", 4.0, 16.0).is_none());
    }

    #[test]
    fn test_cheaper_alternative_none_for_cheapest_or_unknown() {
        let catalog = Catalog::builtin();
        assert!(catalog.find_cheaper_alternative("m6g.large", 2.0, 8.0).is_none());
        assert!(catalog.find_cheaper_alternative("z9.mega", 2.0, 8.0).is_none());
    }
}
