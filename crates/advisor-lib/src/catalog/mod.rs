//! Instance catalog
//!
//! An immutable, versioned table of node types and their on-demand prices.
//! The catalog is built once at startup and shared read-only, so lookups and
//! searches need no coordination between concurrent analyses.

mod data;
mod search;

pub use data::BUILTIN_CATALOG_VERSION;
pub use search::SuitableInstances;

use crate::models::{Category, InstanceSpec};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::info;

/// Serialized form of a catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub version: String,
    pub instances: Vec<InstanceSpec>,
}

/// Read-only table of instance specifications keyed by identifier
#[derive(Debug, Clone)]
pub struct Catalog {
    version: String,
    instances: Vec<InstanceSpec>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate identifiers and non-positive specs
    pub fn new(version: impl Into<String>, instances: Vec<InstanceSpec>) -> Result<Self> {
        let mut index = HashMap::with_capacity(instances.len());

        for (position, spec) in instances.iter().enumerate() {
            if spec.vcpus == 0 || !(spec.memory_gb > 0.0) || !(spec.hourly_price > 0.0) {
                bail!(
                    "Instance type {} must have positive vcpus, memory and price",
                    spec.identifier
                );
            }
            if index.insert(spec.identifier.clone(), position).is_some() {
                bail!("Duplicate instance type {} in catalog", spec.identifier);
            }
        }

        Ok(Self {
            version: version.into(),
            instances,
            index,
        })
    }

    /// The built-in us-east-1 on-demand table
    pub fn builtin() -> Self {
        let instances = data::INSTANCE_ROWS
            .iter()
            .map(
                |&(identifier, vcpus, memory_gb, hourly_price, family, generation, category)| {
                    InstanceSpec {
                        identifier: identifier.to_string(),
                        vcpus,
                        memory_gb,
                        hourly_price,
                        family: family.to_string(),
                        generation,
                        category,
                    }
                },
            )
            .collect::<Vec<_>>();

        let index = instances
            .iter()
            .enumerate()
            .map(|(position, spec)| (spec.identifier.clone(), position))
            .collect();

        Self {
            version: BUILTIN_CATALOG_VERSION.to_string(),
            instances,
            index,
        }
    }

    /// Load a catalog from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {:?}", path))?;
        let file: CatalogFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog file {:?}", path))?;

        let catalog = Self::new(file.version, file.instances)?;
        info!(
            path = %path.display(),
            version = %catalog.version,
            instance_types = catalog.len(),
            "Loaded instance catalog"
        );
        Ok(catalog)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Iterate in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &InstanceSpec> {
        self.instances.iter()
    }

    /// Look up an instance type
    pub fn get(&self, instance_type: &str) -> Option<&InstanceSpec> {
        self.index
            .get(instance_type)
            .map(|&position| &self.instances[position])
    }

    /// Hourly price of an instance type
    pub fn price(&self, instance_type: &str) -> Option<f64> {
        self.get(instance_type).map(|spec| spec.hourly_price)
    }

    /// All instances of a family, cheapest first
    pub fn by_family(&self, family: &str) -> Vec<&InstanceSpec> {
        sorted_by_price(self.iter().filter(|spec| spec.family == family))
    }

    /// All instances of a category, cheapest first
    pub fn by_category(&self, category: Category) -> Vec<&InstanceSpec> {
        sorted_by_price(self.iter().filter(|spec| spec.category == category))
    }

    /// Distinct family names, sorted
    pub fn families(&self) -> Vec<&str> {
        self.iter()
            .map(|spec| spec.family.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct categories present in the catalog, sorted
    pub fn categories(&self) -> Vec<Category> {
        self.iter()
            .map(|spec| spec.category)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Stable sort by hourly price, keeping catalog order between equal prices
pub(crate) fn sorted_by_price<'a>(
    specs: impl Iterator<Item = &'a InstanceSpec>,
) -> Vec<&'a InstanceSpec> {
    let mut specs: Vec<_> = specs.collect();
    specs.sort_by(|a, b| {
        a.hourly_price
            .partial_cmp(&b.hourly_price)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    specs
}
