//! Instance catalog commands

use advisor_lib::InstanceSpec;
use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::{ApiClient, CatalogListing};
use crate::output::{format_hourly, print_json, print_table, OutputFormat};

/// Row for instance types table
#[derive(Tabled)]
struct InstanceRow {
    #[tabled(rename = "Type")]
    identifier: String,
    #[tabled(rename = "vCPUs")]
    vcpus: u32,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Family")]
    family: String,
    #[tabled(rename = "Gen")]
    generation: u32,
    #[tabled(rename = "Category")]
    category: String,
}

impl From<&InstanceSpec> for InstanceRow {
    fn from(spec: &InstanceSpec) -> Self {
        Self {
            identifier: spec.identifier.clone(),
            vcpus: spec.vcpus,
            memory: format!("{} GB", spec.memory_gb),
            price: format_hourly(spec.hourly_price),
            family: spec.family.clone(),
            generation: spec.generation,
            category: spec.category.to_string(),
        }
    }
}

/// Catalog listing path with optional filters
fn listing_path(family: Option<&str>, category: Option<&str>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(family) = family {
        query.append_pair("family", family);
    }
    if let Some(category) = category {
        query.append_pair("category", category);
    }

    let query = query.finish();
    if query.is_empty() {
        "api/catalog".to_string()
    } else {
        format!("api/catalog?{}", query)
    }
}

/// List catalog instance types
pub async fn list_catalog(
    client: &ApiClient,
    family: Option<String>,
    category: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let path = listing_path(family.as_deref(), category.as_deref());
    let listing: CatalogListing = client.get(&path).await?.into_data()?;

    match format {
        OutputFormat::Json => print_json(&listing)?,
        OutputFormat::Table => {
            println!(
                "Catalog {} ({} instance types)",
                listing.version.cyan(),
                listing.count
            );
            print_table(listing.instances.iter().map(InstanceRow::from).collect());
        }
    }

    Ok(())
}

/// Show a single instance type
pub async fn show_instance_type(
    client: &ApiClient,
    instance_type: &str,
    format: OutputFormat,
) -> Result<()> {
    let path = format!("api/catalog/{}", instance_type);
    let spec: InstanceSpec = client.get(&path).await?.into_data()?;

    match format {
        OutputFormat::Json => print_json(&spec)?,
        OutputFormat::Table => print_table(vec![InstanceRow::from(&spec)]),
    }

    Ok(())
}
