//! Cluster inventory commands

use advisor_lib::ClusterInfo;
use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::{ApiClient, ClusterListing};
use crate::output::{print_heading, print_json, print_table, OutputFormat};

/// Row for clusters table
#[derive(Tabled)]
struct ClusterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Runtime")]
    runtime: String,
    #[tabled(rename = "Groups")]
    groups: usize,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&ClusterInfo> for ClusterRow {
    fn from(cluster: &ClusterInfo) -> Self {
        Self {
            id: cluster.id.clone(),
            name: cluster.name.clone(),
            runtime: format!("{:.1}h", cluster.runtime_hours),
            groups: cluster.instance_groups.len(),
            created: cluster.created_time.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Row for node groups table
#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Group ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Instance Type")]
    instance_type: String,
    #[tabled(rename = "Running")]
    running: u32,
    #[tabled(rename = "Requested")]
    requested: u32,
}

/// List clusters split by temporal class
pub async fn list_clusters(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let listing: ClusterListing = client.get("api/clusters").await?.into_data()?;

    match format {
        OutputFormat::Json => print_json(&listing)?,
        OutputFormat::Table => {
            print_heading(
                &format!("Long-running clusters ({})", listing.long_running_count),
                '=',
            );
            print_table(listing.long_running.iter().map(ClusterRow::from).collect());
            println!();

            print_heading(
                &format!("Transient clusters ({})", listing.transient_count),
                '=',
            );
            print_table(listing.transient.iter().map(ClusterRow::from).collect());
            println!();

            println!("Total: {}", listing.total_count.to_string().bold());
        }
    }

    Ok(())
}

/// Show a single cluster with its node groups
pub async fn show_cluster(client: &ApiClient, cluster_id: &str, format: OutputFormat) -> Result<()> {
    let path = format!("api/clusters/{}", cluster_id);
    let cluster: ClusterInfo = client.get(&path).await?.into_data()?;

    match format {
        OutputFormat::Json => print_json(&cluster)?,
        OutputFormat::Table => {
            print_heading(&format!("Cluster {}", cluster.id), '=');
            println!("Name:                   {}", cluster.name.cyan());
            println!("Type:                   {}", cluster.cluster_type);
            println!("Runtime:                {:.1}h", cluster.runtime_hours);
            println!(
                "Created:                {}",
                cluster.created_time.format("%Y-%m-%d %H:%M:%S")
            );
            println!();

            let rows = cluster
                .instance_groups
                .iter()
                .map(|g| GroupRow {
                    id: g.id.clone(),
                    name: g.name.clone(),
                    role: g.role.to_string(),
                    instance_type: g.instance_type.clone(),
                    running: g.running_count,
                    requested: g.requested_count,
                })
                .collect();
            print_table(rows);
        }
    }

    Ok(())
}
