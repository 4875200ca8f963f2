//! Node Advisor CLI
//!
//! A command-line tool for browsing clusters, running rightsizing analyses,
//! reviewing analysis history and querying the instance catalog.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{analysis, catalog, clusters};

/// Node Advisor CLI
#[derive(Parser)]
#[command(name = "nadv")]
#[command(author, version, about = "CLI for Node Advisor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via NADV_API_URL env var)
    #[arg(long, env = "NADV_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, global = true)]
    pub format: Option<output::OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse clusters known to the advisor
    #[command(subcommand)]
    Clusters(ClustersCommands),

    /// Run a rightsizing analysis of a cluster
    Analyze {
        /// Cluster ID
        cluster_id: String,

        /// Hours of metrics to analyze (service default if not specified)
        #[arg(long)]
        lookback_hours: Option<u32>,
    },

    /// Show the latest stored analysis of a cluster
    Analysis {
        /// Cluster ID
        cluster_id: String,
    },

    /// Show stored analysis history
    History {
        /// Only show analyses of this cluster
        #[arg(long)]
        cluster_id: Option<String>,
    },

    /// Query the instance type catalog
    #[command(subcommand)]
    Catalog(CatalogCommands),
}

#[derive(Subcommand)]
pub enum ClustersCommands {
    /// List clusters split by transient and long-running
    List,

    /// Show a cluster and its node groups
    Show {
        /// Cluster ID
        cluster_id: String,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List instance types
    List {
        /// Filter by family (e.g. m6g)
        #[arg(long)]
        family: Option<String>,

        /// Filter by category (general, compute, memory, storage)
        #[arg(long)]
        category: Option<String>,
    },

    /// Show a single instance type
    Show {
        /// Instance type (e.g. r6g.xlarge)
        instance_type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = config::Config::load()?;
    let format = settings.resolve_format(cli.format)?;

    // Initialize client
    let client = client::ApiClient::new(&settings.resolve_api_url(cli.api_url))?;

    // Execute command
    match cli.command {
        Commands::Clusters(clusters_cmd) => match clusters_cmd {
            ClustersCommands::List => {
                clusters::list_clusters(&client, format).await?;
            }
            ClustersCommands::Show { cluster_id } => {
                clusters::show_cluster(&client, &cluster_id, format).await?;
            }
        },
        Commands::Analyze {
            cluster_id,
            lookback_hours,
        } => {
            analysis::analyze_cluster(&client, &cluster_id, lookback_hours, format).await?;
        }
        Commands::Analysis { cluster_id } => {
            analysis::show_latest(&client, &cluster_id, format).await?;
        }
        Commands::History { cluster_id } => {
            analysis::show_history(&client, cluster_id, format).await?;
        }
        Commands::Catalog(catalog_cmd) => match catalog_cmd {
            CatalogCommands::List { family, category } => {
                catalog::list_catalog(&client, family, category, format).await?;
            }
            CatalogCommands::Show { instance_type } => {
                catalog::show_instance_type(&client, &instance_type, format).await?;
            }
        },
    }

    Ok(())
}
