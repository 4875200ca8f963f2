//! Analysis and history commands

use advisor_lib::{history::HistoryMap, AnalysisRecord, GroupAnalysis};
use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::{AnalyzeRequest, ApiClient, Envelope};
use crate::output::{
    color_confidence, color_sizing, format_currency, format_hourly, format_percent,
    format_timestamp, print_heading, print_info, print_json, print_success, print_table,
    print_warning, OutputFormat,
};

/// Row for per-group analysis table
#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Instance Type")]
    instance_type: String,
    #[tabled(rename = "Nodes")]
    nodes: u32,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "CPU avg/peak")]
    cpu: String,
    #[tabled(rename = "Mem avg/peak")]
    memory: String,
    #[tabled(rename = "Sizing")]
    sizing: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Recommendation")]
    recommendation: String,
    #[tabled(rename = "Monthly Savings")]
    savings: String,
}

impl GroupRow {
    fn new(key: &str, group: &GroupAnalysis) -> Self {
        let cpu = &group.metrics.cpu;
        let memory = &group.metrics.memory;

        let best = group
            .recommendations
            .as_ref()
            .and_then(|r| r.best_recommendation.as_ref());

        let recommendation = match (best, &group.recommendations) {
            (Some(candidate), _) => candidate.instance_type.green().to_string(),
            (None, Some(set)) => set.action.to_string(),
            (None, None) => "-".to_string(),
        };

        let savings = best
            .and_then(|c| c.savings.as_ref())
            .map(|s| format_currency(s.monthly_savings))
            .unwrap_or_else(|| "-".to_string());

        Self {
            group: key.to_string(),
            instance_type: group.instance_type.clone(),
            nodes: group.instance_count,
            cost: format_hourly(group.current_hourly_cost),
            cpu: format!(
                "{} / {}",
                format_percent(cpu.average),
                format_percent(cpu.effective_peak.or(cpu.p95))
            ),
            memory: format!(
                "{} / {}",
                format_percent(memory.average),
                format_percent(memory.effective_peak.or(memory.p95))
            ),
            sizing: group
                .sizing_status
                .map(color_sizing)
                .unwrap_or_else(|| "-".to_string()),
            confidence: group
                .confidence
                .as_ref()
                .map(|c| color_confidence(c.level, c.score))
                .unwrap_or_else(|| "-".to_string()),
            recommendation,
            savings,
        }
    }
}

/// Row for history table
#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Cluster")]
    cluster_id: String,
    #[tabled(rename = "Analyzed At")]
    analyzed_at: String,
    #[tabled(rename = "Lookback")]
    lookback: String,
    #[tabled(rename = "Recommendations")]
    recommendations: usize,
    #[tabled(rename = "Monthly Savings")]
    savings: String,
}

fn print_record(record: &AnalysisRecord) {
    print_heading(
        &format!("Analysis: {} ({})", record.cluster_name, record.cluster_id),
        '=',
    );
    println!("Type:                   {}", record.cluster_type);
    println!("Runtime:                {:.1}h", record.runtime_hours);
    println!(
        "Lookback:               {:.1}h (requested {}h)",
        record.lookback_hours, record.requested_lookback_hours
    );
    println!(
        "Period:                 {} to {}",
        format_timestamp(&record.analysis_period.start),
        format_timestamp(&record.analysis_period.end)
    );
    println!();

    let rows = record
        .node_analyses
        .iter()
        .map(|(key, group)| GroupRow::new(key, group))
        .collect();
    print_table(rows);

    for (key, group) in &record.node_analyses {
        if let Some(warning) = &group.metrics_warning {
            print_warning(&format!("{}: {}", key, warning));
        }
        if let Some(note) = group
            .recommendations
            .as_ref()
            .and_then(|r| r.same_family_note.as_ref())
        {
            print_info(&format!("{}: {}", key, note));
        }
    }
    println!();

    println!(
        "{} {} per hour, {} per month",
        "Potential Savings:".bold(),
        format_currency(record.total_potential_hourly_savings)
            .green()
            .bold(),
        format_currency(record.total_potential_monthly_savings)
            .green()
            .bold()
    );
}

/// Run a fresh analysis of a cluster
pub async fn analyze_cluster(
    client: &ApiClient,
    cluster_id: &str,
    lookback_hours: Option<u32>,
    format: OutputFormat,
) -> Result<()> {
    let path = format!("api/clusters/{}/analyze", cluster_id);
    let record: AnalysisRecord = client
        .post(&path, &AnalyzeRequest { lookback_hours })
        .await?
        .into_data()?;

    match format {
        OutputFormat::Json => print_json(&record)?,
        OutputFormat::Table => {
            print_record(&record);
            println!();
            print_success(&format!(
                "Analysis saved with {} recommendation(s)",
                record.recommendation_count()
            ));
        }
    }

    Ok(())
}

/// Show the most recent stored analysis of a cluster
pub async fn show_latest(client: &ApiClient, cluster_id: &str, format: OutputFormat) -> Result<()> {
    let path = format!("api/clusters/{}/analysis", cluster_id);
    let envelope: Envelope<AnalysisRecord> = client.get(&path).await?;

    match (format, envelope.data) {
        (OutputFormat::Json, data) => print_json(&data)?,
        (OutputFormat::Table, Some(record)) => print_record(&record),
        (OutputFormat::Table, None) => print_info(
            envelope
                .message
                .as_deref()
                .unwrap_or("No analysis available for this cluster"),
        ),
    }

    Ok(())
}

/// Show stored analyses, newest first per cluster
pub async fn show_history(
    client: &ApiClient,
    cluster_id: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let path = match &cluster_id {
        Some(id) => format!("api/analysis/history?cluster_id={}", id),
        None => "api/analysis/history".to_string(),
    };
    let history: HistoryMap = client.get(&path).await?.into_data()?;

    match format {
        OutputFormat::Json => print_json(&history)?,
        OutputFormat::Table => {
            let rows = history
                .iter()
                .flat_map(|(id, records)| {
                    records.iter().rev().map(move |record| HistoryRow {
                        cluster_id: id.clone(),
                        analyzed_at: format_timestamp(&record.analyzed_at),
                        lookback: format!("{:.1}h", record.lookback_hours),
                        recommendations: record.recommendation_count(),
                        savings: format_currency(record.total_potential_monthly_savings),
                    })
                })
                .collect();
            print_table(rows);
        }
    }

    Ok(())
}
