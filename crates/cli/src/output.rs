//! Output formatting utilities

use advisor_lib::classify::{ConfidenceLevel, SizingStatus, StatusColor};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table from a list of rows
pub fn print_table<T: Tabled>(rows: Vec<T>) {
    if rows.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print any response payload as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a section heading with an underline
pub fn print_heading(title: &str, underline: char) {
    println!("{}", title.bold());
    println!("{}", underline.to_string().repeat(50));
}

/// Format a dollar amount
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

/// Format an hourly price with sub-cent precision
pub fn format_hourly(amount: f64) -> String {
    format!("${:.4}/hr", amount)
}

/// Format an optional utilization percentage
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => "-".to_string(),
    }
}

/// Color a sizing status by its display priority
pub fn color_sizing(status: SizingStatus) -> String {
    let label = status.label();
    match status.color() {
        StatusColor::Danger => label.red().to_string(),
        StatusColor::Warning => label.yellow().to_string(),
        StatusColor::Success => label.green().to_string(),
        StatusColor::Info => label.blue().to_string(),
    }
}

/// Color a confidence score by its level
pub fn color_confidence(level: ConfidenceLevel, score: f64) -> String {
    let formatted = format!("{:.0}%", score * 100.0);
    match level {
        ConfidenceLevel::High => formatted.green().to_string(),
        ConfidenceLevel::Medium => formatted.yellow().to_string(),
        ConfidenceLevel::Low => formatted.red().to_string(),
    }
}

/// Format timestamp for display
pub fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
