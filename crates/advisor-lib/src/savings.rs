//! Cost delta between the current node type and a candidate

use crate::catalog::Catalog;
use crate::config::HOURS_PER_MONTH;
use crate::models::round_to;
use serde::{Deserialize, Serialize};

/// Projected savings of switching a node group to another type
///
/// Hourly figures are rounded to 4 decimals, monthly and yearly to 2 and the
/// percentage to 1. Savings may be negative when the candidate costs more.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Savings {
    pub hourly_savings: f64,
    pub monthly_savings: f64,
    pub yearly_savings: f64,
    pub savings_percent: f64,
    pub current_hourly_cost: f64,
    pub recommended_hourly_cost: f64,
}

impl Savings {
    pub fn is_positive(&self) -> bool {
        self.hourly_savings > 0.0
    }
}

/// Savings over the default 730-hour month
pub fn calculate_savings(
    catalog: &Catalog,
    current_type: &str,
    candidate_type: &str,
    node_count: u32,
) -> Option<Savings> {
    calculate_savings_with_hours(catalog, current_type, candidate_type, node_count, HOURS_PER_MONTH)
}

/// Savings of replacing `node_count` nodes of `current_type` with `candidate_type`
///
/// Returns `None` when either type is unknown or either price is not positive.
pub fn calculate_savings_with_hours(
    catalog: &Catalog,
    current_type: &str,
    candidate_type: &str,
    node_count: u32,
    hours_per_month: f64,
) -> Option<Savings> {
    let current_price = catalog.price(current_type)?;
    let candidate_price = catalog.price(candidate_type)?;

    if !(current_price > 0.0) || !(candidate_price > 0.0) {
        return None;
    }

    let nodes = f64::from(node_count);
    let hourly = (current_price - candidate_price) * nodes;
    let monthly = hourly * hours_per_month;
    let yearly = monthly * 12.0;
    let percent = (current_price - candidate_price) / current_price * 100.0;

    Some(Savings {
        hourly_savings: round_to(hourly, 4),
        monthly_savings: round_to(monthly, 2),
        yearly_savings: round_to(yearly, 2),
        savings_percent: round_to(percent, 1),
        current_hourly_cost: round_to(current_price * nodes, 4),
        recommended_hourly_cost: round_to(candidate_price * nodes, 4),
    })
}
