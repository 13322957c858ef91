use serde::{Deserialize, Serialize};

/// Wage, hours and workdays for one job. Every field is clamped before use,
/// see [`WorkSchedule::clamped`](crate::core::WorkSchedule::clamped).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSchedule {
    pub hourly_wage: f64,
    pub hours_per_week: f64,
    pub days_per_week: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostScaling {
    /// Quoted against the baseline week and scaled linearly with workdays.
    PerWorkday,
    /// Paid in full regardless of the schedule (e.g. a monthly pass).
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostLine {
    pub label: String,
    pub baseline_annual_cost: f64,
    pub scaling: CostScaling,
}

impl CostLine {
    pub fn per_workday(label: impl Into<String>, baseline_annual_cost: f64) -> Self {
        Self {
            label: label.into(),
            baseline_annual_cost,
            scaling: CostScaling::PerWorkday,
        }
    }

    pub fn fixed(label: impl Into<String>, baseline_annual_cost: f64) -> Self {
        Self {
            label: label.into(),
            baseline_annual_cost,
            scaling: CostScaling::Fixed,
        }
    }
}

/// Resolved costs for one alternative plus the household facts the
/// benefit rules need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRequest {
    pub lines: Vec<CostLine>,
    pub dependents: u32,
    pub use_pre_tax_account: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityResult {
    pub days_per_week: u32,
    pub hours_per_week: f64,
    pub gross_annual: f64,
    pub total_cost: f64,
    pub pre_tax_contribution: f64,
    pub pre_tax_savings: f64,
    pub eligible_expense: f64,
    pub credit_rate: f64,
    pub credit_amount: f64,
    pub net_annual: f64,
    /// `None` is the "undefined" sentinel for a degenerate denominator.
    pub effective_hourly_rate: Option<f64>,
    /// Raw cost per hour worked, before any benefit.
    pub break_even_hourly_rate: Option<f64>,
    pub cost_share_of_gross: Option<f64>,
    pub viable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRow {
    pub days_per_week: u32,
    pub hours_per_week: f64,
    pub total_cost: f64,
    pub gross_annual: f64,
    pub credit_rate: f64,
    pub net_annual: f64,
    pub effective_hourly_rate: Option<f64>,
    pub selected: bool,
}
