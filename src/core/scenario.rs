use super::benefits::BenefitProgram;
use super::engine::evaluate;
use super::income::{clamp_days, clamp_hours};
use super::types::{CostRequest, ScenarioRow, WorkSchedule};

/// Re-evaluates the base schedule once per swept workday count.
///
/// Wage and hours per day stay fixed, so both cost and gross pay move with
/// the day count. Every row runs the full benefit rules again: the credit
/// tier is a step function of income and cannot be interpolated.
pub fn project(
    base: &WorkSchedule,
    cost_request: &CostRequest,
    program: &BenefitProgram,
    sweep: &[u32],
) -> Vec<ScenarioRow> {
    let base = base.clamped();
    let hours_per_day = base.hours_per_day();

    sweep
        .iter()
        .map(|&days| {
            let days = clamp_days(days);
            let schedule = WorkSchedule {
                hourly_wage: base.hourly_wage,
                hours_per_week: clamp_hours(hours_per_day * days as f64),
                days_per_week: days,
            };
            let result = evaluate(&schedule, cost_request, program);
            ScenarioRow {
                days_per_week: result.days_per_week,
                hours_per_week: result.hours_per_week,
                total_cost: result.total_cost,
                gross_annual: result.gross_annual,
                credit_rate: result.credit_rate,
                net_annual: result.net_annual,
                effective_hourly_rate: result.effective_hourly_rate,
                selected: result.days_per_week == base.days_per_week,
            }
        })
        .collect()
}
