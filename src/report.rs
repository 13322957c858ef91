//! Plain-text rendering for the CLI.
//!
//! Headline money is shown in whole units, per-hour and per-mile rates with
//! two decimals, shares as whole percentages, and undefined values as `n/a`.

use crate::core::{
    AlternativeOutcome, Cheaper, ChildcareOutcome, CommuteComparison, CostUnit, ScenarioRow,
    TableVersion, ViabilityResult,
};

pub const UNDEFINED: &str = "n/a";

pub fn currency_whole(value: f64) -> String {
    signed(value, &group_thousands(&format!("{:.0}", value.abs())))
}

pub fn currency_cents(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    signed(value, &format!("{}.{cents}", group_thousands(whole)))
}

pub fn percent_whole(fraction: f64) -> String {
    let percent = format!("{:.0}", fraction * 100.0);
    if percent == "-0" {
        "0%".to_string()
    } else {
        format!("{percent}%")
    }
}

pub fn rate_or_undefined(rate: Option<f64>) -> String {
    rate.map(currency_cents).unwrap_or_else(|| UNDEFINED.to_string())
}

pub fn share_or_undefined(share: Option<f64>) -> String {
    share.map(percent_whole).unwrap_or_else(|| UNDEFINED.to_string())
}

fn signed(value: f64, magnitude: &str) -> String {
    let is_zero = magnitude.chars().all(|c| matches!(c, '0' | '.' | ','));
    if value < 0.0 && !is_zero {
        format!("-${magnitude}")
    } else {
        format!("${magnitude}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn result_lines(result: &ViabilityResult) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Schedule:            {} days, {} h/week",
            result.days_per_week, result.hours_per_week
        ),
        format!("Gross income:        {}", currency_whole(result.gross_annual)),
        format!("Total cost:          {}", currency_whole(result.total_cost)),
    ];
    if result.pre_tax_contribution > 0.0 {
        lines.push(format!(
            "Pre-tax account:     {} set aside, saves {}",
            currency_whole(result.pre_tax_contribution),
            currency_whole(result.pre_tax_savings)
        ));
    }
    if result.credit_amount > 0.0 {
        lines.push(format!(
            "Tax credit:          {} ({} of {})",
            currency_whole(result.credit_amount),
            percent_whole(result.credit_rate),
            currency_whole(result.eligible_expense)
        ));
    }
    lines.extend([
        format!("Net income:          {}", currency_whole(result.net_annual)),
        format!(
            "Effective per hour:  {}",
            rate_or_undefined(result.effective_hourly_rate)
        ),
        format!(
            "Break-even per hour: {}",
            rate_or_undefined(result.break_even_hourly_rate)
        ),
        format!(
            "Cost share of gross: {}",
            share_or_undefined(result.cost_share_of_gross)
        ),
        format!(
            "Verdict:             {}",
            if result.viable {
                "working pays"
            } else {
                "working costs more than it earns"
            }
        ),
    ]);
    lines
}

fn scenario_lines(rows: &[ScenarioRow]) -> Vec<String> {
    let mut lines = vec![format!(
        "  {:>4}  {:>7}  {:>10}  {:>10}  {:>10}  {:>9}",
        "days", "hours", "cost", "gross", "net", "per hour"
    )];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{} {:>4}  {:>7.1}  {:>10}  {:>10}  {:>10}  {:>9}",
            if row.selected { "*" } else { " " },
            row.days_per_week,
            row.hours_per_week,
            currency_whole(row.total_cost),
            currency_whole(row.gross_annual),
            currency_whole(row.net_annual),
            rate_or_undefined(row.effective_hourly_rate)
        )
    }));
    lines
}

pub fn render_childcare(outcome: &ChildcareOutcome) -> String {
    let mut lines = vec![format!(
        "Childcare in {}",
        region_label(&outcome.region, outcome.used_national_average)
    )];
    lines.extend(outcome.cost_lines.iter().map(|line| {
        format!(
            "  {:<28} {}/yr at 5 days",
            line.label,
            currency_whole(line.baseline_annual_cost)
        )
    }));
    lines.push(String::new());
    lines.extend(result_lines(&outcome.result));
    lines.push(String::new());
    lines.push("By workdays per week:".to_string());
    lines.extend(scenario_lines(&outcome.scenarios));
    lines.push(data_as_of(&outcome.table_versions));
    lines.join("\n")
}

fn alternative_lines(title: &str, alternative: &AlternativeOutcome) -> Vec<String> {
    let mut lines = vec![format!("{title}:")];
    lines.extend(
        result_lines(&alternative.result)
            .into_iter()
            .map(|line| format!("  {line}")),
    );
    lines.extend([
        format!("  Monthly cost:        {}", currency_whole(alternative.monthly_cost)),
        format!(
            "  Wage premium needed: {} per hour",
            rate_or_undefined(alternative.break_even_wage_premium)
        ),
        format!(
            "  Time value:          {} per year (not deducted)",
            currency_whole(alternative.time_value)
        ),
    ]);
    lines
}

pub fn render_commute(comparison: &CommuteComparison) -> String {
    let rates = &comparison.driving_rates;
    let mut lines = vec![
        format!(
            "Commute in {}",
            region_label(&comparison.region, comparison.used_national_average)
        ),
        format!(
            "Driving cost per mile: {} (fuel {}, maintenance {}, ownership {})",
            currency_cents(rates.total),
            currency_cents(rates.fuel),
            currency_cents(rates.maintenance),
            currency_cents(rates.ownership)
        ),
        String::new(),
    ];
    lines.extend(alternative_lines("Driving", &comparison.driving));
    lines.push(String::new());
    lines.extend(alternative_lines("Transit", &comparison.transit));
    lines.push(String::new());

    let delta = &comparison.delta;
    lines.push(match delta.cheaper {
        Cheaper::Driving => format!(
            "Driving is cheaper by {} per year",
            currency_whole(delta.total_cost_difference)
        ),
        Cheaper::Transit => format!(
            "Transit is cheaper by {} per year",
            currency_whole(-delta.total_cost_difference)
        ),
        Cheaper::Even => "Both options cost the same".to_string(),
    });
    lines.push(format!(
        "Transit minus driving: net {}, time value {}",
        currency_whole(delta.net_annual_difference),
        currency_whole(delta.time_value_difference)
    ));
    lines.push(String::new());
    lines.push("Driving by workdays per week:".to_string());
    lines.extend(scenario_lines(&comparison.driving.scenarios));
    lines.push("Transit by workdays per week:".to_string());
    lines.extend(scenario_lines(&comparison.transit.scenarios));
    lines.push(data_as_of(&comparison.table_versions));
    lines.join("\n")
}

pub fn render_tables(versions: &[TableVersion]) -> String {
    versions
        .iter()
        .map(|v| {
            format!(
                "{:<20} {:<16} {:>4} rows  updated {}  ({})",
                v.name,
                match v.unit {
                    Some(CostUnit::Annual) => "annual",
                    Some(CostUnit::PerMile) => "per mile",
                    Some(CostUnit::Monthly) => "monthly",
                    None => "benefit program",
                },
                v.rows,
                v.last_updated,
                v.source
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn data_as_of(versions: &[TableVersion]) -> String {
    let tags = versions
        .iter()
        .map(|v| format!("{} {}", v.name, v.last_updated))
        .collect::<Vec<_>>();
    format!("Data as of: {}", tags.join(", "))
}

fn region_label(region: &str, used_national_average: bool) -> String {
    if used_national_average {
        format!("{region} (national average)")
    } else {
        region.to_string()
    }
}
