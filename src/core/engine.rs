use super::benefits::{BenefitProgram, apply_benefits};
use super::constants::BASELINE_DAYS_PER_WEEK;
use super::cost_table::aggregate;
use super::types::{CostRequest, ViabilityResult, WorkSchedule};

/// One full pass: scaled cost, gross pay, benefits, then the derived rates.
///
/// The schedule is clamped first and the clamped values are echoed back in
/// the result; the caller's schedule is never modified.
pub fn evaluate(
    schedule: &WorkSchedule,
    cost_request: &CostRequest,
    program: &BenefitProgram,
) -> ViabilityResult {
    let schedule = schedule.clamped();

    let total_cost = aggregate(
        &cost_request.lines,
        schedule.days_per_week,
        BASELINE_DAYS_PER_WEEK,
    );
    let gross_annual = schedule.gross_annual();
    let benefits = apply_benefits(
        program,
        total_cost,
        gross_annual,
        cost_request.dependents,
        cost_request.use_pre_tax_account,
    );

    let net_annual =
        gross_annual - total_cost + benefits.pre_tax_savings + benefits.credit_amount;
    let hours_per_year = schedule.hours_per_year();

    ViabilityResult {
        days_per_week: schedule.days_per_week,
        hours_per_week: schedule.hours_per_week,
        gross_annual,
        total_cost,
        pre_tax_contribution: benefits.contribution,
        pre_tax_savings: benefits.pre_tax_savings,
        eligible_expense: benefits.eligible_expense,
        credit_rate: benefits.credit_rate,
        credit_amount: benefits.credit_amount,
        net_annual,
        effective_hourly_rate: safe_ratio(net_annual, hours_per_year),
        // Benefits are deliberately left out here; see DESIGN.md.
        break_even_hourly_rate: safe_ratio(total_cost, hours_per_year),
        cost_share_of_gross: safe_ratio(total_cost, gross_annual),
        viable: net_annual > 0.0,
    }
}

/// `numerator / denominator`, or `None` when the denominator is not positive
/// or the quotient is not finite.
pub fn safe_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator.is_nan() || denominator <= 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::benefits::CreditBand;
    use crate::core::constants::WEEKS_PER_YEAR;
    use crate::core::types::CostLine;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_opt(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("rate should be defined");
        assert_approx(actual, expected);
    }

    fn oracle_program() -> BenefitProgram {
        BenefitProgram {
            name: "oracle".to_string(),
            last_updated: "2025-01-15".to_string(),
            source: "hand calculation".to_string(),
            credit_bands: vec![CreditBand {
                income_ceiling: 50_000.0,
                credit_rate: 0.20,
            }],
            per_dependent_caps: vec![0.0, 3_000.0, 6_000.0],
            pre_tax_annual_limit: 5_000.0,
            assumed_marginal_tax_rate: 0.25,
        }
    }

    fn tiered_program() -> BenefitProgram {
        BenefitProgram {
            credit_bands: vec![
                CreditBand {
                    income_ceiling: 15_000.0,
                    credit_rate: 0.35,
                },
                CreditBand {
                    income_ceiling: 25_000.0,
                    credit_rate: 0.30,
                },
                CreditBand {
                    income_ceiling: 43_000.0,
                    credit_rate: 0.21,
                },
            ],
            ..oracle_program()
        }
    }

    fn single_child(baseline: f64, use_pre_tax_account: bool) -> CostRequest {
        CostRequest {
            lines: vec![CostLine::per_workday("infant", baseline)],
            dependents: 1,
            use_pre_tax_account,
        }
    }

    #[test]
    fn oracle_full_week_with_pre_tax_account_matches_hand_calculation() {
        let schedule = WorkSchedule::new(18.0, 40.0, 5);
        let result = evaluate(&schedule, &single_child(12_000.0, true), &oracle_program());

        // gross = 18 * 40 * 52 = 37,440
        // contribution = min(5,000, 12,000) = 5,000 -> savings 1,250
        // eligible = 7,000, capped at 3,000 -> credit 600
        // net = 37,440 - 12,000 + 1,250 + 600 = 27,290
        assert_approx(result.gross_annual, 37_440.0);
        assert_approx(result.total_cost, 12_000.0);
        assert_approx(result.pre_tax_contribution, 5_000.0);
        assert_approx(result.pre_tax_savings, 1_250.0);
        assert_approx(result.eligible_expense, 7_000.0);
        assert_approx(result.credit_amount, 600.0);
        assert_approx(result.net_annual, 27_290.0);
        assert_approx_opt(result.effective_hourly_rate, 27_290.0 / 2_080.0);
        assert_approx_opt(result.break_even_hourly_rate, 12_000.0 / 2_080.0);
        assert_approx_opt(result.cost_share_of_gross, 12_000.0 / 37_440.0);
        assert!(result.viable);
    }

    #[test]
    fn fractional_weekly_hours_are_evaluated_as_entered() {
        let empty = CostRequest {
            lines: Vec::new(),
            dependents: 0,
            use_pre_tax_account: false,
        };
        let result = evaluate(&WorkSchedule::new(20.0, 0.5, 1), &empty, &oracle_program());

        // gross = 20 * 0.5 * 52 = 520; 26 hours a year
        assert_approx(result.hours_per_week, 0.5);
        assert_approx(result.gross_annual, 520.0);
        assert_approx(result.net_annual, 520.0);
        assert_approx_opt(result.effective_hourly_rate, 20.0);
    }

    #[test]
    fn break_even_rate_ignores_benefits() {
        let schedule = WorkSchedule::new(18.0, 40.0, 5);
        let with_account = evaluate(&schedule, &single_child(12_000.0, true), &oracle_program());
        let without_account =
            evaluate(&schedule, &single_child(12_000.0, false), &oracle_program());
        assert_eq!(
            with_account.break_even_hourly_rate,
            without_account.break_even_hourly_rate
        );
        assert!(with_account.net_annual > without_account.net_annual);
    }

    #[test]
    fn three_day_week_scales_cost_before_benefits() {
        let schedule = WorkSchedule::new(18.0, 24.0, 3);
        let result = evaluate(&schedule, &single_child(12_000.0, true), &oracle_program());

        // cost = 12,000 * 3/5 = 7,200; gross = 18 * 24 * 52 = 22,464
        // contribution 5,000 -> savings 1,250; eligible 2,200 < cap -> credit 440
        assert_approx(result.total_cost, 7_200.0);
        assert_approx(result.gross_annual, 22_464.0);
        assert_approx(result.eligible_expense, 2_200.0);
        assert_approx(result.credit_amount, 440.0);
        assert_approx(result.net_annual, 22_464.0 - 7_200.0 + 1_250.0 + 440.0);

        let naive_net = 22_464.0 - 12_000.0 + 1_250.0 + 600.0;
        let naive_rate = naive_net / (24.0 * WEEKS_PER_YEAR);
        let rate = result.effective_hourly_rate.expect("defined");
        assert!((rate - naive_rate).abs() > 1.0);
    }

    #[test]
    fn cost_above_earnings_gives_negative_rate_without_touching_inputs() {
        let schedule = WorkSchedule::new(8.0, 10.0, 5);
        let request = single_child(30_000.0, false);
        let result = evaluate(&schedule, &request, &oracle_program());

        assert!(result.net_annual < 0.0);
        assert!(result.effective_hourly_rate.expect("defined") < 0.0);
        assert!(!result.viable);
        assert_eq!(schedule, WorkSchedule::new(8.0, 10.0, 5));
        assert_eq!(request, single_child(30_000.0, false));
    }

    #[test]
    fn out_of_range_schedule_is_clamped_and_echoed() {
        let schedule = WorkSchedule::new(-5.0, 0.0, 9);
        let result = evaluate(&schedule, &single_child(10_000.0, false), &oracle_program());
        assert_eq!(result.days_per_week, 7);
        assert_approx(result.hours_per_week, 1.0);
        assert_approx(result.gross_annual, 0.0);
        assert_approx(result.total_cost, 14_000.0);
        assert!(result.effective_hourly_rate.is_some());
        assert_eq!(result.cost_share_of_gross, None);
    }

    #[test]
    fn credit_rate_follows_income_tier() {
        let request = single_child(10_000.0, false);
        let low = evaluate(&WorkSchedule::new(7.0, 40.0, 5), &request, &tiered_program());
        let high = evaluate(&WorkSchedule::new(20.0, 40.0, 5), &request, &tiered_program());
        // 14,560 sits in the first band, 41,600 in the last.
        assert_approx(low.credit_rate, 0.35);
        assert_approx(high.credit_rate, 0.21);
        assert_approx(low.credit_amount, 3_000.0 * 0.35);
        assert_approx(high.credit_amount, 3_000.0 * 0.21);
    }

    #[test]
    fn safe_ratio_reports_undefined_for_degenerate_denominators() {
        assert_eq!(safe_ratio(10.0, 0.0), None);
        assert_eq!(safe_ratio(10.0, -1.0), None);
        assert_eq!(safe_ratio(10.0, f64::NAN), None);
        assert_eq!(safe_ratio(f64::INFINITY, 1.0), None);
        assert_eq!(safe_ratio(10.0, 4.0), Some(2.5));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(96))]

        #[test]
        fn prop_zero_cost_means_net_equals_gross(
            wage in 0.0f64..80.0,
            hours in 1.0f64..168.0,
            days in 1u32..8,
            use_pre_tax in proptest::bool::ANY
        ) {
            let request = CostRequest { lines: Vec::new(), dependents: 2, use_pre_tax_account: use_pre_tax };
            let result = evaluate(&WorkSchedule::new(wage, hours, days), &request, &tiered_program());
            prop_assert_eq!(result.credit_amount, 0.0);
            prop_assert_eq!(result.net_annual, result.gross_annual);
        }

        #[test]
        fn prop_net_invariant_and_non_negative_parts(
            wage in -10.0f64..80.0,
            hours in -5.0f64..200.0,
            days in 0u32..10,
            baseline in 0.0f64..40_000.0,
            dependents in 0u32..4,
            use_pre_tax in proptest::bool::ANY
        ) {
            let request = CostRequest {
                lines: vec![CostLine::per_workday("care", baseline)],
                dependents,
                use_pre_tax_account: use_pre_tax,
            };
            let result = evaluate(&WorkSchedule::new(wage, hours, days), &request, &tiered_program());
            prop_assert!(result.total_cost >= 0.0);
            prop_assert!(result.credit_amount >= 0.0);
            prop_assert!(result.credit_amount <= result.eligible_expense + 1e-9);
            let expected_net = result.gross_annual - result.total_cost + result.pre_tax_savings + result.credit_amount;
            prop_assert_eq!(result.net_annual, expected_net);
            prop_assert!(result.effective_hourly_rate.is_some());
            prop_assert!(result.break_even_hourly_rate.is_some());
        }

        #[test]
        fn prop_evaluate_is_idempotent(
            wage in 0.0f64..80.0,
            hours in 1.0f64..80.0,
            days in 1u32..8,
            baseline in 0.0f64..40_000.0
        ) {
            let schedule = WorkSchedule::new(wage, hours, days);
            let request = single_child(baseline, true);
            let first = evaluate(&schedule, &request, &tiered_program());
            let second = evaluate(&schedule, &request, &tiered_program());
            prop_assert_eq!(first, second);
        }
    }
}
