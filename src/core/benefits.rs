use serde::{Deserialize, Serialize};

use super::error::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBand {
    pub income_ceiling: f64,
    pub credit_rate: f64,
}

/// An income-tiered credit plus an optional pre-tax account, as published
/// for one tax year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitProgram {
    pub name: String,
    pub last_updated: String,
    pub source: String,
    /// Strictly increasing ceilings, non-increasing rates.
    pub credit_bands: Vec<CreditBand>,
    /// Index is the number of dependents; the last entry covers any larger count.
    pub per_dependent_caps: Vec<f64>,
    pub pre_tax_annual_limit: f64,
    pub assumed_marginal_tax_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitOutcome {
    pub contribution: f64,
    pub pre_tax_savings: f64,
    pub eligible_expense: f64,
    pub capped_expense: f64,
    pub credit_rate: f64,
    pub credit_amount: f64,
}

impl BenefitProgram {
    pub fn validate(&self) -> Result<(), DataError> {
        let invalid = |reason: String| DataError::InvalidProgram {
            program: self.name.clone(),
            reason,
        };

        if self.last_updated.trim().is_empty() {
            return Err(DataError::MissingVersion {
                table: self.name.clone(),
            });
        }

        for (idx, band) in self.credit_bands.iter().enumerate() {
            if !band.income_ceiling.is_finite() || band.income_ceiling < 0.0 {
                return Err(invalid(format!("band {idx} ceiling must be finite and >= 0")));
            }
            if !(0.0..=1.0).contains(&band.credit_rate) {
                return Err(invalid(format!("band {idx} rate must be between 0 and 1")));
            }
            if let Some(prev) = idx.checked_sub(1).map(|p| self.credit_bands[p]) {
                if band.income_ceiling <= prev.income_ceiling {
                    return Err(invalid(format!(
                        "band {idx} ceiling must exceed the previous ceiling"
                    )));
                }
                if band.credit_rate > prev.credit_rate {
                    return Err(invalid(format!(
                        "band {idx} rate must not exceed the previous rate"
                    )));
                }
            }
        }

        for (dependents, cap) in self.per_dependent_caps.iter().enumerate() {
            if !cap.is_finite() || *cap < 0.0 {
                return Err(invalid(format!(
                    "cap for {dependents} dependents must be finite and >= 0"
                )));
            }
            if dependents > 0 && *cap < self.per_dependent_caps[dependents - 1] {
                return Err(invalid(format!(
                    "cap for {dependents} dependents must not decrease"
                )));
            }
        }

        if !self.pre_tax_annual_limit.is_finite() || self.pre_tax_annual_limit < 0.0 {
            return Err(invalid("pre-tax annual limit must be finite and >= 0".to_string()));
        }

        if !(0.0..=1.0).contains(&self.assumed_marginal_tax_rate) {
            return Err(invalid(
                "assumed marginal tax rate must be between 0 and 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Rate of the first band whose ceiling is at or above `gross_annual`; the
/// lowest (last) rate above every ceiling; zero with no bands.
///
/// Every caller that needs a credit rate goes through here. Gross income
/// moves with the schedule, so a rate must never be carried over from a
/// different evaluation.
pub fn select_credit_rate(bands: &[CreditBand], gross_annual: f64) -> f64 {
    bands
        .iter()
        .find(|band| band.income_ceiling >= gross_annual)
        .or_else(|| bands.last())
        .map(|band| band.credit_rate)
        .unwrap_or(0.0)
}

pub fn dependent_cap(caps: &[f64], dependents: u32) -> f64 {
    caps.get(dependents as usize)
        .or_else(|| caps.last())
        .copied()
        .unwrap_or(0.0)
}

/// Pre-tax account first, then the tiered credit on whatever cost the
/// account did not already cover. Reversing the order overstates the credit.
pub fn apply_benefits(
    program: &BenefitProgram,
    total_cost: f64,
    gross_annual: f64,
    dependents: u32,
    use_pre_tax_account: bool,
) -> BenefitOutcome {
    let total_cost = total_cost.max(0.0);

    let contribution = if use_pre_tax_account {
        program.pre_tax_annual_limit.min(total_cost).max(0.0)
    } else {
        0.0
    };
    let pre_tax_savings = contribution * program.assumed_marginal_tax_rate;

    let eligible_expense = (total_cost - contribution).max(0.0);
    let capped_expense = eligible_expense.min(dependent_cap(&program.per_dependent_caps, dependents));
    let credit_rate = select_credit_rate(&program.credit_bands, gross_annual);
    let credit_amount = capped_expense * credit_rate;

    BenefitOutcome {
        contribution,
        pre_tax_savings,
        eligible_expense,
        capped_expense,
        credit_rate,
        credit_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn tiered_program() -> BenefitProgram {
        BenefitProgram {
            name: "test".to_string(),
            last_updated: "2025-01-15".to_string(),
            source: "test".to_string(),
            credit_bands: vec![
                CreditBand {
                    income_ceiling: 15_000.0,
                    credit_rate: 0.35,
                },
                CreditBand {
                    income_ceiling: 30_000.0,
                    credit_rate: 0.27,
                },
                CreditBand {
                    income_ceiling: 43_000.0,
                    credit_rate: 0.21,
                },
            ],
            per_dependent_caps: vec![0.0, 3_000.0, 6_000.0],
            pre_tax_annual_limit: 5_000.0,
            assumed_marginal_tax_rate: 0.25,
        }
    }

    #[test]
    fn select_credit_rate_includes_the_ceiling_itself() {
        let bands = tiered_program().credit_bands;
        assert_approx(select_credit_rate(&bands, 15_000.0), 0.35);
        assert_approx(select_credit_rate(&bands, 15_000.01), 0.27);
        assert_approx(select_credit_rate(&bands, 29_999.99), 0.27);
        assert_approx(select_credit_rate(&bands, 30_000.0), 0.27);
        assert_approx(select_credit_rate(&bands, 30_000.5), 0.21);
    }

    #[test]
    fn select_credit_rate_uses_lowest_rate_above_all_ceilings() {
        let bands = tiered_program().credit_bands;
        assert_approx(select_credit_rate(&bands, 1_000_000.0), 0.21);
        assert_approx(select_credit_rate(&[], 10_000.0), 0.0);
    }

    #[test]
    fn dependent_cap_reuses_last_entry_for_large_households() {
        let caps = tiered_program().per_dependent_caps;
        assert_approx(dependent_cap(&caps, 0), 0.0);
        assert_approx(dependent_cap(&caps, 1), 3_000.0);
        assert_approx(dependent_cap(&caps, 2), 6_000.0);
        assert_approx(dependent_cap(&caps, 5), 6_000.0);
        assert_approx(dependent_cap(&[], 2), 0.0);
    }

    #[test]
    fn apply_benefits_subtracts_contribution_before_credit() {
        let mut program = tiered_program();
        program.credit_bands = vec![CreditBand {
            income_ceiling: 50_000.0,
            credit_rate: 0.20,
        }];

        let outcome = apply_benefits(&program, 12_000.0, 37_440.0, 1, true);
        assert_approx(outcome.contribution, 5_000.0);
        assert_approx(outcome.pre_tax_savings, 1_250.0);
        assert_approx(outcome.eligible_expense, 7_000.0);
        assert_approx(outcome.capped_expense, 3_000.0);
        assert_approx(outcome.credit_rate, 0.20);
        assert_approx(outcome.credit_amount, 600.0);
    }

    #[test]
    fn apply_benefits_gives_no_credit_when_account_covers_everything() {
        let outcome = apply_benefits(&tiered_program(), 4_000.0, 20_000.0, 2, true);
        assert_approx(outcome.contribution, 4_000.0);
        assert_approx(outcome.pre_tax_savings, 1_000.0);
        assert_approx(outcome.eligible_expense, 0.0);
        assert_approx(outcome.credit_amount, 0.0);
    }

    #[test]
    fn apply_benefits_without_account_credits_full_capped_cost() {
        let outcome = apply_benefits(&tiered_program(), 4_000.0, 20_000.0, 2, false);
        assert_approx(outcome.contribution, 0.0);
        assert_approx(outcome.pre_tax_savings, 0.0);
        assert_approx(outcome.eligible_expense, 4_000.0);
        assert_approx(outcome.credit_amount, 4_000.0 * 0.27);
    }

    #[test]
    fn validate_rejects_bands_out_of_order() {
        let mut program = tiered_program();
        program.credit_bands.swap(0, 1);
        assert!(matches!(
            program.validate(),
            Err(DataError::InvalidProgram { .. })
        ));

        let mut program = tiered_program();
        program.credit_bands[2].credit_rate = 0.40;
        assert!(program.validate().is_err());

        let mut program = tiered_program();
        program.credit_bands[1].income_ceiling = 15_000.0;
        assert!(program.validate().is_err());
    }

    #[test]
    fn validate_rejects_decreasing_caps_and_bad_rates() {
        let mut program = tiered_program();
        program.per_dependent_caps = vec![0.0, 3_000.0, 2_000.0];
        assert!(program.validate().is_err());

        let mut program = tiered_program();
        program.assumed_marginal_tax_rate = 1.5;
        assert!(program.validate().is_err());

        let mut program = tiered_program();
        program.pre_tax_annual_limit = f64::NAN;
        assert!(program.validate().is_err());

        assert!(tiered_program().validate().is_ok());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(96))]

        #[test]
        fn prop_credit_is_bounded_by_eligible_expense(
            total_cost in 0.0f64..60_000.0,
            gross in 0.0f64..120_000.0,
            dependents in 0u32..5,
            use_pre_tax in proptest::bool::ANY
        ) {
            let outcome = apply_benefits(&tiered_program(), total_cost, gross, dependents, use_pre_tax);
            prop_assert!(outcome.credit_amount >= 0.0);
            prop_assert!(outcome.credit_amount <= outcome.eligible_expense + 1e-9);
            prop_assert!(outcome.contribution <= total_cost + 1e-9);
        }

        #[test]
        fn prop_pre_tax_account_never_raises_eligible_expense(
            total_cost in 0.0f64..60_000.0,
            gross in 0.0f64..120_000.0,
            dependents in 0u32..5
        ) {
            let with_account = apply_benefits(&tiered_program(), total_cost, gross, dependents, true);
            let without_account = apply_benefits(&tiered_program(), total_cost, gross, dependents, false);
            prop_assert!(with_account.eligible_expense <= without_account.eligible_expense + 1e-9);
        }

        #[test]
        fn prop_credit_rate_matches_first_band_at_or_above_income(gross in 0.0f64..60_000.0) {
            let bands = tiered_program().credit_bands;
            let rate = select_credit_rate(&bands, gross);
            let expected = if gross <= 15_000.0 {
                0.35
            } else if gross <= 30_000.0 {
                0.27
            } else {
                0.21
            };
            prop_assert!((rate - expected).abs() <= 1e-12);
        }
    }
}
