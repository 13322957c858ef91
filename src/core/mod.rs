mod benefits;
mod childcare;
mod commute;
mod constants;
mod cost_table;
mod data;
mod engine;
mod error;
mod income;
mod scenario;
mod types;

pub use benefits::{
    BenefitOutcome, BenefitProgram, CreditBand, apply_benefits, dependent_cap, select_credit_rate,
};
pub use childcare::{
    ChildSpec, ChildcareOutcome, ChildcareRequest, childcare_cost_request, run_childcare,
};
pub use commute::{
    AlternativeOutcome, Cheaper, CommuteComparison, CommuteDelta, CommuteMode, CommuteRequest,
    DrivingOption, DrivingRates, TransitOption, break_even_wage_premium, compare,
    driving_cost_per_workday, driving_cost_request, driving_rates, time_value,
    transit_cost_request,
};
pub use constants::*;
pub use cost_table::{CostRow, CostTable, CostUnit, aggregate, normalize_key, scale};
pub use data::{CHILDCARE_PROGRAM, COMMUTE_PROGRAM, DataSet, TableKind, TableVersion};
pub use engine::{evaluate, safe_ratio};
pub use error::DataError;
pub use income::{clamp_days, clamp_hours, clamp_wage, gross_annual};
pub use scenario::project;
pub use types::{CostLine, CostRequest, CostScaling, ScenarioRow, ViabilityResult, WorkSchedule};
