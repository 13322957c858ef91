use serde::{Deserialize, Serialize};

use super::benefits::BenefitProgram;
use super::constants::{
    BASELINE_DAYS_PER_WEEK, DEFAULT_COMMUTE_SWEEP, MINUTES_PER_HOUR, MONTHS_PER_YEAR,
    WEEKS_PER_MONTH, WEEKS_PER_YEAR,
};
use super::cost_table::CostTable;
use super::data::{DataSet, TableVersion};
use super::engine::{evaluate, safe_ratio};
use super::error::DataError;
use super::scenario::project;
use super::types::{CostLine, CostRequest, ScenarioRow, ViabilityResult, WorkSchedule};

const FUEL: &str = "fuel";
const MAINTENANCE: &str = "maintenance";
const OWNERSHIP: &str = "ownership";
const TRANSIT: &str = "transit";
const MONTHLY_PASS: &str = "monthly_pass";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivingOption {
    pub vehicle_class: String,
    pub round_trip_miles: f64,
    pub daily_parking: f64,
    pub daily_tolls: f64,
    pub round_trip_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitOption {
    /// Overrides the regional pass price when set.
    pub monthly_pass: Option<f64>,
    pub round_trip_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommuteRequest {
    pub region: String,
    pub schedule: WorkSchedule,
    pub driving: DrivingOption,
    pub transit: TransitOption,
    pub use_pre_tax_account: bool,
    pub sweep: Option<Vec<u32>>,
}

/// Per-mile operating cost of one vehicle class in one region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivingRates {
    pub fuel: f64,
    pub maintenance: f64,
    /// Depreciation, insurance and registration.
    pub ownership: f64,
    pub total: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommuteMode {
    Driving,
    Transit,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cheaper {
    Driving,
    Transit,
    Even,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeOutcome {
    pub mode: CommuteMode,
    pub cost_lines: Vec<CostLine>,
    pub result: ViabilityResult,
    pub monthly_cost: f64,
    /// Informational only; never subtracted from `result.net_annual`.
    pub time_value: f64,
    pub break_even_wage_premium: Option<f64>,
    pub scenarios: Vec<ScenarioRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommuteDelta {
    /// Transit minus driving.
    pub net_annual_difference: f64,
    pub total_cost_difference: f64,
    pub time_value_difference: f64,
    pub cheaper: Cheaper,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommuteComparison {
    pub region: String,
    pub used_national_average: bool,
    pub driving_rates: DrivingRates,
    pub driving: AlternativeOutcome,
    pub transit: AlternativeOutcome,
    pub delta: CommuteDelta,
    pub table_versions: Vec<TableVersion>,
}

pub fn driving_rates(
    table: &CostTable,
    region: &str,
    vehicle_class: &str,
) -> Result<DrivingRates, DataError> {
    let fuel = table.lookup(region, FUEL, vehicle_class)?;
    let maintenance = table.lookup(region, MAINTENANCE, vehicle_class)?;
    let ownership = table.lookup(region, OWNERSHIP, vehicle_class)?;
    Ok(DrivingRates {
        fuel,
        maintenance,
        ownership,
        total: fuel + maintenance + ownership,
    })
}

/// Cost of one workday of driving: mileage plus parking and tolls.
pub fn driving_cost_per_workday(rates: &DrivingRates, option: &DrivingOption) -> f64 {
    non_negative(option.round_trip_miles) * rates.total
        + non_negative(option.daily_parking)
        + non_negative(option.daily_tolls)
}

/// Driving legs quoted against the baseline week so they scale with workdays.
pub fn driving_cost_request(
    rates: &DrivingRates,
    option: &DrivingOption,
    use_pre_tax_account: bool,
) -> CostRequest {
    let baseline_days_per_year = BASELINE_DAYS_PER_WEEK as f64 * WEEKS_PER_YEAR;
    CostRequest {
        lines: vec![
            CostLine::per_workday(
                "mileage",
                non_negative(option.round_trip_miles) * rates.total * baseline_days_per_year,
            ),
            CostLine::per_workday(
                "parking",
                non_negative(option.daily_parking) * baseline_days_per_year,
            ),
            CostLine::per_workday("tolls", non_negative(option.daily_tolls) * baseline_days_per_year),
        ],
        dependents: 0,
        use_pre_tax_account,
    }
}

pub fn transit_cost_request(monthly_pass: f64, use_pre_tax_account: bool) -> CostRequest {
    CostRequest {
        lines: vec![CostLine::fixed(
            "monthly pass",
            non_negative(monthly_pass) * MONTHS_PER_YEAR,
        )],
        dependents: 0,
        use_pre_tax_account,
    }
}

/// Wage-equivalent value of time spent commuting over a year.
pub fn time_value(hourly_wage: f64, round_trip_minutes: f64, workdays_per_year: f64) -> f64 {
    hourly_wage * (non_negative(round_trip_minutes) / MINUTES_PER_HOUR) * workdays_per_year
}

/// Extra hourly pay a zero-commute job would need to leave income unchanged.
pub fn break_even_wage_premium(
    monthly_commute_cost: f64,
    days_per_week: u32,
    daily_work_hours: f64,
) -> Option<f64> {
    safe_ratio(
        monthly_commute_cost,
        days_per_week as f64 * WEEKS_PER_MONTH * daily_work_hours,
    )
}

pub fn compare(data: &DataSet, request: &CommuteRequest) -> Result<CommuteComparison, DataError> {
    let schedule = request.schedule.clamped();
    let program = &data.commute_program;
    let sweep = request
        .sweep
        .as_deref()
        .unwrap_or(&DEFAULT_COMMUTE_SWEEP[..]);

    let rates = driving_rates(
        &data.vehicle_costs,
        &request.region,
        &request.driving.vehicle_class,
    )?;
    let driving_request =
        driving_cost_request(&rates, &request.driving, request.use_pre_tax_account);
    let driving_monthly = driving_cost_per_workday(&rates, &request.driving)
        * schedule.days_per_week as f64
        * WEEKS_PER_MONTH;
    let driving = build_alternative(
        CommuteMode::Driving,
        &schedule,
        driving_request,
        program,
        driving_monthly,
        request.driving.round_trip_minutes,
        sweep,
    );

    let pass = match request.transit.monthly_pass.filter(|p| p.is_finite()) {
        Some(pass) => non_negative(pass),
        None => data
            .transit_passes
            .lookup(&request.region, TRANSIT, MONTHLY_PASS)?,
    };
    let transit = build_alternative(
        CommuteMode::Transit,
        &schedule,
        transit_cost_request(pass, request.use_pre_tax_account),
        program,
        pass,
        request.transit.round_trip_minutes,
        sweep,
    );

    let delta = CommuteDelta {
        net_annual_difference: transit.result.net_annual - driving.result.net_annual,
        total_cost_difference: transit.result.total_cost - driving.result.total_cost,
        time_value_difference: transit.time_value - driving.time_value,
        cheaper: cheaper_of(driving.result.total_cost, transit.result.total_cost),
    };

    Ok(CommuteComparison {
        region: request.region.clone(),
        used_national_average: !data.vehicle_costs.has_region(&request.region),
        driving_rates: rates,
        driving,
        transit,
        delta,
        table_versions: data.commute_versions(),
    })
}

fn build_alternative(
    mode: CommuteMode,
    schedule: &WorkSchedule,
    cost_request: CostRequest,
    program: &BenefitProgram,
    monthly_cost: f64,
    round_trip_minutes: f64,
    sweep: &[u32],
) -> AlternativeOutcome {
    let result = evaluate(schedule, &cost_request, program);
    let scenarios = project(schedule, &cost_request, program, sweep);
    AlternativeOutcome {
        mode,
        result,
        monthly_cost,
        time_value: time_value(
            schedule.hourly_wage,
            round_trip_minutes,
            schedule.workdays_per_year(),
        ),
        break_even_wage_premium: break_even_wage_premium(
            monthly_cost,
            schedule.days_per_week,
            schedule.hours_per_day(),
        ),
        cost_lines: cost_request.lines,
        scenarios,
    }
}

fn cheaper_of(driving_cost: f64, transit_cost: f64) -> Cheaper {
    match driving_cost.total_cmp(&transit_cost) {
        std::cmp::Ordering::Less => Cheaper::Driving,
        std::cmp::Ordering::Greater => Cheaper::Transit,
        std::cmp::Ordering::Equal => Cheaper::Even,
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
