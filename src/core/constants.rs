//! Named calendar and policy constants shared by every calculator.
//!
//! Income annualisation and the monthly wage-premium conversion use different
//! week counts; keep `WEEKS_PER_YEAR` and `WEEKS_PER_MONTH` apart.

/// Weeks used to annualise weekly earnings and per-workday costs.
pub const WEEKS_PER_YEAR: f64 = 52.0;

/// Weeks per month used when converting monthly costs to an hourly premium.
pub const WEEKS_PER_MONTH: f64 = 4.33;

pub const MONTHS_PER_YEAR: f64 = 12.0;

pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Reference schedule that bundled annual costs are quoted against.
pub const BASELINE_DAYS_PER_WEEK: u32 = 5;

/// Substituted for zero, negative or NaN hours. Positive hours below it are
/// valid and kept as entered.
pub const MIN_HOURS_PER_WEEK: f64 = 1.0;
pub const MAX_HOURS_PER_WEEK: f64 = 168.0;

pub const MIN_DAYS_PER_WEEK: u32 = 1;
pub const MAX_DAYS_PER_WEEK: u32 = 7;

/// Region key of the rows every other region falls back to.
pub const NATIONAL_REGION: &str = "national";

pub const DEFAULT_CHILDCARE_SWEEP: [u32; 4] = [5, 4, 3, 2];
pub const DEFAULT_COMMUTE_SWEEP: [u32; 5] = [1, 2, 3, 4, 5];
