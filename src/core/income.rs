use super::constants::{
    MAX_DAYS_PER_WEEK, MAX_HOURS_PER_WEEK, MIN_DAYS_PER_WEEK, MIN_HOURS_PER_WEEK, WEEKS_PER_YEAR,
};
use super::types::WorkSchedule;

impl WorkSchedule {
    pub fn new(hourly_wage: f64, hours_per_week: f64, days_per_week: u32) -> Self {
        Self {
            hourly_wage,
            hours_per_week,
            days_per_week,
        }
    }

    /// Pulls every field into its valid range. Live forms send partial and
    /// out-of-range values on every keystroke, so nothing here is rejected.
    pub fn clamped(self) -> Self {
        Self {
            hourly_wage: clamp_wage(self.hourly_wage),
            hours_per_week: clamp_hours(self.hours_per_week),
            days_per_week: clamp_days(self.days_per_week),
        }
    }

    pub fn gross_annual(&self) -> f64 {
        gross_annual(self.hourly_wage, self.hours_per_week, WEEKS_PER_YEAR)
    }

    pub fn hours_per_day(&self) -> f64 {
        self.hours_per_week / self.days_per_week.max(MIN_DAYS_PER_WEEK) as f64
    }

    pub fn hours_per_year(&self) -> f64 {
        self.hours_per_week * WEEKS_PER_YEAR
    }

    pub fn workdays_per_year(&self) -> f64 {
        self.days_per_week as f64 * WEEKS_PER_YEAR
    }
}

pub fn gross_annual(hourly_wage: f64, hours_per_week: f64, weeks_per_year: f64) -> f64 {
    hourly_wage * hours_per_week * weeks_per_year
}

pub fn clamp_wage(hourly_wage: f64) -> f64 {
    if hourly_wage.is_finite() {
        hourly_wage.max(0.0)
    } else {
        0.0
    }
}

/// Valid hours are `(0, 168]`; only values outside that range are replaced.
pub fn clamp_hours(hours_per_week: f64) -> f64 {
    if hours_per_week.is_nan() || hours_per_week <= 0.0 {
        return MIN_HOURS_PER_WEEK;
    }
    hours_per_week.min(MAX_HOURS_PER_WEEK)
}

pub fn clamp_days(days_per_week: u32) -> u32 {
    days_per_week.clamp(MIN_DAYS_PER_WEEK, MAX_DAYS_PER_WEEK)
}
