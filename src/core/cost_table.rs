use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::constants::NATIONAL_REGION;
use super::error::DataError;
use super::types::{CostLine, CostScaling};

/// What a row's `baseline_cost` is quoted in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostUnit {
    Annual,
    PerMile,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRow {
    pub region: String,
    pub category: String,
    pub subtype: String,
    pub baseline_cost: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CostTableFile {
    name: String,
    unit: CostUnit,
    last_updated: String,
    source: String,
    rows: Vec<CostRow>,
}

type CostKey = (String, String, String);

/// Read-only unit costs keyed by `(region, category, subtype)`.
///
/// Every `(category, subtype)` pair present anywhere in the table is
/// guaranteed a `national` row, so region lookups never come back empty.
#[derive(Debug, Clone)]
pub struct CostTable {
    name: String,
    unit: CostUnit,
    last_updated: String,
    source: String,
    rows: Vec<CostRow>,
    index: HashMap<CostKey, usize>,
}

impl CostTable {
    pub fn from_json(table: &'static str, json: &str) -> Result<Self, DataError> {
        let file: CostTableFile = serde_json::from_str(json)
            .map_err(|source| DataError::Malformed { table, source })?;
        Self::from_rows(file.name, file.unit, file.last_updated, file.source, file.rows)
    }

    pub fn from_rows(
        name: String,
        unit: CostUnit,
        last_updated: String,
        source: String,
        rows: Vec<CostRow>,
    ) -> Result<Self, DataError> {
        if last_updated.trim().is_empty() {
            return Err(DataError::MissingVersion { table: name });
        }

        let mut index = HashMap::with_capacity(rows.len());
        let mut pairs = BTreeSet::new();
        for (idx, row) in rows.iter().enumerate() {
            if !row.baseline_cost.is_finite() || row.baseline_cost < 0.0 {
                return Err(DataError::InvalidCost {
                    table: name,
                    region: row.region.clone(),
                    category: row.category.clone(),
                    subtype: row.subtype.clone(),
                });
            }
            let key = cost_key(&row.region, &row.category, &row.subtype);
            if index.insert(key, idx).is_some() {
                return Err(DataError::DuplicateCostKey {
                    table: name,
                    region: row.region.clone(),
                    category: row.category.clone(),
                    subtype: row.subtype.clone(),
                });
            }
            pairs.insert((normalize_key(&row.category), normalize_key(&row.subtype)));
        }

        for (category, subtype) in pairs {
            let national = (NATIONAL_REGION.to_string(), category, subtype);
            if !index.contains_key(&national) {
                let (_, category, subtype) = national;
                return Err(DataError::MissingNationalRow {
                    table: name,
                    category,
                    subtype,
                });
            }
        }

        Ok(Self {
            name,
            unit,
            last_updated,
            source,
            rows,
            index,
        })
    }

    /// Baseline cost for the key, falling back to the national-average row
    /// when the region has no row of its own.
    pub fn lookup(&self, region: &str, category: &str, subtype: &str) -> Result<f64, DataError> {
        if let Some(&idx) = self.index.get(&cost_key(region, category, subtype)) {
            return Ok(self.rows[idx].baseline_cost);
        }

        match self
            .index
            .get(&cost_key(NATIONAL_REGION, category, subtype))
        {
            Some(&idx) => {
                debug!(
                    table = %self.name,
                    region,
                    category,
                    subtype,
                    "no regional row; using national average"
                );
                Ok(self.rows[idx].baseline_cost)
            }
            None => Err(DataError::UnknownCostKey {
                table: self.name.clone(),
                category: category.to_string(),
                subtype: subtype.to_string(),
            }),
        }
    }

    pub fn has_region(&self, region: &str) -> bool {
        let region = normalize_key(region);
        self.index.keys().any(|(r, _, _)| *r == region)
    }

    /// Each region once, spelled as in its first row, so clients can send
    /// the value straight back.
    pub fn regions(&self) -> Vec<String> {
        let mut regions = BTreeMap::new();
        for row in &self.rows {
            regions
                .entry(normalize_key(&row.region))
                .or_insert_with(|| row.region.trim().to_string());
        }
        regions.into_values().collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> CostUnit {
        self.unit
    }

    pub fn last_updated(&self) -> &str {
        &self.last_updated
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn rows(&self) -> &[CostRow] {
        &self.rows
    }
}

/// Linear rescaling of a baseline-week cost to the actual schedule.
///
/// Real pricing is not linear in days; the linear rule is what published
/// figures are checked against and must stay as is.
pub fn scale(baseline_annual_cost: f64, actual_days_per_week: u32, baseline_days_per_week: u32) -> f64 {
    if baseline_days_per_week == 0 {
        return baseline_annual_cost;
    }
    baseline_annual_cost * (actual_days_per_week as f64 / baseline_days_per_week as f64)
}

/// Total annual cost of every line at the given schedule. Negative
/// baselines count as zero.
pub fn aggregate(lines: &[CostLine], days_per_week: u32, baseline_days_per_week: u32) -> f64 {
    lines
        .iter()
        .map(|line| {
            let baseline = line.baseline_annual_cost.max(0.0);
            match line.scaling {
                CostScaling::PerWorkday => scale(baseline, days_per_week, baseline_days_per_week),
                CostScaling::Fixed => baseline,
            }
        })
        .sum()
}

pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace('-', "_")
}

fn cost_key(region: &str, category: &str, subtype: &str) -> CostKey {
    (
        normalize_key(region),
        normalize_key(category),
        normalize_key(subtype),
    )
}
