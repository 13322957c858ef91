use serde::{Deserialize, Serialize};

use super::constants::DEFAULT_CHILDCARE_SWEEP;
use super::cost_table::CostTable;
use super::data::{DataSet, TableVersion};
use super::engine::evaluate;
use super::error::DataError;
use super::scenario::project;
use super::types::{CostLine, CostRequest, ScenarioRow, ViabilityResult, WorkSchedule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildSpec {
    pub age_band: String,
    pub care_setting: String,
}

/// Everything the childcare form sends on each change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildcareRequest {
    pub region: String,
    pub children: Vec<ChildSpec>,
    pub schedule: WorkSchedule,
    pub use_pre_tax_account: bool,
    /// Defaults to `DEFAULT_CHILDCARE_SWEEP` when absent.
    pub sweep: Option<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildcareOutcome {
    pub region: String,
    pub used_national_average: bool,
    pub cost_lines: Vec<CostLine>,
    pub result: ViabilityResult,
    pub scenarios: Vec<ScenarioRow>,
    /// `lastUpdated` and source of every table behind these figures.
    pub table_versions: Vec<TableVersion>,
}

/// One per-workday line per child, priced for the region.
pub fn childcare_cost_request(
    table: &CostTable,
    region: &str,
    children: &[ChildSpec],
    use_pre_tax_account: bool,
) -> Result<CostRequest, DataError> {
    let lines = children
        .iter()
        .map(|child| {
            let cost = table.lookup(region, &child.age_band, &child.care_setting)?;
            Ok(CostLine::per_workday(
                format!("{} ({})", child.age_band, child.care_setting),
                cost,
            ))
        })
        .collect::<Result<Vec<_>, DataError>>()?;

    Ok(CostRequest {
        lines,
        dependents: children.len() as u32,
        use_pre_tax_account,
    })
}

pub fn run_childcare(data: &DataSet, request: &ChildcareRequest) -> Result<ChildcareOutcome, DataError> {
    let cost_request = childcare_cost_request(
        &data.childcare_costs,
        &request.region,
        &request.children,
        request.use_pre_tax_account,
    )?;

    let program = &data.childcare_program;
    let result = evaluate(&request.schedule, &cost_request, program);
    let sweep = request
        .sweep
        .as_deref()
        .unwrap_or(&DEFAULT_CHILDCARE_SWEEP[..]);
    let scenarios = project(&request.schedule, &cost_request, program, sweep);

    Ok(ChildcareOutcome {
        region: request.region.clone(),
        used_national_average: !data.childcare_costs.has_region(&request.region),
        cost_lines: cost_request.lines,
        result,
        scenarios,
        table_versions: data.childcare_versions(),
    })
}
