use serde::{Deserialize, Serialize};

use super::benefits::BenefitProgram;
use super::cost_table::{CostTable, CostUnit};
use super::error::DataError;

const CHILDCARE_COSTS_JSON: &str = include_str!("../../data/childcare_costs.json");
const VEHICLE_COSTS_JSON: &str = include_str!("../../data/vehicle_costs.json");
const TRANSIT_PASSES_JSON: &str = include_str!("../../data/transit_passes.json");
const BENEFIT_PROGRAMS_JSON: &str = include_str!("../../data/benefit_programs.json");

pub const CHILDCARE_PROGRAM: &str = "childcare";
pub const COMMUTE_PROGRAM: &str = "commute";

#[derive(Debug, Deserialize)]
struct BenefitProgramsFile {
    programs: Vec<BenefitProgram>,
}

/// Every static table the calculators read, validated as a unit.
#[derive(Debug, Clone)]
pub struct DataSet {
    pub childcare_costs: CostTable,
    pub vehicle_costs: CostTable,
    pub transit_passes: CostTable,
    pub childcare_program: BenefitProgram,
    pub commute_program: BenefitProgram,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableVersion {
    pub name: String,
    pub kind: TableKind,
    pub unit: Option<CostUnit>,
    pub last_updated: String,
    pub source: String,
    pub rows: usize,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableKind {
    CostTable,
    BenefitProgram,
}

impl DataSet {
    /// Tables compiled into the binary. Failing here is a packaging bug.
    pub fn bundled() -> Result<Self, DataError> {
        Self::from_json(
            CHILDCARE_COSTS_JSON,
            VEHICLE_COSTS_JSON,
            TRANSIT_PASSES_JSON,
            BENEFIT_PROGRAMS_JSON,
        )
    }

    pub fn from_json(
        childcare_costs: &str,
        vehicle_costs: &str,
        transit_passes: &str,
        benefit_programs: &str,
    ) -> Result<Self, DataError> {
        let childcare_costs = CostTable::from_json("childcare_costs", childcare_costs)?;
        let vehicle_costs = CostTable::from_json("vehicle_costs", vehicle_costs)?;
        let transit_passes = CostTable::from_json("transit_passes", transit_passes)?;

        let file: BenefitProgramsFile =
            serde_json::from_str(benefit_programs).map_err(|source| DataError::Malformed {
                table: "benefit_programs",
                source,
            })?;
        let mut programs = file.programs;
        for program in &programs {
            program.validate()?;
        }
        let childcare_program = take_program(&mut programs, CHILDCARE_PROGRAM)?;
        let commute_program = take_program(&mut programs, COMMUTE_PROGRAM)?;

        Ok(Self {
            childcare_costs,
            vehicle_costs,
            transit_passes,
            childcare_program,
            commute_program,
        })
    }

    pub fn versions(&self) -> Vec<TableVersion> {
        vec![
            cost_table_version(&self.childcare_costs),
            cost_table_version(&self.vehicle_costs),
            cost_table_version(&self.transit_passes),
            program_version(&self.childcare_program),
            program_version(&self.commute_program),
        ]
    }

    /// The tables a childcare result was computed from.
    pub fn childcare_versions(&self) -> Vec<TableVersion> {
        vec![
            cost_table_version(&self.childcare_costs),
            program_version(&self.childcare_program),
        ]
    }

    pub fn commute_versions(&self) -> Vec<TableVersion> {
        vec![
            cost_table_version(&self.vehicle_costs),
            cost_table_version(&self.transit_passes),
            program_version(&self.commute_program),
        ]
    }
}

fn cost_table_version(table: &CostTable) -> TableVersion {
    TableVersion {
        name: table.name().to_string(),
        kind: TableKind::CostTable,
        unit: Some(table.unit()),
        last_updated: table.last_updated().to_string(),
        source: table.source().to_string(),
        rows: table.rows().len(),
    }
}

fn program_version(program: &BenefitProgram) -> TableVersion {
    TableVersion {
        name: program.name.clone(),
        kind: TableKind::BenefitProgram,
        unit: None,
        last_updated: program.last_updated.clone(),
        source: program.source.clone(),
        rows: program.credit_bands.len(),
    }
}

fn take_program(programs: &mut Vec<BenefitProgram>, name: &str) -> Result<BenefitProgram, DataError> {
    let idx = programs
        .iter()
        .position(|p| p.name == name)
        .ok_or_else(|| DataError::MissingProgram(name.to_string()))?;
    Ok(programs.swap_remove(idx))
}
