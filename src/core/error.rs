use thiserror::Error;

/// Problems with the bundled data tables.
///
/// These are configuration faults, never user-input faults: the tables are
/// validated once at load time and the process refuses to start on failure.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("table {table}: malformed JSON: {source}")]
    Malformed {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("table {table}: last_updated tag is empty")]
    MissingVersion { table: String },

    #[error("table {table}: duplicate row for ({region}, {category}, {subtype})")]
    DuplicateCostKey {
        table: String,
        region: String,
        category: String,
        subtype: String,
    },

    #[error("table {table}: ({category}, {subtype}) has no national-average row")]
    MissingNationalRow {
        table: String,
        category: String,
        subtype: String,
    },

    #[error("table {table}: cost for ({region}, {category}, {subtype}) must be finite and >= 0")]
    InvalidCost {
        table: String,
        region: String,
        category: String,
        subtype: String,
    },

    #[error("table {table}: no row for ({category}, {subtype})")]
    UnknownCostKey {
        table: String,
        category: String,
        subtype: String,
    },

    #[error("benefit program {program}: {reason}")]
    InvalidProgram { program: String, reason: String },

    #[error("benefit program {0} is not defined")]
    MissingProgram(String),
}
