use serde::Serialize;

/// Data quality issues found while loading or projecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Warning {
    /// Asset method label not recognised; the asset contributes no depreciation.
    UnrecognizedMethod { asset_id: String, method: String },
    /// No fiscal rate for a transaction year; tax and net income are unknown.
    MissingTaxRate { year: i32 },
    /// No depreciation total supplied for a transaction year; treated as zero.
    MissingDepreciation { year: i32 },
    /// Fiscal rate for a year with no transactions.
    UnusedFiscalYear { year: i32 },
}

impl Warning {
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::UnrecognizedMethod { .. } => "UnrecognizedMethod",
            Warning::MissingTaxRate { .. } => "MissingTaxRate",
            Warning::MissingDepreciation { .. } => "MissingDepreciation",
            Warning::UnusedFiscalYear { .. } => "UnusedFiscalYear",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Warning::UnrecognizedMethod { asset_id, method } => format!(
                "Asset {asset_id} has unrecognised method '{method}' - depreciation counted as 0"
            ),
            Warning::MissingTaxRate { year } => {
                format!("No fiscal rate for {year} - tax and net income left blank")
            }
            Warning::MissingDepreciation { year } => {
                format!("No depreciation total for {year} - counted as 0")
            }
            Warning::UnusedFiscalYear { year } => {
                format!("Fiscal rate for {year} has no matching transactions")
            }
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind(), self.message())
    }
}
