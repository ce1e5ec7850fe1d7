use pphc_derive::CsvSchema;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Depreciation method of a fixed asset
///
/// Parsed leniently from the CSV label. Labels that match neither method are
/// kept as `Unrecognized` and depreciate to zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DepreciationMethod {
    StraightLine,
    DecliningBalance,
    Unrecognized(String),
}

impl DepreciationMethod {
    /// Parse a method label, accepting the English names in any casing as
    /// well as the Indonesian `Garis Lurus` / `Saldo Menurun`.
    pub fn parse(label: &str) -> Self {
        let normalized: String = label
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "straightline" | "garislurus" => DepreciationMethod::StraightLine,
            "decliningbalance" | "doubledecliningbalance" | "saldomenurun" => {
                DepreciationMethod::DecliningBalance
            }
            _ => DepreciationMethod::Unrecognized(label.trim().to_string()),
        }
    }

    pub fn display(&self) -> &str {
        match self {
            DepreciationMethod::StraightLine => "StraightLine",
            DepreciationMethod::DecliningBalance => "DecliningBalance",
            DepreciationMethod::Unrecognized(label) => label,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, DepreciationMethod::Unrecognized(_))
    }
}

impl From<String> for DepreciationMethod {
    fn from(label: String) -> Self {
        DepreciationMethod::parse(&label)
    }
}

impl From<DepreciationMethod> for String {
    fn from(method: DepreciationMethod) -> Self {
        method.display().to_string()
    }
}

impl std::fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// A fixed asset subject to depreciation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, CsvSchema)]
pub struct Asset {
    /// Unique asset identifier (e.g. A001)
    #[serde(alias = "aset_id")]
    pub id: String,
    /// Asset category, used to group the value distribution (e.g. Mesin, Bangunan)
    #[serde(alias = "kategori")]
    pub category: String,
    /// Acquisition cost in currency units (must be positive)
    #[serde(alias = "nilai_perolehan")]
    #[schemars(with = "f64")]
    pub acquisition_value: Decimal,
    /// Useful life in whole years (must be positive)
    #[serde(alias = "umur_ekonomis")]
    pub useful_life_years: i32,
    /// StraightLine or DecliningBalance (Garis Lurus / Saldo Menurun also accepted)
    #[serde(alias = "metode")]
    #[schemars(with = "String")]
    pub method: DepreciationMethod,
}
