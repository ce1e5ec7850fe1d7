use pphc_derive::CsvSchema;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Revenue and operating expense booked for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, CsvSchema)]
pub struct YearlyTransaction {
    /// Fiscal year
    #[serde(alias = "tahun")]
    pub year: i32,
    /// Total revenue for the year
    #[serde(alias = "pendapatan")]
    #[schemars(with = "f64")]
    pub revenue: Decimal,
    /// Total operating expense for the year
    #[serde(alias = "beban_operasional")]
    #[schemars(with = "f64")]
    pub operating_expense: Decimal,
    /// Depreciation as booked in the ledger (informational, replaced by the computed figure)
    #[serde(default, alias = "penyusutan")]
    #[schemars(with = "f64")]
    pub reported_depreciation: Decimal,
    /// Scenario label (e.g. Normal)
    #[serde(default, alias = "skenario")]
    pub scenario: Option<String>,
}
