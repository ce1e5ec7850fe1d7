//! Display-ready figures: currency in millions, two decimal places.
//!
//! Rounding is half-to-even (`MidpointNearestEven`), so 0.125 million becomes
//! 0.12 and 0.135 million becomes 0.14.

use super::asset::Asset;
use super::projection::ProjectionRow;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::BTreeMap;

const MILLION: Decimal = dec!(1000000);

/// Scale to millions and round to 2 dp, half-to-even
pub fn to_millions(amount: Decimal) -> Decimal {
    round2(amount / MILLION)
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// One year of the summary table, in millions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub year: i32,
    pub revenue: Decimal,
    pub operating_expense: Decimal,
    pub depreciation: Decimal,
    pub pre_tax_income: Decimal,
    pub tax: Option<Decimal>,
    pub net_income: Option<Decimal>,
}

impl From<&ProjectionRow> for SummaryRow {
    fn from(row: &ProjectionRow) -> Self {
        SummaryRow {
            year: row.year,
            revenue: to_millions(row.revenue),
            operating_expense: to_millions(row.operating_expense),
            depreciation: to_millions(row.depreciation),
            pre_tax_income: to_millions(row.pre_tax_income),
            tax: row.tax.map(to_millions),
            net_income: row.net_income.map(to_millions),
        }
    }
}

pub fn summarize(rows: &[ProjectionRow]) -> Vec<SummaryRow> {
    rows.iter().map(SummaryRow::from).collect()
}

/// Percentage change in net income from the first to the last summary row.
///
/// Computed on the rounded millions. `None` when there are fewer than two
/// rows, either end has no net income, or the first year is zero.
pub fn net_income_growth(rows: &[SummaryRow]) -> Option<Decimal> {
    if rows.len() < 2 {
        return None;
    }
    let first = rows.first()?.net_income?;
    let last = rows.last()?.net_income?;
    if first.is_zero() {
        return None;
    }
    Some(round2((last - first) / first * dec!(100)))
}

/// Acquisition value of one asset category, in millions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub value: Decimal,
}

/// Acquisition value per category, sorted by category name
pub fn asset_distribution(assets: &[Asset]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for asset in assets {
        *totals.entry(asset.category.as_str()).or_default() += asset.acquisition_value;
    }
    totals
        .into_iter()
        .map(|(category, value)| CategoryTotal {
            category: category.to_string(),
            value: to_millions(value),
        })
        .collect()
}
