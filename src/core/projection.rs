use super::dataset::Dataset;
use super::depreciation::{DecliningBalancePolicy, DepreciationSchedule};
use super::fiscal::FiscalPolicy;
use super::transaction::YearlyTransaction;
use super::warnings::Warning;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("no fiscal rate for year {year}")]
    MissingTaxRate { year: i32 },
    #[error("no transactions to project")]
    NoTransactions,
}

/// What to do when a transaction year has no fiscal rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingRate {
    /// Leave tax and net income blank for that year and record a warning
    #[default]
    Propagate,
    /// Abort the projection
    Fail,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionOptions {
    pub missing_rate: MissingRate,
}

/// Settings for a full run over a dataset
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionConfig {
    /// First year of declining-balance compounding (default: earliest transaction year)
    pub base_year: Option<i32>,
    pub policy: DecliningBalancePolicy,
    pub options: ProjectionOptions,
}

/// One projected year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionRow {
    pub year: i32,
    pub revenue: Decimal,
    pub operating_expense: Decimal,
    pub reported_depreciation: Decimal,
    /// Computed depreciation across all assets
    pub depreciation: Decimal,
    pub pre_tax_income: Decimal,
    pub tax_rate: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub net_income: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    /// Ordered by year ascending
    pub rows: Vec<ProjectionRow>,
    pub warnings: Vec<Warning>,
}

impl Projection {
    pub fn row(&self, year: i32) -> Option<&ProjectionRow> {
        self.rows.iter().find(|r| r.year == year)
    }

    pub fn total_tax(&self) -> Decimal {
        self.rows.iter().filter_map(|r| r.tax).sum()
    }

    pub fn total_net_income(&self) -> Decimal {
        self.rows.iter().filter_map(|r| r.net_income).sum()
    }
}

/// Merge depreciation and fiscal rates into the transactions.
///
/// `pre_tax_income = revenue - operating_expense - depreciation`,
/// `tax = pre_tax_income * tax_rate`, `net_income = pre_tax_income - tax`.
/// Losses produce negative tax; tax holidays are not applied.
pub fn project(
    transactions: &[YearlyTransaction],
    depreciation_by_year: &BTreeMap<i32, Decimal>,
    fiscal: &FiscalPolicy,
    options: ProjectionOptions,
) -> Result<Projection, ProjectionError> {
    let mut ordered: Vec<&YearlyTransaction> = transactions.iter().collect();
    ordered.sort_by_key(|t| t.year);

    let mut projection = Projection::default();

    for tx in ordered {
        let depreciation = match depreciation_by_year.get(&tx.year) {
            Some(amount) => *amount,
            None => {
                log::warn!("No depreciation total for {}, using 0", tx.year);
                projection
                    .warnings
                    .push(Warning::MissingDepreciation { year: tx.year });
                Decimal::ZERO
            }
        };

        let pre_tax_income = tx.revenue - tx.operating_expense - depreciation;

        let tax_rate = fiscal.rate_for(tx.year);
        if tax_rate.is_none() {
            match options.missing_rate {
                MissingRate::Fail => return Err(ProjectionError::MissingTaxRate { year: tx.year }),
                MissingRate::Propagate => {
                    log::warn!("No fiscal rate for {}, tax left blank", tx.year);
                    projection
                        .warnings
                        .push(Warning::MissingTaxRate { year: tx.year });
                }
            }
        }
        let tax = tax_rate.map(|rate| pre_tax_income * rate);
        let net_income = tax.map(|tax| pre_tax_income - tax);

        log::debug!(
            "{}: revenue={}, opex={}, depreciation={}, pre_tax={}, tax={:?}",
            tx.year,
            tx.revenue,
            tx.operating_expense,
            depreciation,
            pre_tax_income,
            tax
        );

        projection.rows.push(ProjectionRow {
            year: tx.year,
            revenue: tx.revenue,
            operating_expense: tx.operating_expense,
            reported_depreciation: tx.reported_depreciation,
            depreciation,
            pre_tax_income,
            tax_rate,
            tax,
            net_income,
        });
    }

    Ok(projection)
}

/// Result of running the whole pipeline over a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionReport {
    pub base_year: i32,
    pub schedule: DepreciationSchedule,
    pub projection: Projection,
}

impl ProjectionReport {
    pub fn rows(&self) -> &[ProjectionRow] {
        &self.projection.rows
    }
}

/// Depreciate every asset over the transaction years, then project tax.
pub fn calculate_projection(
    dataset: &Dataset,
    config: ProjectionConfig,
) -> Result<ProjectionReport, ProjectionError> {
    let base_year = config
        .base_year
        .or_else(|| dataset.first_year())
        .ok_or(ProjectionError::NoTransactions)?;
    let years = dataset.years();

    log::info!(
        "Projecting {} years from base year {} ({} declining balance)",
        years.len(),
        base_year,
        config.policy.display()
    );

    let schedule = DepreciationSchedule::build(&dataset.assets, &years, base_year, config.policy);
    let projection = project(
        &dataset.transactions,
        &schedule.totals(),
        &dataset.fiscal,
        config.options,
    )?;

    Ok(ProjectionReport {
        base_year,
        schedule,
        projection,
    })
}
