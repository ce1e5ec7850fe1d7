pub mod chart;
pub mod depreciation;
pub mod html_report;
pub mod schema;
pub mod summary;
pub mod validate;

use crate::core::{
    calculate_projection, read_assets, read_fiscal_rates, read_transactions, Dataset,
    DecliningBalancePolicy, MissingRate, ProjectionConfig, ProjectionOptions, ProjectionReport,
};
use anyhow::Context;
use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Input datasets and projection settings shared by every reporting command
#[derive(Args, Debug, Clone, Default)]
pub struct DatasetArgs {
    /// Fixed assets CSV (default: built-in sample)
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Yearly transactions CSV (default: built-in sample)
    #[arg(long)]
    transactions: Option<PathBuf>,

    /// Fiscal policy CSV with tax rate per year (default: built-in sample)
    #[arg(long)]
    fiscal: Option<PathBuf>,

    /// First year of declining-balance compounding (default: earliest transaction year)
    #[arg(long)]
    base_year: Option<i32>,

    /// Declining-balance charge while an asset still has value
    #[arg(long, value_enum, default_value_t = PolicyArg::Flat)]
    policy: PolicyArg,

    /// Fail instead of leaving tax blank when a year has no fiscal rate
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum PolicyArg {
    /// Same charge every year until the asset is exhausted
    #[default]
    Flat,
    /// Charge shrinks with the remaining book value
    Decaying,
}

impl From<PolicyArg> for DecliningBalancePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Flat => DecliningBalancePolicy::FlatFirstYear,
            PolicyArg::Decaying => DecliningBalancePolicy::Decaying,
        }
    }
}

impl DatasetArgs {
    /// Load the datasets, falling back to the sample for any file not given
    pub fn load(&self) -> anyhow::Result<Dataset> {
        if self.assets.is_none() && self.transactions.is_none() && self.fiscal.is_none() {
            log::info!("Using built-in sample datasets");
            return Ok(Dataset::sample()?);
        }

        let sample = Dataset::sample()?;
        let assets = match &self.assets {
            Some(path) => read_assets(open(path, "assets")?)?,
            None => sample.assets,
        };
        let transactions = match &self.transactions {
            Some(path) => read_transactions(open(path, "transactions")?)?,
            None => sample.transactions,
        };
        let fiscal = match &self.fiscal {
            Some(path) => read_fiscal_rates(open(path, "fiscal policy")?)?,
            None => sample.fiscal.iter().cloned().collect(),
        };

        Ok(Dataset::new(assets, transactions, fiscal)?)
    }

    pub fn config(&self) -> ProjectionConfig {
        ProjectionConfig {
            base_year: self.base_year,
            policy: self.policy.into(),
            options: ProjectionOptions {
                missing_rate: if self.strict {
                    MissingRate::Fail
                } else {
                    MissingRate::Propagate
                },
            },
        }
    }

    /// Load and run the projection
    pub fn calculate(&self) -> anyhow::Result<(Dataset, ProjectionReport)> {
        let dataset = self.load()?;
        let report = calculate_projection(&dataset, self.config())?;
        Ok((dataset, report))
    }
}

fn open(path: &Path, dataset: &str) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("failed to read {} from {}", dataset, path.display()))?;
    log::debug!("Reading {} from {}", dataset, path.display());
    Ok(BufReader::new(file))
}

/// Format an amount in millions with thousands separators, e.g. `-1,234.50`
pub fn format_millions(amount: rust_decimal::Decimal) -> String {
    let text = format!("{:.2}", amount.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}

pub fn format_optional(amount: Option<rust_decimal::Decimal>) -> String {
    amount.map(format_millions).unwrap_or_else(|| "-".to_string())
}
