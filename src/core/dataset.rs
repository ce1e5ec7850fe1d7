//! Loading and validation of the three input datasets.

use super::asset::Asset;
use super::fiscal::{FiscalPolicy, FiscalYearRate};
use super::transaction::YearlyTransaction;
use super::warnings::Warning;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::io::Read;

const SAMPLE_ASSETS: &str = include_str!("../../data/assets.csv");
const SAMPLE_TRANSACTIONS: &str = include_str!("../../data/transactions.csv");
const SAMPLE_FISCAL: &str = include_str!("../../data/fiscal_policy.csv");

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to parse {dataset}: {source}")]
    Csv {
        dataset: &'static str,
        source: csv::Error,
    },
    #[error("asset {asset_id}: useful life must be positive, got {years}")]
    InvalidUsefulLife { asset_id: String, years: i32 },
    #[error("asset {asset_id}: acquisition value must be positive, got {value}")]
    InvalidAcquisitionValue { asset_id: String, value: Decimal },
    #[error("fiscal year {year}: tax rate must be between 0 and 1, got {rate}")]
    InvalidTaxRate { year: i32, rate: Decimal },
    #[error("fiscal year {year}: tax holiday ends {end} before it starts {start}")]
    InvalidHolidayWindow {
        year: i32,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("duplicate asset id: {0}")]
    DuplicateAsset(String),
    #[error("duplicate fiscal year: {0}")]
    DuplicateFiscalYear(i32),
    #[error("duplicate transaction year: {0}")]
    DuplicateTransactionYear(i32),
}

/// Validated input for a projection run
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub assets: Vec<Asset>,
    /// Sorted by year ascending
    pub transactions: Vec<YearlyTransaction>,
    pub fiscal: FiscalPolicy,
}

impl Dataset {
    pub fn new(
        assets: Vec<Asset>,
        mut transactions: Vec<YearlyTransaction>,
        fiscal_rates: Vec<FiscalYearRate>,
    ) -> Result<Self, DatasetError> {
        validate_assets(&assets)?;

        let mut years = HashSet::new();
        for tx in &transactions {
            if !years.insert(tx.year) {
                return Err(DatasetError::DuplicateTransactionYear(tx.year));
            }
        }
        transactions.sort_by_key(|t| t.year);

        let fiscal = FiscalPolicy::new(fiscal_rates)?;

        log::debug!(
            "Loaded {} assets, {} transaction years, {} fiscal years",
            assets.len(),
            transactions.len(),
            fiscal.len()
        );

        Ok(Dataset {
            assets,
            transactions,
            fiscal,
        })
    }

    /// The five-year, ten-asset sample shipped with the binary
    pub fn sample() -> Result<Self, DatasetError> {
        Dataset::new(
            read_assets(SAMPLE_ASSETS.as_bytes())?,
            read_transactions(SAMPLE_TRANSACTIONS.as_bytes())?,
            read_fiscal_rates(SAMPLE_FISCAL.as_bytes())?,
        )
    }

    /// Transaction years in ascending order
    pub fn years(&self) -> Vec<i32> {
        self.transactions.iter().map(|t| t.year).collect()
    }

    /// Earliest transaction year, the default start of declining-balance compounding
    pub fn first_year(&self) -> Option<i32> {
        self.transactions.first().map(|t| t.year)
    }

    /// Data quality issues that do not prevent a projection
    pub fn warnings(&self) -> Vec<Warning> {
        let mut warnings: Vec<Warning> = self
            .assets
            .iter()
            .filter(|a| !a.method.is_recognized())
            .map(|a| Warning::UnrecognizedMethod {
                asset_id: a.id.clone(),
                method: a.method.display().to_string(),
            })
            .collect();

        let tx_years: HashSet<i32> = self.transactions.iter().map(|t| t.year).collect();
        warnings.extend(
            self.transactions
                .iter()
                .filter(|t| self.fiscal.get(t.year).is_none())
                .map(|t| Warning::MissingTaxRate { year: t.year }),
        );
        warnings.extend(
            self.fiscal
                .years()
                .filter(|y| !tx_years.contains(y))
                .map(|year| Warning::UnusedFiscalYear { year }),
        );
        warnings
    }

    /// SHA-256 over the canonical CSV rendering of all three datasets
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for asset in &self.assets {
            hasher.update(
                format!(
                    "asset,{},{},{},{},{}\n",
                    asset.id,
                    asset.category,
                    asset.acquisition_value.normalize(),
                    asset.useful_life_years,
                    asset.method
                )
                .as_bytes(),
            );
        }
        for tx in &self.transactions {
            hasher.update(
                format!(
                    "transaction,{},{},{},{},{}\n",
                    tx.year,
                    tx.revenue.normalize(),
                    tx.operating_expense.normalize(),
                    tx.reported_depreciation.normalize(),
                    tx.scenario.as_deref().unwrap_or_default()
                )
                .as_bytes(),
            );
        }
        for rate in self.fiscal.iter() {
            hasher.update(
                format!(
                    "fiscal,{},{},{},{}\n",
                    rate.year,
                    rate.tax_rate.normalize(),
                    rate.tax_holiday_start.map(|d| d.to_string()).unwrap_or_default(),
                    rate.tax_holiday_end.map(|d| d.to_string()).unwrap_or_default()
                )
                .as_bytes(),
            );
        }
        hex::encode(hasher.finalize())
    }
}

fn validate_assets(assets: &[Asset]) -> Result<(), DatasetError> {
    let mut ids = HashSet::new();
    for asset in assets {
        if asset.useful_life_years <= 0 {
            return Err(DatasetError::InvalidUsefulLife {
                asset_id: asset.id.clone(),
                years: asset.useful_life_years,
            });
        }
        if asset.acquisition_value <= Decimal::ZERO {
            return Err(DatasetError::InvalidAcquisitionValue {
                asset_id: asset.id.clone(),
                value: asset.acquisition_value,
            });
        }
        if !ids.insert(asset.id.as_str()) {
            return Err(DatasetError::DuplicateAsset(asset.id.clone()));
        }
    }
    Ok(())
}

pub fn read_assets<R: Read>(reader: R) -> Result<Vec<Asset>, DatasetError> {
    read_csv(reader, "assets")
}

pub fn read_transactions<R: Read>(reader: R) -> Result<Vec<YearlyTransaction>, DatasetError> {
    read_csv(reader, "transactions")
}

pub fn read_fiscal_rates<R: Read>(reader: R) -> Result<Vec<FiscalYearRate>, DatasetError> {
    read_csv(reader, "fiscal policy")
}

fn read_csv<T, R>(reader: R, dataset: &'static str) -> Result<Vec<T>, DatasetError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let rows = rdr
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| DatasetError::Csv { dataset, source })?;
    log::debug!("Read {} {} rows", rows.len(), dataset);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DepreciationMethod;
    use rust_decimal_macros::dec;

    #[test]
    fn sample_loads() {
        let dataset = Dataset::sample().unwrap();
        assert_eq!(dataset.assets.len(), 10);
        assert_eq!(dataset.years(), vec![2023, 2024, 2025, 2026, 2027]);
        assert_eq!(dataset.fiscal.rate_for(2027), Some(dec!(0.18)));
        assert!(dataset.warnings().is_empty());
    }

    #[test]
    fn reads_indonesian_headers() {
        let csv = "aset_id,kategori,nilai_perolehan,umur_ekonomis,metode\n\
                   A001,Mesin,500000000,10,Garis Lurus\n\
                   A002,Kendaraan,300000000,5,Saldo Menurun\n";
        let assets = read_assets(csv.as_bytes()).unwrap();
        assert_eq!(assets[0].id, "A001");
        assert_eq!(assets[0].acquisition_value, dec!(500000000));
        assert_eq!(assets[0].method, DepreciationMethod::StraightLine);
        assert_eq!(assets[1].method, DepreciationMethod::DecliningBalance);
    }

    #[test]
    fn reads_transactions_without_optional_columns() {
        let csv = "year,revenue,operating_expense\n2024,100,40\n";
        let txs = read_transactions(csv.as_bytes()).unwrap();
        assert_eq!(txs[0].reported_depreciation, Decimal::ZERO);
        assert_eq!(txs[0].scenario, None);
    }

    #[test]
    fn reads_fiscal_rates_with_empty_holiday() {
        let csv = "year,tax_rate,tax_holiday_start,tax_holiday_end\n2024,0.22,,\n";
        let rates = read_fiscal_rates(csv.as_bytes()).unwrap();
        assert_eq!(rates[0].tax_holiday_start, None);
        assert_eq!(rates[0].holiday(), None);
    }

    #[test]
    fn malformed_number_is_a_csv_error() {
        let csv = "year,revenue,operating_expense\n2024,lots,40\n";
        let err = read_transactions(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::Csv { dataset: "transactions", .. }));
    }

    fn asset(id: &str, value: Decimal, life: i32) -> Asset {
        Asset {
            id: id.to_string(),
            category: "Mesin".to_string(),
            acquisition_value: value,
            useful_life_years: life,
            method: DepreciationMethod::StraightLine,
        }
    }

    #[test]
    fn zero_useful_life_rejected() {
        let err = Dataset::new(vec![asset("A1", dec!(100), 0)], vec![], vec![]).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidUsefulLife { years: 0, .. }));
    }

    #[test]
    fn non_positive_value_rejected() {
        let err = Dataset::new(vec![asset("A1", dec!(0), 5)], vec![], vec![]).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidAcquisitionValue { .. }));
    }

    #[test]
    fn duplicate_asset_rejected() {
        let err = Dataset::new(
            vec![asset("A1", dec!(100), 5), asset("A1", dec!(200), 5)],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateAsset(ref id) if id == "A1"));
    }

    #[test]
    fn transactions_sorted_and_unique() {
        let tx = |year| YearlyTransaction {
            year,
            revenue: dec!(10),
            operating_expense: dec!(5),
            reported_depreciation: Decimal::ZERO,
            scenario: None,
        };
        let dataset = Dataset::new(vec![], vec![tx(2025), tx(2023)], vec![]).unwrap();
        assert_eq!(dataset.years(), vec![2023, 2025]);
        assert_eq!(dataset.first_year(), Some(2023));

        let err = Dataset::new(vec![], vec![tx(2025), tx(2025)], vec![]).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateTransactionYear(2025)));
    }

    #[test]
    fn warnings_cover_methods_and_years() {
        let mut odd = asset("A9", dec!(100), 5);
        odd.method = DepreciationMethod::parse("Units of Production");
        let tx = YearlyTransaction {
            year: 2024,
            revenue: dec!(10),
            operating_expense: dec!(5),
            reported_depreciation: Decimal::ZERO,
            scenario: None,
        };
        let rate = FiscalYearRate {
            year: 2023,
            tax_rate: dec!(0.22),
            tax_holiday_start: None,
            tax_holiday_end: None,
        };
        let dataset = Dataset::new(vec![odd], vec![tx], vec![rate]).unwrap();
        assert_eq!(
            dataset.warnings(),
            vec![
                Warning::UnrecognizedMethod {
                    asset_id: "A9".to_string(),
                    method: "Units of Production".to_string(),
                },
                Warning::MissingTaxRate { year: 2024 },
                Warning::UnusedFiscalYear { year: 2023 },
            ]
        );
    }

    #[test]
    fn fingerprint_tracks_content() {
        let sample = Dataset::sample().unwrap();
        let again = Dataset::sample().unwrap();
        assert_eq!(sample.fingerprint(), again.fingerprint());
        assert_eq!(sample.fingerprint().len(), 64);

        let mut changed = sample.clone();
        changed.assets[0].acquisition_value = dec!(1);
        assert_ne!(sample.fingerprint(), changed.fingerprint());
    }
}
