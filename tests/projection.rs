//! Library-level tests running the full pipeline over fixture datasets

use pphc::core::{
    calculate_projection, net_income_growth, read_assets, read_fiscal_rates, read_transactions,
    summarize, Dataset, DatasetError, DecliningBalancePolicy, MissingRate, ProjectionConfig,
    ProjectionError, ProjectionOptions, Warning,
};
use rust_decimal_macros::dec;
use std::fs::File;

fn load(assets: &str, transactions: &str, fiscal: &str) -> Result<Dataset, DatasetError> {
    Dataset::new(
        read_assets(File::open(assets).unwrap())?,
        read_transactions(File::open(transactions).unwrap())?,
        read_fiscal_rates(File::open(fiscal).unwrap())?,
    )
}

fn fixture() -> Dataset {
    load(
        "tests/data/assets_id.csv",
        "tests/data/transactions_gap.csv",
        "tests/data/fiscal_flat.csv",
    )
    .unwrap()
}

#[test]
fn indonesian_headers_and_method_labels() {
    let dataset = fixture();
    assert_eq!(dataset.assets.len(), 3);
    assert_eq!(dataset.assets[0].id, "B001");
    assert_eq!(dataset.assets[0].acquisition_value, dec!(100000000));
    assert_eq!(
        dataset.warnings(),
        vec![Warning::UnrecognizedMethod {
            asset_id: "B003".to_string(),
            method: "SumOfYears".to_string(),
        }]
    );
}

#[test]
fn flat_projection_over_fixture() {
    let report = calculate_projection(&fixture(), ProjectionConfig::default()).unwrap();
    assert_eq!(report.base_year, 2027);

    let rows = report.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].depreciation, dec!(40000000));
    assert_eq!(rows[0].pre_tax_income, dec!(160000000));
    assert_eq!(rows[0].tax, Some(dec!(40000000)));
    assert_eq!(rows[0].net_income, Some(dec!(120000000)));
    assert_eq!(rows[1].depreciation, dec!(40000000));
    assert_eq!(rows[1].net_income, Some(dec!(157500000)));

    let summary = summarize(rows);
    assert_eq!(net_income_growth(&summary), Some(dec!(31.25)));
}

#[test]
fn decaying_policy_shrinks_declining_balance() {
    let config = ProjectionConfig {
        policy: DecliningBalancePolicy::Decaying,
        ..ProjectionConfig::default()
    };
    let report = calculate_projection(&fixture(), config).unwrap();
    let totals = report.schedule.totals();
    assert_eq!(totals[&2027], dec!(40000000));
    assert_eq!(totals[&2028], dec!(25000000));
}

#[test]
fn base_year_override_keeps_flat_charge() {
    let config = ProjectionConfig {
        base_year: Some(2025),
        ..ProjectionConfig::default()
    };
    let report = calculate_projection(&fixture(), config).unwrap();
    assert_eq!(report.base_year, 2025);
    assert_eq!(report.schedule.total_for(2027), dec!(40000000));
}

#[test]
fn missing_fiscal_year_propagates_or_fails() {
    let sample = Dataset::sample().unwrap();
    let dataset = Dataset::new(
        sample.assets.clone(),
        read_transactions(File::open("tests/data/transactions_gap.csv").unwrap()).unwrap(),
        sample.fiscal.iter().cloned().collect(),
    )
    .unwrap();

    let report = calculate_projection(&dataset, ProjectionConfig::default()).unwrap();
    let last = &report.rows()[1];
    assert_eq!(last.year, 2028);
    assert_eq!(last.tax_rate, None);
    assert_eq!(last.net_income, None);
    assert!(report.rows()[0].net_income.is_some());
    assert_eq!(
        report.projection.warnings,
        vec![Warning::MissingTaxRate { year: 2028 }]
    );

    let strict = ProjectionConfig {
        options: ProjectionOptions {
            missing_rate: MissingRate::Fail,
        },
        ..ProjectionConfig::default()
    };
    assert_eq!(
        calculate_projection(&dataset, strict).unwrap_err(),
        ProjectionError::MissingTaxRate { year: 2028 }
    );
}

#[test]
fn invalid_useful_life_rejected_at_load() {
    let err = load(
        "tests/data/assets_invalid_life.csv",
        "tests/data/transactions_gap.csv",
        "tests/data/fiscal_flat.csv",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DatasetError::InvalidUsefulLife { ref asset_id, years: 0 } if asset_id == "C001"
    ));
}

#[test]
fn fingerprint_tracks_inputs() {
    let a = fixture();
    let b = fixture();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.fingerprint().len(), 64);
    assert_ne!(a.fingerprint(), Dataset::sample().unwrap().fingerprint());
}
