pub mod asset;
pub mod dataset;
pub mod depreciation;
pub mod fiscal;
pub mod projection;
pub mod schema;
pub mod summary;
pub mod transaction;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use asset::{Asset, DepreciationMethod};
pub use dataset::{read_assets, read_fiscal_rates, read_transactions, Dataset, DatasetError};
pub use depreciation::{
    annual_depreciation, total_depreciation, AssetSchedule, DecliningBalancePolicy,
    DepreciationSchedule,
};
pub use fiscal::{FiscalPolicy, FiscalYearRate};
pub use projection::{
    calculate_projection, project, MissingRate, Projection, ProjectionConfig, ProjectionError,
    ProjectionOptions, ProjectionReport, ProjectionRow,
};
pub use schema::CsvField;
pub use summary::{
    asset_distribution, net_income_growth, summarize, to_millions, CategoryTotal, SummaryRow,
};
pub use transaction::YearlyTransaction;
pub use warnings::Warning;
