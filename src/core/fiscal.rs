use super::dataset::DatasetError;
use chrono::NaiveDate;
use pphc_derive::CsvSchema;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fiscal policy for a single year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, CsvSchema)]
pub struct FiscalYearRate {
    /// Fiscal year
    #[serde(alias = "tahun")]
    pub year: i32,
    /// Corporate income tax rate as a fraction (0.22 = 22%)
    #[schemars(with = "f64")]
    pub tax_rate: Decimal,
    /// First day of the tax holiday window (YYYY-MM-DD)
    #[serde(default, alias = "tax_holiday_awal")]
    pub tax_holiday_start: Option<NaiveDate>,
    /// Last day of the tax holiday window (YYYY-MM-DD)
    #[serde(default, alias = "tax_holiday_akhir")]
    pub tax_holiday_end: Option<NaiveDate>,
}

impl FiscalYearRate {
    /// Holiday window, when both ends are present.
    ///
    /// The window is informational: no tax relief is derived from it.
    pub fn holiday(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.tax_holiday_start.zip(self.tax_holiday_end)
    }
}

/// Fiscal rates keyed by year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FiscalPolicy {
    rates: BTreeMap<i32, FiscalYearRate>,
}

impl FiscalPolicy {
    /// Build a policy, validating each row and rejecting duplicate years.
    pub fn new(rows: Vec<FiscalYearRate>) -> Result<Self, DatasetError> {
        let mut rates = BTreeMap::new();
        for row in rows {
            if row.tax_rate < Decimal::ZERO || row.tax_rate > Decimal::ONE {
                return Err(DatasetError::InvalidTaxRate {
                    year: row.year,
                    rate: row.tax_rate,
                });
            }
            if let Some((start, end)) = row.holiday() {
                if end < start {
                    return Err(DatasetError::InvalidHolidayWindow {
                        year: row.year,
                        start,
                        end,
                    });
                }
            }
            let year = row.year;
            if rates.insert(year, row).is_some() {
                return Err(DatasetError::DuplicateFiscalYear(year));
            }
        }
        Ok(FiscalPolicy { rates })
    }

    pub fn get(&self, year: i32) -> Option<&FiscalYearRate> {
        self.rates.get(&year)
    }

    pub fn rate_for(&self, year: i32) -> Option<Decimal> {
        self.get(year).map(|r| r.tax_rate)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.rates.keys().copied()
    }

    /// Rows in ascending year order
    pub fn iter(&self) -> impl Iterator<Item = &FiscalYearRate> {
        self.rates.values()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn rate(year: i32, tax_rate: Decimal) -> FiscalYearRate {
        FiscalYearRate {
            year,
            tax_rate,
            tax_holiday_start: Some(date(&format!("{year}-01-01"))),
            tax_holiday_end: Some(date(&format!("{year}-12-31"))),
        }
    }

    #[test]
    fn lookup_by_year() {
        let policy = FiscalPolicy::new(vec![rate(2024, dec!(0.22)), rate(2023, dec!(0.20))]).unwrap();
        assert_eq!(policy.rate_for(2023), Some(dec!(0.20)));
        assert_eq!(policy.rate_for(2024), Some(dec!(0.22)));
        assert_eq!(policy.rate_for(2025), None);
        assert_eq!(policy.years().collect::<Vec<_>>(), vec![2023, 2024]);
    }

    #[test]
    fn rate_bounds_are_inclusive() {
        assert!(FiscalPolicy::new(vec![rate(2023, dec!(0)), rate(2024, dec!(1))]).is_ok());
    }

    #[test]
    fn rate_above_one_rejected() {
        let err = FiscalPolicy::new(vec![rate(2023, dec!(1.5))]).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidTaxRate { year: 2023, .. }));
    }

    #[test]
    fn negative_rate_rejected() {
        let err = FiscalPolicy::new(vec![rate(2023, dec!(-0.1))]).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidTaxRate { .. }));
    }

    #[test]
    fn duplicate_year_rejected() {
        let err = FiscalPolicy::new(vec![rate(2023, dec!(0.22)), rate(2023, dec!(0.20))]).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateFiscalYear(2023)));
    }

    #[test]
    fn inverted_holiday_rejected() {
        let mut row = rate(2023, dec!(0.22));
        row.tax_holiday_start = Some(date("2023-12-31"));
        row.tax_holiday_end = Some(date("2023-01-01"));
        let err = FiscalPolicy::new(vec![row]).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidHolidayWindow { year: 2023, .. }));
    }

    #[test]
    fn holiday_requires_both_ends() {
        let mut row = rate(2023, dec!(0.22));
        assert!(row.holiday().is_some());
        row.tax_holiday_end = None;
        assert_eq!(row.holiday(), None);
    }
}
