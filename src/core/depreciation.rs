//! Annual depreciation per asset and per year.
//!
//! Straight-line assets depreciate by `acquisition_value / useful_life_years`
//! every year, including years past the end of their useful life.
//!
//! Declining-balance assets use the double-declining rate `2 / useful_life_years`.
//! A remaining value is compounded by `(1 - rate)` for each year from the base
//! year through the requested year; once it is no longer positive the asset
//! stops depreciating. What is charged while it is positive depends on
//! [`DecliningBalancePolicy`].

use super::asset::{Asset, DepreciationMethod};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::BTreeMap;

const TWO: Decimal = dec!(2);

/// Amount charged for a declining-balance asset while it still has value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DecliningBalancePolicy {
    /// `acquisition_value * rate` every year. The compounded remaining value
    /// only decides when the charge stops.
    #[default]
    FlatFirstYear,
    /// `opening book value * rate`, so the charge shrinks each year.
    Decaying,
}

impl DecliningBalancePolicy {
    pub fn display(&self) -> &'static str {
        match self {
            DecliningBalancePolicy::FlatFirstYear => "flat",
            DecliningBalancePolicy::Decaying => "decaying",
        }
    }
}

/// Depreciation charged on `asset` in `year`.
///
/// Unrecognised methods contribute zero.
pub fn annual_depreciation(
    asset: &Asset,
    year: i32,
    base_year: i32,
    policy: DecliningBalancePolicy,
) -> Decimal {
    // Validated datasets never reach this, but in-memory assets can.
    if asset.useful_life_years <= 0 {
        return Decimal::ZERO;
    }

    match &asset.method {
        DepreciationMethod::StraightLine => {
            asset.acquisition_value / Decimal::from(asset.useful_life_years)
        }
        DepreciationMethod::DecliningBalance => declining_balance(asset, year, base_year, policy),
        DepreciationMethod::Unrecognized(_) => Decimal::ZERO,
    }
}

fn declining_balance(
    asset: &Asset,
    year: i32,
    base_year: i32,
    policy: DecliningBalancePolicy,
) -> Decimal {
    let life = Decimal::from(asset.useful_life_years);
    let rate = TWO / life;
    let factor = Decimal::ONE - rate;
    let steps = compounding_steps(year, base_year);

    if !remaining_is_positive(asset.acquisition_value, factor, steps) {
        return Decimal::ZERO;
    }

    match policy {
        // value * 2 / life rather than value * rate keeps e.g. 450M / 6 years exact
        DecliningBalancePolicy::FlatFirstYear => asset.acquisition_value * TWO / life,
        DecliningBalancePolicy::Decaying => {
            // |factor| <= 1 for any positive life, so this can only underflow towards zero
            let opening = match steps {
                0 => asset.acquisition_value,
                n => factor
                    .checked_powi(n - 1)
                    .and_then(|f| asset.acquisition_value.checked_mul(f))
                    .unwrap_or(Decimal::ZERO),
            };
            opening * rate
        }
    }
}

/// Years compounded from `base_year` through `year` inclusive
fn compounding_steps(year: i32, base_year: i32) -> i64 {
    (i64::from(year) - i64::from(base_year) + 1).max(0)
}

/// Whether `value * factor^steps` is positive, from the sign of `factor` and
/// the parity of `steps`.
fn remaining_is_positive(value: Decimal, factor: Decimal, steps: i64) -> bool {
    let growth_positive = if steps == 0 || factor > Decimal::ZERO {
        true
    } else if factor.is_zero() {
        return false;
    } else {
        steps % 2 == 0
    };
    if value.is_zero() {
        return false;
    }
    growth_positive == value.is_sign_positive()
}

/// Sum of every asset's depreciation for `year`
pub fn total_depreciation(
    assets: &[Asset],
    year: i32,
    base_year: i32,
    policy: DecliningBalancePolicy,
) -> Decimal {
    assets
        .iter()
        .map(|a| annual_depreciation(a, year, base_year, policy))
        .sum()
}

/// Depreciation of one asset across the projection years
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSchedule {
    pub asset_id: String,
    pub category: String,
    pub method: DepreciationMethod,
    pub amounts: BTreeMap<i32, Decimal>,
}

/// Per-asset, per-year depreciation matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepreciationSchedule {
    pub base_year: i32,
    pub policy: DecliningBalancePolicy,
    pub years: Vec<i32>,
    pub assets: Vec<AssetSchedule>,
}

impl DepreciationSchedule {
    pub fn build(
        assets: &[Asset],
        years: &[i32],
        base_year: i32,
        policy: DecliningBalancePolicy,
    ) -> Self {
        let schedules = assets
            .iter()
            .map(|asset| {
                let amounts = years
                    .iter()
                    .map(|&year| (year, annual_depreciation(asset, year, base_year, policy)))
                    .collect();
                AssetSchedule {
                    asset_id: asset.id.clone(),
                    category: asset.category.clone(),
                    method: asset.method.clone(),
                    amounts,
                }
            })
            .collect();

        let mut years = years.to_vec();
        years.sort_unstable();
        years.dedup();

        DepreciationSchedule {
            base_year,
            policy,
            years,
            assets: schedules,
        }
    }

    pub fn total_for(&self, year: i32) -> Decimal {
        self.assets
            .iter()
            .filter_map(|a| a.amounts.get(&year).copied())
            .sum()
    }

    /// Total depreciation keyed by year
    pub fn totals(&self) -> BTreeMap<i32, Decimal> {
        let totals: BTreeMap<i32, Decimal> = self
            .years
            .iter()
            .map(|&year| (year, self.total_for(year)))
            .collect();
        for (year, total) in &totals {
            log::debug!("Depreciation {}: {}", year, total);
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Dataset;

    const YEARS: [i32; 5] = [2023, 2024, 2025, 2026, 2027];

    fn asset(id: &str, value: Decimal, life: i32, method: DepreciationMethod) -> Asset {
        Asset {
            id: id.to_string(),
            category: "Test".to_string(),
            acquisition_value: value,
            useful_life_years: life,
            method,
        }
    }

    fn flat(asset: &Asset, year: i32) -> Decimal {
        annual_depreciation(asset, year, 2023, DecliningBalancePolicy::FlatFirstYear)
    }

    #[test]
    fn straight_line_constant_every_year() {
        let a001 = asset("A001", dec!(500000000), 10, DepreciationMethod::StraightLine);
        for year in YEARS {
            assert_eq!(flat(&a001, year), dec!(50000000));
        }
    }

    #[test]
    fn straight_line_continues_past_useful_life() {
        let short = asset("S", dec!(900), 3, DepreciationMethod::StraightLine);
        assert_eq!(flat(&short, 2023 + 10), dec!(300));
    }

    #[test]
    fn declining_balance_is_flat_while_value_remains() {
        let a002 = asset("A002", dec!(300000000), 5, DepreciationMethod::DecliningBalance);
        for year in YEARS {
            assert_eq!(flat(&a002, year), dec!(120000000));
        }
    }

    #[test]
    fn declining_balance_uses_double_rate_exactly() {
        let a006 = asset("A006", dec!(450000000), 6, DepreciationMethod::DecliningBalance);
        assert_eq!(flat(&a006, 2025), dec!(150000000));
        let a010 = asset("A010", dec!(100000000), 4, DepreciationMethod::DecliningBalance);
        assert_eq!(flat(&a010, 2027), dec!(50000000));
    }

    #[test]
    fn declining_balance_before_base_year_charges_first_year_amount() {
        let a002 = asset("A002", dec!(300000000), 5, DepreciationMethod::DecliningBalance);
        assert_eq!(flat(&a002, 2020), dec!(120000000));
    }

    #[test]
    fn two_year_life_is_exhausted_immediately() {
        // rate = 1, so the remaining value hits zero in the base year
        let two = asset("T", dec!(1000), 2, DepreciationMethod::DecliningBalance);
        assert_eq!(flat(&two, 2023), Decimal::ZERO);
        assert_eq!(flat(&two, 2024), Decimal::ZERO);
    }

    #[test]
    fn one_year_life_alternates_sign_of_remaining_value() {
        // rate = 2: remaining goes -v, +v, -v ...
        let one = asset("O", dec!(1000), 1, DepreciationMethod::DecliningBalance);
        assert_eq!(flat(&one, 2023), Decimal::ZERO);
        assert_eq!(flat(&one, 2024), dec!(2000));
        assert_eq!(flat(&one, 2025), Decimal::ZERO);
    }

    #[test]
    fn decaying_policy_shrinks_by_one_minus_rate() {
        let a002 = asset("A002", dec!(300000000), 5, DepreciationMethod::DecliningBalance);
        let decaying =
            |year| annual_depreciation(&a002, year, 2023, DecliningBalancePolicy::Decaying);
        assert_eq!(decaying(2023), dec!(120000000));
        assert_eq!(decaying(2024), dec!(72000000));
        assert_eq!(decaying(2025), dec!(43200000));
    }

    #[test]
    fn declining_balance_stays_positive_far_from_base_year() {
        for (life, year) in [(3, 2100), (4, 2150), (5, 2600)] {
            let far = asset("F", dec!(100000000), life, DepreciationMethod::DecliningBalance);
            let expected = dec!(200000000) / Decimal::from(life);
            assert_eq!(flat(&far, year), expected, "life {} year {}", life, year);
        }
    }

    #[test]
    fn distant_base_year_returns_promptly() {
        let a = asset("D", dec!(100000000), 3, DepreciationMethod::DecliningBalance);
        let policy = DecliningBalancePolicy::FlatFirstYear;
        let amount = annual_depreciation(&a, 2023, -2_000_000_000, policy);
        assert_eq!(amount.round_dp(2), dec!(66666666.67));

        let one = asset("O", dec!(1000), 1, DepreciationMethod::DecliningBalance);
        // 2023 - (-2_000_000_000) + 1 steps is even
        assert_eq!(annual_depreciation(&one, 2023, -2_000_000_000, policy), dec!(2000));

        let decaying =
            annual_depreciation(&a, 2023, -2_000_000_000, DecliningBalancePolicy::Decaying);
        assert_eq!(decaying, Decimal::ZERO);
    }

    #[test]
    fn decaying_policy_leaves_straight_line_alone() {
        let a001 = asset("A001", dec!(500000000), 10, DepreciationMethod::StraightLine);
        assert_eq!(
            annual_depreciation(&a001, 2026, 2023, DecliningBalancePolicy::Decaying),
            dec!(50000000)
        );
    }

    #[test]
    fn unrecognized_method_contributes_zero() {
        let odd = asset("X", dec!(1000), 5, DepreciationMethod::parse("Sum of Years"));
        assert_eq!(flat(&odd, 2023), Decimal::ZERO);
    }

    #[test]
    fn invalid_life_contributes_zero() {
        let broken = asset("X", dec!(1000), 0, DepreciationMethod::StraightLine);
        assert_eq!(flat(&broken, 2023), Decimal::ZERO);
    }

    #[test]
    fn aggregate_equals_sum_of_assets() {
        let dataset = Dataset::sample().unwrap();
        let policy = DecliningBalancePolicy::FlatFirstYear;
        let schedule = DepreciationSchedule::build(&dataset.assets, &YEARS, 2023, policy);
        for year in YEARS {
            let by_hand: Decimal = dataset
                .assets
                .iter()
                .map(|a| annual_depreciation(a, year, 2023, policy))
                .sum();
            assert_eq!(schedule.total_for(year), by_hand);
            assert_eq!(total_depreciation(&dataset.assets, year, 2023, policy), by_hand);
        }
        assert_eq!(schedule.assets.len(), 10);
    }

    #[test]
    fn sample_total_for_2023() {
        let dataset = Dataset::sample().unwrap();
        let total = total_depreciation(
            &dataset.assets,
            2023,
            2023,
            DecliningBalancePolicy::FlatFirstYear,
        );
        // 270.5M straight-line + 370M declining + 300M / 7
        assert_eq!(total.round_dp(6), dec!(683357142.857143));
    }

    #[test]
    fn schedule_years_sorted_and_deduplicated() {
        let a001 = asset("A001", dec!(500000000), 10, DepreciationMethod::StraightLine);
        let schedule = DepreciationSchedule::build(
            &[a001],
            &[2025, 2023, 2025],
            2023,
            DecliningBalancePolicy::FlatFirstYear,
        );
        assert_eq!(schedule.years, vec![2023, 2025]);
        assert_eq!(schedule.totals().len(), 2);
        assert_eq!(schedule.total_for(2024), Decimal::ZERO);
    }
}
