//! Depreciation command - per-asset schedule across the projection years

use super::{format_millions, DatasetArgs};
use crate::core::{to_millions, DepreciationSchedule};
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
};

#[derive(Args, Debug)]
pub struct DepreciationCommand {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Only show assets in this category (case-insensitive)
    #[arg(short, long)]
    category: Option<String>,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ScheduleData {
    base_year: i32,
    policy: &'static str,
    assets: Vec<AssetData>,
    totals: BTreeMap<i32, String>,
}

#[derive(Debug, Serialize)]
struct AssetData {
    id: String,
    category: String,
    method: String,
    amounts: BTreeMap<i32, String>,
}

impl DepreciationCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let (_, report) = self.dataset.calculate()?;
        let schedule = filter_category(report.schedule, self.category.as_deref());

        if self.json {
            let data = ScheduleData {
                base_year: schedule.base_year,
                policy: schedule.policy.display(),
                assets: schedule
                    .assets
                    .iter()
                    .map(|a| AssetData {
                        id: a.asset_id.clone(),
                        category: a.category.clone(),
                        method: a.method.to_string(),
                        amounts: a
                            .amounts
                            .iter()
                            .map(|(year, amount)| (*year, format!("{:.2}", amount)))
                            .collect(),
                    })
                    .collect(),
                totals: schedule
                    .totals()
                    .into_iter()
                    .map(|(year, total)| (year, format!("{:.2}", total)))
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
        } else {
            println!();
            println!(
                "DEPRECIATION SCHEDULE (millions) - base year {}, {} declining balance",
                schedule.base_year,
                schedule.policy.display()
            );
            println!();
            if schedule.assets.is_empty() {
                println!("No assets found matching filters");
            } else {
                println!("{}", render_table(&schedule));
            }
        }
        Ok(())
    }
}

fn filter_category(mut schedule: DepreciationSchedule, category: Option<&str>) -> DepreciationSchedule {
    if let Some(category) = category {
        schedule
            .assets
            .retain(|a| a.category.eq_ignore_ascii_case(category));
        log::debug!("{} assets in category {}", schedule.assets.len(), category);
    }
    schedule
}

fn render_table(schedule: &DepreciationSchedule) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["Asset".to_string(), "Category".to_string(), "Method".to_string()];
    header.extend(schedule.years.iter().map(|y| y.to_string()));
    builder.push_record(header);

    for asset in &schedule.assets {
        let mut record = vec![
            asset.asset_id.clone(),
            asset.category.clone(),
            asset.method.to_string(),
        ];
        record.extend(schedule.years.iter().map(|year| {
            asset
                .amounts
                .get(year)
                .map(|a| format_millions(to_millions(*a)))
                .unwrap_or_default()
        }));
        builder.push_record(record);
    }

    let mut totals = vec!["TOTAL".to_string(), String::new(), String::new()];
    totals.extend(
        schedule
            .years
            .iter()
            .map(|year| format_millions(to_millions(schedule.total_for(*year)))),
    );
    builder.push_record(totals);

    builder
        .build()
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
        .to_string()
}
