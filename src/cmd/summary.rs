//! Summary command - yearly projection in millions

use super::{format_millions, format_optional, DatasetArgs};
use crate::core::{
    net_income_growth, summarize, to_millions, ProjectionReport, SummaryRow, Warning,
};
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::io;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Output as JSON instead of a formatted table
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV instead of a formatted table
    #[arg(long)]
    csv: bool,
}

/// Row for the summary table output
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SummaryTableRow {
    #[tabled(rename = "Year")]
    pub year: i32,

    #[tabled(rename = "Revenue")]
    pub revenue: String,

    #[tabled(rename = "Operating Expense")]
    pub operating_expense: String,

    #[tabled(rename = "Reported Dep.")]
    pub reported_depreciation: String,

    #[tabled(rename = "Depreciation")]
    pub depreciation: String,

    #[tabled(rename = "Pre-tax Income")]
    pub pre_tax_income: String,

    #[tabled(rename = "Tax Rate")]
    pub tax_rate: String,

    #[tabled(rename = "Tax")]
    pub tax: String,

    #[tabled(rename = "Net Income")]
    pub net_income: String,
}

#[derive(Debug, Serialize)]
struct SummaryData {
    base_year: i32,
    policy: &'static str,
    unit: &'static str,
    years: Vec<SummaryRow>,
    net_income_growth_pct: Option<Decimal>,
    warnings: Vec<Warning>,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let (_, report) = self.dataset.calculate()?;
        let rows = build_table_rows(&report);

        if self.json {
            self.print_json(&report)
        } else if self.csv {
            write_csv(&rows, io::stdout())
        } else {
            self.print_table(&report, &rows);
            Ok(())
        }
    }

    fn print_table(&self, report: &ProjectionReport, rows: &[SummaryTableRow]) {
        println!();
        println!(
            "PROJECTION SUMMARY (millions) - base year {}, {} declining balance",
            report.base_year,
            report.schedule.policy.display()
        );
        println!();

        if rows.is_empty() {
            println!("No transaction years found");
            return;
        }

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);

        let summary = summarize(report.rows());
        println!();
        println!(
            "Total tax: {} | Total net income: {}",
            format_millions(to_millions(report.projection.total_tax())),
            format_millions(to_millions(report.projection.total_net_income()))
        );
        if let (Some(growth), Some(first), Some(last)) =
            (net_income_growth(&summary), summary.first(), summary.last())
        {
            println!(
                "Net income change {}-{}: {:.2}%",
                first.year, last.year, growth
            );
        }

        for warning in &report.projection.warnings {
            println!("\u{26A0} {}", warning.message());
        }
        println!();
    }

    fn print_json(&self, report: &ProjectionReport) -> anyhow::Result<()> {
        let years = summarize(report.rows());
        let data = SummaryData {
            base_year: report.base_year,
            policy: report.schedule.policy.display(),
            unit: "millions",
            net_income_growth_pct: net_income_growth(&years),
            years,
            warnings: report.projection.warnings.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}

pub fn build_table_rows(report: &ProjectionReport) -> Vec<SummaryTableRow> {
    report
        .rows()
        .iter()
        .map(|row| {
            let summary = SummaryRow::from(row);
            SummaryTableRow {
                year: row.year,
                revenue: format_millions(summary.revenue),
                operating_expense: format_millions(summary.operating_expense),
                reported_depreciation: format_millions(to_millions(row.reported_depreciation)),
                depreciation: format_millions(summary.depreciation),
                pre_tax_income: format_millions(summary.pre_tax_income),
                tax_rate: row
                    .tax_rate
                    .map(|r| format!("{:.2}%", r * dec!(100)))
                    .unwrap_or_else(|| "-".to_string()),
                tax: format_optional(summary.tax),
                net_income: format_optional(summary.net_income),
            }
        })
        .collect()
}

fn write_csv<W: io::Write>(rows: &[SummaryTableRow], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
