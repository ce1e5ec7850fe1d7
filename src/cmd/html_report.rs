//! HTML report generation for the projection
//!
//! Generates a self-contained HTML file with embedded CSS, inline SVG charts and
//! a small script for toggling chart series. The charts are also written out as
//! standalone SVG images next to the report.

use super::chart::{self, escape, TREND_SERIES};
use super::summary::{build_table_rows, SummaryTableRow};
use super::DatasetArgs;
use crate::core::{
    asset_distribution, net_income_growth, summarize, Dataset, FiscalPolicy, ProjectionReport,
};
use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt::Write;
use std::path::{Path, PathBuf};

pub const REPORT_FILE: &str = "financial_report.html";
pub const TREND_CHART_FILE: &str = "financial_trends.svg";
pub const DISTRIBUTION_CHART_FILE: &str = "asset_distribution.svg";

#[derive(Args, Debug)]
pub struct HtmlCommand {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Output directory for the HTML report and SVG charts (default: temp directory, opened in browser)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl HtmlCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let (dataset, report) = self.dataset.calculate()?;
        let files = render(&dataset, &report)?;

        if let Some(ref dir) = self.output {
            let path = files.write_to(dir)?;
            println!("HTML report written to: {}", path.display());
        } else {
            // Write to temp dir and open in browser
            let dir = std::env::temp_dir().join("pphc-report");
            let path = files.write_to(&dir)?;
            opener::open(&path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            println!("Opened HTML report in browser: {}", path.display());
        }

        Ok(())
    }
}

/// Rendered report and chart images
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub html: String,
    pub trend_chart: String,
    pub distribution_chart: String,
}

impl ReportFiles {
    /// Write all files into `dir`, returning the report path
    pub fn write_to(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        for (name, content) in [
            (REPORT_FILE, &self.html),
            (TREND_CHART_FILE, &self.trend_chart),
            (DISTRIBUTION_CHART_FILE, &self.distribution_chart),
        ] {
            let path = dir.join(name);
            std::fs::write(&path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::debug!("Wrote {}", path.display());
        }
        Ok(dir.join(REPORT_FILE))
    }
}

/// Data structure for embedding in HTML as JSON
#[derive(Serialize)]
pub struct HtmlReportData {
    pub base_year: i32,
    pub policy: &'static str,
    pub years: Vec<SummaryTableRow>,
    pub series: Vec<SeriesData>,
    pub net_income_growth_pct: Option<String>,
    pub fingerprint: String,
}

#[derive(Serialize)]
pub struct SeriesData {
    pub key: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

pub fn render(dataset: &Dataset, report: &ProjectionReport) -> anyhow::Result<ReportFiles> {
    let summary = summarize(report.rows());
    let trend_chart = chart::trend_chart(&summary);
    let distribution_chart = chart::distribution_chart(&asset_distribution(&dataset.assets));
    let html = generate(dataset, report, &trend_chart, &distribution_chart)?;
    Ok(ReportFiles {
        html,
        trend_chart,
        distribution_chart,
    })
}

/// Generate HTML report content
pub fn generate(
    dataset: &Dataset,
    report: &ProjectionReport,
    trend_chart: &str,
    distribution_chart: &str,
) -> anyhow::Result<String> {
    let rows = build_table_rows(report);
    let growth = net_income_growth(&summarize(report.rows()));
    let fingerprint = dataset.fingerprint();

    let data = HtmlReportData {
        base_year: report.base_year,
        policy: report.schedule.policy.display(),
        years: rows.clone(),
        series: TREND_SERIES
            .iter()
            .map(|s| SeriesData {
                key: s.key,
                label: s.label,
                color: s.color,
            })
            .collect(),
        net_income_growth_pct: growth.map(|g| format!("{:.2}", g)),
        fingerprint: fingerprint.clone(),
    };
    // keep "</script>" in user-supplied names from closing the script block
    let json_data = serde_json::to_string(&data)
        .context("failed to serialize report data")?
        .replace("</", "<\\/");

    let summary_table = summary_table(&rows);
    let fiscal_table = fiscal_table(&dataset.fiscal);
    let growth_text = growth_sentence(&rows, growth);
    let policy = report.schedule.policy.display();
    let base_year = report.base_year;
    let pink = chart::PASTEL_PINK;
    let rose = chart::ROSE;

    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Financial Analysis Report</title>
    <style>
{css}
    </style>
</head>
<body>
    <header>
        <h1>Financial Analysis Report</h1>
        <p class="subtitle">Corporate income tax projection after fixed-asset depreciation. Figures in IDR millions, base year {base_year}, {policy} declining balance.</p>
    </header>

    <main>
        <section class="data-section">
            <h2>Financial Summary</h2>
            <div class="table-container">
{summary_table}
            </div>
        </section>

        <section class="data-section">
            <h2>Financial Trend</h2>
            <div class="series-toggle" id="series-toggle">
                <button class="toggle-btn active" data-series="" onclick="showSeries('')">All</button>
            </div>
            <figure class="chart" id="trend-chart">
{trend_chart}
            </figure>
        </section>

        <section class="data-section">
            <h2>Fixed Asset Distribution</h2>
            <figure class="chart">
{distribution_chart}
            </figure>
        </section>

        <section class="data-section">
            <h2>Fiscal Policy</h2>
            <div class="table-container">
{fiscal_table}
            </div>
            <p class="note">Tax holiday windows are shown for reference and are not applied to the projection.</p>
        </section>

        <section class="highlight">
            <p>{growth_text}</p>
        </section>
    </main>

    <footer>
        <p>Input fingerprint (SHA-256): <code>{fingerprint}</code></p>
    </footer>

    <script>
const DATA = {json_data};

function init() {{
    const toggle = document.getElementById('series-toggle');
    DATA.series.forEach(series => {{
        const btn = document.createElement('button');
        btn.className = 'toggle-btn';
        btn.dataset.series = series.key;
        btn.textContent = series.label;
        btn.style.borderColor = series.color;
        btn.onclick = () => showSeries(series.key);
        toggle.appendChild(btn);
    }});
}}

function showSeries(key) {{
    document.querySelectorAll('#trend-chart .series').forEach(el => {{
        el.style.display = (!key || el.classList.contains('series-' + key)) ? '' : 'none';
    }});
    document.querySelectorAll('#series-toggle .toggle-btn').forEach(btn => {{
        btn.classList.toggle('active', btn.dataset.series === key);
    }});
}}

document.addEventListener('DOMContentLoaded', init);
    </script>
</body>
</html>
"##,
        css = CSS.replace("{pink}", pink).replace("{rose}", rose),
    ))
}

fn summary_table(rows: &[SummaryTableRow]) -> String {
    let mut html = String::from(
        "<table id=\"summary-table\">\n<thead><tr><th>Year</th><th>Revenue</th><th>Operating Expense</th><th>Depreciation</th><th>Pre-tax Income</th><th>Tax Rate</th><th>Tax</th><th>Net Income</th></tr></thead>\n<tbody>\n",
    );
    for row in rows {
        let class = if row.net_income.starts_with('-') {
            " class=\"loss\""
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<tr{class}><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.year,
            row.revenue,
            row.operating_expense,
            row.depreciation,
            row.pre_tax_income,
            row.tax_rate,
            row.tax,
            row.net_income
        );
    }
    html.push_str("</tbody>\n</table>");
    html
}

fn fiscal_table(fiscal: &FiscalPolicy) -> String {
    let mut html = String::from(
        "<table id=\"fiscal-table\">\n<thead><tr><th>Year</th><th>Tax Rate</th><th>Tax Holiday</th></tr></thead>\n<tbody>\n",
    );
    for rate in fiscal.iter() {
        let holiday = match rate.holiday() {
            Some((start, end)) => format!("{} to {}", start, end),
            None => "-".to_string(),
        };
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{:.2}%</td><td>{}</td></tr>",
            rate.year,
            rate.tax_rate * dec!(100),
            escape(&holiday)
        );
    }
    html.push_str("</tbody>\n</table>");
    html
}

fn growth_sentence(rows: &[SummaryTableRow], growth: Option<Decimal>) -> String {
    match (growth, rows.first(), rows.last()) {
        (Some(growth), Some(first), Some(last)) => format!(
            "Net income changed by <strong>{:.2}%</strong> from {} to {}.",
            growth, first.year, last.year
        ),
        _ => "Net income growth is not available for this projection.".to_string(),
    }
}

const CSS: &str = r#"
:root {
    --accent: {rose};
    --pastel: {pink};
    --gray-50: #f9fafb;
    --gray-200: #e5e7eb;
    --gray-500: #6b7280;
    --gray-700: #374151;
    --gray-900: #111827;
    --danger: #dc2626;
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
    background: var(--gray-50);
    color: var(--gray-900);
    line-height: 1.5;
}

header {
    background: white;
    border-bottom: 3px solid var(--pastel);
    padding: 1.5rem 2rem;
}

header h1 {
    font-size: 1.75rem;
    font-weight: 600;
    color: var(--accent);
}

.subtitle {
    color: var(--gray-500);
}

main {
    max-width: 1280px;
    margin: 0 auto;
    padding: 1.5rem 2rem;
    display: flex;
    flex-direction: column;
    gap: 1.5rem;
}

.data-section {
    background: white;
    border: 1px solid var(--gray-200);
    border-radius: 0.5rem;
    padding: 1.25rem;
}

.data-section h2 {
    font-size: 1.2rem;
    font-weight: 600;
    color: var(--accent);
    margin-bottom: 0.75rem;
}

.table-container {
    overflow-x: auto;
}

table {
    width: 100%;
    border-collapse: collapse;
    font-size: 0.9rem;
}

th, td {
    padding: 0.5rem 0.75rem;
    border-bottom: 1px solid var(--gray-200);
    text-align: right;
    white-space: nowrap;
}

th:first-child, td:first-child {
    text-align: left;
}

thead th {
    background: var(--pastel);
    color: var(--gray-900);
    font-weight: 600;
}

tr.loss td:last-child {
    color: var(--danger);
}

.chart svg {
    width: 100%;
    height: auto;
}

.series-toggle {
    display: flex;
    gap: 0.5rem;
    margin-bottom: 0.75rem;
}

.toggle-btn {
    border: 2px solid var(--gray-200);
    background: white;
    border-radius: 999px;
    padding: 0.25rem 0.9rem;
    cursor: pointer;
    color: var(--gray-700);
}

.toggle-btn.active {
    background: var(--pastel);
    border-color: var(--accent);
}

.note {
    margin-top: 0.5rem;
    font-size: 0.85rem;
    color: var(--gray-500);
}

.highlight {
    border-left: 4px solid var(--accent);
    background: white;
    padding: 1rem 1.25rem;
    font-size: 1.1rem;
}

.highlight strong {
    color: var(--accent);
}

footer {
    text-align: center;
    padding: 1rem;
    color: var(--gray-500);
    font-size: 0.8rem;
}
"#;
