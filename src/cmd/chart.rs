//! SVG charts for the HTML report
//!
//! Both charts are self-contained `<svg>` documents, so the same markup is
//! inlined in the report and written out as standalone image files.

use crate::core::{CategoryTotal, SummaryRow};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::f64::consts::PI;
use std::fmt::Write;

pub const PASTEL_PINK: &str = "#F8B8C7";
pub const ROSE: &str = "#E75480";
pub const PASTEL_YELLOW: &str = "#FFF9B1";
pub const PASTEL_BLUE: &str = "#B3CDE0";

const PIE_PALETTE: [&str; 4] = [PASTEL_PINK, PASTEL_YELLOW, PASTEL_BLUE, ROSE];

/// A bar series in the trend chart
#[derive(Debug, Clone, Copy)]
pub struct Series {
    pub key: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    value: fn(&SummaryRow) -> Option<Decimal>,
}

pub static TREND_SERIES: [Series; 3] = [
    Series {
        key: "revenue",
        label: "Revenue",
        color: PASTEL_PINK,
        value: |r| Some(r.revenue),
    },
    Series {
        key: "operating-expense",
        label: "Operating Expense",
        color: PASTEL_YELLOW,
        value: |r| Some(r.operating_expense),
    },
    Series {
        key: "net-income",
        label: "Net Income",
        color: PASTEL_BLUE,
        value: |r| r.net_income,
    },
];

const BAR_WIDTH: f64 = 1200.0;
const BAR_HEIGHT: f64 = 600.0;
const PIE_WIDTH: f64 = 800.0;
const PIE_HEIGHT: f64 = 600.0;

/// Grouped bar chart of revenue, operating expense and net income per year (millions)
pub fn trend_chart(rows: &[SummaryRow]) -> String {
    let (left, right, top, bottom) = (90.0, 40.0, 80.0, 70.0);
    let plot_w = BAR_WIDTH - left - right;
    let plot_h = BAR_HEIGHT - top - bottom;

    let values: Vec<f64> = rows
        .iter()
        .flat_map(|row| TREND_SERIES.iter().filter_map(move |s| (s.value)(row)))
        .map(to_f64)
        .collect();
    let mut max = values.iter().copied().fold(0.0, f64::max);
    let min = values.iter().copied().fold(0.0, f64::min);
    if max == min {
        max = min + 1.0;
    }
    let y = |v: f64| top + (max - v) / (max - min) * plot_h;

    let mut svg = svg_open(BAR_WIDTH, BAR_HEIGHT, "Financial trend chart");
    let _ = writeln!(
        svg,
        r#"<text class="title" x="{}" y="36" text-anchor="middle" font-size="22" fill="{ROSE}">Financial Trend (IDR millions)</text>"#,
        BAR_WIDTH / 2.0
    );

    // gridlines and axis labels
    for step in 0..=5 {
        let value = min + (max - min) * f64::from(step) / 5.0;
        let gy = y(value);
        let _ = writeln!(
            svg,
            r##"<line x1="{left}" y1="{gy:.1}" x2="{:.1}" y2="{gy:.1}" stroke="#e5e7eb"/><text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12" fill="#6b7280">{value:.0}</text>"##,
            left + plot_w,
            left - 8.0,
            gy + 4.0
        );
    }
    let zero = y(0.0);
    let _ = writeln!(
        svg,
        r##"<line class="zero" x1="{left}" y1="{zero:.1}" x2="{:.1}" y2="{zero:.1}" stroke="#374151"/>"##,
        left + plot_w
    );

    if !rows.is_empty() {
        let group_w = plot_w / rows.len() as f64;
        let bar_w = group_w * 0.8 / TREND_SERIES.len() as f64;

        for (i, row) in rows.iter().enumerate() {
            let group_x = left + group_w * i as f64;
            for (j, series) in TREND_SERIES.iter().enumerate() {
                let Some(value) = (series.value)(row) else {
                    continue;
                };
                let v = to_f64(value);
                let x = group_x + group_w * 0.1 + bar_w * j as f64;
                let (y_top, y_bottom) = (y(v.max(0.0)), y(v.min(0.0)));
                let label_y = if v >= 0.0 { y_top - 6.0 } else { y_bottom + 14.0 };
                let _ = writeln!(
                    svg,
                    r##"<g class="series series-{key}"><rect class="bar" x="{x:.1}" y="{y_top:.1}" width="{bar_w:.1}" height="{:.1}" fill="{color}"><title>{label} {year}: {value:.2}</title></rect><text x="{:.1}" y="{label_y:.1}" text-anchor="middle" font-size="11" fill="#374151">{value:.2}</text></g>"##,
                    (y_bottom - y_top).max(0.5),
                    x + bar_w / 2.0,
                    key = series.key,
                    color = series.color,
                    label = series.label,
                    year = row.year,
                );
            }
            let _ = writeln!(
                svg,
                r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13" fill="#374151">{}</text>"##,
                group_x + group_w / 2.0,
                top + plot_h + 24.0,
                row.year
            );
        }
    }

    let _ = writeln!(
        svg,
        r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13" fill="#374151">Year</text>"##,
        left + plot_w / 2.0,
        BAR_HEIGHT - 16.0
    );

    for (j, series) in TREND_SERIES.iter().enumerate() {
        let lx = BAR_WIDTH - right - 430.0 + 150.0 * j as f64;
        let _ = writeln!(
            svg,
            r##"<g class="legend"><rect x="{lx:.1}" y="52" width="14" height="14" fill="{}" stroke="#9ca3af"/><text x="{:.1}" y="64" font-size="13" fill="#374151">{}</text></g>"##,
            series.color,
            lx + 20.0,
            series.label
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Pie chart of acquisition value per asset category, first slice pulled out
pub fn distribution_chart(totals: &[CategoryTotal]) -> String {
    let (cx, cy, r) = (PIE_WIDTH / 2.0, PIE_HEIGHT / 2.0 + 30.0, 200.0);
    let mut svg = svg_open(PIE_WIDTH, PIE_HEIGHT, "Asset distribution chart");
    let _ = writeln!(
        svg,
        r#"<text class="title" x="{}" y="36" text-anchor="middle" font-size="22" fill="{ROSE}">Fixed Asset Value Distribution (IDR millions)</text>"#,
        PIE_WIDTH / 2.0
    );

    let total: f64 = totals.iter().map(|t| to_f64(t.value)).sum();
    if totals.is_empty() || total <= 0.0 {
        let _ = writeln!(
            svg,
            r##"<text x="{cx}" y="{cy}" text-anchor="middle" font-size="16" fill="#6b7280">No assets</text>"##
        );
        svg.push_str("</svg>\n");
        return svg;
    }

    let mut start = -PI / 2.0;
    for (i, slice) in totals.iter().enumerate() {
        let fraction = to_f64(slice.value) / total;
        let sweep = fraction * 2.0 * PI;
        let mid = start + sweep / 2.0;
        let pull = if i == 0 { r * 0.1 } else { 0.0 };
        let (ox, oy) = (cx + pull * mid.cos(), cy + pull * mid.sin());
        let color = PIE_PALETTE[i % PIE_PALETTE.len()];
        let title = format!(
            "{}: {:.2} ({:.1}%)",
            escape(&slice.category),
            slice.value,
            fraction * 100.0
        );

        if fraction >= 1.0 {
            let _ = writeln!(
                svg,
                r##"<circle class="slice" cx="{ox:.1}" cy="{oy:.1}" r="{r}" fill="{color}" stroke="white" stroke-width="2"><title>{title}</title></circle>"##
            );
        } else if fraction > 0.0 {
            let end = start + sweep;
            let large_arc = u8::from(sweep > PI);
            let _ = writeln!(
                svg,
                r##"<path class="slice" d="M {ox:.2} {oy:.2} L {:.2} {:.2} A {r} {r} 0 {large_arc} 1 {:.2} {:.2} Z" fill="{color}" stroke="white" stroke-width="2"><title>{title}</title></path>"##,
                ox + r * start.cos(),
                oy + r * start.sin(),
                ox + r * end.cos(),
                oy + r * end.sin(),
            );
        }

        if fraction > 0.0 {
            let (lx, ly) = (ox + r * 0.65 * mid.cos(), oy + r * 0.65 * mid.sin());
            let _ = writeln!(
                svg,
                r##"<text x="{lx:.1}" y="{ly:.1}" text-anchor="middle" font-size="13" fill="#374151"><tspan x="{lx:.1}">{}</tspan><tspan x="{lx:.1}" dy="16">{:.1}%</tspan></text>"##,
                escape(&slice.category),
                fraction * 100.0
            );
        }
        start += sweep;
    }

    for (i, slice) in totals.iter().enumerate() {
        let ly = 90.0 + 22.0 * i as f64;
        let _ = writeln!(
            svg,
            r##"<g class="legend"><rect x="{:.1}" y="{:.1}" width="14" height="14" fill="{}" stroke="#9ca3af"/><text x="{:.1}" y="{:.1}" font-size="13" fill="#374151">{}</text></g>"##,
            PIE_WIDTH - 150.0,
            ly - 12.0,
            PIE_PALETTE[i % PIE_PALETTE.len()],
            PIE_WIDTH - 130.0,
            ly,
            escape(&slice.category)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn svg_open(width: f64, height: f64, label: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {width} {height}\" width=\"{width}\" height=\"{height}\" role=\"img\" aria-label=\"{label}\" font-family=\"-apple-system, 'Segoe UI', Roboto, Arial, sans-serif\">\n<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n"
    )
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Escape text for inclusion in XML/HTML
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
