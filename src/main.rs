use clap::{Parser, Subcommand};

use pphc::cmd::{
    depreciation::DepreciationCommand, html_report::HtmlCommand, schema::SchemaCommand,
    summary::SummaryCommand, validate::ValidateCommand,
};

/// Corporate income tax projection after fixed-asset depreciation
#[derive(Parser, Debug)]
#[command(name = "pphc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Yearly projection in millions: depreciation, tax and net income
    Summary(SummaryCommand),
    /// Per-asset depreciation schedule
    Depreciation(DepreciationCommand),
    /// Generate the HTML report; charts are written as SVG images
    /// (financial_trends.svg, asset_distribution.svg)
    Html(HtmlCommand),
    /// Check the input datasets for data quality issues
    Validate(ValidateCommand),
    /// Print the expected input formats
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Summary(cmd) => cmd.exec(),
        Command::Depreciation(cmd) => cmd.exec(),
        Command::Html(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
