//! Schema command - print expected input formats

use crate::core::{Asset, CsvField, FiscalYearRate, YearlyTransaction};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,

    /// Input dataset to describe
    #[arg(short, long, value_enum, default_value = "assets")]
    dataset: DatasetKind,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for one row of the dataset
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DatasetKind {
    Assets,
    Transactions,
    Fiscal,
}

impl DatasetKind {
    fn title(self) -> &'static str {
        match self {
            DatasetKind::Assets => "Fixed Assets CSV",
            DatasetKind::Transactions => "Yearly Transactions CSV",
            DatasetKind::Fiscal => "Fiscal Policy CSV",
        }
    }

    fn fields(self) -> &'static [CsvField] {
        match self {
            DatasetKind::Assets => Asset::csv_schema(),
            DatasetKind::Transactions => YearlyTransaction::csv_schema(),
            DatasetKind::Fiscal => FiscalYearRate::csv_schema(),
        }
    }

    fn header(self) -> String {
        match self {
            DatasetKind::Assets => Asset::csv_header(),
            DatasetKind::Transactions => YearlyTransaction::csv_header(),
            DatasetKind::Fiscal => FiscalYearRate::csv_header(),
        }
    }
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => {
                println!("{}", self.dataset.header());
                Ok(())
            }
            SchemaFormat::CsvFields => {
                print!("{}", describe_fields(self.dataset));
                Ok(())
            }
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = match self.dataset {
            DatasetKind::Assets => schema_for!(Asset),
            DatasetKind::Transactions => schema_for!(YearlyTransaction),
            DatasetKind::Fiscal => schema_for!(FiscalYearRate),
        };
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}

fn describe_fields(kind: DatasetKind) -> String {
    let title = kind.title();
    let mut out = format!("{}\n{}\n\n", title, "=".repeat(title.len()));
    for field in kind.fields() {
        let req = if field.required { "required" } else { "optional" };
        out.push_str(&format!("{:24} ({:8})  {}\n", field.name, req, field.description));
        if !field.aliases.is_empty() {
            out.push_str(&format!("{:24}             also: {}\n", "", field.aliases.join(", ")));
        }
    }
    if kind == DatasetKind::Assets {
        out.push_str("\nmethod is StraightLine or DecliningBalance; other values depreciate to 0\n");
    }
    out
}
