use serde::Serialize;

/// Column metadata generated by `#[derive(CsvSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CsvField {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
    pub description: &'static str,
}
