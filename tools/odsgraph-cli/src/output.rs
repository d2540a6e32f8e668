//! Output formatting utilities.

use std::io::{self, Write};

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::Result;
use crate::OutputFormat;

/// A base element row.
#[derive(Tabled, Serialize)]
pub struct BaseElementRow {
    #[tabled(rename = "Element")]
    pub name: String,
    #[tabled(rename = "Attributes")]
    pub attributes: usize,
    #[tabled(rename = "Relations")]
    pub relations: usize,
}

/// A base attribute row.
#[derive(Tabled, Serialize)]
pub struct BaseAttributeRow {
    #[tabled(rename = "Attribute")]
    pub name: String,
    #[tabled(rename = "Data Type")]
    pub data_type: String,
    #[tabled(rename = "Unique")]
    pub unique: bool,
    #[tabled(rename = "Obligatory")]
    pub obligatory: bool,
    #[tabled(rename = "Enumeration")]
    pub enumeration: String,
}

/// A base relation row.
#[derive(Tabled, Serialize)]
pub struct BaseRelationRow {
    #[tabled(rename = "Relation")]
    pub name: String,
    #[tabled(rename = "Target")]
    pub target: String,
    #[tabled(rename = "Range")]
    pub range: String,
}

/// Instance count of one type.
#[derive(Tabled, Serialize)]
pub struct TypeCountRow {
    #[tabled(rename = "Type")]
    pub name: String,
    #[tabled(rename = "Base Type")]
    pub base_type: String,
    #[tabled(rename = "Instances")]
    pub instances: usize,
}

/// Targets of one instance under one relation.
#[derive(Tabled, Serialize)]
pub struct EdgeRow {
    #[tabled(rename = "Instance")]
    pub source: String,
    #[tabled(rename = "Relation")]
    pub relation: String,
    #[tabled(rename = "Related")]
    pub targets: String,
}

/// Render rows in the requested format.
pub fn render<T: Tabled + Serialize>(rows: &[T], format: OutputFormat, empty: &str) -> Result<String> {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                return Ok(empty.to_string());
            }
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            Ok(table.to_string())
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
    }
}

/// Write one block of output to stdout.
pub fn emit(text: &str) -> Result<()> {
    write_block(&mut io::stdout().lock(), text)
}

fn write_block(out: &mut impl Write, text: &str) -> Result<()> {
    writeln!(out, "{text}")?;
    Ok(())
}
