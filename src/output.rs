//! Output formatting and persistence for report results.
//!
//! Results render as debug pretty-print, JSON, or CSV, to a file or stdout.

use anyhow::Result;
use clap::ValueEnum;
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Debug;
use std::io::Write;
use tracing::{debug, info};

use crate::loader::VaccinationTable;

/// How a result set is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Pretty,
    Json,
    Csv,
}

/// Serializes `rows` as CSV with a header line.
pub fn to_csv_string<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("csv flush failed: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

/// Writes `rows` to a CSV file at `path`, replacing any existing file.
pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing CSV");
    std::fs::write(path, to_csv_string(rows)?)?;
    Ok(())
}

/// Serializes a verbatim table as CSV.
pub fn table_to_csv_string(table: &VaccinationTable) -> Result<String> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("csv flush failed: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

/// Renders `rows` in `format` to `output`, or to stdout when no path is given.
pub fn emit<T: Serialize + Debug>(rows: &[T], format: Format, output: Option<&str>) -> Result<()> {
    if let (Format::Csv, Some(path)) = (format, output) {
        write_csv(path, rows)?;
        info!(path, "Output written");
        return Ok(());
    }
    let rendered = match format {
        Format::Pretty => format!("{:#?}\n", rows),
        Format::Json => serde_json::to_string_pretty(rows)? + "\n",
        Format::Csv => to_csv_string(rows)?,
    };
    write_out(&rendered, output)
}

/// Writes already-rendered text to `output`, or to stdout.
pub fn write_out(rendered: &str, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            info!(path, "Output written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
