//! CSV bytes ⇄ [`Table`].
//!
//! Cells are read as text without type inference so zips and phone numbers keep their leading
//! zeros. Empty cells are absent.

use chrono::{DateTime, Local};
use csv::{ReaderBuilder, WriterBuilder};
use serde_json::Value;
use std::collections::HashMap;

use crate::domain::model::{cell_text, ImportKind, Record, Table};
use crate::utils::error::{EtlError, Result};

const BOM: char = '\u{feff}';

pub fn read_table(data: &[u8]) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = unique_headers(reader.headers()?.iter());
    let mut columns: Vec<String> = Vec::with_capacity(headers.len());
    for header in &headers {
        if !columns.contains(header) {
            columns.push(header.clone());
        }
    }
    let mut table = Table::new(columns);

    for record in reader.records() {
        let record = record?;
        let mut row = Record::new();
        for (index, column) in headers.iter().enumerate() {
            // repeated blank headers share one unnamed column; the first cell wins
            if row.data.contains_key(column) {
                continue;
            }
            let value = match record.get(index) {
                Some(cell) if !cell.is_empty() => Value::String(cell.to_string()),
                _ => Value::Null,
            };
            row.set(column.as_str(), value);
        }
        table.push(row);
    }

    tracing::debug!(
        "Read {} row(s) across {} column(s)",
        table.len(),
        table.columns.len()
    );
    Ok(table)
}

/// Repeated header names get `.1`, `.2`, ... so no column shadows another. Blank headers are
/// left as they are.
fn unique_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.enumerate()
        .map(|(index, header)| {
            let header = if index == 0 {
                header.trim_start_matches(BOM)
            } else {
                header
            };
            if header.trim().is_empty() {
                return header.to_string();
            }
            let count = seen.entry(header.to_string()).or_insert(0);
            let name = if *count == 0 {
                header.to_string()
            } else {
                format!("{header}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

pub fn write_table(table: &Table) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(table.columns.iter().map(|column| render(row.get(column))))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {e}"),
    })
}

fn render(value: Option<&Value>) -> String {
    match value {
        Some(Value::Bool(true)) => "TRUE".to_string(),
        Some(Value::Bool(false)) => "FALSE".to_string(),
        Some(other) => cell_text(other).unwrap_or_default(),
        None => String::new(),
    }
}

/// `<kind>_<YYYY-MM-DD_HH-MM-SS>` without extension.
pub fn artifact_stem(kind: ImportKind, at: DateTime<Local>) -> String {
    format!("{}_{}", kind, at.format("%Y-%m-%d_%H-%M-%S"))
}

pub fn output_filename(kind: ImportKind) -> String {
    format!("{}.csv", artifact_stem(kind, Local::now()))
}
