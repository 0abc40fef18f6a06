//! Comma-separated import and export for [`DataSet`].
//!
//! Import rules:
//! - whitespace-only lines are skipped, the first remaining record is the
//!   header; a record holding one blank cell reads as a blank line
//! - headers become fields via [`normalize_field_name`], the trimmed raw
//!   header is kept as the label
//! - data cells are kept verbatim; quoted cells may hold commas, quotes,
//!   line breaks and edge whitespace
//! - short rows are padded with empty strings, extra cells are dropped

use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use thiserror::Error;

use super::{normalize_field_name, DataSet};
use crate::template::{DataRow, Field};

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV input has no header line")]
    Empty,
    #[error("header '{0}' appears more than once")]
    DuplicateHeader(String),
    #[error("header column {0} is empty")]
    EmptyHeader(usize),
    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("writing CSV: {0}")]
    Write(String),
}

impl PartialEq for CsvError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CsvError::Empty, CsvError::Empty) => true,
            (CsvError::DuplicateHeader(a), CsvError::DuplicateHeader(b)) => a == b,
            (CsvError::EmptyHeader(a), CsvError::EmptyHeader(b)) => a == b,
            (CsvError::Write(a), CsvError::Write(b)) => a == b,
            _ => false,
        }
    }
}

/// A record produced by a line holding nothing but whitespace.
fn is_blank_line(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).map_or(true, |c| c.trim().is_empty())
}

/// Parse delimited text into a dataset.
pub fn parse(text: &str) -> Result<DataSet, CsvError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records().filter(|r| match r {
        Ok(record) => !is_blank_line(record),
        Err(_) => true,
    });

    let headers = records.next().ok_or(CsvError::Empty)??;

    let mut dataset = DataSet::new();
    for (i, header) in headers.iter().enumerate() {
        let name = normalize_field_name(header);
        if name.is_empty() {
            return Err(CsvError::EmptyHeader(i + 1));
        }
        if dataset.field(&name).is_some() {
            return Err(CsvError::DuplicateHeader(name));
        }
        dataset.fields.push(Field::new(name, header.trim()));
    }

    for record in records {
        let record = record?;
        let row: DataRow = dataset
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        dataset.push_row(row);
    }

    Ok(dataset)
}

/// Quote cells a reader could split or trim: delimiters, quotes, line
/// breaks and leading or trailing whitespace.
fn quote_cell(value: &str) -> String {
    let edge_space = value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace);
    if edge_space || value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write the dataset back out: a header of field names, then one line per
/// row in field order.
pub fn to_csv(dataset: &DataSet) -> Result<String, CsvError> {
    // Cells arrive pre-quoted by `quote_cell`.
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(Vec::new());

    writer.write_record(dataset.fields.iter().map(|f| quote_cell(&f.name)))?;
    for row in &dataset.rows {
        writer.write_record(
            dataset
                .fields
                .iter()
                .map(|f| quote_cell(row.get(&f.name).unwrap_or(""))),
        )?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CsvError::Write(e.error().to_string()))?;
    String::from_utf8(bytes).map_err(|e| CsvError::Write(e.to_string()))
}
