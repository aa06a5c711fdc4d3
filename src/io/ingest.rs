//! CSV ingest for raw consumption samples.
//!
//! This module turns the raw CSV (`x` ordinal plus the two period columns)
//! into a sorted `RawTable`.
//!
//! Design goals:
//! - **Strict schema**: missing columns are a clear error (exit code 2)
//! - **Strict rows**: any unparsable or non-finite cell aborts the run with its line number
//! - **Separation of concerns**: no resampling logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use crate::domain::{ColumnNames, RawSample, RawTable};
use crate::error::{AppError, EXIT_DATA, EXIT_IO};

/// Name of the ordinal column.
pub const ORDINAL_COLUMN: &str = "x";

/// Load raw samples from a CSV file.
pub fn load_raw_table(path: &Path, columns: &ColumnNames) -> Result<RawTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let table = read_raw_table(file, columns)?;
    debug!(path = %path.display(), rows = table.samples.len(), "loaded raw samples");
    Ok(table)
}

/// Read raw samples from any CSV source.
pub fn read_raw_table<R: Read>(source: R, columns: &ColumnNames) -> Result<RawTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let x_idx = require_column(&header_map, ORDINAL_COLUMN)?;
    let current_idx = require_column(&header_map, &columns.current)?;
    let prior_idx = require_column(&header_map, &columns.prior)?;

    let mut samples = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; CSV lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(EXIT_IO, format!("CSV parse error on line {line}: {e}")))?;

        samples.push(RawSample {
            x: parse_cell(&record, x_idx, ORDINAL_COLUMN, line)?,
            prior: parse_cell(&record, prior_idx, &columns.prior, line)?,
            current: parse_cell(&record, current_idx, &columns.current, line)?,
        });
    }

    if samples.len() < 2 {
        return Err(AppError::new(
            EXIT_DATA,
            format!("Need at least two samples to resample, found {}.", samples.len()),
        ));
    }

    samples.sort_by(|a, b| a.x.total_cmp(&b.x));
    if let Some(w) = samples.windows(2).find(|w| w[0].x == w[1].x) {
        return Err(AppError::new(EXIT_DATA, format!("Duplicate ordinal `x = {}` in input.", w[0].x)));
    }

    Ok(RawTable {
        columns: columns.clone(),
        samples,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn require_column(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(name)
        .copied()
        .ok_or_else(|| AppError::new(EXIT_IO, format!("Missing required column: `{name}`")))
}

fn parse_cell(record: &StringRecord, idx: usize, name: &str, line: usize) -> Result<f64, AppError> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::new(EXIT_DATA, format!("Line {line}: missing value for `{name}`.")))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| AppError::new(EXIT_DATA, format!("Line {line}: `{name}` is not a number: {raw:?}.")))?;
    if !value.is_finite() {
        return Err(AppError::new(EXIT_DATA, format!("Line {line}: `{name}` is not finite: {raw:?}.")));
    }
    Ok(value)
}
