//! Export the daily series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! one row per day, ISO dates, full-precision floats.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::domain::{DailySeries, SeriesColumn};
use crate::error::{AppError, EXIT_IO};

/// Column order of the export (after the leading `date`).
pub const EXPORT_COLUMNS: [SeriesColumn; 4] = [
    SeriesColumn::Current,
    SeriesColumn::Prior,
    SeriesColumn::Change,
    SeriesColumn::SmoothedChange,
];

/// Write the daily series to a CSV file.
pub fn write_daily_csv(path: &Path, series: &DailySeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_daily_csv_to(file, series)?;
    debug!(path = %path.display(), rows = series.len(), "wrote daily CSV");
    Ok(())
}

/// Write the daily series as CSV to any writer.
pub fn write_daily_csv_to<W: Write>(sink: W, series: &DailySeries) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);

    let mut header = vec!["date"];
    header.extend(EXPORT_COLUMNS.iter().map(|c| c.label(&series.columns)));
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write export CSV header: {e}")))?;

    for row in &series.rows {
        let mut record = vec![row.date.format("%Y-%m-%d").to_string()];
        record.extend(EXPORT_COLUMNS.iter().map(|c| row.value(*c).to_string()));
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
