//! Shared pipeline steps used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> resample -> change -> smooth -> chart fragments -> report -> CSV
//!
//! Subcommands then only decide which prefix of the workflow to run.

use std::path::PathBuf;

use tracing::info;

use crate::data::{change_column, resample, smooth_series};
use crate::domain::{ChartLayout, DailyRow, DailySeries, RawTable, ReportConfig};
use crate::error::AppError;
use crate::plot::{PlotlyScript, build_figures, fragment_file_name, write_fragments};
use crate::report::assemble_report;

/// Derive the daily series from raw samples.
///
/// Pure: no I/O, same inputs give bit-identical outputs.
pub fn build_series(table: &RawTable, reference_year: i32, smooth: f64) -> Result<DailySeries, AppError> {
    let resampled = resample(table, reference_year)?;
    let change = change_column(&resampled.current, &resampled.prior)?;
    let smoothed = smooth_series(&resampled.grid.ordinals, &change, smooth)?;

    let rows = resampled
        .grid
        .ordinals
        .iter()
        .zip(&resampled.grid.dates)
        .enumerate()
        .map(|(i, (&ordinal, &date))| DailyRow {
            ordinal,
            date,
            current: resampled.current[i],
            prior: resampled.prior[i],
            change: change[i],
            smoothed_change: smoothed[i],
        })
        .collect();

    Ok(DailySeries {
        columns: table.columns.clone(),
        rows,
    })
}

/// Load the raw CSV and derive the daily series.
pub fn load_series(config: &ReportConfig) -> Result<DailySeries, AppError> {
    let table = crate::io::load_raw_table(&config.input, &config.columns)?;
    let series = build_series(&table, config.reference_year, config.smooth)?;
    info!(
        input = %config.input.display(),
        samples = table.samples.len(),
        days = series.len(),
        "daily series derived"
    );
    Ok(series)
}

/// Write the daily series CSV export.
pub fn export_series(series: &DailySeries, config: &ReportConfig) -> Result<(), AppError> {
    crate::io::write_daily_csv(&config.csv_out, series)?;
    info!(csv = %config.csv_out.display(), rows = series.len(), "daily CSV written");
    Ok(())
}

/// Data stage: derive the daily series and write the CSV export.
pub fn run_data_stage(config: &ReportConfig) -> Result<DailySeries, AppError> {
    let series = load_series(config)?;
    export_series(&series, config)?;
    Ok(series)
}

/// Presentation stage: build figures and write one fragment file per figure.
pub fn render_charts(series: &DailySeries, config: &ReportConfig) -> Result<Vec<PathBuf>, AppError> {
    let plotly = PlotlyScript::resolve(config.plotly_js.as_deref(), &config.plotly_src)?;
    let figures = build_figures(series, config.layout);
    let paths = write_fragments(&figures, &config.out_dir, &plotly)?;
    info!(layout = ?config.layout, fragments = paths.len(), "charts rendered");
    Ok(paths)
}

/// Fragment paths a given layout produces in `config.out_dir`.
pub fn expected_fragments(config: &ReportConfig) -> Vec<PathBuf> {
    let count = match config.layout {
        ChartLayout::Separate => 2,
        ChartLayout::Combined => 1,
    };
    (0..count).map(|i| config.out_dir.join(fragment_file_name(i))).collect()
}

/// Report assembly from fragments already on disk.
pub fn run_assembly(config: &ReportConfig, fragments: &[PathBuf]) -> Result<(), AppError> {
    assemble_report(&config.readme, &config.stylesheet, fragments, &config.report)
}

/// Full run: series, charts, report, then the CSV export.
///
/// A failed build leaves no CSV export behind.
pub fn run_build(config: &ReportConfig) -> Result<DailySeries, AppError> {
    let series = load_series(config)?;
    let fragments = render_charts(&series, config)?;
    run_assembly(config, &fragments)?;
    export_series(&series, config)?;
    Ok(series)
}
