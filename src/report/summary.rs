//! Terminal summary of a run.
//!
//! Formatting lives here so the data stage stays free of presentation code.

use crate::domain::{DailySeries, ReportConfig, SeriesColumn};
use crate::plot::hover::format_signed_percent;

/// Format a short summary of the daily series and where outputs went.
pub fn format_run_summary(series: &DailySeries, config: &ReportConfig) -> String {
    let mut out = String::new();

    out.push_str("=== edelta - energy consumption change ===\n");
    out.push_str(&format!("Input: {}\n", config.input.display()));

    if let (Some(first), Some(last)) = (series.rows.first(), series.rows.last()) {
        out.push_str(&format!(
            "Days: n={} | {} .. {} (ordinals {}..={}, reference year {})\n",
            series.len(),
            first.date,
            last.date,
            first.ordinal,
            last.ordinal,
            config.reference_year,
        ));
    }

    for column in [SeriesColumn::Current, SeriesColumn::Prior] {
        if let Some((lo, hi)) = min_max(&series.column(column)) {
            out.push_str(&format!(
                "{:<16} [{lo:.2}, {hi:.2}] GWh\n",
                column.label(&series.columns)
            ));
        }
    }
    for column in [SeriesColumn::Change, SeriesColumn::SmoothedChange] {
        if let Some((lo, hi)) = min_max(&series.column(column)) {
            out.push_str(&format!(
                "{:<16} [{}, {}]\n",
                column.label(&series.columns),
                format_signed_percent(lo, 1),
                format_signed_percent(hi, 1),
            ));
        }
    }
    out.push_str(&format!("Smoothing: p={}\n", config.smooth));

    out
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().copied().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
