//! Hover text for chart traces.
//!
//! Value columns show the consumption in GWh; change columns show a signed
//! percentage. The current-period trace carries an extra line with that day's
//! relative change.

use crate::domain::{ColumnNames, DailyRow, DailySeries, SeriesColumn};

/// Format a fraction as a signed percentage, e.g. `0.051 -> "+5.10%"`.
pub fn format_signed_percent(value: f64, decimals: usize) -> String {
    format!("{:+.*}%", decimals, value * 100.0)
}

/// Hover text for one row of `column`.
pub fn hover_text(row: &DailyRow, column: SeriesColumn, names: &ColumnNames) -> String {
    let label = column.label(names);
    let date = row.date.format("%B %d");
    let value = row.value(column);

    let mut text = if column.is_change() {
        format!(
            "<b>Date</b>: {date}<br><b>{label}</b>: {}",
            format_signed_percent(value, 2)
        )
    } else {
        format!("<b>{label}</b><br><b>Date</b>: {date}<br><b>Consumption</b>: {value:.2} GWh")
    };

    if column == SeriesColumn::Current {
        text.push_str(&format!(
            "<br><b>Change:</b> {}",
            format_signed_percent(row.change, 1)
        ));
    }
    text
}

/// Hover text for every row of `column`.
pub fn create_hovertext(series: &DailySeries, column: SeriesColumn) -> Vec<String> {
    series
        .rows
        .iter()
        .map(|row| hover_text(row, column, &series.columns))
        .collect()
}
