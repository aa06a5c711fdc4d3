//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built once per run by the data stage
//! - exported to CSV
//! - handed to the chart builder without further conversion

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;

/// Column label for the relative change series.
pub const CHANGE_COLUMN: &str = "change";

/// Column label for the smoothed relative change series.
pub const SMOOTHED_CHANGE_COLUMN: &str = "smoothed change";

/// Default smoothing parameter for the change series.
pub const DEFAULT_SMOOTH: f64 = 0.0001;

/// Default reference year used to turn day-of-year ordinals into dates.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2020;

/// How the chart figures are laid out in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartLayout {
    /// Two independent single-row charts, one fragment each.
    Separate,
    /// One two-row subplot sharing the date axis, a single fragment.
    Combined,
}

/// Names of the two comparison-period columns in the raw CSV.
///
/// The same names are used as trace labels and as CSV export headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub current: String,
    pub prior: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            current: "2020".to_string(),
            prior: "2015-2019".to_string(),
        }
    }
}

/// Identifies one column of the daily series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesColumn {
    Current,
    Prior,
    Change,
    SmoothedChange,
}

impl SeriesColumn {
    /// Label shown in legends, hover text and CSV headers.
    pub fn label(self, names: &ColumnNames) -> &str {
        match self {
            SeriesColumn::Current => &names.current,
            SeriesColumn::Prior => &names.prior,
            SeriesColumn::Change => CHANGE_COLUMN,
            SeriesColumn::SmoothedChange => SMOOTHED_CHANGE_COLUMN,
        }
    }

    /// `true` for the change-derived columns (plotted as filled areas, formatted as percent).
    pub fn is_change(self) -> bool {
        matches!(self, SeriesColumn::Change | SeriesColumn::SmoothedChange)
    }

    /// Fixed line colour used by every chart.
    pub fn color(self) -> &'static str {
        match self {
            SeriesColumn::Current => "#00C49A",
            SeriesColumn::Prior => "#FB8F67",
            SeriesColumn::Change => "#156064",
            SeriesColumn::SmoothedChange => "#F8E16C",
        }
    }
}

/// One raw observation: day-of-year ordinal plus both period values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub x: f64,
    pub prior: f64,
    pub current: f64,
}

/// Raw samples sorted by ordinal, as loaded from CSV.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub columns: ColumnNames,
    pub samples: Vec<RawSample>,
}

impl RawTable {
    pub fn ordinals(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.x).collect()
    }

    pub fn current(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.current).collect()
    }

    pub fn prior(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.prior).collect()
    }
}

/// One row of the daily-resampled table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRow {
    pub ordinal: i64,
    pub date: NaiveDate,
    pub current: f64,
    pub prior: f64,
    /// `current / prior - 1`.
    pub change: f64,
    pub smoothed_change: f64,
}

impl DailyRow {
    pub fn value(&self, column: SeriesColumn) -> f64 {
        match column {
            SeriesColumn::Current => self.current,
            SeriesColumn::Prior => self.prior,
            SeriesColumn::Change => self.change,
            SeriesColumn::SmoothedChange => self.smoothed_change,
        }
    }
}

/// The daily series produced by the data stage.
///
/// Invariant: `rows` cover a contiguous range of ordinals (and dates) with no gaps.
#[derive(Debug, Clone)]
pub struct DailySeries {
    pub columns: ColumnNames,
    pub rows: Vec<DailyRow>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn column(&self, column: SeriesColumn) -> Vec<f64> {
        self.rows.iter().map(|r| r.value(column)).collect()
    }
}

/// Resolved per-run configuration.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Raw input CSV (`x` + period columns).
    pub input: PathBuf,
    /// Resampled table export.
    pub csv_out: PathBuf,
    /// Directory that receives the intermediate chart fragments.
    pub out_dir: PathBuf,
    /// Markdown narrative used as the report shell.
    pub readme: PathBuf,
    /// Stylesheet inlined into the report head.
    pub stylesheet: PathBuf,
    /// Final HTML report.
    pub report: PathBuf,

    pub columns: ColumnNames,
    pub reference_year: i32,
    pub smooth: f64,
    pub layout: ChartLayout,
    /// `src` of the Plotly.js script tag emitted with the first fragment.
    pub plotly_src: String,
    /// Local Plotly.js bundle inlined into the first fragment instead of `plotly_src`.
    pub plotly_js: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("helen2020-raw.csv"),
            csv_out: PathBuf::from("helen2020.csv"),
            out_dir: PathBuf::from("."),
            readme: PathBuf::from("README.md"),
            stylesheet: PathBuf::from("pandoc.css"),
            report: PathBuf::from("index.html"),
            columns: ColumnNames::default(),
            reference_year: DEFAULT_REFERENCE_YEAR,
            smooth: DEFAULT_SMOOTH,
            layout: ChartLayout::Separate,
            plotly_src: crate::plot::DEFAULT_PLOTLY_SRC.to_string(),
            plotly_js: None,
        }
    }
}
