//! Command-line parsing for the energy consumption change report.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! data and presentation code. Args structs are converted into a
//! `ReportConfig` by `app::config_from_*`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ChartLayout, DEFAULT_REFERENCE_YEAR, DEFAULT_SMOOTH};
use crate::plot::DEFAULT_PLOTLY_SRC;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "edelta", version, about = "Energy consumption year-over-year change report")]
pub struct Cli {
    /// Log per-step details (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run everything: data stage, charts, report assembly.
    Build(BuildArgs),
    /// Resample, compute change, smooth, and write the daily CSV.
    Data(DataArgs),
    /// Data stage plus chart fragments (fragments are kept on disk).
    Charts(ChartsArgs),
    /// Assemble the report from existing chart fragments.
    Assemble(AssembleArgs),
}

/// Options for the data stage.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Raw CSV with an `x` ordinal column and both period columns.
    #[arg(short, long, default_value = "helen2020-raw.csv")]
    pub input: PathBuf,

    /// Where to write the daily-resampled CSV.
    #[arg(long = "csv-out", default_value = "helen2020.csv")]
    pub csv_out: PathBuf,

    /// Column holding the current-period values.
    #[arg(long = "current-col", default_value = "2020")]
    pub current_col: String,

    /// Column holding the prior-period values.
    #[arg(long = "prior-col", default_value = "2015-2019")]
    pub prior_col: String,

    /// Year used to turn day-of-year ordinals into dates.
    #[arg(long, default_value_t = DEFAULT_REFERENCE_YEAR)]
    pub year: i32,

    /// Smoothing parameter for the change spline, in [0, 1].
    #[arg(long, default_value_t = DEFAULT_SMOOTH)]
    pub smooth: f64,
}

/// Options for chart rendering.
#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    /// Directory for the intermediate chart fragments.
    #[arg(long = "out-dir", default_value = ".")]
    pub out_dir: PathBuf,

    /// Separate charts or one combined two-row chart.
    #[arg(long, value_enum, default_value_t = ChartLayout::Separate)]
    pub layout: ChartLayout,

    /// Plotly.js script loaded by the first fragment.
    #[arg(long = "plotly-src", default_value = DEFAULT_PLOTLY_SRC)]
    pub plotly_src: String,

    /// Local Plotly.js bundle to inline, making the report work offline.
    /// Takes precedence over `--plotly-src`.
    #[arg(long = "plotly-js")]
    pub plotly_js: Option<PathBuf>,
}

/// Options for report assembly.
#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Markdown narrative containing a `[PLOTS]` paragraph.
    #[arg(long, default_value = "README.md")]
    pub readme: PathBuf,

    /// Stylesheet inlined into the report head.
    #[arg(long, default_value = "pandoc.css")]
    pub stylesheet: PathBuf,

    /// Output HTML report.
    #[arg(long, default_value = "index.html")]
    pub report: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub data: DataArgs,
    #[command(flatten)]
    pub charts: ChartArgs,
    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ChartsArgs {
    #[command(flatten)]
    pub data: DataArgs,
    #[command(flatten)]
    pub charts: ChartArgs,
}

#[derive(Debug, Args, Clone)]
pub struct AssembleArgs {
    /// Directory holding the chart fragments.
    #[arg(long = "out-dir", default_value = ".")]
    pub out_dir: PathBuf,

    /// Layout the fragments were rendered with (decides how many are expected).
    #[arg(long, value_enum, default_value_t = ChartLayout::Separate)]
    pub layout: ChartLayout,

    #[command(flatten)]
    pub report: ReportArgs,
}
