//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - initialises logging
//! - runs the requested prefix of the pipeline
//! - prints the run summary

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{AssembleArgs, ChartArgs, Command, DataArgs, ReportArgs};
use crate::domain::{ColumnNames, ReportConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `edelta` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_logging(cli.verbose);

    match cli.command {
        Command::Build(args) => {
            let config = config_from_args(&args.data, Some(&args.charts), Some(&args.report));
            let series = pipeline::run_build(&config)?;
            println!("{}", crate::report::format_run_summary(&series, &config));
            println!("Report: {}", config.report.display());
        }
        Command::Data(args) => {
            let config = config_from_args(&args, None, None);
            let series = pipeline::run_data_stage(&config)?;
            println!("{}", crate::report::format_run_summary(&series, &config));
        }
        Command::Charts(args) => {
            let config = config_from_args(&args.data, Some(&args.charts), None);
            let series = pipeline::load_series(&config)?;
            let fragments = pipeline::render_charts(&series, &config)?;
            pipeline::export_series(&series, &config)?;
            println!("{}", crate::report::format_run_summary(&series, &config));
            for path in fragments {
                println!("Fragment: {}", path.display());
            }
        }
        Command::Assemble(args) => {
            let config = config_from_assemble_args(&args);
            let fragments = pipeline::expected_fragments(&config);
            pipeline::run_assembly(&config, &fragments)?;
            println!("Report: {}", config.report.display());
        }
    }

    info!("done");
    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn config_from_args(data: &DataArgs, charts: Option<&ChartArgs>, report: Option<&ReportArgs>) -> ReportConfig {
    let mut config = ReportConfig {
        input: data.input.clone(),
        csv_out: data.csv_out.clone(),
        columns: ColumnNames {
            current: data.current_col.clone(),
            prior: data.prior_col.clone(),
        },
        reference_year: data.year,
        smooth: data.smooth,
        ..ReportConfig::default()
    };
    if let Some(charts) = charts {
        config.out_dir = charts.out_dir.clone();
        config.layout = charts.layout;
        config.plotly_src = charts.plotly_src.clone();
        config.plotly_js = charts.plotly_js.clone();
    }
    if let Some(report) = report {
        apply_report_args(&mut config, report);
    }
    config
}

pub fn config_from_assemble_args(args: &AssembleArgs) -> ReportConfig {
    let mut config = ReportConfig {
        out_dir: args.out_dir.clone(),
        layout: args.layout,
        ..ReportConfig::default()
    };
    apply_report_args(&mut config, &args.report);
    config
}

fn apply_report_args(config: &mut ReportConfig, report: &ReportArgs) {
    config.readme = report.readme.clone();
    config.stylesheet = report.stylesheet.clone();
    config.report = report.report.clone();
}

/// Rewrite argv so `edelta` defaults to `edelta build`.
///
/// Rules:
/// - `edelta`                      -> `edelta build`
/// - `edelta --input raw.csv ...`  -> `edelta build --input raw.csv ...`
/// - `edelta --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("build".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "build" | "data" | "charts" | "assemble");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "build flags".
    if arg1.starts_with('-') {
        argv.insert(1, "build".to_string());
        return argv;
    }

    argv
}
