//! End-to-end runs of the build pipeline against temporary directories.

use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use energy_delta::app::pipeline::{expected_fragments, render_charts, run_assembly, run_build, run_data_stage};
use energy_delta::domain::{ChartLayout, ReportConfig};
use energy_delta::report::PLOTS_PLACEHOLDER;
use tempfile::TempDir;

const README: &str = "# Energy use in 2020\n\nSome context.\n\n[PLOTS]\n\nClosing words.\n";
const CSS: &str = "body { font-family: serif; }";

fn setup(raw_csv: &str) -> (TempDir, ReportConfig) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("raw.csv"), raw_csv).unwrap();
    fs::write(root.join("README.md"), README).unwrap();
    fs::write(root.join("pandoc.css"), CSS).unwrap();

    let config = ReportConfig {
        input: root.join("raw.csv"),
        csv_out: root.join("daily.csv"),
        out_dir: root.to_path_buf(),
        readme: root.join("README.md"),
        stylesheet: root.join("pandoc.css"),
        report: root.join("index.html"),
        ..ReportConfig::default()
    };
    (dir, config)
}

fn three_day_csv() -> &'static str {
    "x,2015-2019,2020\n1,20,10\n2,20,20\n3,20,30\n"
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn three_day_build_produces_report_and_consumes_fragments() {
    let (_dir, config) = setup(three_day_csv());

    let series = run_build(&config).unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.rows[0].ordinal, 1);
    assert_eq!(series.rows[2].ordinal, 3);
    assert_relative_eq!(series.rows[0].change, -0.5);
    assert_relative_eq!(series.rows[2].change, 0.5);

    let report = read(&config.report);
    assert!(!report.contains("[PLOTS]"));
    assert!(!report.contains(PLOTS_PLACEHOLDER));
    assert!(report.contains("id=\"chart-1\""));
    assert!(report.contains("id=\"chart-2\""));
    assert_eq!(report.matches("plotly-graph-div").count(), 2);
    assert!(report.contains("<title>Energy use in 2020</title>"));
    assert!(report.contains(CSS));
    assert!(report.find("<style>").unwrap() < report.find("</head>").unwrap());

    for fragment in expected_fragments(&config) {
        assert!(!fragment.exists(), "{} should be deleted", fragment.display());
    }
}

#[test]
fn daily_csv_has_one_row_per_day() {
    let (_dir, config) = setup("x,2015-2019,2020\n0.5,10,10\n4.5,10,18\n");

    run_data_stage(&config).unwrap();

    let csv = read(&config.csv_out);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "date,2020,2015-2019,change,smoothed change");
    // ceil(0.5) = 1 .. floor(4.5) = 4
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("2020-01-01,11,10,"));
    assert!(lines[4].starts_with("2020-01-04,17,10,"));
}

#[test]
fn repeated_runs_are_identical() {
    let (_dir, config) = setup("x,2015-2019,2020\n1,20,10\n5,21,19\n9,19,22\n14,20,18\n");

    let first = run_data_stage(&config).unwrap();
    let first_csv = read(&config.csv_out);
    let second = run_data_stage(&config).unwrap();
    let second_csv = read(&config.csv_out);

    assert_eq!(first.rows, second.rows);
    assert_eq!(first_csv, second_csv);
}

#[test]
fn combined_layout_embeds_a_single_chart() {
    let (_dir, mut config) = setup(three_day_csv());
    config.layout = ChartLayout::Combined;

    run_build(&config).unwrap();

    let report = read(&config.report);
    assert_eq!(report.matches("plotly-graph-div").count(), 1);
    assert!(report.contains("\"yaxis2\""));
    assert!(!config.out_dir.join("plot1.html").exists());
}

#[test]
fn missing_placeholder_is_fatal_and_keeps_fragments() {
    let (_dir, config) = setup(three_day_csv());
    fs::write(&config.readme, "# No charts here\n").unwrap();

    let series = run_data_stage(&config).unwrap();
    let fragments = render_charts(&series, &config).unwrap();
    let err = run_assembly(&config, &fragments).unwrap_err();

    assert_eq!(err.exit_code(), energy_delta::error::EXIT_REPORT);
    assert!(!config.report.exists());
    assert!(fragments.iter().all(|p| p.exists()));
}

#[test]
fn missing_fragment_is_fatal() {
    let (_dir, config) = setup(three_day_csv());

    let err = run_assembly(&config, &expected_fragments(&config)).unwrap_err();

    assert_eq!(err.exit_code(), energy_delta::error::EXIT_REPORT);
    assert!(!config.report.exists());
}

#[test]
fn missing_input_is_fatal() {
    let (_dir, mut config) = setup(three_day_csv());
    config.input = config.out_dir.join("nope.csv");

    let err = run_build(&config).unwrap_err();

    assert_eq!(err.exit_code(), energy_delta::error::EXIT_IO);
    assert!(!config.csv_out.exists());
    assert!(!config.report.exists());
}

#[test]
fn local_plotly_bundle_makes_the_report_self_contained() {
    let (_dir, config) = setup(three_day_csv());
    let bundle = config.out_dir.join("plotly.min.js");
    fs::write(&bundle, "window.Plotly = { newPlot: function () {} }; /* offline-bundle </script> */").unwrap();
    let config = ReportConfig {
        plotly_js: Some(bundle),
        ..config
    };

    run_build(&config).unwrap();

    let report = read(&config.report);
    assert!(report.contains("window.Plotly = { newPlot: function () {} };"));
    assert!(report.contains("/* offline-bundle <\\/script> */"));
    assert!(!report.contains("<script src="));
    assert!(!report.contains(&config.plotly_src));
    assert_eq!(report.matches("window.Plotly").count(), 1);
}

#[test]
fn missing_plotly_bundle_is_fatal() {
    let (_dir, config) = setup(three_day_csv());
    let config = ReportConfig {
        plotly_js: Some(config.out_dir.join("absent.js")),
        ..config
    };

    let err = run_build(&config).unwrap_err();

    assert_eq!(err.exit_code(), energy_delta::error::EXIT_IO);
    assert!(!config.report.exists());
    assert!(!config.csv_out.exists());
}

#[test]
fn failed_build_leaves_no_csv() {
    let (_dir, config) = setup(three_day_csv());
    fs::write(&config.readme, "# No charts here\n").unwrap();

    let err = run_build(&config).unwrap_err();

    assert_eq!(err.exit_code(), energy_delta::error::EXIT_REPORT);
    assert!(!config.report.exists());
    assert!(!config.csv_out.exists());
}

#[test]
fn successful_build_writes_the_csv() {
    let (_dir, config) = setup(three_day_csv());

    run_build(&config).unwrap();

    assert_eq!(read(&config.csv_out).lines().count(), 4);
}
