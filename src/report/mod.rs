//! Reporting: HTML report assembly and the terminal run summary.

pub mod assemble;
pub mod summary;

pub use assemble::{PLOTS_PLACEHOLDER, assemble_report};
pub use summary::format_run_summary;
