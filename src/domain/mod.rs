//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw CSV observations (`RawSample`, `RawTable`)
//! - the daily-resampled output (`DailyRow`, `DailySeries`)
//! - column naming and chart layout enums
//! - the resolved run configuration (`ReportConfig`)

pub mod types;

pub use types::*;
