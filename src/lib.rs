//! `energy-delta` library crate.
//!
//! The binary (`edelta`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the data stage can be reused without the report
//! - code stays easy to navigate

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
