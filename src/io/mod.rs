//! Input/output helpers.
//!
//! - raw CSV ingest + validation (`ingest`)
//! - daily series CSV export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
