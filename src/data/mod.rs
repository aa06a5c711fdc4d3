//! Data stage: daily resampling, relative change, and smoothing.

pub mod change;
pub mod resample;
pub mod smooth;

pub use change::{change_column, relative_change};
pub use resample::{DailyGrid, Resampled, daily_grid, ordinal_to_date, resample};
pub use smooth::smooth_series;
