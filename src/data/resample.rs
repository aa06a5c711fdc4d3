//! Resample raw samples onto a uniform daily grid.
//!
//! The grid covers every integer ordinal in `ceil(min x) ..= floor(max x)`;
//! each value column is linearly interpolated at those points. Ordinals are
//! read as day-of-year in a fixed reference year, so dates around a leap day
//! can be off by one relative to the years the data came from.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::RawTable;
use crate::error::{AppError, EXIT_DATA};
use crate::math::LinearInterpolator;

/// Integer ordinals and their calendar dates.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyGrid {
    pub ordinals: Vec<i64>,
    pub dates: Vec<NaiveDate>,
}

impl DailyGrid {
    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }
}

/// Both period columns interpolated onto the daily grid.
#[derive(Debug, Clone)]
pub struct Resampled {
    pub grid: DailyGrid,
    pub current: Vec<f64>,
    pub prior: Vec<f64>,
}

/// Convert a day-of-year ordinal to a date in `year`.
pub fn ordinal_to_date(year: i32, ordinal: i64) -> Result<NaiveDate, AppError> {
    u32::try_from(ordinal)
        .ok()
        .and_then(|day| NaiveDate::from_yo_opt(year, day))
        .ok_or_else(|| {
            AppError::new(
                EXIT_DATA,
                format!("Ordinal {ordinal} is not a valid day of year {year}."),
            )
        })
}

/// Build the daily grid spanning the observed ordinal range.
pub fn daily_grid(min_x: f64, max_x: f64, year: i32) -> Result<DailyGrid, AppError> {
    let start = min_x.ceil() as i64;
    let end = max_x.floor() as i64;
    if start > end {
        return Err(AppError::new(
            EXIT_DATA,
            format!("Observed range [{min_x}, {max_x}] contains no whole day."),
        ));
    }

    let ordinals: Vec<i64> = (start..=end).collect();
    let dates = ordinals
        .iter()
        .map(|&d| ordinal_to_date(year, d))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DailyGrid { ordinals, dates })
}

/// Interpolate one value column at every grid ordinal.
pub fn resample_column(xs: &[f64], ys: &[f64], grid: &DailyGrid) -> Result<Vec<f64>, AppError> {
    let f = LinearInterpolator::new(xs.to_vec(), ys.to_vec())?;
    grid.ordinals
        .iter()
        .map(|&d| {
            f.evaluate(d as f64).ok_or_else(|| {
                let (lo, hi) = f.domain();
                AppError::new(
                    EXIT_DATA,
                    format!("Ordinal {d} lies outside the observed range [{lo}, {hi}]."),
                )
            })
        })
        .collect()
}

/// Resample both period columns of `table` onto the daily grid.
pub fn resample(table: &RawTable, year: i32) -> Result<Resampled, AppError> {
    let xs = table.ordinals();
    let (min_x, max_x) = match (xs.first(), xs.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => return Err(AppError::new(EXIT_DATA, "No samples to resample.")),
    };

    let grid = daily_grid(min_x, max_x, year)?;
    let current = resample_column(&xs, &table.current(), &grid)?;
    let prior = resample_column(&xs, &table.prior(), &grid)?;

    debug!(
        days = grid.len(),
        first = %grid.dates[0],
        last = %grid.dates[grid.len() - 1],
        "resampled to daily grid"
    );

    Ok(Resampled { grid, current, prior })
}

/// `true` if consecutive dates are exactly one day apart.
pub fn is_contiguous(dates: &[NaiveDate]) -> bool {
    dates.windows(2).all(|w| w[0].succ_opt() == Some(w[1]))
}
