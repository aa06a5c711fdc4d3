//! Smoothing of the change series.

use tracing::debug;

use crate::error::AppError;
use crate::math::SmoothingSpline;

/// Smooth `values` sampled at integer `ordinals` with a cubic smoothing spline.
///
/// Returns the spline evaluated at the same ordinals.
pub fn smooth_series(ordinals: &[i64], values: &[f64], smooth: f64) -> Result<Vec<f64>, AppError> {
    let xs: Vec<f64> = ordinals.iter().map(|&d| d as f64).collect();
    let spline = SmoothingSpline::fit(&xs, values, smooth)?;
    debug!(points = xs.len(), smooth, "fitted smoothing spline");
    Ok(spline.into_fitted())
}
