//! Piecewise-linear interpolation on a sorted grid.
//!
//! The interpolant is only defined on the closed interval `[x_0, x_{n-1}]`;
//! there is no extrapolation. At a knot the stored value is returned as-is,
//! so resampling reproduces observations exactly.

use crate::error::{AppError, EXIT_DATA};

#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Build an interpolator from strictly increasing, finite knots.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, AppError> {
        if xs.len() != ys.len() {
            return Err(AppError::new(
                EXIT_DATA,
                format!("Interpolation needs matching lengths (x={}, y={}).", xs.len(), ys.len()),
            ));
        }
        if xs.len() < 2 {
            return Err(AppError::new(EXIT_DATA, "Interpolation needs at least two samples."));
        }
        if let Some(bad) = xs.iter().chain(ys.iter()).find(|v| !v.is_finite()) {
            return Err(AppError::new(EXIT_DATA, format!("Non-finite value in interpolation input: {bad}")));
        }
        if let Some(w) = xs.windows(2).find(|w| w[1] <= w[0]) {
            return Err(AppError::new(
                EXIT_DATA,
                format!("Ordinals must be strictly increasing (found {} then {}).", w[0], w[1]),
            ));
        }
        Ok(Self { xs, ys })
    }

    /// Observed domain `(min, max)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Evaluate at `x`, or `None` outside the observed interval.
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        let (lo, hi) = self.domain();
        if !(lo..=hi).contains(&x) {
            return None;
        }

        let idx = self.xs.partition_point(|&v| v < x);
        if self.xs[idx] == x {
            return Some(self.ys[idx]);
        }

        // idx > 0 here: x > xs[0] because the exact-match case returned above.
        let (x0, x1) = (self.xs[idx - 1], self.xs[idx]);
        let (y0, y1) = (self.ys[idx - 1], self.ys[idx]);
        let t = (x - x0) / (x1 - x0);
        Some(y0 + t * (y1 - y0))
    }
}
