//! Cubic smoothing spline (Reinsch form).
//!
//! For sites `x_0 < … < x_{n-1}`, values `y_i` and a smoothing parameter
//! `p ∈ [0, 1]`, the fitted spline `f` minimizes
//!
//! ```text
//! p Σ (y_i - f(x_i))² + (1 - p) ∫ f''(t)² dt
//! ```
//!
//! - `p = 0` gives the least-squares straight line
//! - `p = 1` gives the natural cubic interpolant
//!
//! With `h_i = x_{i+1} - x_i`, `R` the `(n-2)×(n-2)` tridiagonal matrix with
//! `R_ii = 2 (h_i + h_{i+1})` and `R_{i,i+1} = h_{i+1}`, and `Qᵀ` the
//! `(n-2)×n` second-difference matrix, we solve
//!
//! ```text
//! (6 (1 - p) QᵀQ + p R) u = Qᵀ y
//! ```
//!
//! and recover the smoothed values as `ŷ = y - 6 (1 - p) Q u`. The piecewise
//! cubic coefficients follow from `ŷ` and `c = p u` (natural end conditions).

use nalgebra::{DMatrix, DVector};

use crate::error::{AppError, EXIT_NUMERIC};
use crate::math::solve::solve_spd;

/// A fitted cubic smoothing spline.
#[derive(Debug, Clone)]
pub struct SmoothingSpline {
    breaks: Vec<f64>,
    /// Per-piece coefficients `[c3, c2, c1, c0]` in the local variable `t = x - breaks[i]`.
    coeffs: Vec<[f64; 4]>,
    /// Spline values at the input sites.
    fitted: Vec<f64>,
}

impl SmoothingSpline {
    /// Fit a smoothing spline through `(xs, ys)` with smoothing parameter `smooth`.
    pub fn fit(xs: &[f64], ys: &[f64], smooth: f64) -> Result<Self, AppError> {
        validate_inputs(xs, ys, smooth)?;

        let n = xs.len();
        let dx: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();

        if n == 2 {
            let slope = (ys[1] - ys[0]) / dx[0];
            return Ok(Self {
                breaks: xs.to_vec(),
                coeffs: vec![[0.0, 0.0, slope, ys[0]]],
                fitted: ys.to_vec(),
            });
        }

        let m = n - 2;
        let dx_recip: Vec<f64> = dx.iter().map(|h| 1.0 / h).collect();

        let mut r = DMatrix::<f64>::zeros(m, m);
        for i in 0..m {
            r[(i, i)] = 2.0 * (dx[i] + dx[i + 1]);
            if i + 1 < m {
                r[(i, i + 1)] = dx[i + 1];
                r[(i + 1, i)] = dx[i + 1];
            }
        }

        let mut qt = DMatrix::<f64>::zeros(m, n);
        for i in 0..m {
            qt[(i, i)] = dx_recip[i];
            qt[(i, i + 1)] = -(dx_recip[i] + dx_recip[i + 1]);
            qt[(i, i + 2)] = dx_recip[i + 1];
        }
        let qtq = &qt * qt.transpose();

        let a = qtq * (6.0 * (1.0 - smooth)) + r * smooth;

        let dydx: Vec<f64> = ys
            .windows(2)
            .zip(&dx_recip)
            .map(|(w, hr)| (w[1] - w[0]) * hr)
            .collect();
        let b = DVector::from_iterator(m, dydx.windows(2).map(|w| w[1] - w[0]));

        let u = solve_spd(&a, &b).ok_or_else(|| {
            AppError::new(EXIT_NUMERIC, "Smoothing spline system is singular or ill-conditioned.")
        })?;

        // Q u, computed as second differences of the zero-padded u.
        let padded_u = pad_zero(u.iter().copied(), m);
        let d1: Vec<f64> = padded_u
            .windows(2)
            .zip(&dx_recip)
            .map(|(w, hr)| (w[1] - w[0]) * hr)
            .collect();
        let padded_d1 = pad_zero(d1.iter().copied(), d1.len());
        let d2: Vec<f64> = padded_d1.windows(2).map(|w| w[1] - w[0]).collect();

        let scale = 6.0 * (1.0 - smooth);
        let fitted: Vec<f64> = ys.iter().zip(&d2).map(|(y, q)| y - scale * q).collect();

        let c3 = pad_zero(u.iter().map(|v| smooth * v), m);
        let coeffs = (0..n - 1)
            .map(|i| {
                let h = dx[i];
                let c1 = (fitted[i + 1] - fitted[i]) * dx_recip[i] - h * (2.0 * c3[i] + c3[i + 1]);
                [(c3[i + 1] - c3[i]) * dx_recip[i], 3.0 * c3[i], c1, fitted[i]]
            })
            .collect();

        if fitted.iter().any(|v| !v.is_finite()) {
            return Err(AppError::new(EXIT_NUMERIC, "Smoothing spline produced non-finite values."));
        }

        Ok(Self {
            breaks: xs.to_vec(),
            coeffs,
            fitted,
        })
    }

    /// Spline values at the fitted sites.
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    pub fn into_fitted(self) -> Vec<f64> {
        self.fitted
    }

    /// Evaluate the spline at `x`, or `None` outside the fitted range.
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        let first = self.breaks[0];
        let last = self.breaks[self.breaks.len() - 1];
        if !(first..=last).contains(&x) {
            return None;
        }

        let piece = self
            .breaks
            .partition_point(|&b| b <= x)
            .saturating_sub(1)
            .min(self.coeffs.len() - 1);
        let t = x - self.breaks[piece];
        let [c3, c2, c1, c0] = self.coeffs[piece];
        Some(((c3 * t + c2) * t + c1) * t + c0)
    }
}

/// `[0, values..., 0]` for an iterator of known length.
fn pad_zero(values: impl Iterator<Item = f64>, len: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(len + 2);
    out.push(0.0);
    out.extend(values);
    out.push(0.0);
    out
}

fn validate_inputs(xs: &[f64], ys: &[f64], smooth: f64) -> Result<(), AppError> {
    if !(0.0..=1.0).contains(&smooth) {
        return Err(AppError::new(
            EXIT_NUMERIC,
            format!("Smoothing parameter must be within [0, 1], got {smooth}."),
        ));
    }
    if xs.len() != ys.len() {
        return Err(AppError::new(
            EXIT_NUMERIC,
            format!("Spline sites and values differ in length ({} vs {}).", xs.len(), ys.len()),
        ));
    }
    if xs.len() < 2 {
        return Err(AppError::new(EXIT_NUMERIC, "Smoothing spline needs at least two points."));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(AppError::new(EXIT_NUMERIC, "Smoothing spline input contains non-finite values."));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(AppError::new(EXIT_NUMERIC, "Spline sites must be strictly increasing."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn p_one_interpolates() {
        let xs = grid(6);
        let ys = vec![0.0, 2.0, -1.0, 3.0, 0.5, 1.0];
        let s = SmoothingSpline::fit(&xs, &ys, 1.0).unwrap();
        for (f, y) in s.fitted().iter().zip(&ys) {
            assert!((f - y).abs() < 1e-9, "expected {y}, got {f}");
        }
    }

    #[test]
    fn p_zero_is_least_squares_line() {
        let xs = grid(4);
        let ys = vec![0.0, 1.0, 0.0, 1.0];
        let s = SmoothingSpline::fit(&xs, &ys, 0.0).unwrap();
        let expected = [0.2, 0.4, 0.6, 0.8];
        for (f, e) in s.fitted().iter().zip(&expected) {
            assert!((f - e).abs() < 1e-9, "expected {e}, got {f}");
        }
    }

    #[test]
    fn straight_lines_pass_through_unchanged() {
        let xs = grid(10);
        let ys: Vec<f64> = xs.iter().map(|x| 0.3 * x - 1.0).collect();
        let s = SmoothingSpline::fit(&xs, &ys, 0.0001).unwrap();
        for (f, y) in s.fitted().iter().zip(&ys) {
            assert!((f - y).abs() < 1e-9);
        }
    }

    #[test]
    fn evaluate_matches_fitted_at_sites() {
        let xs = grid(8);
        let ys = vec![1.0, 0.0, 2.0, 1.5, -0.5, 0.0, 1.0, 2.0];
        let s = SmoothingSpline::fit(&xs, &ys, 0.3).unwrap();
        for (x, f) in xs.iter().zip(s.fitted()) {
            let v = s.evaluate(*x).unwrap();
            assert!((v - f).abs() < 1e-9, "at {x}: {v} vs {f}");
        }
        assert!(s.evaluate(-0.1).is_none());
        assert!(s.evaluate(7.1).is_none());
    }

    #[test]
    fn smoothing_reduces_roughness() {
        let xs = grid(20);
        let ys: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let s = SmoothingSpline::fit(&xs, &ys, 0.01).unwrap();
        let rough = |v: &[f64]| v.windows(3).map(|w| (w[0] - 2.0 * w[1] + w[2]).powi(2)).sum::<f64>();
        assert!(rough(s.fitted()) < rough(&ys) * 0.1);
    }

    #[test]
    fn two_points_give_a_line() {
        let s = SmoothingSpline::fit(&[1.0, 3.0], &[2.0, 6.0], 0.5).unwrap();
        assert_eq!(s.fitted(), &[2.0, 6.0]);
        assert!((s.evaluate(2.0).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_parameters() {
        let xs = grid(4);
        let ys = vec![0.0; 4];
        assert!(SmoothingSpline::fit(&xs, &ys, 1.5).is_err());
        assert!(SmoothingSpline::fit(&xs, &ys, f64::NAN).is_err());
        assert!(SmoothingSpline::fit(&xs[..1], &ys[..1], 0.5).is_err());
        assert!(SmoothingSpline::fit(&[0.0, 0.0, 1.0], &[0.0; 3], 0.5).is_err());
    }

    fn irregular() -> (Vec<f64>, Vec<f64>) {
        let xs = vec![0.0, 0.7, 1.5, 3.0, 3.4, 5.1, 6.0, 8.2];
        let ys = xs.iter().map(|x: &f64| x.sin() + 0.1 * x * x - 0.5 * (1.3 * x).cos()).collect();
        (xs, ys)
    }

    /// `(p I + (1 - p) Q R⁻¹ Qᵀ)⁻¹ p y` with the Green & Silverman band matrices.
    fn penalized_least_squares(xs: &[f64], ys: &[f64], p: f64) -> Vec<f64> {
        let n = xs.len();
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();

        let mut q = DMatrix::<f64>::zeros(n, n - 2);
        let mut r = DMatrix::<f64>::zeros(n - 2, n - 2);
        for k in 0..n - 2 {
            q[(k, k)] = 1.0 / h[k];
            q[(k + 1, k)] = -1.0 / h[k] - 1.0 / h[k + 1];
            q[(k + 2, k)] = 1.0 / h[k + 1];
            r[(k, k)] = (h[k] + h[k + 1]) / 3.0;
            if k + 1 < n - 2 {
                r[(k, k + 1)] = h[k + 1] / 6.0;
                r[(k + 1, k)] = h[k + 1] / 6.0;
            }
        }

        let penalty = &q * r.try_inverse().unwrap() * q.transpose();
        let a = DMatrix::<f64>::identity(n, n) * p + penalty * (1.0 - p);
        let b = DVector::from_column_slice(ys) * p;
        a.lu().solve(&b).unwrap().iter().copied().collect()
    }

    #[test]
    fn fitted_values_match_penalized_least_squares() {
        let (xs, ys) = irregular();
        for p in [0.0001, 0.01, 0.3, 0.9] {
            let s = SmoothingSpline::fit(&xs, &ys, p).unwrap();
            let expected = penalized_least_squares(&xs, &ys, p);
            for (i, (f, e)) in s.fitted().iter().zip(&expected).enumerate() {
                assert!((f - e).abs() < 1e-9, "p = {p}, site {i}: {f} vs {e}");
            }
        }
    }

    #[test]
    fn pieces_join_smoothly_at_interior_knots() {
        let (xs, ys) = irregular();
        for p in [0.0001, 0.3, 0.9] {
            let s = SmoothingSpline::fit(&xs, &ys, p).unwrap();
            for i in 1..s.coeffs.len() {
                let h = s.breaks[i] - s.breaks[i - 1];
                let [a3, a2, a1, a0] = s.coeffs[i - 1];
                let [_, b2, b1, b0] = s.coeffs[i];

                let value = ((a3 * h + a2) * h + a1) * h + a0;
                let slope = (3.0 * a3 * h + 2.0 * a2) * h + a1;
                let curvature = 6.0 * a3 * h + 2.0 * a2;
                assert!((value - b0).abs() < 1e-9, "p = {p}, knot {i}: value {value} vs {b0}");
                assert!((slope - b1).abs() < 1e-9, "p = {p}, knot {i}: slope {slope} vs {b1}");
                assert!(
                    (curvature - 2.0 * b2).abs() < 1e-9,
                    "p = {p}, knot {i}: curvature {curvature} vs {}",
                    2.0 * b2
                );

                let knot = s.breaks[i];
                let left = s.evaluate(knot - 1e-7).unwrap();
                let right = s.evaluate(knot + 1e-7).unwrap();
                assert!((s.evaluate(knot).unwrap() - s.fitted()[i]).abs() < 1e-9);
                assert!((right - left).abs() < 1e-5);
            }
            // Natural end conditions.
            assert!(s.coeffs[0][1].abs() < 1e-12);
            let [c3, c2, _, _] = s.coeffs[s.coeffs.len() - 1];
            let h = s.breaks[s.breaks.len() - 1] - s.breaks[s.breaks.len() - 2];
            assert!((6.0 * c3 * h + 2.0 * c2).abs() < 1e-9);
        }
    }
}
