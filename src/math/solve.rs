//! Dense linear solves for the smoothing spline.
//!
//! The spline fit reduces to one symmetric positive definite system
//!
//! ```text
//! (6 (1 - p) QᵀQ + p R) u = Qᵀ y
//! ```
//!
//! of size `n - 2`. For a year of daily data that is a few hundred unknowns,
//! small enough that a dense Cholesky factorization is simpler than a banded
//! solver and still fast.

use nalgebra::{DMatrix, DVector};

/// Solve `a x = b` for a symmetric positive definite `a`.
///
/// Cholesky is tried first. If the matrix is not numerically positive definite
/// we fall back to SVD with progressively looser tolerances.
///
/// Returns `None` if no finite solution could be found.
pub fn solve_spd(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    if a.nrows() != a.ncols() || a.nrows() != b.len() {
        return None;
    }

    if let Some(chol) = a.clone().cholesky() {
        let x = chol.solve(b);
        if x.iter().all(|v| v.is_finite()) {
            return Some(x);
        }
    }

    let svd = a.clone().svd(true, true);
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(x) = svd.solve(b, tol) {
            if x.iter().all(|v| v.is_finite()) {
                return Some(x);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_small_spd_system() {
        // [4 1; 1 3] x = [1; 2]  =>  x = [1/11; 7/11]
        let a = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_row_slice(&[1.0, 2.0]);

        let x = solve_spd(&a, &b).unwrap();
        assert!((x[0] - 1.0 / 11.0).abs() < 1e-12);
        assert!((x[1] - 7.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let a = DMatrix::<f64>::identity(3, 3);
        let b = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(solve_spd(&a, &b).is_none());
    }
}
