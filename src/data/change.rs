//! Relative year-over-year change.
//!
//! The report uses one sign convention throughout: `current / prior - 1`,
//! so consumption above the reference period is positive.

use crate::error::{AppError, EXIT_DATA};

/// Relative change of `current` against `prior`.
pub fn relative_change(current: f64, prior: f64) -> f64 {
    current / prior - 1.0
}

/// Elementwise relative change of two aligned columns.
///
/// Fails on length mismatch or when a change is not finite (e.g. a zero prior value).
pub fn change_column(current: &[f64], prior: &[f64]) -> Result<Vec<f64>, AppError> {
    if current.len() != prior.len() {
        return Err(AppError::new(
            EXIT_DATA,
            format!("Change columns differ in length ({} vs {}).", current.len(), prior.len()),
        ));
    }

    current
        .iter()
        .zip(prior)
        .enumerate()
        .map(|(i, (&c, &p))| {
            let change = relative_change(c, p);
            if change.is_finite() {
                Ok(change)
            } else {
                Err(AppError::new(
                    EXIT_DATA,
                    format!("Relative change is undefined at row {i} (current={c}, prior={p})."),
                ))
            }
        })
        .collect()
}
