//! Forecast accuracy measures.

use crate::defaults::R2_SS_TOT_FLOOR;
use crate::types::VarError;
use ndarray::ArrayView1;

fn check_pair(y_hat: &ArrayView1<f64>, y: &ArrayView1<f64>) -> Result<(), VarError> {
    if y_hat.len() != y.len() {
        return Err(VarError::LengthMismatch {
            left: y_hat.len(),
            right: y.len(),
        });
    }
    if y.is_empty() {
        return Err(VarError::EmptyInput);
    }
    Ok(())
}

/// Root mean squared error, `sqrt(Σ (ŷ_i − y_i)² / n)`.
///
/// # Errors
/// `VarError::LengthMismatch` if the lengths differ, `VarError::EmptyInput`
/// if both are empty.
pub fn rmse(y_hat: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<f64, VarError> {
    check_pair(&y_hat, &y)?;
    let sse: f64 = y_hat
        .iter()
        .zip(y.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum();
    Ok((sse / y.len() as f64).sqrt())
}

/// Mean absolute error.
pub fn mae(y_hat: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<f64, VarError> {
    check_pair(&y_hat, &y)?;
    let sae: f64 = y_hat.iter().zip(y.iter()).map(|(a, b)| (a - b).abs()).sum();
    Ok(sae / y.len() as f64)
}

/// Coefficient of determination of `y_hat` against `y`.
pub fn r_squared(y_hat: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<f64, VarError> {
    check_pair(&y_hat, &y)?;
    let y_mean = y.mean().unwrap_or(0.0);
    let ss_tot: f64 = y.iter().map(|&v| (v - y_mean).powi(2)).sum();
    let ss_res: f64 = y_hat
        .iter()
        .zip(y.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum();
    Ok(1.0 - ss_res / ss_tot.max(R2_SS_TOT_FLOOR))
}
