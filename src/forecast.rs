use crate::types::VarError;
use ndarray::{Array1, Array2};

/// Apply fitted coefficients to every row of a design matrix.
///
/// `predictions[i] = Σ_j x[i][j] · coef[j]`. Neither input is modified.
///
/// # Errors
/// Returns `VarError::DimensionMismatch` if `x` does not have one column per
/// coefficient.
pub fn predict(x: &Array2<f64>, coef: &Array1<f64>) -> Result<Array1<f64>, VarError> {
    if x.ncols() != coef.len() {
        return Err(VarError::DimensionMismatch {
            expected: coef.len(),
            found: x.ncols(),
        });
    }
    Ok(x.dot(coef))
}
