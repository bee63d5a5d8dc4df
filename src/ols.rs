use crate::types::{Collinearity, EstimatorOptions, LaggedDesign, VarError, VarFit};
use linfa::dataset::Dataset;
use linfa::traits::Fit;
use linfa_linear::LinearRegression;
use ndarray::{s, Array1, Array2, Axis};

/// Flag design columns that are numerically linear combinations of the
/// columns before them.
///
/// Runs Householder QR over the columns in their natural order. A column is
/// aliased when the part of it orthogonal to the kept columns has norm
/// `<= tol * ||column||`, or when it is identically zero. Once the kept
/// columns span every row, the remaining columns are aliased as well.
pub(crate) fn aliased_columns(x: &Array2<f64>, tol: f64) -> Vec<bool> {
    let (n, m) = x.dim();
    let norms: Vec<f64> = x
        .axis_iter(Axis(1))
        .map(|col| col.dot(&col).sqrt())
        .collect();

    let mut work = x.to_owned();
    let mut aliased = vec![false; m];
    let mut rank = 0;

    for j in 0..m {
        if rank == n || norms[j] == 0.0 {
            aliased[j] = true;
            continue;
        }

        let tail = work.slice(s![rank.., j]).to_owned();
        let residual = tail.dot(&tail).sqrt();
        if residual <= tol * norms[j] {
            aliased[j] = true;
            continue;
        }

        // Reflect the tail onto e_1 and apply the same reflection to the
        // columns still to be examined.
        let alpha = if tail[0] >= 0.0 { -residual } else { residual };
        let mut v = tail;
        v[0] -= alpha;
        let v_norm2 = v.dot(&v);
        if v_norm2 > 0.0 {
            for c in j..m {
                let mut col = work.slice_mut(s![rank.., c]);
                let f = 2.0 * v.dot(&col) / v_norm2;
                col.scaled_add(-f, &v);
            }
        }
        rank += 1;
    }

    aliased
}

/// Solve `x · coef ≈ y` in the least-squares sense.
///
/// Columns flagged by the rank check are rejected or pinned to zero according
/// to `opts.collinearity`; the remaining full-rank system is solved with
/// Linfa's ordinary least squares. The intercept, if any, must already be a
/// column of `x`.
///
/// Returns the coefficient vector (length `x.ncols()`) and the aliased column
/// indices.
///
/// # Errors
/// * `VarError::InvalidInput` if the system is empty or `y` does not have one
///   entry per row
/// * `VarError::SingularSystem` if the system has no stable solution
pub fn fit_coefficients(
    x: &Array2<f64>,
    y: &Array1<f64>,
    opts: &EstimatorOptions,
) -> Result<(Array1<f64>, Vec<usize>), VarError> {
    let (rows, cols) = x.dim();
    if rows == 0 || cols == 0 {
        return Err(VarError::InvalidInput(format!(
            "least-squares system is empty ({rows}x{cols})"
        )));
    }
    if y.len() != rows {
        return Err(VarError::InvalidInput(format!(
            "design has {rows} rows but target has {} entries",
            y.len()
        )));
    }

    let mask = aliased_columns(x, opts.rank_tol);
    let kept: Vec<usize> = (0..cols).filter(|&j| !mask[j]).collect();
    let aliased: Vec<usize> = (0..cols).filter(|&j| mask[j]).collect();
    let rank = kept.len();

    if rank == 0 {
        return Err(VarError::SingularSystem { rank, cols });
    }
    if !aliased.is_empty() {
        match opts.collinearity {
            Collinearity::Reject => return Err(VarError::SingularSystem { rank, cols }),
            Collinearity::DropAliased => {
                tracing::warn!(?aliased, rank, cols, "dropping collinear design columns");
            }
        }
    }

    let x_used = if aliased.is_empty() {
        x.clone()
    } else {
        x.select(Axis(1), &kept)
    };

    // Column 0 already carries the intercept.
    let dataset = Dataset::new(x_used, y.clone());
    let fitted = LinearRegression::new()
        .with_intercept(false)
        .fit(&dataset)
        .map_err(|e| {
            tracing::debug!(error = ?e, "linear regression failed");
            VarError::SingularSystem { rank, cols }
        })?;

    let params = fitted.params();
    if params.iter().any(|v| !v.is_finite()) {
        return Err(VarError::SingularSystem { rank, cols });
    }

    let mut coef = Array1::<f64>::zeros(cols);
    for (&j, &b) in kept.iter().zip(params.iter()) {
        coef[j] = b;
    }

    Ok((coef, aliased))
}

/// Fit one VAR equation from a lagged design.
///
/// # Arguments
/// * `lagged` - Design matrix and target vector from [`crate::lag::transform`]
/// * `opts` - Rank tolerance and collinearity policy
///
/// # Returns
/// `VarFit` with the coefficient vector, its per-lag view and in-sample metrics
pub fn fit(lagged: &LaggedDesign, opts: &EstimatorOptions) -> Result<VarFit, VarError> {
    let (coefficients, aliased) = fit_coefficients(&lagged.design, &lagged.target, opts)?;

    let lag_matrix = coefficients
        .slice(s![1..])
        .to_owned()
        .into_shape((lagged.lag(), lagged.n_vars()))
        .map_err(|e| VarError::InvalidInput(e.to_string()))?;

    let fitted = crate::forecast::predict(&lagged.design, &coefficients)?;
    let (rmse, r2) = compute_metrics(&lagged.target, &fitted)?;

    tracing::debug!(rows = lagged.n_rows(), rmse, r2, "fitted VAR equation");

    Ok(VarFit {
        intercept: coefficients[0],
        coefficients,
        lag_matrix,
        aliased,
        n_rows: lagged.n_rows(),
        rmse,
        r2,
        lag: lagged.lag(),
        n_vars: lagged.n_vars(),
        target_column: lagged.target_column(),
    })
}

/// Compute RMSE and R² on the fit window.
pub(crate) fn compute_metrics(
    y_actual: &Array1<f64>,
    y_pred: &Array1<f64>,
) -> Result<(f64, f64), VarError> {
    let rmse = crate::metrics::rmse(y_pred.view(), y_actual.view())?;
    let r2 = crate::metrics::r_squared(y_pred.view(), y_actual.view())?;
    Ok((rmse, r2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lag::transform;
    use crate::types::RawSeries;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn drop_aliased() -> EstimatorOptions {
        EstimatorOptions {
            collinearity: Collinearity::DropAliased,
            ..Default::default()
        }
    }

    #[test]
    fn test_fit_simple_line() {
        // y = 2 + 3x
        let x = Array2::from_shape_vec((3, 2), vec![1.0, 0.0, 1.0, 1.0, 1.0, 2.0]).unwrap();
        let y = Array1::from_vec(vec![2.0, 5.0, 8.0]);

        let (coef, aliased) = fit_coefficients(&x, &y, &EstimatorOptions::default()).unwrap();
        assert!(aliased.is_empty());
        assert!((coef[0] - 2.0).abs() < 1e-9);
        assert!((coef[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_exactly_determined() {
        let x = Array2::from_shape_vec((2, 2), vec![1.0, 1.0, 1.0, -1.0]).unwrap();
        let y = Array1::from_vec(vec![3.0, 1.0]);

        let (coef, _) = fit_coefficients(&x, &y, &EstimatorOptions::default()).unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-9);
        assert!((coef[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_recovers_exact_coefficients() {
        let mut rng = StdRng::seed_from_u64(7);
        let rows: Vec<Vec<f64>> = (0..60)
            .map(|_| (0..3).map(|_| rng.gen_range(-5.0..5.0)).collect())
            .collect();
        let series = RawSeries::from_rows(&rows).unwrap();
        let lagged = transform(&series, 2, 0).unwrap();

        let beta_true: Array1<f64> = (0..lagged.n_cols())
            .map(|j| 0.5 - 0.15 * j as f64)
            .collect();
        let y = lagged.design().dot(&beta_true);

        let (coef, aliased) =
            fit_coefficients(lagged.design(), &y, &EstimatorOptions::default()).unwrap();
        assert!(aliased.is_empty());
        for (b, t) in coef.iter().zip(beta_true.iter()) {
            assert!((b - t).abs() < 1e-8, "coef {b} vs true {t}");
        }
    }

    #[test]
    fn test_collinear_columns_rejected() {
        // Second variable is exactly twice the first.
        let rows: Vec<Vec<f64>> = [1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0]
            .iter()
            .map(|&v| vec![v, 2.0 * v])
            .collect();
        let series = RawSeries::from_rows(&rows).unwrap();
        let lagged = transform(&series, 1, 0).unwrap();

        let result = fit(&lagged, &EstimatorOptions::default());
        assert!(matches!(
            result,
            Err(VarError::SingularSystem { rank: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_collinear_columns_dropped() {
        let rows: Vec<Vec<f64>> = [1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0]
            .iter()
            .map(|&v| vec![v, 2.0 * v])
            .collect();
        let series = RawSeries::from_rows(&rows).unwrap();
        let lagged = transform(&series, 1, 0).unwrap();

        let fit = fit(&lagged, &drop_aliased()).unwrap();
        assert_eq!(fit.aliased, vec![2]);
        assert_eq!(fit.coefficients[2], 0.0);
        // Fibonacci targets are not an exact line in the previous value,
        // but the in-sample metrics must still be well defined.
        assert!(fit.rmse.is_finite());
    }

    #[test]
    fn test_zero_design_is_singular() {
        let x = Array2::<f64>::zeros((4, 2));
        let y = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        let result = fit_coefficients(&x, &y, &drop_aliased());
        assert!(matches!(result, Err(VarError::SingularSystem { rank: 0, .. })));
    }

    #[test]
    fn test_underdetermined_rejected_by_default() {
        let x = Array2::from_shape_vec((2, 3), vec![1.0, 2.0, 3.0, 1.0, 5.0, 7.0]).unwrap();
        let y = Array1::from_vec(vec![1.0, 2.0]);

        let result = fit_coefficients(&x, &y, &EstimatorOptions::default());
        assert!(matches!(result, Err(VarError::SingularSystem { rank: 2, cols: 3 })));

        let (coef, aliased) = fit_coefficients(&x, &y, &drop_aliased()).unwrap();
        assert_eq!(aliased, vec![2]);
        let pred = x.dot(&coef);
        assert!((pred[0] - 1.0).abs() < 1e-9);
        assert!((pred[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_row_mismatch() {
        let x = Array2::<f64>::ones((3, 2));
        let y = Array1::from_vec(vec![1.0, 2.0]);
        let result = fit_coefficients(&x, &y, &EstimatorOptions::default());
        assert!(matches!(result, Err(VarError::InvalidInput(_))));
    }

    #[test]
    fn test_aliased_columns_detection() {
        let x = Array2::from_shape_vec(
            (4, 4),
            vec![
                1.0, 1.0, 2.0, 0.0, //
                1.0, 2.0, 3.0, 0.0, //
                1.0, 3.0, 4.0, 0.0, //
                1.0, 4.0, 5.0, 0.0,
            ],
        )
        .unwrap();
        assert_eq!(aliased_columns(&x, 1e-7), vec![false, false, true, true]);
    }

    #[test]
    fn test_fit_lag_matrix_layout() {
        let mut rng = StdRng::seed_from_u64(11);
        let rows: Vec<Vec<f64>> = (0..40)
            .map(|_| vec![rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)])
            .collect();
        let series = RawSeries::from_rows(&rows).unwrap();
        let lagged = transform(&series, 2, 1).unwrap();

        let fit = fit(&lagged, &EstimatorOptions::default()).unwrap();
        assert_eq!(fit.lag_matrix.shape(), &[2, 2]);
        assert_eq!(fit.intercept, fit.coefficients[0]);
        assert_eq!(fit.coefficient(1, 0), Some(fit.coefficients[1]));
        assert_eq!(fit.coefficient(2, 1), Some(fit.coefficients[4]));
        assert_eq!(fit.coefficient(0, 0), None);
        assert_eq!(fit.coefficient(3, 0), None);
        assert_eq!(fit.n_rows, 38);
        assert!(fit.r2 <= 1.0);
    }
}
