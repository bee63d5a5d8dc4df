use crate::lag::transform;
use crate::metrics::{mae, r_squared, rmse};
use crate::ols::fit;
use crate::types::{RawSeries, VarError, VarFit, VarOptions, VarReport};

/// Transform the training series and fit the target equation.
pub fn fit_only(train: &RawSeries, opts: &VarOptions) -> Result<VarFit, VarError> {
    let lagged = transform(train, opts.lag, opts.target_column)?;
    if opts.trace_rows {
        lagged.trace_rows();
    }
    let fitted = fit(&lagged, &opts.estimator)?;
    tracing::info!(
        rows = fitted.n_rows,
        coefficients = fitted.coefficients.len(),
        train_rmse = fitted.rmse,
        "estimated VAR coefficients"
    );
    Ok(fitted)
}

/// Fit on `train`, forecast `test` one step ahead and score the forecasts.
///
/// A fit failure returns before the test series is transformed.
///
/// # Errors
/// Returns `VarError::InvalidInput` if the two series have different widths,
/// plus any error from the individual stages.
pub fn run(train: &RawSeries, test: &RawSeries, opts: &VarOptions) -> Result<VarReport, VarError> {
    let fitted = fit_only(train, opts)?;
    evaluate(&fitted, test, opts)
}

/// Forecast and score `test` with an already fitted equation.
pub fn evaluate(fitted: &VarFit, test: &RawSeries, opts: &VarOptions) -> Result<VarReport, VarError> {
    if test.n_vars() != fitted.n_vars {
        return Err(VarError::InvalidInput(format!(
            "test series has {} variables, model was fitted on {}",
            test.n_vars(),
            fitted.n_vars
        )));
    }

    let lagged = transform(test, fitted.lag, fitted.target_column)?;
    if opts.trace_rows {
        lagged.trace_rows();
    }

    let predictions = fitted.predict(&lagged)?;
    let actual = lagged.target().clone();
    let rmse = rmse(predictions.view(), actual.view())?;
    let r2 = r_squared(predictions.view(), actual.view())?;
    let mae = mae(predictions.view(), actual.view())?;

    tracing::info!(rows = actual.len(), rmse, r2, "scored test forecasts");

    Ok(VarReport {
        fit: fitted.clone(),
        predictions,
        actual,
        rmse,
        r2,
        mae,
    })
}
