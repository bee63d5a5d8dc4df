use ndarray::{Array1, Array2};

use crate::types::{LaggedDesign, RawSeries, VarError};

/// Column index of variable `var` at lag depth `depth` (1-based) in a design
/// built for `n_vars` variables. Column 0 is the intercept.
pub fn lag_column(depth: usize, var: usize, n_vars: usize) -> usize {
    1 + (depth - 1) * n_vars + var
}

/// Human-readable name for design column `col`.
pub fn column_label(col: usize, n_vars: usize) -> String {
    if col == 0 || n_vars == 0 {
        return "const".to_string();
    }
    let depth = (col - 1) / n_vars + 1;
    let var = (col - 1) % n_vars;
    format!("y{var}(t-{depth})")
}

/// Build the time-lagged design matrix and target vector.
///
/// Row `i` describes time `t = i + lag`: its target is `data[t][target_column]`,
/// column 0 is the constant 1, followed by the full observation vectors
/// `data[t-1], data[t-2], …, data[t-lag]` in that order.
///
/// # Arguments
/// * `data` - Raw observations (rows = time steps)
/// * `lag` - Lag order `p`
/// * `target_column` - Variable to forecast
///
/// # Errors
/// Returns `VarError::InvalidInput` if `lag` is zero, leaves no usable rows,
/// or `target_column` is out of range.
pub fn transform(
    data: &RawSeries,
    lag: usize,
    target_column: usize,
) -> Result<LaggedDesign, VarError> {
    let rows = crate::data::validate_lag(data, lag, target_column)?;
    let n_vars = data.n_vars();
    let cols = lag * n_vars + 1;

    let mut design = Array2::<f64>::zeros((rows, cols));
    let mut target = Array1::<f64>::zeros(rows);

    for (i, mut row) in design.rows_mut().into_iter().enumerate() {
        let t = i + lag;
        target[i] = data.step(t)[target_column];
        row[0] = 1.0;
        for depth in 1..=lag {
            let start = lag_column(depth, 0, n_vars);
            row.slice_mut(ndarray::s![start..start + n_vars])
                .assign(&data.step(t - depth));
        }
    }

    tracing::debug!(rows, cols, lag, target_column, "built lagged design");

    Ok(LaggedDesign {
        design,
        target,
        lag,
        n_vars,
        target_column,
    })
}

impl LaggedDesign {
    /// Emit every design row with its target at DEBUG level.
    ///
    /// Diagnostic only; `transform` never calls this.
    pub fn trace_rows(&self) {
        for (i, row) in self.design.rows().into_iter().enumerate() {
            tracing::debug!(
                row = i,
                t = self.time_of_row(i),
                x = ?row.to_vec(),
                y = self.target[i],
                "design row"
            );
        }
    }
}
