use ndarray::{Array1, Array2, ArrayView1};
use serde::Serialize;

use crate::defaults::{DEFAULT_LAG_ORDER, DEFAULT_RANK_TOL, DEFAULT_TARGET_COLUMN};

/// Multivariate observations: one row per time step, one column per variable.
///
/// Invariant: at least one row and one column, every value finite.
/// Only the validating constructors can build one, so ragged input never
/// reaches the lag transformer.
///
/// # Example
/// ```
/// use var_forecast::RawSeries;
/// let series = RawSeries::from_rows(&[vec![1.0, 2.0], vec![2.0, 3.0]]).unwrap();
/// assert_eq!(series.n_steps(), 2);
/// assert_eq!(series.n_vars(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RawSeries {
    values: Array2<f64>,
}

impl RawSeries {
    /// Build from row vectors, rejecting empty or ragged input.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, VarError> {
        let width = crate::data::validate_rows(rows)?;
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let values = Array2::from_shape_vec((rows.len(), width), flat)
            .map_err(|e| VarError::InvalidInput(e.to_string()))?;
        Self::from_array(values)
    }

    /// Wrap an existing matrix (rows = time steps).
    pub fn from_array(values: Array2<f64>) -> Result<Self, VarError> {
        crate::data::validate_matrix(&values)?;
        Ok(Self { values })
    }

    /// Number of time steps `T`.
    pub fn n_steps(&self) -> usize {
        self.values.nrows()
    }

    /// Number of variables `k`.
    pub fn n_vars(&self) -> usize {
        self.values.ncols()
    }

    /// Observation vector at time `t`.
    pub fn step(&self, t: usize) -> ArrayView1<'_, f64> {
        self.values.row(t)
    }
}

/// Regression inputs derived from a [`RawSeries`] for a fixed lag order.
///
/// `design` is `n × (lag·n_vars + 1)` with `n = T − lag`; column 0 is the
/// intercept and column `1 + (d−1)·n_vars + j` holds variable `j` at lag `d`.
/// Row `i` describes time `t = i + lag`.
#[derive(Clone, Debug)]
pub struct LaggedDesign {
    pub(crate) design: Array2<f64>,
    pub(crate) target: Array1<f64>,
    pub(crate) lag: usize,
    pub(crate) n_vars: usize,
    pub(crate) target_column: usize,
}

impl LaggedDesign {
    pub fn design(&self) -> &Array2<f64> {
        &self.design
    }

    pub fn target(&self) -> &Array1<f64> {
        &self.target
    }

    pub fn lag(&self) -> usize {
        self.lag
    }

    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    pub fn target_column(&self) -> usize {
        self.target_column
    }

    /// Number of usable rows, `T − lag`.
    pub fn n_rows(&self) -> usize {
        self.design.nrows()
    }

    /// Number of design columns, `lag·n_vars + 1`.
    pub fn n_cols(&self) -> usize {
        self.design.ncols()
    }

    /// Raw time index described by design row `row`.
    pub fn time_of_row(&self, row: usize) -> usize {
        row + self.lag
    }

    /// Design row describing raw time `t`, if `t` has a full lag history
    /// inside the source series.
    pub fn row_of_time(&self, t: usize) -> Option<usize> {
        t.checked_sub(self.lag).filter(|&row| row < self.n_rows())
    }
}

/// How the estimator treats design columns that are linear combinations of
/// earlier columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Collinearity {
    /// Fail with [`VarError::SingularSystem`].
    #[default]
    Reject,
    /// Leave aliased columns out of the solve and pin their coefficient to 0.
    DropAliased,
}

/// Options for the least-squares fit.
///
/// # Example
/// ```
/// use var_forecast::{Collinearity, EstimatorOptions};
/// let opts = EstimatorOptions {
///     collinearity: Collinearity::DropAliased,
///     ..Default::default()
/// };
/// assert!(opts.rank_tol > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct EstimatorOptions {
    /// Relative threshold below which a column's residual norm counts as
    /// linearly dependent on the columns before it.
    pub rank_tol: f64,
    pub collinearity: Collinearity,
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        Self {
            rank_tol: DEFAULT_RANK_TOL,
            collinearity: Collinearity::Reject,
        }
    }
}

/// Run configuration for the train/test pipeline.
#[derive(Clone, Debug)]
pub struct VarOptions {
    /// Lag order `p`.
    pub lag: usize,
    /// Index of the forecast variable `y_c`.
    pub target_column: usize,
    pub estimator: EstimatorOptions,
    /// Emit every design row at DEBUG level after each transform.
    pub trace_rows: bool,
}

impl Default for VarOptions {
    fn default() -> Self {
        Self {
            lag: DEFAULT_LAG_ORDER,
            target_column: DEFAULT_TARGET_COLUMN,
            estimator: EstimatorOptions::default(),
            trace_rows: false,
        }
    }
}

/// Fitted VAR equation for one target variable.
#[derive(Clone, Debug)]
pub struct VarFit {
    /// Full coefficient vector, aligned with the design columns.
    pub coefficients: Array1<f64>,
    /// Coefficient of the constant column.
    pub intercept: f64,
    /// Lag coefficients reshaped to `lag × n_vars`; row `d−1` holds lag `d`.
    pub lag_matrix: Array2<f64>,
    /// Design columns pinned to zero because they were collinear.
    pub aliased: Vec<usize>,
    /// Rows used in the fit.
    pub n_rows: usize,
    /// In-sample root mean squared error.
    pub rmse: f64,
    /// In-sample R².
    pub r2: f64,
    pub lag: usize,
    pub n_vars: usize,
    pub target_column: usize,
}

impl VarFit {
    /// Coefficient on variable `var` at lag depth `depth` (1-based).
    pub fn coefficient(&self, depth: usize, var: usize) -> Option<f64> {
        if depth == 0 || depth > self.lag || var >= self.n_vars {
            return None;
        }
        Some(self.lag_matrix[[depth - 1, var]])
    }

    /// Forecast every row of `design`, checking it was built with the same
    /// lag order and variable count as the training data.
    pub fn predict(&self, design: &LaggedDesign) -> Result<Array1<f64>, VarError> {
        if design.lag() != self.lag || design.n_vars() != self.n_vars {
            return Err(VarError::InvalidInput(format!(
                "design built with lag {} on {} variables, model fitted with lag {} on {}",
                design.lag(),
                design.n_vars(),
                self.lag,
                self.n_vars
            )));
        }
        crate::forecast::predict(&design.design, &self.coefficients)
    }
}

/// Output of a train/test run.
#[derive(Clone, Debug)]
pub struct VarReport {
    pub fit: VarFit,
    pub predictions: Array1<f64>,
    pub actual: Array1<f64>,
    /// Out-of-sample root mean squared error.
    pub rmse: f64,
    pub r2: f64,
    pub mae: f64,
}

impl VarReport {
    pub fn summary(&self) -> ReportSummary {
        let n_cols = self.fit.coefficients.len();
        ReportSummary {
            lag: self.fit.lag,
            target_column: self.fit.target_column,
            columns: (0..n_cols)
                .map(|c| crate::lag::column_label(c, self.fit.n_vars))
                .collect(),
            coefficients: self.fit.coefficients.to_vec(),
            aliased: self.fit.aliased.clone(),
            train_rows: self.fit.n_rows,
            train_rmse: self.fit.rmse,
            train_r2: self.fit.r2,
            test_rows: self.actual.len(),
            rmse: self.rmse,
            r2: self.r2,
            mae: self.mae,
        }
    }
}

/// Flat, serialisable view of a [`VarReport`].
#[derive(Clone, Debug, Serialize)]
pub struct ReportSummary {
    pub lag: usize,
    pub target_column: usize,
    pub columns: Vec<String>,
    pub coefficients: Vec<f64>,
    pub aliased: Vec<usize>,
    pub train_rows: usize,
    pub train_rmse: f64,
    pub train_r2: f64,
    pub test_rows: usize,
    pub rmse: f64,
    pub r2: f64,
    pub mae: f64,
}

/// Library error type.
#[derive(thiserror::Error, Debug)]
pub enum VarError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("least-squares system is singular (rank {rank} of {cols} columns)")]
    SingularSystem { rank: usize, cols: usize },
    #[error("dimension mismatch: expected {expected} columns, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("input lengths mismatch ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    #[error("empty input")]
    EmptyInput,
    #[error("line {line}, column {column}: cannot parse {value:?} as a number")]
    Parse {
        line: usize,
        column: usize,
        value: String,
    },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl VarError {
    /// True when the least-squares fit itself failed.
    pub fn is_fit_failure(&self) -> bool {
        matches!(self, VarError::SingularSystem { .. })
    }
}
