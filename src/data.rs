use std::fs::File;
use std::io::Read;
use std::path::Path;

use ndarray::Array2;

use crate::defaults::DEFAULT_DELIMITER;
use crate::types::{RawSeries, VarError};

/// Validate row vectors before they are packed into a matrix.
///
/// Returns the common row width `k`.
///
/// # Errors
/// Returns `VarError::InvalidInput` if there are no rows, the first row is
/// empty, or any row width differs from the first.
pub fn validate_rows(rows: &[Vec<f64>]) -> Result<usize, VarError> {
    let first = rows
        .first()
        .ok_or_else(|| VarError::InvalidInput("series has no rows".into()))?;

    let width = first.len();
    if width == 0 {
        return Err(VarError::InvalidInput("series has no columns".into()));
    }

    for (t, row) in rows.iter().enumerate().skip(1) {
        if row.len() != width {
            return Err(VarError::InvalidInput(format!(
                "row {t} has {} columns, expected {width}",
                row.len()
            )));
        }
    }

    Ok(width)
}

/// Validate a packed observation matrix: non-empty and finite.
pub fn validate_matrix(values: &Array2<f64>) -> Result<(), VarError> {
    let (rows, cols) = values.dim();
    if rows == 0 || cols == 0 {
        return Err(VarError::InvalidInput(format!(
            "series must be non-empty, got {rows}x{cols}"
        )));
    }

    if let Some(((t, j), v)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(VarError::InvalidInput(format!(
            "non-finite value {v} at row {t}, column {j}"
        )));
    }

    Ok(())
}

/// Check the requested lag order and target column against a series.
///
/// Returns the number of usable rows `T − p`.
pub fn validate_lag(series: &RawSeries, lag: usize, target_column: usize) -> Result<usize, VarError> {
    if lag == 0 {
        return Err(VarError::InvalidInput("lag order must be at least 1".into()));
    }

    let k = series.n_vars();
    if target_column >= k {
        return Err(VarError::InvalidInput(format!(
            "target column {target_column} out of range for {k} variables"
        )));
    }

    let steps = series.n_steps();
    if steps <= lag {
        return Err(VarError::InvalidInput(format!(
            "lag order {lag} leaves no usable rows in a series of {steps} steps"
        )));
    }

    Ok(steps - lag)
}

/// Options for reading a delimited numeric table.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub delimiter: u8,
    /// Skip the first record as a header line.
    pub has_header: bool,
    /// Number of leading non-numeric columns (e.g. a date) to drop.
    pub skip_columns: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            has_header: false,
            skip_columns: 0,
        }
    }
}

/// Load a delimited file where each line is one time step.
pub fn read_csv<P: AsRef<Path>>(path: P, opts: &LoadOptions) -> Result<RawSeries, VarError> {
    let file = File::open(path.as_ref())?;
    read_delimited(file, opts)
}

/// Parse delimited numeric rows from any reader.
///
/// Line numbers in `VarError::Parse` are 1-based and count header lines;
/// column numbers refer to the original (unskipped) field positions.
pub fn read_delimited<R: Read>(reader: R, opts: &LoadOptions) -> Result<RawSeries, VarError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(opts.delimiter)
        .has_headers(opts.has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 1);

        let mut row = Vec::with_capacity(record.len().saturating_sub(opts.skip_columns));
        for (column, field) in record.iter().enumerate().skip(opts.skip_columns) {
            let value = field.parse::<f64>().map_err(|_| VarError::Parse {
                line,
                column,
                value: field.to_string(),
            })?;
            row.push(value);
        }
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), "loaded delimited series");
    RawSeries::from_rows(&rows)
}
