//! # var_forecast
//!
//! Fixed-order Vector Autoregression (VAR) for one target variable.
//!
//! The crate runs a strictly linear pipeline:
//!
//! * **Lag transform**: raw observations → design matrix with an intercept
//!   column followed by the full observation vectors at lags `1..=p`
//! * **Estimate**: least-squares coefficients via Linfa, with an explicit rank
//!   check for collinear columns
//! * **Forecast**: one-step-ahead predictions on a held-out series
//! * **Evaluate**: RMSE (plus R² and MAE) of the forecasts
//!
//! ## Example
//!
//! ```
//! use var_forecast::{pipeline, RawSeries, VarOptions};
//!
//! // Two variables driven by a deterministic input.
//! let rows: Vec<Vec<f64>> = (0..60)
//!     .map(|t| {
//!         let t = t as f64;
//!         vec![(0.3 * t).sin() + 0.05 * t, (0.11 * t).cos()]
//!     })
//!     .collect();
//! let train = RawSeries::from_rows(&rows[..45]).unwrap();
//! let test = RawSeries::from_rows(&rows[45..]).unwrap();
//!
//! let report = pipeline::run(&train, &test, &VarOptions::default()).unwrap();
//! assert_eq!(report.fit.coefficients.len(), 2 * 2 + 1);
//! println!("test RMSE: {:.4}", report.rmse);
//! ```

// Module declarations
pub mod data;
mod defaults;
pub mod forecast;
pub mod lag;
pub mod metrics;
pub mod ols;
pub mod pipeline;
mod types;

// Re-export public types
pub use data::LoadOptions;
pub use types::{
    Collinearity, EstimatorOptions, LaggedDesign, RawSeries, ReportSummary, VarError, VarFit,
    VarOptions, VarReport,
};

// Re-export main public functions
pub use data::read_csv;
pub use forecast::predict;
pub use lag::transform;
pub use metrics::rmse;
pub use ols::{fit, fit_coefficients};
