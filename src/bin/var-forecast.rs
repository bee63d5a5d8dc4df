//! # var-forecast
//!
//! Fit a VAR(p) equation on a training file, forecast a test file one step
//! ahead and report the coefficients and RMSE.
//!
//! Exit status: 0 on success, 2 when the least-squares fit fails, 1 for any
//! other error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use var_forecast::{
    data, lag, pipeline, Collinearity, EstimatorOptions, LoadOptions, VarError, VarFit, VarOptions,
};

const EXIT_FAILURE: u8 = 1;
const EXIT_FIT_FAILED: u8 = 2;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "var-forecast")]
#[command(about = "Fit a fixed-order VAR model and score its forecasts", long_about = None)]
struct Cli {
    /// Training data (one time step per line, numeric columns only)
    #[arg(long)]
    train: PathBuf,

    /// Held-out data with the same columns as the training file
    #[arg(long)]
    test: PathBuf,

    /// Lag order p
    #[arg(short, long, default_value = "2")]
    lag: usize,

    /// Index of the variable to forecast
    #[arg(short, long, default_value = "0")]
    target: usize,

    /// Field delimiter
    #[arg(short, long, default_value = ",")]
    delimiter: char,

    /// Treat the first line of each file as a header
    #[arg(long)]
    header: bool,

    /// Number of leading non-numeric columns to ignore (e.g. a date)
    #[arg(long, default_value = "0")]
    skip_columns: usize,

    /// Pin collinear design columns to zero instead of failing the fit
    #[arg(long)]
    drop_aliased: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Log every design row at DEBUG level
    #[arg(long)]
    trace_rows: bool,
}

impl Cli {
    fn load_options(&self) -> Result<LoadOptions, VarError> {
        if !self.delimiter.is_ascii() {
            return Err(VarError::InvalidInput(format!(
                "delimiter {:?} must be a single ASCII character",
                self.delimiter
            )));
        }
        Ok(LoadOptions {
            delimiter: self.delimiter as u8,
            has_header: self.header,
            skip_columns: self.skip_columns,
        })
    }

    fn var_options(&self) -> VarOptions {
        let collinearity = if self.drop_aliased {
            Collinearity::DropAliased
        } else {
            Collinearity::Reject
        };
        VarOptions {
            lag: self.lag,
            target_column: self.target,
            estimator: EstimatorOptions {
                collinearity,
                ..Default::default()
            },
            trace_rows: self.trace_rows,
        }
    }
}

fn print_coefficients(fit: &VarFit) {
    println!("VAR({}) coefficients for variable {}:", fit.lag, fit.target_column);
    for (col, value) in fit.coefficients.iter().enumerate() {
        let marker = if fit.aliased.contains(&col) { "  (aliased)" } else { "" };
        println!("  {:<10} {value:>14.6}{marker}", lag::column_label(col, fit.n_vars));
    }
}

fn run(cli: &Cli) -> Result<(), VarError> {
    let load = cli.load_options()?;
    let opts = cli.var_options();

    let train = data::read_csv(&cli.train, &load)?;
    tracing::info!(
        path = %cli.train.display(),
        steps = train.n_steps(),
        vars = train.n_vars(),
        "loaded training series"
    );

    let fitted = pipeline::fit_only(&train, &opts)?;
    if let Format::Text = cli.format {
        print_coefficients(&fitted);
    }

    let test = data::read_csv(&cli.test, &load)?;
    tracing::info!(
        path = %cli.test.display(),
        steps = test.n_steps(),
        vars = test.n_vars(),
        "loaded test series"
    );

    let report = pipeline::evaluate(&fitted, &test, &opts)?;
    match cli.format {
        Format::Text => println!("rmse {:.6}", report.rmse),
        Format::Json => {
            let json = serde_json::to_string_pretty(&report.summary())
                .map_err(|e| VarError::InvalidInput(e.to_string()))?;
            println!("{json}");
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "var_forecast=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_fit_failure() => {
            eprintln!("Model estimation failed: {e}");
            ExitCode::from(EXIT_FIT_FAILED)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
