use var_forecast::{lag, pipeline, RawSeries, VarOptions};

fn main() {
    // Three seasonal climate-like series with a weak cross effect.
    let rows: Vec<Vec<f64>> = (0..400)
        .map(|t| {
            let t = t as f64;
            let season = (2.0 * std::f64::consts::PI * t / 365.0).sin();
            let temp = 25.0 + 8.0 * season + 0.6 * (t / 9.0).sin();
            let humidity = 60.0 - 15.0 * season + 2.0 * (t / 5.0).cos();
            let wind = 7.0 + 1.5 * (t / 13.0).sin();
            vec![temp, humidity, wind]
        })
        .collect();

    let train = RawSeries::from_rows(&rows[..320]).unwrap();
    let test = RawSeries::from_rows(&rows[320..]).unwrap();

    let opts = VarOptions {
        lag: 2,
        target_column: 0,
        ..Default::default()
    };
    let report = pipeline::run(&train, &test, &opts).unwrap();

    println!("VAR({}) coefficients:", report.fit.lag);
    for (col, value) in report.fit.coefficients.iter().enumerate() {
        println!("  {:<10} {value:>10.4}", lag::column_label(col, report.fit.n_vars));
    }
    println!("Train RMSE={:.4}  R2={:.4}", report.fit.rmse, report.fit.r2);
    println!("Test  RMSE={:.4}  R2={:.4}  MAE={:.4}", report.rmse, report.r2, report.mae);
}
