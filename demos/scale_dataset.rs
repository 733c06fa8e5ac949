//! Scaling a small dataset with every scaler type.
//!
//! Fits a `ScalingModel` for each scaler on the same measurements, prints the
//! scaled first row and the reconstruction error of `inverse_transform`, then
//! saves and reloads one model.
//!
//! Run with: cargo run --example scale_dataset [scaler_name]

use scaling_rs::{
    backend::{CpuBackend, Tensor2D},
    ScalerType, ScalingModel, ScalingModelConfig,
};
use std::error::Error;

/// Iris-like measurements: [sepal length, sepal width, petal length, petal width].
fn get_measurements() -> Vec<Vec<f64>> {
    vec![
        vec![5.1, 3.5, 1.4, 0.2],
        vec![4.9, 3.0, 1.4, 0.2],
        vec![6.2, 2.9, 4.3, 1.3],
        vec![5.9, 3.0, 4.2, 1.5],
        vec![6.3, 3.3, 6.0, 2.5],
        vec![7.1, 3.0, 5.9, 2.1],
        vec![5.0, 3.6, 1.4, 0.2],
        vec![6.7, 3.1, 4.4, 1.4],
        vec![5.8, 2.7, 5.1, 1.9],
        vec![6.4, 3.2, 5.3, 2.3],
    ]
}

fn to_tensor(rows: &[Vec<f64>]) -> Tensor2D<CpuBackend> {
    let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Tensor2D::new(flat, rows.len(), n_cols)
}

fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

fn main() -> Result<(), Box<dyn Error>> {
    let data = to_tensor(&get_measurements());
    let (rows, cols) = data.shape();
    println!("Dataset: {} samples x {} features\n", rows, cols);

    // Optional scaler name on the command line, otherwise run all of them
    let selected: Vec<ScalerType> = match std::env::args().nth(1) {
        Some(name) => vec![name.parse()?],
        None => ScalerType::ALL.to_vec(),
    };

    let config = ScalingModelConfig::default()
        .with_range(-1, 1)
        .with_epsilon(1e-5);

    for scaler_type in selected {
        let mut model =
            ScalingModel::<CpuBackend>::with_config(config.clone()).with_scaler_type(scaler_type);

        let scaled = model.fit_transform(&data)?;
        let restored = model.inverse_transform(&scaled)?;

        let first_row: Vec<String> = scaled.to_vec()[..cols]
            .iter()
            .map(|v| format!("{:>7.3}", v))
            .collect();
        println!(
            "{:<20} first row [{}]  max reconstruction error {:.2e}",
            scaler_type.to_string(),
            first_row.join(", "),
            max_abs_diff(&restored.to_vec(), &data.to_vec())
        );
    }

    // Persist a fitted model and reload it
    let mut model = ScalingModel::<CpuBackend>::with_config(config)
        .with_scaler_type(ScalerType::ZcaWhitening);
    model.fit(&data)?;

    let path = std::env::temp_dir().join("scale_dataset_zca.bin");
    model.save_to_file(&path)?;
    let loaded = ScalingModel::<CpuBackend>::load_from_file(&path)?;
    std::fs::remove_file(&path)?;

    let diff = max_abs_diff(
        &model.transform(&data)?.to_vec(),
        &loaded.transform(&data)?.to_vec(),
    );
    println!("\nReloaded {} model, max output difference {:.2e}", loaded.scaler_type(), diff);

    Ok(())
}
