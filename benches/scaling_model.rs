use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scaling_rs::{backend::Tensor2D, CpuBackend, ScalerType, ScalingModel};

/// Deterministic correlated dataset: `rows` samples, `cols` features.
fn synthetic_data(rows: usize, cols: usize) -> Tensor2D<CpuBackend> {
    let mut data = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        let base = (r as f64 * 0.37).sin() * 10.0;
        for c in 0..cols {
            let noise = ((r * 31 + c * 17) % 97) as f64 / 97.0;
            data.push(base * (c as f64 + 1.0) * 0.5 + noise + c as f64);
        }
    }
    Tensor2D::new(data, rows, cols)
}

fn bench_fit(c: &mut Criterion) {
    let data = synthetic_data(1_000, 8);

    for scaler_type in ScalerType::ALL {
        c.bench_with_input(
            BenchmarkId::new("fit", scaler_type),
            &scaler_type,
            |b, &tag| {
                b.iter(|| {
                    let mut model = ScalingModel::<CpuBackend>::default().with_scaler_type(tag);
                    model.fit(black_box(&data)).expect("Failed to fit model");
                    model
                });
            },
        );
    }
}

fn bench_transform(c: &mut Criterion) {
    let data = synthetic_data(1_000, 8);

    for scaler_type in ScalerType::ALL {
        let mut model = ScalingModel::<CpuBackend>::default().with_scaler_type(scaler_type);
        model.fit(&data).expect("Failed to fit model");

        c.bench_with_input(
            BenchmarkId::new("transform", scaler_type),
            &model,
            |b, model| {
                b.iter(|| model.transform(black_box(&data)).expect("Failed to transform"));
            },
        );
    }
}

fn bench_whitening_features(c: &mut Criterion) {
    // Eigendecomposition cost grows with the feature count
    for cols in [4, 16, 32].iter() {
        let data = synthetic_data(500, *cols);
        c.bench_with_input(
            BenchmarkId::new("zca_fit_features", cols),
            &data,
            |b, data| {
                b.iter(|| {
                    let mut model = ScalingModel::<CpuBackend>::default()
                        .with_scaler_type(ScalerType::ZcaWhitening);
                    model.fit(black_box(data)).expect("Failed to fit model");
                    model
                });
            },
        );
    }
}

criterion_group!(
    benches,
    bench_fit,
    bench_transform,
    bench_whitening_features
);
criterion_main!(benches);
