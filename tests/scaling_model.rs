//! End-to-end checks of `ScalingModel` through the public API.

use scaling_rs::backend::{CpuBackend, Tensor2D};
use scaling_rs::preprocessing::{
    FittedScaler, FittedTransformer, PreprocessingError, ScalerParams, ScalerType, ScalingModel,
    ScalingModelConfig, ScalingModelParams, StandardScaler, StandardScalerConfig,
    StandardScalerParams, Transformer,
};
use scaling_rs::serialization::SerializableParams;

fn dataset() -> Tensor2D<CpuBackend> {
    Tensor2D::new(
        vec![
            0.5, 120.0, 3.0, //
            1.5, 80.0, 2.5, //
            2.0, 150.0, 4.5, //
            3.5, 95.0, 1.0, //
            4.0, 130.0, 3.5, //
            5.5, 60.0, 2.0, //
            6.0, 110.0, 5.0,
        ],
        7,
        3,
    )
}

fn assert_close(a: &[f64], b: &[f64], tol: f64) {
    assert_eq!(a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        assert!((x - y).abs() < tol, "index {}: {} vs {}", i, x, y);
    }
}

#[test]
fn every_scaler_type_round_trips_through_bytes() {
    let data = dataset();

    for tag in ScalerType::ALL {
        let mut model = ScalingModel::<CpuBackend>::new(-2, 2, 1e-4).with_scaler_type(tag);
        let scaled = model.fit_transform(&data).unwrap();

        let bytes = model.extract_params().to_bytes().unwrap();
        let restored =
            ScalingModel::<CpuBackend>::from_params(ScalingModelParams::from_bytes(&bytes).unwrap())
                .unwrap();

        assert_eq!(restored.scaler_type(), tag);
        assert_eq!(restored.config(), &ScalingModelConfig::new(-2, 2, 1e-4));
        assert_eq!(restored.transform(&data).unwrap().to_vec(), scaled.to_vec());
        assert_close(
            &restored.inverse_transform(&scaled).unwrap().to_vec(),
            &data.to_vec(),
            1e-9,
        );
    }
}

#[test]
fn tag_from_integer_drives_the_model() {
    let data = dataset();
    let mut model = ScalingModel::<CpuBackend>::default();

    model.set_scaler_type(ScalerType::try_from(1).unwrap());
    assert_eq!(model.scaler_type(), ScalerType::StandardScaler);
    model.fit(&data).unwrap();

    // Same result as the standalone scaler
    let direct = StandardScaler::<CpuBackend>::new().fit(&data).unwrap();
    assert_eq!(
        model.transform(&data).unwrap().to_vec(),
        direct.transform(&data).unwrap().to_vec()
    );

    assert!(ScalerType::try_from(42).is_err());
}

#[test]
fn refit_with_new_tag_replaces_the_scaler() {
    let data = dataset();
    let mut model =
        ScalingModel::<CpuBackend>::default().with_scaler_type(ScalerType::MinMaxScaler);
    model.fit(&data).unwrap();

    model.set_scaler_type(ScalerType::PcaWhitening);
    assert!(matches!(
        model.transform(&data),
        Err(PreprocessingError::NotFitted(_))
    ));

    model.fit(&data).unwrap();
    assert!(matches!(
        model.fitted_scaler(),
        Some(FittedScaler::PcaWhitening(_))
    ));
    assert!(matches!(
        model.extract_params().scaler,
        Some(ScalerParams::PcaWhitening(_))
    ));
}

#[test]
fn transform_rejects_wrong_feature_count() {
    let mut model =
        ScalingModel::<CpuBackend>::default().with_scaler_type(ScalerType::MeanNormalization);
    model.fit(&dataset()).unwrap();

    let narrow = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0], 1, 2);
    assert!(matches!(
        model.transform(&narrow),
        Err(PreprocessingError::FeatureMismatch {
            expected_features: 3,
            got_features: 2
        })
    ));
}

#[test]
fn fitted_scaler_params_survive_json() {
    let mut model =
        ScalingModel::<CpuBackend>::default().with_scaler_type(ScalerType::ZcaWhitening);
    model.fit(&dataset()).unwrap();

    let scaler = model.fitted_scaler().unwrap();
    let json = serde_json::to_string(&scaler.extract_params()).unwrap();
    let params: ScalerParams = serde_json::from_str(&json).unwrap();
    assert_eq!(params.scaler_type(), ScalerType::ZcaWhitening);

    let restored = FittedScaler::<CpuBackend>::from_params(params).unwrap();
    assert_close(
        &restored.transform(&dataset()).unwrap().to_vec(),
        &scaler.transform(&dataset()).unwrap().to_vec(),
        1e-12,
    );
}

#[test]
fn saved_model_loads_in_a_fresh_process_state() {
    let data = dataset();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scaling_model.bin");

    {
        let mut model =
            ScalingModel::<CpuBackend>::new(0, 10, 1e-6).with_scaler_type(ScalerType::MinMaxScaler);
        model.fit(&data).unwrap();
        model.save_to_file(&path).unwrap();
    }

    let loaded = ScalingModel::<CpuBackend>::load_from_file(&path).unwrap();
    let scaled = loaded.transform(&data).unwrap().to_vec();
    assert!(scaled.iter().all(|v| (0.0..=10.0).contains(v)));
    assert_eq!(loaded.n_features_in(), Some(3));
}

#[test]
fn corrupted_params_file_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zero_std.bin");

    let params = ScalingModelParams {
        scaler_type: ScalerType::StandardScaler,
        min_value: 0,
        max_value: 1,
        epsilon: 1e-6,
        scaler: Some(ScalerParams::StandardScaler(StandardScalerParams {
            config: StandardScalerConfig::default(),
            mean: vec![1.0],
            std: vec![0.0],
            n_features: 1,
        })),
    };
    std::fs::write(&path, params.to_bytes().unwrap()).unwrap();

    assert!(matches!(
        ScalingModel::<CpuBackend>::load_from_file(&path),
        Err(PreprocessingError::InvalidParameter(_))
    ));
}

#[cfg(feature = "ndarray")]
#[test]
fn ndarray_backend_matches_cpu() {
    use scaling_rs::backend::NdarrayBackend;

    let values = dataset().to_vec();
    for tag in ScalerType::ALL {
        let mut cpu = ScalingModel::<CpuBackend>::default().with_scaler_type(tag);
        let mut nd = ScalingModel::<NdarrayBackend>::default().with_scaler_type(tag);

        let a = cpu
            .fit_transform(&Tensor2D::new(values.clone(), 7, 3))
            .unwrap();
        let b = nd.fit_transform(&Tensor2D::new(values.clone(), 7, 3)).unwrap();
        assert_close(&a.to_vec(), &b.to_vec(), 1e-9);
    }
}
