//! Min-Max Scaler.
//!
//! Transforms features by scaling each feature to a given range (default [0, 1]).
//!
//! The transformation is given by:
//! ```text
//! X_scaled = (X - X_min) / (X_max - X_min) * (max - min) + min
//! ```
//!
//! # Example
//! ```
//! use scaling_rs::backend::{CpuBackend, Tensor2D};
//! use scaling_rs::preprocessing::{FittedTransformer, MinMaxScaler, Transformer};
//!
//! let data = Tensor2D::<CpuBackend>::from_column(&[1.0, 2.0, 3.0, 4.0, 5.0]);
//! let fitted = MinMaxScaler::<CpuBackend>::new().fit(&data).unwrap();
//!
//! let scaled = fitted
//!     .transform(&Tensor2D::from_column(&[1.0, 3.0, 5.0]))
//!     .unwrap();
//! assert_eq!(scaled.to_vec(), vec![0.0, 0.5, 1.0]);
//! ```

use super::{
    check_divisors, check_finite_params, check_n_features, check_param_lengths, nonzero_scale,
    validate_fit_input,
};
use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Configuration for MinMaxScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerConfig {
    /// Minimum value of the target range.
    pub min: f64,
    /// Maximum value of the target range.
    pub max: f64,
}

impl Default for MinMaxScalerConfig {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl MinMaxScalerConfig {
    fn validate(&self) -> Result<(), PreprocessingError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.max <= self.min {
            return Err(PreprocessingError::InvalidParameter(format!(
                "MinMaxScaler range must satisfy min < max, got [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Serializable parameters for a fitted MinMaxScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerParams {
    /// Configuration options.
    pub config: MinMaxScalerConfig,
    /// Minimum of each feature.
    pub min_: Vec<f64>,
    /// Maximum of each feature.
    pub max_: Vec<f64>,
    /// Scale factor for each feature: (max - min) / (feature_max - feature_min).
    pub scale_: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// MinMaxScaler transformer (unfitted).
///
/// Transforms features by scaling each feature to a given range.
#[derive(Clone, Debug)]
pub struct MinMaxScaler<B: Backend> {
    config: MinMaxScalerConfig,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for MinMaxScaler<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> MinMaxScaler<B> {
    /// Create a new MinMaxScaler with default range [0, 1].
    pub fn new() -> Self {
        Self {
            config: MinMaxScalerConfig::default(),
            _backend: PhantomData,
        }
    }

    /// Set the target range for scaling.
    ///
    /// The range is checked by [`Transformer::fit`], which fails with
    /// [`PreprocessingError::InvalidParameter`] unless `min < max`.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.config.min = min;
        self.config.max = max;
        self
    }

    /// The configured target range.
    pub fn config(&self) -> &MinMaxScalerConfig {
        &self.config
    }
}

impl<B: Backend> Transformer<B> for MinMaxScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = MinMaxScalerParams;
    type Fitted = FittedMinMaxScaler<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        self.config.validate()?;
        let (_, cols) = validate_fit_input(data, "MinMaxScaler")?;

        let min_vec = B::col_min_2d(&data.data);
        let max_vec = B::col_max_2d(&data.data);

        let min_vals = B::to_vec_1d(&min_vec);
        let max_vals = B::to_vec_1d(&max_vec);

        let ranges = max_vals
            .iter()
            .zip(min_vals.iter())
            .map(|(max, min)| max - min)
            .collect();
        // Constant features get range 1 and map to the range minimum.
        let target_range = self.config.max - self.config.min;
        let scale_vals: Vec<f64> = nonzero_scale(ranges, "MinMaxScaler")
            .into_iter()
            .map(|range| target_range / range)
            .collect();

        Ok(FittedMinMaxScaler {
            config: self.config.clone(),
            min_: Tensor1D::from_raw(min_vec),
            max_: Tensor1D::from_raw(max_vec),
            scale_: Tensor1D::new(scale_vals),
            n_features: cols,
        })
    }
}

/// Fitted MinMaxScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedMinMaxScaler<B: Backend> {
    config: MinMaxScalerConfig,
    min_: Tensor1D<B>,
    max_: Tensor1D<B>,
    scale_: Tensor1D<B>,
    n_features: usize,
}

impl<B: Backend> FittedMinMaxScaler<B> {
    /// Get the minimum values for each feature.
    pub fn min(&self) -> &Tensor1D<B> {
        &self.min_
    }

    /// Get the maximum values for each feature.
    pub fn max(&self) -> &Tensor1D<B> {
        &self.max_
    }

    /// Get the scale factor for each feature.
    pub fn scale(&self) -> &Tensor1D<B> {
        &self.scale_
    }

    /// Get the data range (max - min) for each feature.
    pub fn data_range(&self) -> Tensor1D<B> {
        self.max_.sub(&self.min_)
    }
}

impl<B: Backend> FittedTransformer<B> for FittedMinMaxScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = MinMaxScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        check_n_features(data, self.n_features)?;

        // X_scaled = (X - X_min) * scale_ + target_min
        let centered = B::broadcast_sub_1d_to_2d_rows(&data.data, &self.min_.data);
        let scaled = B::broadcast_mul_1d_to_2d_rows(&centered, &self.scale_.data);
        let result = B::add_scalar_2d(&scaled, &B::scalar_f64(self.config.min));

        Ok(Tensor2D::from_raw(result))
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        check_n_features(data, self.n_features)?;

        // X = (X_scaled - target_min) / scale_ + X_min
        let centered = B::add_scalar_2d(&data.data, &B::scalar_f64(-self.config.min));
        let unscaled = B::broadcast_div_1d_to_2d_rows(&centered, &self.scale_.data);
        let result = B::broadcast_add_1d_to_2d_rows(&unscaled, &self.min_.data);

        Ok(Tensor2D::from_raw(result))
    }

    fn extract_params(&self) -> Self::Params {
        MinMaxScalerParams {
            config: self.config.clone(),
            min_: self.min_.to_vec(),
            max_: self.max_.to_vec(),
            scale_: self.scale_.to_vec(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        params.config.validate()?;
        check_param_lengths(
            "MinMaxScaler",
            params.n_features,
            &[
                ("min_", params.min_.len()),
                ("max_", params.max_.len()),
                ("scale_", params.scale_.len()),
            ],
        )?;
        check_finite_params(
            "MinMaxScaler",
            &[("min_", params.min_.as_slice()), ("max_", params.max_.as_slice())],
        )?;
        check_divisors("MinMaxScaler", "scale_", &params.scale_)?;

        Ok(Self {
            config: params.config,
            min_: Tensor1D::new(params.min_),
            max_: Tensor1D::new(params.max_),
            scale_: Tensor1D::new(params.scale_),
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn create_test_data() -> Tensor2D<CpuBackend> {
        // [[0, 1], [0, 1], [1, 3]]
        Tensor2D::new(vec![0.0, 1.0, 0.0, 1.0, 1.0, 3.0], 3, 2)
    }

    #[test]
    fn test_minmax_scaler_fit() {
        let data = create_test_data();
        let scaler = MinMaxScaler::<CpuBackend>::new();
        let fitted = scaler.fit(&data).unwrap();

        // Min: [0, 1], Max: [1, 3]
        assert_eq!(fitted.min().to_vec(), vec![0.0, 1.0]);
        assert_eq!(fitted.max().to_vec(), vec![1.0, 3.0]);
        assert_eq!(fitted.data_range().to_vec(), vec![1.0, 2.0]);

        // Scale: (1 - 0) / (1 - 0) = 1, (1 - 0) / (3 - 1) = 0.5
        let scale = fitted.scale().to_vec();
        assert!((scale[0] - 1.0).abs() < 1e-12);
        assert!((scale[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_minmax_scaler_transform() {
        let data = create_test_data();
        let fitted = MinMaxScaler::<CpuBackend>::new().fit(&data).unwrap();

        let values = fitted.transform(&data).unwrap().to_vec();

        // Both columns map to [0, 0, 1]
        assert_eq!(values, vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_minmax_scaler_unit_interval_scenario() {
        let train = Tensor2D::<CpuBackend>::from_column(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let fitted = MinMaxScaler::<CpuBackend>::new()
            .with_range(0.0, 1.0)
            .fit(&train)
            .unwrap();

        assert_eq!(fitted.min().to_vec(), vec![1.0]);
        assert_eq!(fitted.max().to_vec(), vec![5.0]);

        let scaled = fitted
            .transform(&Tensor2D::from_column(&[1.0, 3.0, 5.0]))
            .unwrap();
        assert_eq!(scaled.to_vec(), vec![0.0, 0.5, 1.0]);

        let restored = fitted
            .inverse_transform(&Tensor2D::from_column(&[0.0, 0.5, 1.0]))
            .unwrap();
        assert_eq!(restored.to_vec(), vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_minmax_scaler_inverse_transform() {
        let data = create_test_data();
        let fitted = MinMaxScaler::<CpuBackend>::new().fit(&data).unwrap();

        let transformed = fitted.transform(&data).unwrap();
        let recovered = fitted.inverse_transform(&transformed).unwrap();

        for (o, r) in data.to_vec().iter().zip(recovered.to_vec().iter()) {
            assert!((o - r).abs() < 1e-12, "Expected {}, got {}", o, r);
        }
    }

    #[test]
    fn test_minmax_scaler_custom_range() {
        let data = create_test_data();
        let scaler = MinMaxScaler::<CpuBackend>::new().with_range(-1.0, 1.0);
        let fitted = scaler.fit(&data).unwrap();

        let values = fitted.transform(&data).unwrap().to_vec();

        // Both columns map to [-1, -1, 1]
        assert_eq!(values, vec![-1.0, -1.0, -1.0, -1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_minmax_scaler_invalid_range() {
        let data = create_test_data();
        for (min, max) in [(1.0, 1.0), (2.0, -2.0), (0.0, f64::NAN)] {
            let result = MinMaxScaler::<CpuBackend>::new()
                .with_range(min, max)
                .fit(&data);
            assert!(
                matches!(result, Err(PreprocessingError::InvalidParameter(_))),
                "range [{}, {}] should be rejected",
                min,
                max
            );
        }
    }

    #[test]
    fn test_minmax_scaler_constant_feature() {
        let data = Tensor2D::<CpuBackend>::new(vec![7.0, 0.0, 7.0, 4.0], 2, 2);
        let fitted = MinMaxScaler::<CpuBackend>::new()
            .with_range(2.0, 3.0)
            .fit(&data)
            .unwrap();

        let values = fitted.transform(&data).unwrap().to_vec();
        assert_eq!(values, vec![2.0, 2.0, 2.0, 3.0]);

        let recovered = fitted
            .inverse_transform(&Tensor2D::new(values, 2, 2))
            .unwrap();
        assert_eq!(recovered.to_vec(), data.to_vec());
    }

    #[test]
    fn test_minmax_scaler_serialization() {
        let data = create_test_data();
        let fitted = MinMaxScaler::<CpuBackend>::new().fit(&data).unwrap();

        let params = fitted.extract_params();
        let restored = FittedMinMaxScaler::<CpuBackend>::from_params(params.clone()).unwrap();

        assert_eq!(restored.extract_params(), params);
        assert_eq!(
            fitted.transform(&data).unwrap().to_vec(),
            restored.transform(&data).unwrap().to_vec()
        );
    }

    #[test]
    fn test_minmax_scaler_save_load() {
        let data = create_test_data();
        let fitted = MinMaxScaler::<CpuBackend>::new()
            .with_range(-1.0, 1.0)
            .fit(&data)
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minmax.bin");
        fitted.save_to_file(&path).unwrap();

        let loaded = FittedMinMaxScaler::<CpuBackend>::load_from_file(&path).unwrap();
        assert_eq!(
            fitted.transform(&data).unwrap().to_vec(),
            loaded.transform(&data).unwrap().to_vec()
        );
    }

    #[test]
    fn test_minmax_scaler_feature_mismatch() {
        let data = create_test_data(); // 2 features
        let fitted = MinMaxScaler::<CpuBackend>::new().fit(&data).unwrap();

        let wrong_data = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0], 1, 3);
        assert!(matches!(
            fitted.inverse_transform(&wrong_data),
            Err(PreprocessingError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));
    }

    #[test]
    fn test_minmax_scaler_from_params_rejects_zero_divisor() {
        for scale in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let params = MinMaxScalerParams {
                config: MinMaxScalerConfig::default(),
                min_: vec![0.0],
                max_: vec![4.0],
                scale_: vec![scale],
                n_features: 1,
            };
            assert!(
                matches!(
                    FittedMinMaxScaler::<CpuBackend>::from_params(params),
                    Err(PreprocessingError::InvalidParameter(_))
                ),
                "scale_ = {}",
                scale
            );
        }

        let params = MinMaxScalerParams {
            config: MinMaxScalerConfig::default(),
            min_: vec![f64::NEG_INFINITY],
            max_: vec![4.0],
            scale_: vec![0.25],
            n_features: 1,
        };
        assert!(matches!(
            FittedMinMaxScaler::<CpuBackend>::from_params(params),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }
}
