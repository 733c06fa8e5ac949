//! Mean Normalization.
//!
//! Centers each feature on its mean and divides by its range:
//! ```text
//! X_scaled = (X - mean) / (X_max - X_min)
//! ```
//! Every scaled feature ends up with zero mean and a spread of exactly 1.

use super::{
    check_finite_params, check_n_features, check_param_lengths, nonzero_scale, validate_fit_input,
};
use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Serializable parameters for a fitted MeanNormalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeanNormalizationParams {
    /// Mean of each feature.
    pub mean: Vec<f64>,
    /// Minimum of each feature.
    pub min: Vec<f64>,
    /// Maximum of each feature.
    pub max: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// MeanNormalization transformer (unfitted).
#[derive(Clone, Debug)]
pub struct MeanNormalization<B: Backend> {
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for MeanNormalization<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> MeanNormalization<B> {
    /// Create a new MeanNormalization.
    pub fn new() -> Self {
        Self {
            _backend: PhantomData,
        }
    }
}

impl<B: Backend> Transformer<B> for MeanNormalization<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = MeanNormalizationParams;
    type Fitted = FittedMeanNormalization<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (_, cols) = validate_fit_input(data, "MeanNormalization")?;

        let params = MeanNormalizationParams {
            mean: B::to_vec_1d(&B::col_mean_2d(&data.data)),
            min: B::to_vec_1d(&B::col_min_2d(&data.data)),
            max: B::to_vec_1d(&B::col_max_2d(&data.data)),
            n_features: cols,
        };
        Ok(FittedMeanNormalization::build(params))
    }
}

/// Fitted MeanNormalization ready for inference.
#[derive(Clone, Debug)]
pub struct FittedMeanNormalization<B: Backend> {
    mean: Tensor1D<B>,
    min: Tensor1D<B>,
    max: Tensor1D<B>,
    scale: Tensor1D<B>,
    n_features: usize,
}

impl<B: Backend> FittedMeanNormalization<B> {
    fn build(params: MeanNormalizationParams) -> Self {
        let range = params
            .max
            .iter()
            .zip(params.min.iter())
            .map(|(max, min)| max - min)
            .collect();

        Self {
            scale: Tensor1D::new(nonzero_scale(range, "MeanNormalization")),
            mean: Tensor1D::new(params.mean),
            min: Tensor1D::new(params.min),
            max: Tensor1D::new(params.max),
            n_features: params.n_features,
        }
    }

    /// Mean of each feature.
    pub fn mean(&self) -> &Tensor1D<B> {
        &self.mean
    }

    /// Minimum of each feature.
    pub fn min(&self) -> &Tensor1D<B> {
        &self.min
    }

    /// Maximum of each feature.
    pub fn max(&self) -> &Tensor1D<B> {
        &self.max
    }

    /// Divisor of each feature: its range, or 1 for constant features.
    pub fn scale(&self) -> &Tensor1D<B> {
        &self.scale
    }
}

impl<B: Backend> FittedTransformer<B> for FittedMeanNormalization<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = MeanNormalizationParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        check_n_features(data, self.n_features)?;
        let centered = B::broadcast_sub_1d_to_2d_rows(&data.data, &self.mean.data);
        Ok(Tensor2D::from_raw(B::broadcast_div_1d_to_2d_rows(
            &centered,
            &self.scale.data,
        )))
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        check_n_features(data, self.n_features)?;
        let unscaled = B::broadcast_mul_1d_to_2d_rows(&data.data, &self.scale.data);
        Ok(Tensor2D::from_raw(B::broadcast_add_1d_to_2d_rows(
            &unscaled,
            &self.mean.data,
        )))
    }

    fn extract_params(&self) -> Self::Params {
        MeanNormalizationParams {
            mean: self.mean.to_vec(),
            min: self.min.to_vec(),
            max: self.max.to_vec(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        check_param_lengths(
            "MeanNormalization",
            params.n_features,
            &[
                ("mean", params.mean.len()),
                ("min", params.min.len()),
                ("max", params.max.len()),
            ],
        )?;
        check_finite_params(
            "MeanNormalization",
            &[
                ("mean", params.mean.as_slice()),
                ("min", params.min.as_slice()),
                ("max", params.max.as_slice()),
            ],
        )?;
        if params.max.iter().zip(params.min.iter()).any(|(max, min)| max < min) {
            return Err(PreprocessingError::InvalidParameter(
                "MeanNormalization params: `max` must not be below `min`".to_string(),
            ));
        }
        Ok(Self::build(params))
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}
