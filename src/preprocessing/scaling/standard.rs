//! Standard Scaler (Z-score normalization).
//!
//! Transforms features by removing the mean and scaling to unit variance.
//!
//! The standard score of a sample `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the training samples, and `s` is the standard deviation.
//!
//! # Example
//! ```ignore
//! use scaling_rs::preprocessing::{Transformer, StandardScaler};
//! use scaling_rs::backend::CpuBackend;
//!
//! let scaler = StandardScaler::<CpuBackend>::new()
//!     .with_mean(true)
//!     .with_std(true);
//!
//! let fitted = scaler.fit(&data)?;
//! let scaled = fitted.transform(&data)?;
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

/// Configuration for StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// If true, center the data before scaling.
    pub with_mean: bool,
    /// If true, scale the data to unit variance.
    pub with_std: bool,
    /// Delta degrees of freedom for the standard deviation (0 = population).
    pub ddof: usize,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
            ddof: 0,
        }
    }
}

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Configuration options.
    pub config: StandardScalerConfig,
    /// Mean of each feature (zeros if `with_mean` is false).
    pub mean: Vec<f64>,
    /// Standard deviation of each feature (ones if `with_std` is false).
    pub std: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug)]
pub struct StandardScaler<B: Backend> {
    config: StandardScalerConfig,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for StandardScaler<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> StandardScaler<B> {
    /// Create a new StandardScaler with default configuration.
    pub fn new() -> Self {
        Self {
            config: StandardScalerConfig::default(),
            _backend: PhantomData,
        }
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }

    /// Set the delta degrees of freedom used for the standard deviation.
    pub fn with_ddof(mut self, ddof: usize) -> Self {
        self.config.ddof = ddof;
        self
    }
}

impl<B: Backend> Transformer<B> for StandardScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = StandardScalerParams;
    type Fitted = FittedStandardScaler<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (_, cols) = validate_fit_input(data, "StandardScaler")?;

        let mean = if self.config.with_mean {
            Tensor1D::from_raw(B::col_mean_2d(&data.data))
        } else {
            Tensor1D::zeros(cols)
        };

        let std = if self.config.with_std {
            let raw = B::to_vec_1d(&B::col_std_2d(&data.data, self.config.ddof));
            Tensor1D::new(nonzero_scale(raw, "StandardScaler"))
        } else {
            Tensor1D::new(vec![1.0; cols])
        };

        Ok(FittedStandardScaler {
            config: self.config.clone(),
            mean,
            std,
            n_features: cols,
        })
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler<B: Backend> {
    config: StandardScalerConfig,
    mean: Tensor1D<B>,
    std: Tensor1D<B>,
    n_features: usize,
}

impl<B: Backend> FittedStandardScaler<B> {
    /// Get the mean values for each feature.
    pub fn mean(&self) -> &Tensor1D<B> {
        &self.mean
    }

    /// Get the standard deviation values for each feature.
    pub fn std(&self) -> &Tensor1D<B> {
        &self.std
    }
}

impl<B: Backend> FittedTransformer<B> for FittedStandardScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = StandardScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        check_n_features(data, self.n_features)?;

        let mut result = data.data.clone();
        if self.config.with_mean {
            result = B::broadcast_sub_1d_to_2d_rows(&result, &self.mean.data);
        }
        if self.config.with_std {
            result = B::broadcast_div_1d_to_2d_rows(&result, &self.std.data);
        }

        Ok(Tensor2D::from_raw(result))
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        check_n_features(data, self.n_features)?;

        let mut result = data.data.clone();
        if self.config.with_std {
            result = B::broadcast_mul_1d_to_2d_rows(&result, &self.std.data);
        }
        if self.config.with_mean {
            result = B::broadcast_add_1d_to_2d_rows(&result, &self.mean.data);
        }

        Ok(Tensor2D::from_raw(result))
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            config: self.config.clone(),
            mean: self.mean.to_vec(),
            std: self.std.to_vec(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        check_param_lengths(
            "StandardScaler",
            params.n_features,
            &[("mean", params.mean.len()), ("std", params.std.len())],
        )?;
        check_finite_params("StandardScaler", &[("mean", params.mean.as_slice())])?;
        check_divisors("StandardScaler", "std", &params.std)?;

        Ok(Self {
            config: params.config,
            mean: Tensor1D::new(params.mean),
            std: Tensor1D::new(params.std),
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}
