//! Max-Abs Scaler.
//!
//! Scales each feature by its maximum absolute value, so the maximal absolute
//! value of each feature in the training set becomes 1.0.
//!
//! It does not shift/center the data, and thus does not destroy any sparsity.
//!
//! # Example
//! ```ignore
//! use scaling_rs::preprocessing::{Transformer, MaxAbsScaler};
//! use scaling_rs::backend::CpuBackend;
//!
//! let scaler = MaxAbsScaler::<CpuBackend>::new();
//! let fitted = scaler.fit(&data)?;
//! let scaled = fitted.transform(&data)?;
//! ```

use super::{check_n_features, check_param_lengths, nonzero_scale, validate_fit_input};
use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Serializable parameters for a fitted MaxAbsScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaxAbsScalerParams {
    /// Maximum absolute value for each feature, as seen during fit.
    pub max_abs_: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// MaxAbsScaler transformer (unfitted).
#[derive(Clone, Debug)]
pub struct MaxAbsScaler<B: Backend> {
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for MaxAbsScaler<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> MaxAbsScaler<B> {
    /// Create a new MaxAbsScaler.
    pub fn new() -> Self {
        Self {
            _backend: PhantomData,
        }
    }
}

impl<B: Backend> Transformer<B> for MaxAbsScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = MaxAbsScalerParams;
    type Fitted = FittedMaxAbsScaler<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (_, cols) = validate_fit_input(data, "MaxAbsScaler")?;

        let abs_data = B::abs_2d(&data.data);
        let max_abs_vals = B::to_vec_1d(&B::col_max_2d(&abs_data));

        Ok(FittedMaxAbsScaler::from_max_abs(max_abs_vals, cols))
    }
}

/// Fitted MaxAbsScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedMaxAbsScaler<B: Backend> {
    max_abs_: Tensor1D<B>,
    // max_abs_ with zeros replaced by 1
    divisor: Tensor1D<B>,
    n_features: usize,
}

impl<B: Backend> FittedMaxAbsScaler<B> {
    fn from_max_abs(max_abs: Vec<f64>, n_features: usize) -> Self {
        let divisor = nonzero_scale(max_abs.clone(), "MaxAbsScaler");
        Self {
            max_abs_: Tensor1D::new(max_abs),
            divisor: Tensor1D::new(divisor),
            n_features,
        }
    }

    /// Get the maximum absolute values for each feature.
    pub fn max_abs(&self) -> &Tensor1D<B> {
        &self.max_abs_
    }

    /// Get the scale factor for each feature (`1 / max_abs`, or 1 for all-zero features).
    pub fn scale(&self) -> Tensor1D<B> {
        Tensor1D::new(self.divisor.to_vec().into_iter().map(|d| 1.0 / d).collect())
    }
}

impl<B: Backend> FittedTransformer<B> for FittedMaxAbsScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = MaxAbsScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        check_n_features(data, self.n_features)?;
        Ok(Tensor2D::from_raw(B::broadcast_div_1d_to_2d_rows(
            &data.data,
            &self.divisor.data,
        )))
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        check_n_features(data, self.n_features)?;
        Ok(Tensor2D::from_raw(B::broadcast_mul_1d_to_2d_rows(
            &data.data,
            &self.divisor.data,
        )))
    }

    fn extract_params(&self) -> Self::Params {
        MaxAbsScalerParams {
            max_abs_: self.max_abs_.to_vec(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        check_param_lengths(
            "MaxAbsScaler",
            params.n_features,
            &[("max_abs_", params.max_abs_.len())],
        )?;
        if params.max_abs_.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(PreprocessingError::InvalidParameter(
                "MaxAbsScaler params: `max_abs_` must be finite and non-negative".to_string(),
            ));
        }
        Ok(Self::from_max_abs(params.max_abs_, params.n_features))
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}
