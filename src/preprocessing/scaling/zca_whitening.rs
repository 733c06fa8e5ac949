//! ZCA Whitening.
//!
//! PCA whitening followed by a rotation back onto the input axes:
//! ```text
//! Y = (X - mean) · V · diag(1 / sqrt(λ + ε)) · Vᵀ
//! ```
//! The whitening matrix is symmetric, and among all whitening transforms ZCA
//! keeps the output closest to the input in the least-squares sense.

use super::whitening::{self, Basis, WhiteningCore};
use super::WhiteningConfig;
use crate::backend::{Backend, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use std::marker::PhantomData;

/// Serializable parameters for a fitted ZcaWhitening.
pub type ZcaWhiteningParams = whitening::WhiteningParams;

/// ZcaWhitening transformer (unfitted).
#[derive(Clone, Debug)]
pub struct ZcaWhitening<B: Backend> {
    config: WhiteningConfig,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for ZcaWhitening<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> ZcaWhitening<B> {
    /// Create a new ZcaWhitening with the default epsilon.
    pub fn new() -> Self {
        Self {
            config: WhiteningConfig::default(),
            _backend: PhantomData,
        }
    }

    /// Set the regularization added to each eigenvalue.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }
}

impl<B: Backend> Transformer<B> for ZcaWhitening<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = ZcaWhiteningParams;
    type Fitted = FittedZcaWhitening<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let params = whitening::fit_params(data, &self.config, Basis::Zca)?;
        FittedZcaWhitening::from_params(params)
    }
}

/// Fitted ZcaWhitening ready for inference.
#[derive(Clone, Debug)]
pub struct FittedZcaWhitening<B: Backend> {
    core: WhiteningCore<B>,
}

impl<B: Backend> FittedZcaWhitening<B> {
    /// Covariance eigenvalues, descending, before regularization.
    pub fn eigenvalues(&self) -> &[f64] {
        &self.core.params.eigenvalues
    }

    /// Regularization used when fitting.
    pub fn epsilon(&self) -> f64 {
        self.core.params.config.epsilon
    }

    /// Symmetric whitening matrix `W`, so that `Y = (X - mean) · W`.
    pub fn whitening_matrix(&self) -> &Tensor2D<B> {
        &self.core.whiten
    }
}

impl<B: Backend> FittedTransformer<B> for FittedZcaWhitening<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = ZcaWhiteningParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.core.transform(data)
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        self.core.inverse_transform(data)
    }

    fn extract_params(&self) -> Self::Params {
        self.core.params.clone()
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        Ok(Self {
            core: WhiteningCore::build(params, Basis::Zca)?,
        })
    }

    fn n_features_in(&self) -> usize {
        self.core.params.n_features
    }
}
