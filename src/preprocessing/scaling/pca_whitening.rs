//! PCA Whitening.
//!
//! Projects centered data onto the principal axes of its covariance and
//! rescales every axis to unit variance:
//! ```text
//! Y = (X - mean) · V · diag(1 / sqrt(λ + ε))
//! ```
//! where `V` holds the covariance eigenvectors as columns and `λ` the matching
//! eigenvalues (descending). Column `k` of the output is the `k`-th principal
//! component. `ε` keeps near-singular directions finite.

use super::whitening::{self, Basis, WhiteningCore};
use super::WhiteningConfig;
use crate::backend::{Backend, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use std::marker::PhantomData;

/// Serializable parameters for a fitted PcaWhitening.
pub type PcaWhiteningParams = whitening::WhiteningParams;

/// PcaWhitening transformer (unfitted).
#[derive(Clone, Debug)]
pub struct PcaWhitening<B: Backend> {
    config: WhiteningConfig,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for PcaWhitening<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> PcaWhitening<B> {
    /// Create a new PcaWhitening with the default epsilon.
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

impl<B: Backend> Transformer<B> for PcaWhitening<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = PcaWhiteningParams;
    type Fitted = FittedPcaWhitening<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let params = whitening::fit_params(data, &self.config, Basis::Pca)?;
        FittedPcaWhitening::from_params(params)
    }
}

/// Fitted PcaWhitening ready for inference.
#[derive(Clone, Debug)]
pub struct FittedPcaWhitening<B: Backend> {
    core: WhiteningCore<B>,
}

impl<B: Backend> FittedPcaWhitening<B> {
    /// Covariance eigenvalues, descending, before regularization.
    pub fn eigenvalues(&self) -> &[f64] {
        &self.core.params.eigenvalues
    }

    /// Covariance eigenvectors as columns of a row-major matrix.
    pub fn eigenvectors(&self) -> &[f64] {
        &self.core.params.eigenvectors
    }

    /// Regularization used when fitting.
    pub fn epsilon(&self) -> f64 {
        self.core.params.config.epsilon
    }

    /// Whitening matrix `W`, so that `Y = (X - mean) · W`.
    pub fn whitening_matrix(&self) -> &Tensor2D<B> {
        &self.core.whiten
    }
}

impl<B: Backend> FittedTransformer<B> for FittedPcaWhitening<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = PcaWhiteningParams;

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
            core: WhiteningCore::build(params, Basis::Pca)?,
        })
    }

    fn n_features_in(&self) -> usize {
        self.core.params.n_features
    }
}
