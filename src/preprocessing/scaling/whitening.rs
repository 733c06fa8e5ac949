//! Shared machinery for PCA and ZCA whitening.
//!
//! Both scalers learn the same state (feature means plus the eigendecomposition
//! of the covariance matrix) and only differ in the basis the whitened data is
//! expressed in, so fitting, validation and the backend-side matrix products
//! live here.

use super::{check_finite_params, check_n_features, check_param_lengths, validate_fit_input};
use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::linalg::{self, SymmetricEigen};
use crate::preprocessing::error::PreprocessingError;
use serde::{Deserialize, Serialize};

/// Default regularization added to every covariance eigenvalue.
pub const DEFAULT_EPSILON: f64 = 0.00005;

/// Configuration shared by the whitening scalers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WhiteningConfig {
    /// Added to each eigenvalue before taking its square root.
    pub epsilon: f64,
}

impl Default for WhiteningConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl WhiteningConfig {
    pub(crate) fn validate(&self) -> Result<(), PreprocessingError> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(PreprocessingError::InvalidParameter(format!(
                "whitening epsilon must be finite and non-negative, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Serializable parameters for a fitted whitening scaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WhiteningParams {
    /// Configuration options.
    pub config: WhiteningConfig,
    /// Mean of each feature.
    pub mean: Vec<f64>,
    /// Covariance eigenvalues, descending, before regularization.
    pub eigenvalues: Vec<f64>,
    /// Covariance eigenvectors as columns of a row-major `n_features²` matrix.
    pub eigenvectors: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// Output basis of the whitened data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Basis {
    /// Principal axes.
    Pca,
    /// Principal axes rotated back onto the input axes.
    Zca,
}

impl Basis {
    fn name(self) -> &'static str {
        match self {
            Basis::Pca => "PcaWhitening",
            Basis::Zca => "ZcaWhitening",
        }
    }
}

/// Learns mean and covariance eigendecomposition from `data`.
pub(crate) fn fit_params<B: Backend>(
    data: &Tensor2D<B>,
    config: &WhiteningConfig,
    basis: Basis,
) -> Result<WhiteningParams, PreprocessingError> {
    config.validate()?;
    let (rows, cols) = validate_fit_input(data, basis.name())?;

    let mean = B::col_mean_2d(&data.data);
    let centered = B::broadcast_sub_1d_to_2d_rows(&data.data, &mean);
    let scatter = B::matmul(&B::transpose(&centered), &centered);

    let divisor = if rows > 1 { (rows - 1) as f64 } else { 1.0 };
    let covariance: Vec<f64> = B::to_vec_2d(&scatter)
        .into_iter()
        .map(|v| v / divisor)
        .collect();

    let SymmetricEigen {
        mut values,
        vectors,
        ..
    } = linalg::symmetric_eigen(&covariance, cols)?;

    let clamped = values.iter().filter(|&&v| v < 0.0).count();
    if clamped > 0 {
        log::warn!(
            "{}: clamped {} negative covariance eigenvalue(s) to zero",
            basis.name(),
            clamped
        );
        for v in values.iter_mut() {
            *v = v.max(0.0);
        }
    }

    log::debug!(
        "{}: fitted {} samples x {} features, eigenvalues {:?}",
        basis.name(),
        rows,
        cols,
        values
    );

    Ok(WhiteningParams {
        config: config.clone(),
        mean: B::to_vec_1d(&mean),
        eigenvalues: values,
        eigenvectors: vectors,
        n_features: cols,
    })
}

/// Fitted whitening state: params plus the backend-side matrices built from them.
#[derive(Clone, Debug)]
pub(crate) struct WhiteningCore<B: Backend> {
    pub(crate) params: WhiteningParams,
    pub(crate) mean: Tensor1D<B>,
    pub(crate) whiten: Tensor2D<B>,
    pub(crate) unwhiten: Tensor2D<B>,
}

impl<B: Backend> WhiteningCore<B> {
    /// Builds the whitening and inverse matrices for `basis`.
    pub(crate) fn build(params: WhiteningParams, basis: Basis) -> Result<Self, PreprocessingError> {
        params.config.validate()?;
        let n = params.n_features;
        check_param_lengths(
            basis.name(),
            n,
            &[
                ("mean", params.mean.len()),
                ("eigenvalues", params.eigenvalues.len()),
            ],
        )?;
        if params.eigenvectors.len() != n * n {
            return Err(PreprocessingError::InvalidParameter(format!(
                "{} params: `eigenvectors` has {} entries, expected {}",
                basis.name(),
                params.eigenvectors.len(),
                n * n
            )));
        }
        check_finite_params(
            basis.name(),
            &[
                ("mean", params.mean.as_slice()),
                ("eigenvectors", params.eigenvectors.as_slice()),
            ],
        )?;

        let mut inv_sqrt = Vec::with_capacity(n);
        let mut sqrt = Vec::with_capacity(n);
        for &lambda in &params.eigenvalues {
            let regularized = lambda + params.config.epsilon;
            if regularized <= 0.0 || !regularized.is_finite() {
                return Err(PreprocessingError::NumericalError(format!(
                    "{}: covariance eigenvalue {} is not positive after adding epsilon {}; \
                     the covariance is singular, increase epsilon",
                    basis.name(),
                    lambda,
                    params.config.epsilon
                )));
            }
            let root = regularized.sqrt();
            sqrt.push(root);
            inv_sqrt.push(1.0 / root);
        }

        let v = &params.eigenvectors;
        let (whiten, unwhiten) = match basis {
            // W = V·diag(1/√λ), W⁻¹ = diag(√λ)·Vᵀ
            Basis::Pca => (
                linalg::scale_columns(v, &inv_sqrt, n),
                linalg::transpose(&linalg::scale_columns(v, &sqrt, n), n),
            ),
            // W = V·diag(1/√λ)·Vᵀ, W⁻¹ = V·diag(√λ)·Vᵀ
            Basis::Zca => (
                linalg::matmul_transpose_b(&linalg::scale_columns(v, &inv_sqrt, n), v, n),
                linalg::matmul_transpose_b(&linalg::scale_columns(v, &sqrt, n), v, n),
            ),
        };

        Ok(Self {
            mean: Tensor1D::new(params.mean.clone()),
            whiten: Tensor2D::new(whiten, n, n),
            unwhiten: Tensor2D::new(unwhiten, n, n),
            params,
        })
    }

    pub(crate) fn transform(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        check_n_features(data, self.params.n_features)?;
        let centered = B::broadcast_sub_1d_to_2d_rows(&data.data, &self.mean.data);
        Ok(Tensor2D::from_raw(B::matmul(&centered, &self.whiten.data)))
    }

    pub(crate) fn inverse_transform(
        &self,
        data: &Tensor2D<B>,
    ) -> Result<Tensor2D<B>, PreprocessingError> {
        check_n_features(data, self.params.n_features)?;
        let rotated = B::matmul(&data.data, &self.unwhiten.data);
        Ok(Tensor2D::from_raw(B::broadcast_add_1d_to_2d_rows(
            &rotated,
            &self.mean.data,
        )))
    }
}

/// Sample covariance of row-major `values`, used by the whitening tests.
#[cfg(test)]
pub(crate) fn sample_covariance(values: &[f64], rows: usize, cols: usize) -> Vec<f64> {
    let mut mean = vec![0.0; cols];
    for row in values.chunks_exact(cols) {
        for (m, x) in mean.iter_mut().zip(row) {
            *m += x / rows as f64;
        }
    }
    let mut cov = vec![0.0; cols * cols];
    for row in values.chunks_exact(cols) {
        for i in 0..cols {
            for j in 0..cols {
                cov[i * cols + j] += (row[i] - mean[i]) * (row[j] - mean[j]) / (rows - 1) as f64;
            }
        }
    }
    cov
}
