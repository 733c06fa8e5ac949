//! Scaling transformers for feature normalization.
//!
//! # Available Transformers
//!
//! | Transformer | Description | Use Case |
//! |-------------|-------------|----------|
//! | [`StandardScaler`] | Z-score normalization (mean=0, std=1) | Default choice for most algorithms |
//! | [`MinMaxScaler`] | Scale to [0, 1] or custom range | When bounded output is needed |
//! | [`MaxAbsScaler`] | Scale by max absolute value | Sparse data |
//! | [`MeanNormalization`] | Center on the mean, divide by the range | Zero-centred, range-bounded features |
//! | [`PcaWhitening`] | Rotate onto principal axes, unit variance | Decorrelated inputs |
//! | [`ZcaWhitening`] | PCA whitening rotated back to input axes | Decorrelated inputs that stay close to the originals |
//!
//! # Example
//!
//! ```
//! use scaling_rs::backend::{CpuBackend, Tensor2D};
//! use scaling_rs::preprocessing::{FittedTransformer, MaxAbsScaler, Transformer};
//!
//! let data = Tensor2D::<CpuBackend>::new(vec![-2.0, 1.0, 4.0, -0.5], 2, 2);
//! let fitted = MaxAbsScaler::<CpuBackend>::new().fit(&data).unwrap();
//! assert_eq!(fitted.transform(&data).unwrap().to_vec(), vec![-0.5, 1.0, 1.0, -0.5]);
//! ```

pub mod maxabs;
pub mod mean_normalization;
pub mod minmax;
pub mod pca_whitening;
pub mod standard;
pub mod zca_whitening;

mod whitening;

pub use maxabs::{FittedMaxAbsScaler, MaxAbsScaler, MaxAbsScalerParams};
pub use mean_normalization::{
    FittedMeanNormalization, MeanNormalization, MeanNormalizationParams,
};
pub use minmax::{FittedMinMaxScaler, MinMaxScaler, MinMaxScalerConfig, MinMaxScalerParams};
pub use pca_whitening::{FittedPcaWhitening, PcaWhitening, PcaWhiteningParams};
pub use standard::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
pub use whitening::{WhiteningConfig, WhiteningParams, DEFAULT_EPSILON};
pub use zca_whitening::{FittedZcaWhitening, ZcaWhitening, ZcaWhiteningParams};

use crate::backend::{Backend, Tensor2D};
use crate::preprocessing::error::PreprocessingError;

/// Rejects empty or non-finite training data; returns its shape.
pub(crate) fn validate_fit_input<B: Backend>(
    data: &Tensor2D<B>,
    scaler: &str,
) -> Result<(usize, usize), PreprocessingError> {
    let (rows, cols) = data.shape();

    if rows == 0 || cols == 0 {
        return Err(PreprocessingError::EmptyData(format!(
            "Cannot fit {} on empty data",
            scaler
        )));
    }

    if !data.is_finite() {
        return Err(PreprocessingError::MissingValues(format!(
            "{} requires finite training data",
            scaler
        )));
    }

    Ok((rows, cols))
}

/// Rejects inputs whose column count differs from the fitted one.
pub(crate) fn check_n_features<B: Backend>(
    data: &Tensor2D<B>,
    n_features: usize,
) -> Result<(), PreprocessingError> {
    let (_, cols) = data.shape();
    if cols != n_features {
        return Err(PreprocessingError::FeatureMismatch {
            expected_features: n_features,
            got_features: cols,
        });
    }
    Ok(())
}

/// Checks that every restored parameter vector has one entry per feature.
pub(crate) fn check_param_lengths(
    scaler: &str,
    n_features: usize,
    vectors: &[(&str, usize)],
) -> Result<(), PreprocessingError> {
    for &(name, len) in vectors {
        if len != n_features {
            return Err(PreprocessingError::InvalidParameter(format!(
                "{} params: `{}` has {} entries, expected {}",
                scaler, name, len, n_features
            )));
        }
    }
    Ok(())
}

/// Rejects restored parameter vectors holding NaN or infinite entries.
pub(crate) fn check_finite_params(
    scaler: &str,
    vectors: &[(&str, &[f64])],
) -> Result<(), PreprocessingError> {
    for &(name, values) in vectors {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "{} params: `{}` must be finite",
                scaler, name
            )));
        }
    }
    Ok(())
}

/// Rejects restored divisors that are not finite and strictly positive.
pub(crate) fn check_divisors(
    scaler: &str,
    name: &str,
    values: &[f64],
) -> Result<(), PreprocessingError> {
    if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(PreprocessingError::InvalidParameter(format!(
            "{} params: `{}` must be finite and positive",
            scaler, name
        )));
    }
    Ok(())
}

/// Replaces zero divisors (constant features) by 1.
pub(crate) fn nonzero_scale(values: Vec<f64>, scaler: &str) -> Vec<f64> {
    let constant = values.iter().filter(|&&v| v == 0.0).count();
    if constant > 0 {
        log::warn!(
            "{}: {} constant feature(s), leaving them unscaled",
            scaler,
            constant
        );
    }
    values
        .into_iter()
        .map(|v| if v == 0.0 { 1.0 } else { v })
        .collect()
}
