//! Feature scaling transformers and the runtime-selected [`ScalingModel`].
//!
//! # Design
//!
//! - **Fit/inference split**: an unfitted transformer only carries
//!   hyperparameters; `fit` returns a separate fitted type.
//! - **Backend agnostic**: every transformer works with any `Backend`.
//! - **Serializable**: fitted transformers export a plain params struct that
//!   can be saved and loaded.
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer with hyperparameters
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//!
//! # Available Transformers
//!
//! - [`StandardScaler`]: Z-score normalization
//! - [`MinMaxScaler`]: Scale to [0, 1] or custom range
//! - [`MeanNormalization`]: Center on the mean, divide by the range
//! - [`MaxAbsScaler`]: Scale by maximum absolute value
//! - [`PcaWhitening`]: Decorrelate onto principal axes with unit variance
//! - [`ZcaWhitening`]: Decorrelate while staying close to the input axes
//!
//! [`ScalingModel`] picks one of them at runtime from a [`ScalerType`] tag.
//!
//! # Example
//!
//! ```no_run
//! use scaling_rs::backend::{CpuBackend, Tensor2D};
//! use scaling_rs::preprocessing::{ScalerType, ScalingModel};
//!
//! # fn main() -> Result<(), scaling_rs::preprocessing::PreprocessingError> {
//! let training_data = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 5.0], 2, 2);
//!
//! let mut model = ScalingModel::<CpuBackend>::default()
//!     .with_scaler_type("standard_scaler".parse::<ScalerType>()?);
//! model.fit(&training_data)?;
//!
//! // Save for later use
//! model.save_to_file("scaler.bin")?;
//!
//! // Later, load and transform new data
//! let loaded = ScalingModel::<CpuBackend>::load_from_file("scaler.bin")?;
//! let scaled = loaded.transform(&training_data)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod scaling;
pub mod scaling_model;
pub mod traits;

// Re-export main types
pub use error::PreprocessingError;
pub use scaling::{
    FittedMaxAbsScaler, FittedMeanNormalization, FittedMinMaxScaler, FittedPcaWhitening,
    FittedStandardScaler, FittedZcaWhitening, MaxAbsScaler, MaxAbsScalerParams,
    MeanNormalization, MeanNormalizationParams, MinMaxScaler, MinMaxScalerConfig,
    MinMaxScalerParams, PcaWhitening, PcaWhiteningParams, StandardScaler, StandardScalerConfig,
    StandardScalerParams, WhiteningConfig, WhiteningParams, ZcaWhitening, ZcaWhiteningParams,
};
pub use scaling_model::{
    FittedScaler, ScalerParams, ScalerType, ScalingModel, ScalingModelConfig, ScalingModelParams,
    UnfittedScaler,
};
pub use traits::{FittedTransformer, Transformer};
