//! # scaling-rs
//!
//! Feature scaling for numerical machine learning, with pluggable backends and
//! a strict split between fitting and inference.
//!
//! ## Core Design Principles
//!
//! - **Fit/Inference Separation**: unfitted scalers carry hyperparameters only;
//!   `fit` produces a separate fitted type holding the learned parameters.
//! - **Runtime Selection**: [`ScalingModel`] owns one fitted scaler chosen by a
//!   [`ScalerType`] tag and reports `NotFitted` instead of guessing.
//! - **Backend Agnosticism**: the `Backend` trait lets the same scalers run on
//!   a pure-Rust buffer or on `ndarray`.
//! - **Plain Parameters**: fitted state exports to serde structs of `f64`, so
//!   models are saved and reloaded without loss.
//!
//! ## Quick Start
//!
//! ```rust
//! use scaling_rs::backend::{CpuBackend, Tensor2D};
//! use scaling_rs::{ScalerType, ScalingModel};
//!
//! // 4 samples, 2 features
//! let data = Tensor2D::<CpuBackend>::new(vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0, 4.0, 40.0], 4, 2);
//!
//! let mut model =
//!     ScalingModel::<CpuBackend>::default().with_scaler_type(ScalerType::MaxAbsScaler);
//! let scaled = model.fit_transform(&data).unwrap();
//! assert_eq!(scaled.to_vec(), vec![0.25, 0.25, 0.5, 0.5, 0.75, 0.75, 1.0, 1.0]);
//!
//! let restored = model.inverse_transform(&scaled).unwrap();
//! assert_eq!(restored.to_vec(), data.to_vec());
//! ```
//!
//! ## Module Structure
//!
//! - `backend`: Tensor abstractions and computation primitives (`Tensor1D`, `Tensor2D`)
//! - `linalg`: Symmetric eigendecomposition used by the whitening scalers
//! - `preprocessing`: The scalers, their traits and the `ScalingModel`
//! - `serialization`: Byte encoding of fitted parameters

pub mod backend;

/// Dense linear algebra for whitening.
pub mod linalg;

/// Feature scaling transformers.
pub mod preprocessing;

/// Parameter persistence.
pub mod serialization;

/// Re-export of core backend types for convenient usage.
pub use backend::{Backend, ScalarOps, Tensor1D, Tensor2D};

#[cfg(feature = "cpu")]
pub use backend::CpuBackend;

pub use preprocessing::{
    FittedTransformer, PreprocessingError, ScalerType, ScalingModel, ScalingModelConfig,
    Transformer,
};
