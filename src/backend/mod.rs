//! # Backend Abstraction
//!
//! Trait-based abstraction over the numeric storage used by the scalers, so the
//! same transformer code runs on a pure-Rust buffer or on `ndarray` arrays.
//!
//! ## Available Backends
//!
//! | Backend          | Feature   | Use Case                          |
//! |------------------|-----------|-----------------------------------|
//! | `CpuBackend`     | `cpu`     | Default, pure-Rust implementation |
//! | `NdarrayBackend` | `ndarray` | Interop with `ndarray` ecosystem  |
//!
//! ## Example
//!
//! ```rust
//! use scaling_rs::backend::{CpuBackend, Tensor2D};
//!
//! // 3 samples, 2 features, row-major
//! let x: Tensor2D<CpuBackend> = Tensor2D::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
//! assert_eq!(x.shape(), (3, 2));
//! assert_eq!(x.col_mean().to_vec(), vec![3.0, 4.0]);
//! ```
//!
//! ## Implementing a New Backend
//!
//! 1. Create a module behind a feature gate.
//! 2. Pick concrete 1D/2D storage types.
//! 3. Implement [`Backend`] for a zero-sized marker type.
//! 4. Re-export the marker type from this module.
//!
//! See `cpu.rs` for the reference implementation.

#[cfg(feature = "cpu")]
mod cpu;
#[cfg(feature = "cpu")]
/// Pure-Rust CPU backend implementation with zero external dependencies.
pub use cpu::{CpuBackend, CpuTensor2D};

#[cfg(feature = "ndarray")]
mod ndarray_backend;
#[cfg(feature = "ndarray")]
/// Backend backed by the `ndarray` crate for ecosystem interoperability.
pub use ndarray_backend::{NdarrayBackend, NdarrayTensor2D};

/// Scalar value operations.
pub mod scalar;
/// One-dimensional tensor abstraction.
pub mod tensor1d;
/// Two-dimensional tensor abstraction.
pub mod tensor2d;

pub use scalar::ScalarOps;
pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Abstraction over tensor storage and the operations the scalers need.
///
/// All 2D tensors are row-major with one sample per row and one feature per
/// column. Column reductions therefore produce one value per feature, and the
/// `broadcast_*_1d_to_2d_rows` family applies a per-feature vector to every row.
///
/// # Shape checking
///
/// Element-wise and broadcasting operations assume compatible shapes and may
/// panic otherwise. Transformers validate feature counts before calling into
/// the backend, so these panics indicate a bug rather than bad user input.
///
/// # Example Implementation Sketch
///
/// ```ignore
/// use scaling_rs::backend::{Backend, ScalarOps};
///
/// #[derive(Clone, Copy, Debug)]
/// struct MyBackend;
///
/// impl Backend for MyBackend {
///     type Scalar = f64;
///     type Tensor1D = Vec<f64>;
///     type Tensor2D = MyMatrix;
///     // ... implement all required methods
/// }
/// ```
pub trait Backend: Clone + Copy + Send + Sync + 'static {
    /// Scalar type supporting arithmetic operations.
    type Scalar: ScalarOps;

    /// One-dimensional tensor type.
    type Tensor1D: Clone + Send + Sync;

    /// Two-dimensional tensor type.
    type Tensor2D: Clone + Send + Sync;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros of given length.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Creates a 2D tensor filled with zeros of given dimensions.
    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major ordered data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D;

    /// Creates a backend-specific scalar from an f64 value.
    fn scalar_f64(value: f64) -> Self::Scalar;

    // --- Data access ---

    /// Copies a 1D tensor to host memory.
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64>;

    /// Copies a 2D tensor to host memory in row-major order.
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64>;

    /// Returns the number of elements in a 1D tensor.
    fn len_1d(t: &Self::Tensor1D) -> usize;

    /// Returns the shape of a 2D tensor as (rows, cols).
    fn shape(t: &Self::Tensor2D) -> (usize, usize);

    /// Returns `true` if no element is NaN or infinite.
    fn all_finite_2d(t: &Self::Tensor2D) -> bool;

    // --- Element-wise operations ---

    /// Element-wise subtraction of two 1D tensors.
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Adds a scalar to each element of a 2D tensor.
    fn add_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D;

    /// Element-wise absolute value of a 2D tensor.
    fn abs_2d(t: &Self::Tensor2D) -> Self::Tensor2D;

    // --- Column-wise reductions ---

    /// Mean of each column. Returns a tensor of length `cols`.
    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Standard deviation of each column.
    ///
    /// `ddof` is the delta degrees of freedom (0 for population std, 1 for
    /// sample std). Columns with `rows <= ddof` yield 0.
    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D;

    /// Minimum of each column.
    fn col_min_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Maximum of each column.
    fn col_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    // --- Broadcasting operations ---

    /// `result[i, j] = t[i, j] - v[j]`
    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// `result[i, j] = t[i, j] + v[j]`
    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// `result[i, j] = t[i, j] * v[j]`
    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// `result[i, j] = t[i, j] / v[j]`
    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    // --- Linear algebra ---

    /// Returns the transpose of a 2D tensor.
    fn transpose(t: &Self::Tensor2D) -> Self::Tensor2D;

    /// Matrix product `a · b`.
    ///
    /// # Panics
    /// If `a.cols() != b.rows()`.
    fn matmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;
}
