use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use crate::preprocessing::error::PreprocessingError;
use std::marker::PhantomData;

/// Backend-typed 2D tensor: the dataset type every scaler consumes.
///
/// Row-major, one sample per row, one feature per column.
///
/// # Example
/// ```
/// use scaling_rs::backend::{CpuBackend, Tensor2D};
///
/// // A column vector of five samples with a single feature
/// let x = Tensor2D::<CpuBackend>::from_column(&[1.0, 2.0, 3.0, 4.0, 5.0]);
/// assert_eq!(x.shape(), (5, 1));
/// ```
#[derive(Clone)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor2D<B> {
    /// Creates a tensor from row-major host values.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`. Use [`Tensor2D::try_new`] for a checked
    /// constructor.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        Self::from_raw(B::from_vec_2d(data, rows, cols))
    }

    /// Checked variant of [`Tensor2D::new`].
    pub fn try_new(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self, PreprocessingError> {
        if data.len() != rows * cols {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} values for ({}, {})", rows * cols, rows, cols),
                got: format!("{} values", data.len()),
            });
        }
        Ok(Self::new(data, rows, cols))
    }

    /// Creates an `(n, 1)` tensor holding a single feature.
    pub fn from_column(values: &[f64]) -> Self {
        Self::new(values.to_vec(), values.len(), 1)
    }

    /// Creates a tensor filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_raw(B::zeros_2d(rows, cols))
    }

    pub(crate) fn from_raw(data: B::Tensor2D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        B::shape(&self.data)
    }

    /// Copies the tensor to host memory in row-major order.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_2d(&self.data)
    }

    /// Per-column mean.
    pub fn col_mean(&self) -> Tensor1D<B> {
        Tensor1D::from_raw(B::col_mean_2d(&self.data))
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        Self::from_raw(B::transpose(&self.data))
    }

    /// Matrix product `self · other`.
    ///
    /// # Panics
    /// If `self.cols() != other.rows()`.
    pub fn matmul(&self, other: &Self) -> Self {
        Self::from_raw(B::matmul(&self.data, &other.data))
    }

    /// Returns `true` if every element is finite.
    pub fn is_finite(&self) -> bool {
        B::all_finite_2d(&self.data)
    }
}

impl<B: Backend> std::fmt::Debug for Tensor2D<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tensor2D")
            .field("shape", &self.shape())
            .field("data", &self.to_vec())
            .finish()
    }
}
