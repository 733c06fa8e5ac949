use super::Backend;
use ndarray::{Array1, Array2, Axis};

/// Tensor backend built on the `ndarray` crate.
///
/// # Type mappings
/// - `Scalar`: `f64`
/// - `Tensor1D`: `ndarray::Array1<f64>`
/// - `Tensor2D`: [`NdarrayTensor2D`], a wrapper around `ndarray::Array2<f64>`
#[derive(Clone, Debug, Copy)]
pub struct NdarrayBackend;

/// Wrapper type for 2D tensors using ndarray's `Array2<f64>`.
///
/// # Example
/// ```
/// use scaling_rs::backend::NdarrayTensor2D;
///
/// let tensor = NdarrayTensor2D::from(&[
///     vec![1.0f64, 2.0, 3.0],
///     vec![4.0f64, 5.0, 6.0],
/// ][..]);
/// assert_eq!(tensor.0.shape(), &[2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct NdarrayTensor2D(pub Array2<f64>);

impl From<&[Vec<f64>]> for NdarrayTensor2D {
    /// Converts a slice of row vectors into a 2D tensor.
    ///
    /// # Panics
    /// Panics if rows have inconsistent lengths.
    fn from(x: &[Vec<f64>]) -> Self {
        let rows = x.len();
        let cols = x.first().map_or(0, Vec::len);
        assert!(
            x.iter().all(|r| r.len() == cols),
            "All rows must have same length"
        );
        let data: Vec<f64> = x.iter().flat_map(|r| r.iter()).copied().collect();
        NdarrayBackend::from_vec_2d(data, rows, cols)
    }
}

impl From<Array2<f64>> for NdarrayTensor2D {
    fn from(a: Array2<f64>) -> Self {
        NdarrayTensor2D(a)
    }
}

impl Backend for NdarrayBackend {
    type Scalar = f64;
    type Tensor1D = Array1<f64>;
    type Tensor2D = NdarrayTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        Array1::zeros(len)
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        NdarrayTensor2D(Array2::zeros((rows, cols)))
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        Array1::from_vec(data)
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        let array = Array2::from_shape_vec((rows, cols), data)
            .unwrap_or_else(|e| panic!("Inconsistent shape: {}", e));
        NdarrayTensor2D(array)
    }

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.to_vec()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        // iter() walks in logical row-major order regardless of memory layout
        t.0.iter().copied().collect()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        t.0.dim()
    }

    fn all_finite_2d(t: &Self::Tensor2D) -> bool {
        t.0.iter().all(|x| x.is_finite())
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a - b
    }

    fn add_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 + *s)
    }

    fn abs_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        NdarrayTensor2D(t.0.mapv(f64::abs))
    }

    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.0.mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(t.0.ncols()))
    }

    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D {
        if t.0.nrows() <= ddof {
            return Array1::zeros(t.0.ncols());
        }
        t.0.std_axis(Axis(0), ddof as f64)
    }

    fn col_min_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.0.fold_axis(Axis(0), f64::INFINITY, |&acc, &x| acc.min(x))
    }

    fn col_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.0.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &x| acc.max(x))
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 - &v.view().insert_axis(Axis(0)))
    }

    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 + &v.view().insert_axis(Axis(0)))
    }

    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 * &v.view().insert_axis(Axis(0)))
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 / &v.view().insert_axis(Axis(0)))
    }

    fn transpose(t: &Self::Tensor2D) -> Self::Tensor2D {
        NdarrayTensor2D(t.0.t().to_owned())
    }

    fn matmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        NdarrayTensor2D(a.0.dot(&b.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor2d_from(data: &[Vec<f64>]) -> NdarrayTensor2D {
        NdarrayTensor2D::from(data)
    }

    #[test]
    fn test_from_vec_2d_row_major() {
        let t = NdarrayBackend::from_vec_2d(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        assert_eq!(t.0[[0, 2]], 3.0);
        assert_eq!(t.0[[1, 0]], 4.0);
        assert_eq!(NdarrayBackend::to_vec_2d(&t), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    #[should_panic(expected = "Inconsistent shape")]
    fn test_from_vec_2d_rejects_bad_length() {
        NdarrayBackend::from_vec_2d(vec![1.0, 2.0, 3.0], 2, 2);
    }

    #[test]
    fn test_to_vec_2d_after_transpose() {
        let t = tensor2d_from(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let tt = NdarrayBackend::transpose(&t);
        assert_eq!(NdarrayBackend::to_vec_2d(&tt), vec![1.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    fn test_col_reductions() {
        let t = tensor2d_from(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert_eq!(NdarrayBackend::col_mean_2d(&t).to_vec(), vec![3.0, 4.0]);
        assert_eq!(NdarrayBackend::col_min_2d(&t).to_vec(), vec![1.0, 2.0]);
        assert_eq!(NdarrayBackend::col_max_2d(&t).to_vec(), vec![5.0, 6.0]);
        let std = NdarrayBackend::col_std_2d(&t, 1);
        assert!((std[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_broadcast_and_matmul() {
        let t = tensor2d_from(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let v = Array1::from_vec(vec![1.0, 2.0]);
        let centered = NdarrayBackend::broadcast_sub_1d_to_2d_rows(&t, &v);
        assert_eq!(NdarrayBackend::to_vec_2d(&centered), vec![0.0, 0.0, 2.0, 2.0]);

        let id = tensor2d_from(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
        let prod = NdarrayBackend::matmul(&t, &id);
        assert_eq!(NdarrayBackend::to_vec_2d(&prod), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_empty_rows() {
        let t = NdarrayBackend::zeros_2d(0, 2);
        assert_eq!(NdarrayBackend::shape(&t), (0, 2));
        assert_eq!(NdarrayBackend::col_mean_2d(&t).to_vec(), vec![0.0, 0.0]);
    }
}
