use super::Backend;

/// Pure-Rust CPU backend.
///
/// 1D tensors are plain `Vec<f64>`; 2D tensors are [`CpuTensor2D`], a flat
/// row-major buffer with its shape.
#[derive(Clone, Debug, Copy)]
pub struct CpuBackend;

/// Row-major 2D buffer: `(data, rows, cols)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTensor2D(pub Vec<f64>, pub usize, pub usize);

impl CpuTensor2D {
    /// Wraps a row-major buffer.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Self(data, rows, cols)
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.iter().map(|&x| f(x)).collect(), self.1, self.2)
    }

    fn broadcast_rows(&self, v: &[f64], f: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!(v.len(), self.2, "Broadcast vector length must equal column count");
        let data = self
            .0
            .chunks(self.2.max(1))
            .flat_map(|row| row.iter().zip(v.iter()).map(|(&x, &y)| f(x, y)))
            .collect();
        Self(data, self.1, self.2)
    }

    fn fold_columns(&self, init: f64, f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
        let mut acc = vec![init; self.2];
        for row in self.0.chunks(self.2.max(1)) {
            for (a, &x) in acc.iter_mut().zip(row.iter()) {
                *a = f(*a, x);
            }
        }
        acc
    }
}

impl From<&[Vec<f64>]> for CpuTensor2D {
    fn from(x: &[Vec<f64>]) -> Self {
        if x.is_empty() {
            return CpuTensor2D::new(Vec::new(), 0, 0);
        }
        let rows = x.len();
        let cols = x[0].len();
        assert!(
            x.iter().all(|row| row.len() == cols),
            "All rows must have same length"
        );
        let data: Vec<f64> = x.iter().flat_map(|row| row.iter()).copied().collect();
        CpuTensor2D::new(data, rows, cols)
    }
}

impl Backend for CpuBackend {
    type Scalar = f64;
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.0; len]
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(vec![0.0; rows * cols], rows, cols)
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        data
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data, rows, cols)
    }

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.0.clone()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        (t.1, t.2)
    }

    fn all_finite_2d(t: &Self::Tensor2D) -> bool {
        t.0.iter().all(|x| x.is_finite())
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a.iter().zip(b.iter()).map(|(a, b)| a - b).collect()
    }

    fn add_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D {
        t.map(|x| x + s)
    }

    fn abs_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        t.map(f64::abs)
    }

    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        if t.1 == 0 {
            return vec![0.0; t.2];
        }
        let n = t.1 as f64;
        t.fold_columns(0.0, |acc, x| acc + x)
            .into_iter()
            .map(|s| s / n)
            .collect()
    }

    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D {
        if t.1 <= ddof {
            return vec![0.0; t.2];
        }
        let means = Self::col_mean_2d(t);
        let mut var_sum = vec![0.0; t.2];
        for row in t.0.chunks(t.2.max(1)) {
            for ((acc, &x), &m) in var_sum.iter_mut().zip(row.iter()).zip(means.iter()) {
                *acc += (x - m) * (x - m);
            }
        }
        let divisor = (t.1 - ddof) as f64;
        var_sum.into_iter().map(|v| (v / divisor).sqrt()).collect()
    }

    fn col_min_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.fold_columns(f64::INFINITY, f64::min)
    }

    fn col_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.fold_columns(f64::NEG_INFINITY, f64::max)
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.broadcast_rows(v, |x, y| x - y)
    }

    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.broadcast_rows(v, |x, y| x + y)
    }

    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.broadcast_rows(v, |x, y| x * y)
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.broadcast_rows(v, |x, y| x / y)
    }

    fn transpose(t: &Self::Tensor2D) -> Self::Tensor2D {
        let (rows, cols) = (t.1, t.2);
        let mut data = vec![0.0; rows * cols];
        for i in 0..rows {
            for j in 0..cols {
                data[j * rows + i] = t.0[i * cols + j];
            }
        }
        CpuTensor2D(data, cols, rows)
    }

    fn matmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        let (m, k) = (a.1, a.2);
        let (k2, n) = (b.1, b.2);
        assert_eq!(k, k2, "matmul: inner dimensions differ ({} vs {})", k, k2);

        let mut data = vec![0.0; m * n];
        for i in 0..m {
            for p in 0..k {
                let aip = a.0[i * k + p];
                if aip == 0.0 {
                    continue;
                }
                for j in 0..n {
                    data[i * n + j] += aip * b.0[p * n + j];
                }
            }
        }
        CpuTensor2D(data, m, n)
    }
}
