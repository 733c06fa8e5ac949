//! Dense linear algebra on host buffers.
//!
//! The whitening scalers need the eigendecomposition of a small `d×d`
//! covariance matrix (`d` = number of features). That matrix is brought to
//! host memory once per fit, decomposed here with the cyclic Jacobi method,
//! and the resulting whitening matrices are handed back to the backend.
//!
//! All matrices are square, row-major `Vec<f64>` of length `n * n`.

use crate::preprocessing::error::PreprocessingError;

const MAX_SWEEPS: usize = 50;
const TOL: f64 = 1e-14;

/// Eigendecomposition of a symmetric matrix: `A = V · diag(values) · Vᵀ`.
#[derive(Clone, Debug, PartialEq)]
pub struct SymmetricEigen {
    /// Eigenvalues, sorted in descending order.
    pub values: Vec<f64>,
    /// Eigenvectors stored as columns of a row-major `n×n` matrix; column `k`
    /// belongs to `values[k]`.
    pub vectors: Vec<f64>,
    /// Matrix order.
    pub n: usize,
}

impl SymmetricEigen {
    /// Returns eigenvector `k` as an owned vector.
    pub fn vector(&self, k: usize) -> Vec<f64> {
        (0..self.n).map(|r| self.vectors[r * self.n + k]).collect()
    }
}

/// Eigendecomposition of a symmetric `n×n` row-major matrix.
///
/// Only the upper triangle drives the rotations; the input is assumed
/// symmetric. Eigenvalues come back sorted descending with their
/// eigenvectors permuted alongside.
///
/// # Errors
/// [`PreprocessingError::InvalidShape`] if `matrix.len() != n * n` or `n == 0`,
/// [`PreprocessingError::MissingValues`] if the matrix is not finite,
/// [`PreprocessingError::NumericalError`] if the rotations do not converge.
///
/// # Example
/// ```
/// use scaling_rs::linalg::symmetric_eigen;
///
/// let eig = symmetric_eigen(&[2.0, 1.0, 1.0, 2.0], 2).unwrap();
/// assert!((eig.values[0] - 3.0).abs() < 1e-12);
/// assert!((eig.values[1] - 1.0).abs() < 1e-12);
/// ```
pub fn symmetric_eigen(matrix: &[f64], n: usize) -> Result<SymmetricEigen, PreprocessingError> {
    if n == 0 || matrix.len() != n * n {
        return Err(PreprocessingError::InvalidShape {
            expected: format!("non-empty square matrix with {} values", n * n),
            got: format!("{} values", matrix.len()),
        });
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(PreprocessingError::MissingValues(
            "Cannot decompose a matrix with NaN or infinite entries".to_string(),
        ));
    }

    let mut a = matrix.to_vec();
    let mut v = identity(n);
    jacobi_sweeps(&mut a, &mut v, n)?;

    let values: Vec<f64> = (0..n).map(|i| a[i * n + i]).collect();
    Ok(sort_descending(values, v, n))
}

fn jacobi_sweeps(a: &mut [f64], v: &mut [f64], n: usize) -> Result<(), PreprocessingError> {
    // Off-diagonal tolerance is relative to the matrix norm.
    let norm = frobenius_norm(a);
    if norm == 0.0 {
        return Ok(());
    }
    let tol = TOL * norm;

    for sweep in 0..MAX_SWEEPS {
        let max_off = max_off_diagonal(a, n);
        if max_off <= tol {
            log::trace!("jacobi: converged after {} sweeps", sweep);
            return Ok(());
        }

        // Skip small pivots during the first sweeps.
        let threshold = if sweep < 4 {
            0.2 * max_off / (n * n) as f64
        } else {
            0.0
        };

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[p * n + q];
                if apq.abs() < threshold || apq == 0.0 {
                    continue;
                }
                rotate(a, v, n, p, q);
            }
        }
    }

    let max_off = max_off_diagonal(a, n);
    if max_off <= tol {
        return Ok(());
    }
    log::warn!(
        "jacobi: no convergence after {} sweeps, off-diagonal {:e} (norm {:e})",
        MAX_SWEEPS,
        max_off,
        norm
    );
    Err(PreprocessingError::NumericalError(format!(
        "eigendecomposition did not converge after {} sweeps",
        MAX_SWEEPS
    )))
}

fn frobenius_norm(a: &[f64]) -> f64 {
    a.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn max_off_diagonal(a: &[f64], n: usize) -> f64 {
    let mut max_off = 0.0_f64;
    for p in 0..n {
        for q in (p + 1)..n {
            max_off = max_off.max(a[p * n + q].abs());
        }
    }
    max_off
}

/// Annihilates `a[p][q]` with one Jacobi rotation, accumulated into `v`.
fn rotate(a: &mut [f64], v: &mut [f64], n: usize, p: usize, q: usize) {
    let apq = a[p * n + q];
    let diff = a[q * n + q] - a[p * n + p];

    let t = if diff.abs() < 1e-300 {
        apq.signum()
    } else {
        let theta = diff / (2.0 * apq);
        theta.signum() / (theta.abs() + (1.0 + theta * theta).sqrt())
    };
    let c = 1.0 / (1.0 + t * t).sqrt();
    let s = t * c;
    let tau = s / (1.0 + c);

    a[p * n + p] -= t * apq;
    a[q * n + q] += t * apq;
    a[p * n + q] = 0.0;
    a[q * n + p] = 0.0;

    for r in 0..n {
        if r == p || r == q {
            continue;
        }
        let arp = a[r * n + p];
        let arq = a[r * n + q];
        a[r * n + p] = arp - s * (arq + tau * arp);
        a[p * n + r] = a[r * n + p];
        a[r * n + q] = arq + s * (arp - tau * arq);
        a[q * n + r] = a[r * n + q];
    }

    for r in 0..n {
        let vrp = v[r * n + p];
        let vrq = v[r * n + q];
        v[r * n + p] = vrp - s * (vrq + tau * vrp);
        v[r * n + q] = vrq + s * (vrp - tau * vrq);
    }
}

fn sort_descending(values: Vec<f64>, vectors: Vec<f64>, n: usize) -> SymmetricEigen {
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| values[j].total_cmp(&values[i]));

    let mut sorted_vectors = vec![0.0; n * n];
    for (new_col, &old_col) in order.iter().enumerate() {
        for r in 0..n {
            sorted_vectors[r * n + new_col] = vectors[r * n + old_col];
        }
    }

    SymmetricEigen {
        values: order.iter().map(|&i| values[i]).collect(),
        vectors: sorted_vectors,
        n,
    }
}

/// The `n×n` identity matrix.
pub fn identity(n: usize) -> Vec<f64> {
    let mut m = vec![0.0; n * n];
    for i in 0..n {
        m[i * n + i] = 1.0;
    }
    m
}

/// `M · diag(d)`: scales column `j` of the `n×n` matrix `m` by `d[j]`.
pub fn scale_columns(m: &[f64], d: &[f64], n: usize) -> Vec<f64> {
    let mut out = m.to_vec();
    for row in out.chunks_exact_mut(n) {
        for (x, s) in row.iter_mut().zip(d) {
            *x *= s;
        }
    }
    out
}

/// `A · Bᵀ` for two `n×n` matrices.
pub fn matmul_transpose_b(a: &[f64], b: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n * n];
    for i in 0..n {
        let a_row = &a[i * n..(i + 1) * n];
        for j in 0..n {
            let b_row = &b[j * n..(j + 1) * n];
            out[i * n + j] = a_row.iter().zip(b_row).map(|(x, y)| x * y).sum();
        }
    }
    out
}

/// Transpose of an `n×n` matrix.
pub fn transpose(m: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            out[j * n + i] = m[i * n + j];
        }
    }
    out
}
