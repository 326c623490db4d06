//! Covariance and eigendecomposition for PCA

use ndarray::{Array1, Array2, Axis};

/// Eigenpairs of a symmetric matrix, sorted by descending eigenvalue
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    /// Eigenvalues, descending
    pub eigenvalues: Array1<f64>,
    /// Eigenvectors as columns, matching the eigenvalue order
    pub eigenvectors: Array2<f64>,
}

impl EigenDecomposition {
    /// Decompose a symmetric matrix by power iteration with deflation.
    ///
    /// Each dominant eigenpair is extracted in turn and removed from the
    /// matrix (A ← A − λ v vᵀ) before finding the next one. Adequate for the
    /// small covariance matrices this analysis works with.
    pub fn from_symmetric(matrix: &Array2<f64>) -> Self {
        let n = matrix.nrows();
        let mut eigenvalues = Array1::zeros(n);
        let mut eigenvectors = Array2::zeros((n, n));
        let mut deflated = matrix.clone();

        for i in 0..n {
            let (value, vector) = power_iteration(&deflated, 500, 1e-12);
            eigenvalues[i] = value;
            eigenvectors.column_mut(i).assign(&vector);

            let outer = outer_product(&vector, &vector);
            deflated = deflated - value * outer;
        }

        // Deflation already yields a roughly descending order; sort to make
        // it exact
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            eigenvalues[b]
                .partial_cmp(&eigenvalues[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let sorted_values = Array1::from_iter(order.iter().map(|&i| eigenvalues[i]));
        let mut sorted_vectors = Array2::zeros((n, n));
        for (new_col, &old_col) in order.iter().enumerate() {
            sorted_vectors
                .column_mut(new_col)
                .assign(&eigenvectors.column(old_col));
        }

        Self {
            eigenvalues: sorted_values,
            eigenvectors: sorted_vectors,
        }
    }
}

/// Dominant eigenpair of a symmetric matrix by power iteration
fn power_iteration(matrix: &Array2<f64>, max_iter: usize, tol: f64) -> (f64, Array1<f64>) {
    let n = matrix.nrows();
    let mut v = Array1::from_elem(n, 1.0 / (n as f64).sqrt());
    let mut eigenvalue = 0.0;

    for _ in 0..max_iter {
        let av = matrix.dot(&v);

        // Rayleigh quotient with the unit-norm previous iterate
        let next_eigenvalue = v.dot(&av);

        let norm = av.dot(&av).sqrt();
        let next_v = if norm > 1e-12 { av / norm } else { av };

        if (next_eigenvalue - eigenvalue).abs() < tol {
            return (next_eigenvalue, next_v);
        }

        eigenvalue = next_eigenvalue;
        v = next_v;
    }

    (eigenvalue, v)
}

/// Outer product v · wᵀ
fn outer_product(v: &Array1<f64>, w: &Array1<f64>) -> Array2<f64> {
    let n = v.len();
    let m = w.len();
    let mut result = Array2::zeros((n, m));

    for i in 0..n {
        for j in 0..m {
            result[[i, j]] = v[i] * w[j];
        }
    }

    result
}

/// Sample covariance matrix of a data matrix (rows = observations)
pub fn covariance_matrix(data: &Array2<f64>) -> Array2<f64> {
    let n = data.nrows() as f64;
    let mean = data.mean_axis(Axis(0)).unwrap();
    let centered = data - &mean;

    centered.t().dot(&centered) / (n - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_eigen_decomposition_trace() {
        let matrix = array![[4.0, 2.0], [2.0, 3.0]];
        let eigen = EigenDecomposition::from_symmetric(&matrix);

        // Descending order and trace preservation
        assert!(eigen.eigenvalues[0] >= eigen.eigenvalues[1]);
        assert!((eigen.eigenvalues.sum() - 7.0).abs() < 1e-3);
    }

    #[test]
    fn test_eigenvectors_unit_norm() {
        let matrix = array![[2.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 1.0]];
        let eigen = EigenDecomposition::from_symmetric(&matrix);

        for c in 0..3 {
            let col = eigen.eigenvectors.column(c);
            let norm: f64 = col.iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-4);
        }

        // Diagonal matrix: largest eigenvalue is 5
        assert!((eigen.eigenvalues[0] - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_covariance_matrix_symmetry() {
        let data = array![[1.0, 2.0], [3.0, 4.0], [5.0, 7.0]];
        let cov = covariance_matrix(&data);

        assert_eq!(cov.shape(), &[2, 2]);
        assert!((cov[[0, 1]] - cov[[1, 0]]).abs() < 1e-12);
        // Variances on the diagonal are non-negative
        assert!(cov[[0, 0]] >= 0.0);
        assert!(cov[[1, 1]] >= 0.0);
    }
}
