//! Feature preprocessing utilities

use ndarray::{Array1, Array2};

/// Scale each column to unit L2 norm.
///
/// Matches scikit-learn's `normalize(X, axis=0)`: a column whose norm
/// is zero is left unchanged (the divisor is treated as 1). Relative order
/// within a column is preserved since every entry is divided by the same
/// positive factor.
pub fn normalize_columns(data: &Array2<f64>) -> Array2<f64> {
    let norms = column_norms(data);

    let mut result = data.clone();
    let (n_rows, n_cols) = data.dim();

    for j in 0..n_cols {
        if norms[j] > 1e-10 {
            for i in 0..n_rows {
                result[[i, j]] /= norms[j];
            }
        }
    }

    result
}

/// L2 norm of each column
pub fn column_norms(data: &Array2<f64>) -> Array1<f64> {
    let n_cols = data.ncols();
    let mut norms = Array1::zeros(n_cols);

    for j in 0..n_cols {
        norms[j] = data.column(j).iter().map(|x| x * x).sum::<f64>().sqrt();
    }

    norms
}
