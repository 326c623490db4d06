//! Fitted PCA model

use super::decomposition::{covariance_matrix, EigenDecomposition};
use ndarray::{Array1, Array2, Axis};

/// Principal component analysis of a feature matrix
#[derive(Debug, Clone)]
pub struct PcaAnalysis {
    /// Number of components (= number of features here; the analysis keeps
    /// the full decomposition)
    pub n_components: usize,
    /// Components as columns (eigenvectors of the covariance matrix)
    pub components: Array2<f64>,
    /// Variance explained by each component, descending
    pub explained_variance: Array1<f64>,
    /// Fraction of total variance per component; sums to 1
    pub explained_variance_ratio: Array1<f64>,
    /// Running sum of the ratios
    pub cumulative_variance_ratio: Array1<f64>,
    /// Column means used for centering
    pub mean: Array1<f64>,
    /// Names of the original feature dimensions
    pub feature_names: Vec<String>,
}

impl PcaAnalysis {
    /// Fit the full PCA on a data matrix (rows = observations)
    pub fn fit(data: &Array2<f64>, feature_names: Vec<String>) -> Self {
        let n_components = data.ncols();

        let mean = data.mean_axis(Axis(0)).unwrap();
        let cov = covariance_matrix(data);
        let eigen = EigenDecomposition::from_symmetric(&cov);

        // The covariance matrix is positive semi-definite; tiny negative
        // eigenvalues are deflation round-off
        let explained_variance = eigen.eigenvalues.mapv(|x| x.max(0.0));

        let total_variance = explained_variance.sum();
        let explained_variance_ratio = if total_variance > 0.0 {
            &explained_variance / total_variance
        } else {
            Array1::zeros(n_components)
        };

        let mut cumulative = Array1::zeros(n_components);
        let mut running = 0.0;
        for i in 0..n_components {
            running += explained_variance_ratio[i];
            cumulative[i] = running;
        }

        Self {
            n_components,
            components: eigen.eigenvectors,
            explained_variance,
            explained_variance_ratio,
            cumulative_variance_ratio: cumulative,
            mean,
            feature_names,
        }
    }

    /// Loading vector of the first principal component across the original
    /// feature dimensions
    pub fn first_component(&self) -> Array1<f64> {
        self.components.column(0).to_owned()
    }

    /// Name of the feature with the largest-magnitude loading on PC1
    pub fn dominant_feature(&self) -> &str {
        let pc1 = self.components.column(0);
        let mut best = 0;
        for (i, &w) in pc1.iter().enumerate() {
            if w.abs() > pc1[best].abs() {
                best = i;
            }
        }
        &self.feature_names[best]
    }

    /// Print the component matrix (rows = components), the way the second
    /// run dumps it to stdout before the dimension-impact chart
    pub fn print_components(&self) {
        println!("PCA components (rows = components, cols = features):");
        for c in 0..self.n_components {
            let row: Vec<String> = (0..self.feature_names.len())
                .map(|f| format!("{:>10.6}", self.components[[f, c]]))
                .collect();
            println!("  PC{}: [{}]", c + 1, row.join(", "));
        }
    }
}
