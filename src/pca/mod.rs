//! Principal Component Analysis

pub mod analysis;
pub mod decomposition;

pub use analysis::PcaAnalysis;
pub use decomposition::{covariance_matrix, EigenDecomposition};
