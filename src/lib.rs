//! # BTC Clusters - K-Means and PCA study of the daily BTC-USD series
//!
//! This library backs two exploratory-analysis binaries that load a daily
//! BTC-USD price/volume CSV, cluster the feature table with K-Means, explain
//! the clusters with PCA, and render the diagnostic charts in the terminal.
//!
//! ## Modules
//!
//! - `data` - CSV ingestion and feature preprocessing
//! - `cluster` - K-Means clustering
//! - `pca` - PCA decomposition and analysis
//! - `utils` - Summary statistics and terminal charts

pub mod cluster;
pub mod data;
pub mod pca;
pub mod utils;

pub use cluster::KMeans;
pub use data::{normalize_columns, PriceHistory};
pub use pca::PcaAnalysis;
