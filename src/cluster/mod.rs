//! Clustering algorithms

pub mod kmeans;

pub use kmeans::{KMeans, KMeansFit};
