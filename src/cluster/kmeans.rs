//! K-Means clustering with seeded multi-restart initialization

use anyhow::{ensure, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// K-Means configuration.
///
/// Follows scikit-learn's KMeans fitting policy: k-means++ initialization,
/// `n_init` independent restarts drawn from one seeded RNG, Lloyd iteration,
/// and the lowest-inertia run wins. Same input and seed always produce the
/// same partition.
#[derive(Debug, Clone)]
pub struct KMeans {
    n_clusters: usize,
    seed: u64,
    n_init: usize,
    max_iter: usize,
    tol: f64,
}

/// Result of fitting K-Means to a data matrix
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Cluster label in 0..n_clusters for each row
    pub labels: Vec<usize>,
    /// Final centroids (rows = clusters)
    pub centroids: Array2<f64>,
    /// Sum of squared distances of each row to its centroid
    pub inertia: f64,
    /// Lloyd iterations of the winning restart
    pub n_iter: usize,
}

impl KMeans {
    /// Create a K-Means configuration for `n_clusters` clusters
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            seed: 0,
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
        }
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of restarts
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set the iteration cap per restart
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Fit the model, returning labels, centroids and inertia
    pub fn fit(&self, data: &Array2<f64>) -> Result<KMeansFit> {
        ensure!(self.n_clusters >= 1, "n_clusters must be at least 1");
        ensure!(
            data.nrows() >= self.n_clusters,
            "cannot form {} clusters from {} rows",
            self.n_clusters,
            data.nrows()
        );
        ensure!(self.n_init >= 1, "n_init must be at least 1");

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<KMeansFit> = None;

        for _ in 0..self.n_init {
            let fit = self.run_lloyd(&data.view(), &mut rng);
            if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }

        Ok(best.expect("at least one restart ran"))
    }

    /// One restart: k-means++ seeding followed by Lloyd iteration
    fn run_lloyd(&self, data: &ArrayView2<f64>, rng: &mut StdRng) -> KMeansFit {
        let n_rows = data.nrows();
        let n_cols = data.ncols();

        let mut centroids = kmeans_plus_plus_init(data, self.n_clusters, rng);
        let mut labels = vec![0usize; n_rows];
        let mut n_iter = 0;

        for iter in 0..self.max_iter {
            n_iter = iter + 1;

            // Assignment step
            for i in 0..n_rows {
                let (label, _) = nearest_centroid(&data.row(i), &centroids);
                labels[i] = label;
            }

            // Update step
            let mut sums: Array2<f64> = Array2::zeros((self.n_clusters, n_cols));
            let mut counts = vec![0usize; self.n_clusters];
            for i in 0..n_rows {
                counts[labels[i]] += 1;
                for j in 0..n_cols {
                    sums[[labels[i], j]] += data[[i, j]];
                }
            }

            let mut new_centroids = centroids.clone();
            let mut empty = Vec::new();
            for c in 0..self.n_clusters {
                if counts[c] > 0 {
                    for j in 0..n_cols {
                        new_centroids[[c, j]] = sums[[c, j]] / counts[c] as f64;
                    }
                } else {
                    empty.push(c);
                }
            }
            if !empty.is_empty() {
                reseed_empty_clusters(data, &labels, &centroids, &empty, &mut new_centroids);
            }

            // Convergence: total squared centroid shift below tolerance
            let shift: f64 = (&new_centroids - &centroids).iter().map(|x| x * x).sum();
            centroids = new_centroids;

            if shift < self.tol {
                break;
            }
        }

        // Final assignment against the converged centroids
        let mut inertia = 0.0;
        for i in 0..n_rows {
            let (label, dist_sq) = nearest_centroid(&data.row(i), &centroids);
            labels[i] = label;
            inertia += dist_sq;
        }

        KMeansFit {
            labels,
            centroids,
            inertia,
            n_iter,
        }
    }
}

/// Squared Euclidean distance between two points
fn squared_distance(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(&x, &y)| (x - y) * (x - y)).sum()
}

/// Index and squared distance of the nearest centroid
fn nearest_centroid(point: &ArrayView1<f64>, centroids: &Array2<f64>) -> (usize, f64) {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;

    for (c, centroid) in centroids.rows().into_iter().enumerate() {
        let dist = squared_distance(point, &centroid);
        if dist < best_dist {
            best = c;
            best_dist = dist;
        }
    }

    (best, best_dist)
}

/// Re-seed emptied clusters from the points farthest from their assigned
/// centroids, taking a distinct point for each emptied cluster
fn reseed_empty_clusters(
    data: &ArrayView2<f64>,
    labels: &[usize],
    centroids: &Array2<f64>,
    empty: &[usize],
    new_centroids: &mut Array2<f64>,
) {
    let mut dists: Vec<f64> = (0..data.nrows())
        .map(|i| squared_distance(&data.row(i), &centroids.row(labels[i])))
        .collect();

    for &c in empty {
        let far = dists
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);

        new_centroids.row_mut(c).assign(&data.row(far));
        // Taken; the next emptied cluster must pick a different point
        dists[far] = -1.0;
    }
}

/// k-means++ seeding: first centroid uniform, each next centroid drawn with
/// probability proportional to its squared distance from the nearest
/// already-chosen centroid
fn kmeans_plus_plus_init(data: &ArrayView2<f64>, k: usize, rng: &mut StdRng) -> Array2<f64> {
    let n_rows = data.nrows();
    let n_cols = data.ncols();
    let mut centroids = Array2::zeros((k, n_cols));

    let first = rng.gen_range(0..n_rows);
    centroids.row_mut(0).assign(&data.row(first));

    let mut min_dists = vec![0.0f64; n_rows];
    for c in 1..k {
        let mut total = 0.0;
        for i in 0..n_rows {
            let mut best = f64::INFINITY;
            for chosen in 0..c {
                let dist = squared_distance(&data.row(i), &centroids.row(chosen));
                if dist < best {
                    best = dist;
                }
            }
            min_dists[i] = best;
            total += best;
        }

        let next = if total > 0.0 {
            // Weighted draw over the cumulative distance mass
            let target = rng.gen::<f64>() * total;
            let mut acc = 0.0;
            let mut picked = n_rows - 1;
            for (i, &d) in min_dists.iter().enumerate() {
                acc += d;
                if acc >= target {
                    picked = i;
                    break;
                }
            }
            picked
        } else {
            // All points coincide with chosen centroids
            rng.gen_range(0..n_rows)
        };

        centroids.row_mut(c).assign(&data.row(next));
    }

    centroids
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_tier_table() -> Array2<f64> {
        // 5 low-valued rows, 5 high-valued rows
        array![
            [1.0, 1.2, 0.9, 1.1, 10.0],
            [1.1, 1.3, 1.0, 1.2, 12.0],
            [0.9, 1.1, 0.8, 1.0, 9.0],
            [1.0, 1.2, 0.9, 1.1, 11.0],
            [1.2, 1.4, 1.1, 1.3, 10.5],
            [100.0, 102.0, 99.0, 101.0, 1000.0],
            [101.0, 103.0, 100.0, 102.0, 1100.0],
            [99.0, 101.0, 98.0, 100.0, 950.0],
            [100.5, 102.5, 99.5, 101.5, 1050.0],
            [102.0, 104.0, 101.0, 103.0, 990.0],
        ]
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let data = two_tier_table();
        let model = KMeans::new(2).with_seed(0);

        let first = model.fit(&data).unwrap();
        let second = model.fit(&data).unwrap();

        assert_eq!(first.labels, second.labels);
        assert!((first.inertia - second.inertia).abs() < 1e-12);
    }

    #[test]
    fn test_two_tier_separation() {
        let data = two_tier_table();
        let fit = KMeans::new(2).with_seed(0).fit(&data).unwrap();

        // All low rows share one label, all high rows the other
        let low_label = fit.labels[0];
        let high_label = fit.labels[5];
        assert_ne!(low_label, high_label);
        assert!(fit.labels[..5].iter().all(|&l| l == low_label));
        assert!(fit.labels[5..].iter().all(|&l| l == high_label));
    }

    #[test]
    fn test_labels_in_range() {
        let data = two_tier_table();
        let fit = KMeans::new(5).with_seed(0).fit(&data).unwrap();

        assert_eq!(fit.labels.len(), data.nrows());
        assert!(fit.labels.iter().all(|&l| l < 5));
        assert_eq!(fit.centroids.nrows(), 5);
        assert!(fit.n_iter >= 1);
    }

    #[test]
    fn test_k_equals_rows() {
        let data = array![[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]];
        let fit = KMeans::new(3).with_seed(0).fit(&data).unwrap();

        // Each point gets its own cluster, inertia collapses to zero
        assert!(fit.inertia < 1e-10);
        let mut sorted = fit.labels.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }

    #[test]
    fn test_too_few_rows_is_error() {
        let data = array![[1.0, 2.0]];
        assert!(KMeans::new(2).fit(&data).is_err());
    }

    #[test]
    fn test_reseed_two_empty_clusters_distinct_points() {
        let data = array![[0.0, 0.0], [10.0, 0.0], [0.0, 10.0], [10.0, 10.0]];
        let centroids = array![[0.0, 0.0], [50.0, 50.0], [60.0, 60.0]];
        // Every point sits in cluster 0; clusters 1 and 2 are empty
        let labels = vec![0usize, 0, 0, 0];
        let mut new_centroids = centroids.clone();

        reseed_empty_clusters(
            &data.view(),
            &labels,
            &centroids,
            &[1, 2],
            &mut new_centroids,
        );

        // Farthest point from (0,0) is (10,10); the second emptied cluster
        // must take a different point
        assert_eq!(new_centroids.row(1), data.row(3));
        assert_ne!(new_centroids.row(1), new_centroids.row(2));
    }

    #[test]
    fn test_centroids_are_cluster_means() {
        let data = array![[0.0, 0.0], [2.0, 2.0], [100.0, 100.0], [102.0, 102.0]];
        let fit = KMeans::new(2).with_seed(0).fit(&data).unwrap();

        // Converged centroids are the means of their assigned points
        for (i, &label) in fit.labels.iter().enumerate() {
            let centroid = fit.centroids.row(label);
            let expected = if data[[i, 0]] < 50.0 { 1.0 } else { 101.0 };
            assert!((centroid[0] - expected).abs() < 1e-9);
            assert!((centroid[1] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_restarts_do_not_worsen_inertia() {
        let data = two_tier_table();
        let single = KMeans::new(2).with_seed(7).with_n_init(1).fit(&data).unwrap();
        let multi = KMeans::new(2).with_seed(7).with_n_init(10).fit(&data).unwrap();

        assert!(multi.inertia <= single.inertia + 1e-9);
    }
}
