//! K-means: centroid-based partitioning (Lloyd's algorithm).
//!
//! Partitions a dataset into `k` clusters by alternating two steps:
//!
//! 1. **Assign**: each point goes to its nearest centroid.
//! 2. **Update**: each centroid moves to the mean of its assigned points.
//!
//! The objective being (locally) minimized is the within-cluster sum of
//! squares:
//!
//! ```text
//! WCSS = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! Iteration stops when no centroid moves more than `tolerance` under the
//! configured metric, or after `max_iterations` rounds.
//!
//! ## Initialization
//!
//! Centroids are seeded with `k` distinct points drawn from a random
//! permutation of the dataset (Forgy-style). Pass a seed through
//! [`Kmeans::with_seed`] for reproducible runs; without one the RNG is drawn
//! from the thread-local generator.
//!
//! ## Empty clusters
//!
//! A cluster that receives no points in an assignment pass keeps its previous
//! centroid. No point is stolen and nothing is re-seeded, so a cluster can
//! stay empty through convergence; [`clusters`](super::Clusterer::clusters)
//! then reports an empty bucket for it rather than dropping it.
//!
//! ## Complexity
//!
//! O(N·K·D) per iteration, single-threaded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};
use rand::prelude::*;

use super::metric::{euclidean, Metric};
use super::traits::Clusterer;
use super::util::validate_dimensions;
use crate::error::{Error, Result};

/// Per-iteration snapshot reported by [`Kmeans::fit_with_observer`].
#[derive(Clone, Copy, Debug)]
pub struct FitProgress {
    /// Iteration number, starting at 0.
    pub iteration: usize,
    /// Within-cluster sum of squared Euclidean distances, measured against
    /// the centroids the points were just assigned to.
    pub wcss: f64,
    /// Largest centroid movement of the update step, under the configured
    /// metric. The run converges when this drops to `tolerance` or below.
    pub max_centroid_shift: f64,
}

/// Fitted model state. Built from scratch on every `fit`.
#[derive(Clone, Debug)]
struct KmeansModel {
    labels: Vec<i64>,
    centroids: Vec<Vec<f64>>,
}

/// K-means clustering algorithm.
#[derive(Clone, Debug)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum Lloyd iterations.
    max_iterations: usize,
    /// Convergence threshold on centroid movement.
    tolerance: f64,
    /// Distance metric for assignment and convergence.
    metric: Metric,
    /// RNG seed for centroid initialization.
    seed: Option<u64>,
    /// Cooperative cancellation flag, checked once per iteration.
    cancel: Option<Arc<AtomicBool>>,
    model: Option<KmeansModel>,
}

impl Kmeans {
    /// Create a new K-means clusterer for `k` clusters.
    ///
    /// Defaults: `max_iterations = 100`, `tolerance = 1e-4`, Euclidean
    /// distance, unseeded RNG.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: 100,
            tolerance: 1e-4,
            metric: Metric::Euclidean,
            seed: None,
            cancel: None,
            model: None,
        }
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance on centroid movement.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the RNG seed for reproducible initialization.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Install a cancellation flag.
    ///
    /// `fit` checks the flag once per iteration and aborts with
    /// [`Error::Cancelled`], leaving the instance un-fitted.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Labels of the fitted dataset, one per point, in `[0, k)`.
    pub fn labels(&self) -> Result<&[i64]> {
        Ok(&self.model()?.labels)
    }

    /// Like [`Clusterer::fit`], reporting a [`FitProgress`] snapshot to
    /// `observer` after each iteration.
    pub fn fit_with_observer(
        &mut self,
        data: &[Vec<f64>],
        observer: &mut dyn FnMut(&FitProgress),
    ) -> Result<()> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyDataset);
        }

        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }

        if n < self.k {
            return Err(Error::InsufficientPoints {
                requested: self.k,
                n_points: n,
            });
        }

        let dim = validate_dimensions(data)?;

        // Replace wholesale: a failed or cancelled fit leaves no stale model.
        self.model = None;

        debug!(
            "k-means fit: n={}, k={}, dim={}, max_iterations={}",
            n, self.k, dim, self.max_iterations
        );

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        // Forgy init: k distinct points from a random permutation.
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut rng);
        let mut centroids: Vec<Vec<f64>> = indices[..self.k]
            .iter()
            .map(|&i| data[i].clone())
            .collect();

        let mut labels = vec![0i64; n];

        for iteration in 0..self.max_iterations {
            if let Some(cancel) = &self.cancel {
                if cancel.load(Ordering::Relaxed) {
                    return Err(Error::Cancelled);
                }
            }

            // Assignment, accumulating the objective as we go.
            let mut wcss = 0.0;
            for (i, point) in data.iter().enumerate() {
                let nearest = nearest_centroid(&self.metric, point, &centroids);
                labels[i] = nearest as i64;
                let d = euclidean(point, &centroids[nearest]);
                wcss += d * d;
            }

            let snapshot = centroids.clone();

            // Update: mean of assigned points; empty clusters keep their
            // previous centroid.
            let mut sums = vec![vec![0.0; dim]; self.k];
            let mut counts = vec![0usize; self.k];
            for (point, &label) in data.iter().zip(labels.iter()) {
                let c = label as usize;
                counts[c] += 1;
                for (acc, x) in sums[c].iter_mut().zip(point.iter()) {
                    *acc += x;
                }
            }
            for c in 0..self.k {
                if counts[c] == 0 {
                    continue;
                }
                for (slot, acc) in centroids[c].iter_mut().zip(sums[c].iter()) {
                    *slot = acc / counts[c] as f64;
                }
            }

            let max_centroid_shift = snapshot
                .iter()
                .zip(centroids.iter())
                .map(|(old, new)| self.metric.distance(old, new))
                .fold(0.0, f64::max);

            observer(&FitProgress {
                iteration,
                wcss,
                max_centroid_shift,
            });

            if max_centroid_shift <= self.tolerance {
                debug!(
                    "k-means converged after {} iterations (shift {:.3e})",
                    iteration + 1,
                    max_centroid_shift
                );
                break;
            }
        }

        self.model = Some(KmeansModel { labels, centroids });
        info!("k-means fit complete: n={}, k={}", n, self.k);
        Ok(())
    }

    fn model(&self) -> Result<&KmeansModel> {
        self.model.as_ref().ok_or(Error::NotFitted)
    }
}

impl Clusterer for Kmeans {
    fn fit(&mut self, data: &[Vec<f64>]) -> Result<()> {
        self.fit_with_observer(data, &mut |_| {})
    }

    fn predict(&self, point: &[f64]) -> Result<i64> {
        let model = self.model()?;
        let dim = model.centroids[0].len();
        if point.len() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: point.len(),
            });
        }

        Ok(nearest_centroid(&self.metric, point, &model.centroids) as i64)
    }

    fn clusters(&self) -> Result<Vec<Vec<usize>>> {
        let model = self.model()?;

        // One bucket per cluster id; buckets for empty clusters stay empty
        // rather than being filtered out.
        let mut clusters = vec![Vec::new(); self.k];
        for (i, &label) in model.labels.iter().enumerate() {
            clusters[label as usize].push(i);
        }

        Ok(clusters)
    }

    fn centroids(&self) -> Result<Vec<Vec<f64>>> {
        Ok(self.model()?.centroids.clone())
    }
}

/// Index of the centroid nearest to `point`; ties go to the lowest index.
fn nearest_centroid(metric: &Metric, point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut nearest = 0;
    let mut min_dist = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = metric.distance(point, centroid);
        if dist < min_dist {
            min_dist = dist;
            nearest = idx;
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blob_data() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![0.2, 0.0],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
            vec![10.2, 10.0],
        ]
    }

    #[test]
    fn separates_two_blobs() {
        let mut kmeans = Kmeans::new(2).with_seed(42);
        kmeans.fit(&two_blob_data()).unwrap();

        let labels = kmeans.labels().unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn centroids_land_on_blob_means() {
        let mut kmeans = Kmeans::new(2).with_seed(42);
        kmeans.fit(&two_blob_data()).unwrap();

        let centroids = kmeans.centroids().unwrap();
        assert_eq!(centroids.len(), 2);

        // One centroid near (0.1, 0.033), the other near (10.1, 10.033).
        let mut near_origin = 0;
        for c in &centroids {
            if euclidean(c, &[0.1, 0.1]) < 0.5 {
                near_origin += 1;
            } else {
                assert!(euclidean(c, &[10.1, 10.1]) < 0.5);
            }
        }
        assert_eq!(near_origin, 1);
    }

    #[test]
    fn deterministic_under_seed() {
        let data = two_blob_data();

        let mut a = Kmeans::new(2).with_seed(7);
        let mut b = Kmeans::new(2).with_seed(7);
        a.fit(&data).unwrap();
        b.fit(&data).unwrap();

        assert_eq!(a.labels().unwrap(), b.labels().unwrap());
        assert_eq!(a.centroids().unwrap(), b.centroids().unwrap());
    }

    #[test]
    fn refit_replaces_model() {
        let data = two_blob_data();
        let mut kmeans = Kmeans::new(2).with_seed(1);
        kmeans.fit(&data).unwrap();

        let shifted: Vec<Vec<f64>> = data
            .iter()
            .map(|p| p.iter().map(|x| x + 100.0).collect())
            .collect();
        kmeans.fit(&shifted).unwrap();

        for c in kmeans.centroids().unwrap() {
            assert!(c[0] >= 100.0);
        }
    }

    #[test]
    fn predict_round_trip() {
        let data = two_blob_data();
        let mut kmeans = Kmeans::new(2).with_seed(42);
        kmeans.fit(&data).unwrap();

        let labels = kmeans.labels().unwrap().to_vec();
        for (point, label) in data.iter().zip(labels) {
            assert_eq!(kmeans.predict(point).unwrap(), label);
        }
    }

    #[test]
    fn duplicate_points_leave_empty_bucket() {
        // Every point is identical, so after the first assignment all of them
        // sit on centroid 0 (ties break to the lowest index) and cluster 1
        // stays empty. The empty bucket must survive in `clusters`.
        let data = vec![vec![1.0, 1.0]; 4];
        let mut kmeans = Kmeans::new(2).with_seed(3);
        kmeans.fit(&data).unwrap();

        let clusters = kmeans.clusters().unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0], vec![0, 1, 2, 3]);
        assert!(clusters[1].is_empty());
    }

    #[test]
    fn manhattan_metric() {
        let mut kmeans = Kmeans::new(2).with_seed(42).with_metric(Metric::Manhattan);
        kmeans.fit(&two_blob_data()).unwrap();

        let labels = kmeans.labels().unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn empty_dataset_error() {
        let mut kmeans = Kmeans::new(2);
        assert!(matches!(kmeans.fit(&[]), Err(Error::EmptyDataset)));
    }

    #[test]
    fn insufficient_points_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let mut kmeans = Kmeans::new(5);
        assert!(matches!(
            kmeans.fit(&data),
            Err(Error::InsufficientPoints {
                requested: 5,
                n_points: 2
            })
        ));
    }

    #[test]
    fn zero_k_error() {
        let data = vec![vec![0.0, 0.0]];
        let mut kmeans = Kmeans::new(0);
        assert!(matches!(
            kmeans.fit(&data),
            Err(Error::InvalidParameter { name: "k", .. })
        ));
    }

    #[test]
    fn ragged_dataset_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0]];
        let mut kmeans = Kmeans::new(1);
        assert!(matches!(
            kmeans.fit(&data),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn predict_dimension_mismatch() {
        let mut kmeans = Kmeans::new(1).with_seed(0);
        kmeans.fit(&[vec![0.0, 0.0]]).unwrap();
        assert!(matches!(
            kmeans.predict(&[0.0]),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn reads_before_fit_fail() {
        let kmeans = Kmeans::new(2);
        assert!(matches!(kmeans.clusters(), Err(Error::NotFitted)));
        assert!(matches!(kmeans.centroids(), Err(Error::NotFitted)));
        assert!(matches!(kmeans.labels(), Err(Error::NotFitted)));
        assert!(matches!(kmeans.predict(&[0.0, 0.0]), Err(Error::NotFitted)));
    }

    #[test]
    fn cancelled_fit_leaves_unfitted() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut kmeans = Kmeans::new(2).with_seed(42).with_cancel_flag(flag);
        assert!(matches!(
            kmeans.fit(&two_blob_data()),
            Err(Error::Cancelled)
        ));
        assert!(matches!(kmeans.clusters(), Err(Error::NotFitted)));
    }

    #[test]
    fn observer_sees_every_iteration() {
        let mut iterations = Vec::new();
        let mut kmeans = Kmeans::new(2).with_seed(42);
        kmeans
            .fit_with_observer(&two_blob_data(), &mut |p| iterations.push(p.iteration))
            .unwrap();

        assert!(!iterations.is_empty());
        for (expected, &got) in iterations.iter().enumerate() {
            assert_eq!(expected, got);
        }
    }
}
