//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! Groups points by neighborhood density instead of distance to a center.
//! Unlike k-means it discovers the number of clusters on its own, finds
//! clusters of arbitrary shape, and labels outliers as noise.
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: maximum distance between two points to be neighbors.
//! - **MinPts**: minimum neighborhood size (self included) for a point to be
//!   a core point.
//! - **Core point**: has at least MinPts neighbors within ε.
//! - **Border point**: within ε of a core point but not core itself; absorbed
//!   into the core point's cluster without its own neighborhood being
//!   expanded.
//! - **Noise**: density-reachable from no core point. Noise is provisional —
//!   a point marked noise early can later be absorbed as a border point.
//!
//! ## Algorithm
//!
//! Points are scanned in index order. Each unclassified point gets a region
//! query over the full dataset (naive O(N), no spatial index); non-core
//! points become provisional noise, core points open a new cluster and expand
//! it breadth-first through the neighborhoods of further core points.
//!
//! Cluster ids are allocated from 1 upward; 0 is never used, so a label can
//! always be distinguished from "no cluster". Noise carries the [`NOISE`]
//! label.
//!
//! ## Complexity
//!
//! O(N²·D) per `fit` in the worst case. O(N) extra space for labels and the
//! expansion frontier.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};

use super::metric::Metric;
use super::traits::Clusterer;
use super::util::validate_dimensions;
use crate::error::{Error, Result};

/// Label assigned to noise points.
pub const NOISE: i64 = -2;

// A point that has not been evaluated yet. Never observable after `fit`:
// every point ends up with a cluster id or `NOISE`.
const UNCLASSIFIED: i64 = -1;

/// Fitted model state. Built from scratch on every `fit`.
///
/// The dataset is retained so `predict` can compare a query point against the
/// actual fitted coordinates.
#[derive(Clone, Debug)]
struct DbscanModel {
    labels: Vec<i64>,
    n_clusters: usize,
    data: Vec<Vec<f64>>,
    dim: usize,
}

/// DBSCAN clustering algorithm.
#[derive(Clone, Debug)]
pub struct Dbscan {
    /// Neighborhood radius.
    eps: f64,
    /// Minimum neighborhood size (self included) for a core point.
    min_pts: usize,
    /// Distance metric for region queries.
    metric: Metric,
    /// Cooperative cancellation flag, checked once per seed point.
    cancel: Option<Arc<AtomicBool>>,
    model: Option<DbscanModel>,
}

impl Dbscan {
    /// Create a new DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `eps` - Maximum distance between two points to be neighbors.
    /// * `min_pts` - Minimum number of points (self included) to form a dense
    ///   region.
    ///
    /// # Typical Values
    ///
    /// - `eps`: often read off a k-distance plot (k = `min_pts` - 1).
    /// - `min_pts`: 2 × dimension is a common heuristic.
    pub fn new(eps: f64, min_pts: usize) -> Self {
        Self {
            eps,
            min_pts,
            metric: Metric::Euclidean,
            cancel: None,
            model: None,
        }
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Install a cancellation flag.
    ///
    /// `fit` checks the flag once per seed point and aborts with
    /// [`Error::Cancelled`], leaving the instance un-fitted.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Labels of the fitted dataset, one per point: a cluster id starting at
    /// 1, or [`NOISE`].
    pub fn labels(&self) -> Result<&[i64]> {
        Ok(&self.model()?.labels)
    }

    /// Number of clusters the fitted model discovered (noise excluded).
    pub fn n_clusters(&self) -> Result<usize> {
        Ok(self.model()?.n_clusters)
    }

    fn model(&self) -> Result<&DbscanModel> {
        self.model.as_ref().ok_or(Error::NotFitted)
    }

    /// Indices of all points within `eps` of `data[origin]`, the origin
    /// itself included (its self-distance is 0).
    fn region_query(&self, data: &[Vec<f64>], origin: usize) -> Vec<usize> {
        let point = &data[origin];
        data.iter()
            .enumerate()
            .filter(|(_, other)| self.metric.distance(point, other) <= self.eps)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Grow `cluster_id` breadth-first from a core point's neighborhood.
    ///
    /// The frontier is a grow-only queue walked by index. `queued` marks
    /// every index ever enqueued, so frontier membership is decided once per
    /// point.
    fn expand_cluster(
        &self,
        data: &[Vec<f64>],
        neighbors: Vec<usize>,
        labels: &mut [i64],
        cluster_id: i64,
    ) {
        let mut queued = vec![false; data.len()];
        for &idx in &neighbors {
            queued[idx] = true;
        }
        let mut frontier = neighbors;

        let mut i = 0;
        while i < frontier.len() {
            let current = frontier[i];
            i += 1;

            // Previously-evaluated noise becomes a border point of this
            // cluster. Its neighborhood is not expanded.
            if labels[current] == NOISE {
                labels[current] = cluster_id;
                continue;
            }

            if labels[current] != UNCLASSIFIED {
                continue;
            }
            labels[current] = cluster_id;

            let current_neighbors = self.region_query(data, current);
            if current_neighbors.len() < self.min_pts {
                continue;
            }

            // Core point: pull its unclaimed neighbors into the frontier.
            for nn in current_neighbors {
                if (labels[nn] == UNCLASSIFIED || labels[nn] == NOISE) && !queued[nn] {
                    queued[nn] = true;
                    frontier.push(nn);
                }
            }
        }
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

impl Clusterer for Dbscan {
    fn fit(&mut self, data: &[Vec<f64>]) -> Result<()> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyDataset);
        }

        if !(self.eps > 0.0) {
            return Err(Error::InvalidParameter {
                name: "eps",
                message: "must be positive",
            });
        }

        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1",
            });
        }

        let dim = validate_dimensions(data)?;

        // Replace wholesale: a failed or cancelled fit leaves no stale model.
        self.model = None;

        debug!(
            "dbscan fit: n={}, dim={}, eps={}, min_pts={}",
            n, dim, self.eps, self.min_pts
        );

        let mut labels = vec![UNCLASSIFIED; n];
        let mut cluster_id: i64 = 0;

        for point_idx in 0..n {
            if let Some(cancel) = &self.cancel {
                if cancel.load(Ordering::Relaxed) {
                    return Err(Error::Cancelled);
                }
            }

            if labels[point_idx] != UNCLASSIFIED {
                continue;
            }

            let neighbors = self.region_query(data, point_idx);

            if neighbors.len() < self.min_pts {
                // Not dense enough: provisional noise, may become a border
                // point of a later cluster.
                labels[point_idx] = NOISE;
                continue;
            }

            // Core point: open the next cluster. Ids start at 1.
            cluster_id += 1;
            labels[point_idx] = cluster_id;
            self.expand_cluster(data, neighbors, &mut labels, cluster_id);
        }

        self.model = Some(DbscanModel {
            labels,
            n_clusters: cluster_id as usize,
            data: data.to_vec(),
            dim,
        });
        info!("dbscan fit complete: n={}, clusters={}", n, cluster_id);
        Ok(())
    }

    /// Assign a new point to the cluster of its nearest non-noise fitted
    /// point, or [`NOISE`] if that point is farther than `eps` (or the model
    /// contains only noise).
    fn predict(&self, point: &[f64]) -> Result<i64> {
        let model = self.model()?;
        if point.len() != model.dim {
            return Err(Error::DimensionMismatch {
                expected: model.dim,
                found: point.len(),
            });
        }

        let mut min_dist = f64::INFINITY;
        let mut nearest = NOISE;
        for (fitted, &label) in model.data.iter().zip(model.labels.iter()) {
            if label == NOISE {
                continue;
            }
            let dist = self.metric.distance(point, fitted);
            if dist < min_dist {
                min_dist = dist;
                nearest = label;
            }
        }

        if min_dist <= self.eps {
            Ok(nearest)
        } else {
            Ok(NOISE)
        }
    }

    /// One index list per cluster, in cluster-id order. Noise points appear
    /// in no list.
    fn clusters(&self) -> Result<Vec<Vec<usize>>> {
        let model = self.model()?;

        let mut clusters = vec![Vec::new(); model.n_clusters];
        for (i, &label) in model.labels.iter().enumerate() {
            if label > 0 {
                clusters[(label - 1) as usize].push(i);
            }
        }

        Ok(clusters)
    }

    /// DBSCAN has no centroid concept; this fails even on a fitted model.
    fn centroids(&self) -> Result<Vec<Vec<f64>>> {
        Err(Error::UnsupportedOperation("DBSCAN has no centroid concept"))
    }
}
