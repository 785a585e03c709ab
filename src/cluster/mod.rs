//! Clustering algorithms behind a common stateful contract.
//!
//! Two algorithms are provided, both implementing [`Clusterer`]:
//!
//! ## K-means
//!
//! Centroid-based partitioning: assign each point to the nearest centroid,
//! move each centroid to the mean of its points, repeat until the centroids
//! stop moving.
//!
//! **Objective**: minimize the within-cluster sum of squares:
//!
//! ```text
//! WCSS = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**: roughly spherical clusters of similar size, and a known
//! `k`. Labels are `0..k`.
//!
//! ## DBSCAN
//!
//! Density-based clustering: grow clusters through ε-neighborhoods of core
//! points. Discovers the number of clusters on its own, handles non-convex
//! shapes, and labels outliers as [`NOISE`]. Cluster ids start at 1. DBSCAN
//! has no centroid concept, so [`Clusterer::centroids`] always fails for it.
//!
//! ## Distance metrics
//!
//! Both algorithms take a [`Metric`]: Euclidean (default), Manhattan, cosine
//! distance, or a caller-supplied function.
//!
//! ## Usage
//!
//! ```rust
//! use huddle::{Clusterer, Dbscan, Kmeans, NOISE};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! // K-means: fit, then query the model.
//! let mut kmeans = Kmeans::new(2).with_seed(42);
//! kmeans.fit(&data).unwrap();
//! let labels = kmeans.labels().unwrap();
//! assert_eq!(labels[0], labels[1]);  // First two together
//! assert_ne!(labels[0], labels[2]);  // Separate from last two
//! assert_eq!(kmeans.centroids().unwrap().len(), 2);
//!
//! // DBSCAN: same contract, density semantics.
//! let mut dbscan = Dbscan::new(0.5, 2);
//! dbscan.fit(&data).unwrap();
//! assert_eq!(dbscan.n_clusters().unwrap(), 2);
//! assert!(dbscan.labels().unwrap().iter().all(|&l| l != NOISE));
//! ```

mod dbscan;
mod kmeans;
mod metric;
mod traits;
mod util;

pub use dbscan::{Dbscan, NOISE};
pub use kmeans::{FitProgress, Kmeans};
pub use metric::{cosine_distance, cosine_similarity, euclidean, manhattan, Metric};
pub use traits::Clusterer;
