use crate::error::Result;

/// Common interface for stateful clustering algorithms.
///
/// The lifecycle is: construct, [`fit`](Clusterer::fit) once on a dataset,
/// then query the fitted model. Every read operation fails with
/// [`NotFitted`](crate::error::Error::NotFitted) before the first successful
/// `fit`, and re-running `fit` replaces the model wholesale.
///
/// Instances are not safe for concurrent use: `fit` takes `&mut self` and
/// rebuilds all model state. Callers that need to train models concurrently
/// must use separate instances.
pub trait Clusterer {
    /// Run the algorithm on `data`, replacing any previously fitted model.
    ///
    /// `data` is a slice of points, all of the same dimensionality; cluster
    /// membership in later queries refers to points by their index here.
    fn fit(&mut self, data: &[Vec<f64>]) -> Result<()>;

    /// Assign a new point to a cluster of the fitted model.
    ///
    /// Label semantics are algorithm-specific: K-means labels are in
    /// `[0, k)`; DBSCAN labels start at 1 and may be
    /// [`NOISE`](crate::cluster::NOISE).
    fn predict(&self, point: &[f64]) -> Result<i64>;

    /// The fitted clusters as lists of point indices, noise excluded.
    fn clusters(&self) -> Result<Vec<Vec<usize>>>;

    /// The fitted cluster centers, one per cluster.
    ///
    /// Algorithms without a centroid concept fail with
    /// [`UnsupportedOperation`](crate::error::Error::UnsupportedOperation)
    /// even when fitted.
    fn centroids(&self) -> Result<Vec<Vec<f64>>>;
}
