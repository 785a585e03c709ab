use thiserror::Error;

/// Errors returned by clustering algorithms in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// `fit` was called with a dataset containing no points.
    #[error("empty dataset")]
    EmptyDataset,

    /// K-means was asked for more clusters than the dataset has points.
    #[error("insufficient points: requested {requested} clusters, but dataset has {n_points} points")]
    InsufficientPoints {
        /// Requested number of clusters.
        requested: usize,
        /// Number of points in the dataset.
        n_points: usize,
    },

    /// A read operation was called before a successful `fit`.
    #[error("model is not fitted")]
    NotFitted,

    /// The operation is not defined for this algorithm.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// Points in a dataset (or a query point) have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// `fit` was cancelled through the cancellation flag.
    #[error("fit cancelled")]
    Cancelled,
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
