//! Distance metrics over dense `f64` vectors.
//!
//! All metrics compare two equal-length slices. Length mismatches are signalled
//! through cheap sentinel values rather than a `Result`, so the functions stay
//! branch-light inside the clustering hot loops:
//!
//! - [`euclidean`] and [`manhattan`] return `+∞` on mismatch. An infinite
//!   distance is never selected as a nearest neighbor, so a stray mismatched
//!   point cannot win an arg-min.
//! - [`cosine_similarity`] returns `-1.0` on mismatch (so [`cosine_distance`]
//!   returns `2.0`). This asymmetry with the other two metrics is historical
//!   and kept as-is; callers that need a hard failure should validate lengths
//!   up front, which is what the clustering entry points do (see
//!   [`Error::DimensionMismatch`](crate::error::Error::DimensionMismatch)).
//!
//! Cosine similarity of a zero-norm vector is defined as `0.0`.

use std::fmt;
use std::sync::Arc;

/// Euclidean (L2) distance: `√Σ(aᵢ−bᵢ)²`.
///
/// Returns `+∞` if the slices have different lengths.
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }

    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Manhattan (L1) distance: `Σ|aᵢ−bᵢ|`.
///
/// Returns `+∞` if the slices have different lengths.
pub fn manhattan(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }

    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// Cosine similarity: `(a·b) / (‖a‖‖b‖)`.
///
/// Higher means more similar, the opposite orientation of a distance.
/// Returns `0.0` when either vector has zero norm, and `-1.0` if the slices
/// have different lengths (note: not the `+∞` sentinel the other metrics use).
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return -1.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Cosine distance: `1 − cosine_similarity(a, b)`.
///
/// Ranges over `[0, 2]` for nonzero vectors; `2.0` on length mismatch.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    1.0 - cosine_similarity(a, b)
}

/// Distance strategy used by the clustering algorithms.
///
/// The built-in variants dispatch to the free functions in this module.
/// [`Metric::Custom`] is the escape hatch for caller-supplied metrics; the
/// closure must be symmetric and non-negative for the algorithms to behave.
#[derive(Clone, Default)]
pub enum Metric {
    /// Euclidean (L2) distance.
    #[default]
    Euclidean,
    /// Manhattan (L1) distance.
    Manhattan,
    /// Cosine distance (`1 −` cosine similarity).
    Cosine,
    /// Caller-supplied distance function.
    Custom(Arc<dyn Fn(&[f64], &[f64]) -> f64 + Send + Sync>),
}

impl Metric {
    /// Compute the distance between `a` and `b` under this metric.
    #[inline]
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Metric::Euclidean => euclidean(a, b),
            Metric::Manhattan => manhattan(a, b),
            Metric::Cosine => cosine_distance(a, b),
            Metric::Custom(f) => f(a, b),
        }
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Euclidean => f.write_str("Euclidean"),
            Metric::Manhattan => f.write_str("Manhattan"),
            Metric::Cosine => f.write_str("Cosine"),
            Metric::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
