use crate::error::{Error, Result};

/// Check that all points share one nonzero dimensionality, returning it.
///
/// Callers must ensure `data` is non-empty.
pub(crate) fn validate_dimensions(data: &[Vec<f64>]) -> Result<usize> {
    let dim = data[0].len();
    if dim == 0 {
        return Err(Error::InvalidParameter {
            name: "dimension",
            message: "points must have at least 1 dimension",
        });
    }

    for point in data {
        if point.len() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: point.len(),
            });
        }
    }

    Ok(dim)
}
