//! Equal-width binning.

use crate::error::{ProcessingError, Result};
use crate::stats::descriptive::{min_max, span_scale};
use crate::types::BinnedVector;

/// Assign every value to one of `bins` equal-width intervals over `[min, max]`.
///
/// The bin index is `floor((x - min) / width)` with `width = (max - min) / bins`,
/// clamped to `[0, bins - 1]` so the maximum lands in the last bin. When every
/// value is equal the width is zero and everything goes to bin 0. An empty
/// column yields an empty result.
pub fn equal_width_binning(xs: &[f64], bins: usize) -> Result<BinnedVector> {
    if bins == 0 {
        return Err(ProcessingError::InvalidBinCount(bins));
    }
    if xs.is_empty() {
        return Ok(Vec::new());
    }

    let (min, max) = min_max(xs)?;
    let scale = span_scale(min, max);
    let min = min * scale;
    let width = (max * scale - min) / bins as f64;
    if width == 0.0 {
        return Ok(vec![0; xs.len()]);
    }

    let last = bins - 1;
    Ok(xs
        .iter()
        .map(|x| {
            let index = ((x * scale - min) / width).floor();
            if index <= 0.0 {
                0
            } else {
                (index as usize).min(last)
            }
        })
        .collect())
}
