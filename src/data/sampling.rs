//! Stride sampling: keep every k-th record so the 3D view stays interactive.
//!
//! Sampling is deterministic and order-preserving: for a stride `s` the
//! output is the records at indices `0, s, 2s, …`, i.e. `ceil(n / s)` of them.

use std::num::NonZeroUsize;
use std::sync::Arc;

use super::model::{Dataset, SensorRecord};
use crate::error::{DataError, DataResult};

/// Default stride used by the viewer.
pub const DEFAULT_STRIDE: i64 = 5;

// ---------------------------------------------------------------------------
// Stride – a validated, strictly positive step
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Stride(NonZeroUsize);

impl Stride {
    /// Validate a configured stride. Zero and negative values are rejected
    /// instead of being treated as 1.
    pub fn new(value: i64) -> DataResult<Stride> {
        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Stride)
            .ok_or_else(|| {
                DataError::InvalidConfiguration(format!(
                    "sampling stride must be a positive integer, got {value}"
                ))
            })
    }

    /// Smallest stride keeping at most `max_points` out of `len` records.
    pub fn for_point_cap(len: usize, max_points: usize) -> DataResult<Stride> {
        if max_points == 0 {
            return Err(DataError::InvalidConfiguration(
                "max_points must be at least 1".into(),
            ));
        }
        let step = len.div_ceil(max_points).max(1);
        Ok(Stride(NonZeroUsize::new(step).unwrap_or(NonZeroUsize::MIN)))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for Stride {
    fn default() -> Self {
        Stride(NonZeroUsize::new(DEFAULT_STRIDE as usize).unwrap_or(NonZeroUsize::MIN))
    }
}

// ---------------------------------------------------------------------------
// Pure primitives
// ---------------------------------------------------------------------------

/// Indices kept by stride sampling over a sequence of length `len`.
pub fn stride_indices(len: usize, stride: Stride) -> Vec<usize> {
    (0..len).step_by(stride.get()).collect()
}

/// Every `stride`-th element of `items`, starting at the first.
pub fn stride_sample<T>(items: &[T], stride: Stride) -> Vec<&T> {
    items.iter().step_by(stride.get()).collect()
}

// ---------------------------------------------------------------------------
// SampledDataset – a view over a shared Dataset
// ---------------------------------------------------------------------------

/// A strided view of a [`Dataset`]. Holds row indices, not copies.
#[derive(Debug, Clone)]
pub struct SampledDataset {
    source: Arc<Dataset>,
    indices: Vec<usize>,
    stride: Stride,
}

impl SampledDataset {
    pub fn new(source: Arc<Dataset>, stride: Stride) -> Self {
        let indices = stride_indices(source.len(), stride);
        log::info!(
            "Sampled {} of {} records (stride {})",
            indices.len(),
            source.len(),
            stride.get()
        );
        SampledDataset {
            source,
            indices,
            stride,
        }
    }

    pub fn stride(&self) -> Stride {
        self.stride
    }

    /// Index in the full dataset of each sampled record.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn source(&self) -> &Arc<Dataset> {
        &self.source
    }

    pub fn get(&self, i: usize) -> Option<&SensorRecord> {
        self.indices.get(i).and_then(|&idx| self.source.get(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorRecord> + '_ {
        self.indices.iter().filter_map(|&idx| self.source.get(idx))
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
