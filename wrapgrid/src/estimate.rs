/// Returns the lower median of `samples`, sorting them in place.
///
/// `None` when the slice is empty.
pub(crate) fn lower_median(samples: &mut [i64]) -> Option<i64> {
    if samples.is_empty() {
        return None;
    }
    // The median resists outliers better than the mean; rows are expected to
    // be near-uniform with the occasional tall one.
    samples.sort_unstable();
    Some(samples[samples.len() / 2])
}

/// Height estimate for rows that contain no realized item.
///
/// Tracks the last estimate across layout passes so that a pass in which
/// nothing is realized keeps the previous value instead of collapsing to
/// zero.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RowHeightEstimator {
    height: i64,
}

impl RowHeightEstimator {
    pub(crate) fn new() -> Self {
        Self { height: 1 }
    }

    /// Feeds one pass worth of measured row heights and returns the estimate
    /// to use for that pass. The estimate is never zero; it divides offsets
    /// in the geometry queries.
    pub(crate) fn observe(&mut self, samples: &mut [i64]) -> i64 {
        if let Some(median) = lower_median(samples) {
            self.height = median.max(1);
        }
        self.height
    }

    pub(crate) fn height(&self) -> i64 {
        self.height
    }
}
