use crate::{Axis, Orientation, ScrollPolicy};

/// Default upper bound for the column count.
pub const DEFAULT_MAX_COLUMNS: usize = 7;

/// Configuration for [`crate::GridEngine`].
///
/// All fields have working defaults; use the `with_*` builders to adjust the
/// ones you care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridOptions {
    /// The scrolling direction. Items wrap along the opposite axis.
    pub orientation: Orientation,
    /// Lower bound for the column count, at least 1.
    pub min_columns: usize,
    /// Upper bound for the column count, at least 1.
    ///
    /// If this is smaller than `min_columns`, the minimum wins.
    pub max_columns: usize,
    /// Per-axis sizing policy, indexed by [`Axis`].
    ///
    /// The cross-axis policy decides whether columns are sized from minimum
    /// or natural widths; the primary-axis policy does the same for row
    /// heights.
    pub scroll_policy: [ScrollPolicy; 2],
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            min_columns: 1,
            max_columns: DEFAULT_MAX_COLUMNS,
            scroll_policy: [ScrollPolicy::Minimum; 2],
        }
    }
}

impl GridOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_min_columns(mut self, min_columns: usize) -> Self {
        self.min_columns = min_columns.max(1);
        self
    }

    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = max_columns.max(1);
        self
    }

    pub fn with_scroll_policy(mut self, axis: Axis, policy: ScrollPolicy) -> Self {
        self.scroll_policy[axis as usize] = policy;
        self
    }
}
