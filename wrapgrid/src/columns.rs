use crate::ScrollPolicy;

/// Number of columns that fit into `available` pixels of cross-axis space.
///
/// Rounding down is exactly what is wanted here, so integer division works.
/// Degenerate inputs (zero or negative space, zero measured sizes) fall into
/// the clamp; when `min_columns > max_columns`, the minimum wins.
pub(crate) fn compute_n_columns(
    available: i64,
    measured_min: i64,
    measured_nat: i64,
    policy: ScrollPolicy,
    min_columns: usize,
    max_columns: usize,
) -> usize {
    let per_column = match policy {
        ScrollPolicy::Minimum => measured_min.max(1),
        ScrollPolicy::Natural => measured_nat.max(1),
    };
    let n = (available / per_column).max(0) as usize;
    n.min(max_columns).max(min_columns)
}

/// Width of one column: an even share of the available space, but never less
/// than the widest realized element's minimum.
pub(crate) fn column_width(available: i64, n_columns: usize, measured_min: i64) -> f64 {
    (available as f64 / n_columns.max(1) as f64).max(measured_min as f64)
}
