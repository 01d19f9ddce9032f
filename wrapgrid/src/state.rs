/// A snapshot of the per-pass layout state derived by the engine.
///
/// Updated by every [`crate::GridEngine::update_layout`] call and consumed by
/// the geometry queries and the anchoring layer.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    /// Number of columns items wrap into, clamped into the configured bounds.
    pub n_columns: usize,
    /// Width of one column along the cross axis.
    pub column_width: f64,
    /// Assumed height for rows that contain no realized item.
    pub unknown_row_height: i64,
}
