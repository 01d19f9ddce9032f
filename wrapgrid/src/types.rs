/// Physical axis of a widget.
///
/// The grid scrolls along its orientation and wraps items into columns along
/// the opposite axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn opposite(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

/// Logical axis of the grid, relative to its orientation.
///
/// `Primary` is the scrolling direction, `Cross` the wrapping (column-count)
/// direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Primary = 0,
    Cross = 1,
}

/// Direction text (and therefore the leading edge of horizontal axes) flows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Whether an axis is sized from minimum or natural element sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollPolicy {
    #[default]
    Minimum,
    Natural,
}

/// A minimum/natural size pair, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeRequest {
    pub minimum: i64,
    pub natural: i64,
}

/// A placement rectangle in widget coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Result of an offset → row lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAtOffset {
    /// Position of the item in the row's first column.
    pub position: usize,
    /// Offset of the queried pixel from the top of the row.
    pub offset: i64,
    /// Height of the row, along the primary axis.
    pub size: i64,
}

/// Result of a position → offset lookup: the pixel span of a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowSpan {
    /// Offset of the row's first pixel, along the primary axis.
    pub offset: i64,
    /// Height of the row, along the primary axis.
    pub size: i64,
}

/// Default handle type for realized elements.
///
/// The engine never inspects element handles; they are handed back to the
/// element pool for measurement and to the host for placement.
pub type ElementId = u64;
