//! A headless virtualization engine for scrollable, wrapping grids.
//!
//! This crate focuses on the core geometry needed to present a huge, mutable
//! collection as a grid that wraps into columns: an augmented interval index
//! over contiguous item runs, fast offset → row and row → offset lookup, a
//! column count/width solver, and median-based height estimation for rows that
//! have no realized element yet.
//!
//! It is UI-agnostic. A widget layer is expected to provide:
//! - the available size on each layout pass
//! - realization state (which items are bound to reusable on-screen elements)
//! - element measurements through the [`ElementPool`] trait
//!
//! For the scroll-position stores and the anchoring protocol that keeps an
//! item pixel-stable across relayouts, see the `wrapgrid-adapter` crate.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod columns;
mod engine;
mod estimate;
mod options;
mod state;
mod tree;
mod types;


pub use engine::{ElementPool, GridEngine};
pub use options::{DEFAULT_MAX_COLUMNS, GridOptions};
pub use state::ViewportState;
pub use tree::RunId;
pub use types::{
    Axis, CellAtOffset, ElementId, Orientation, PixelRect, RowSpan, ScrollPolicy, SizeRequest,
    TextDirection,
};
