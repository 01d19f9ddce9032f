//! Scroll-position stores and anchoring for the `wrapgrid` crate.
//!
//! The `wrapgrid` crate is UI-agnostic and focuses on grid geometry. This
//! crate adds the pieces that tie the geometry to a scrollable widget:
//!
//! - [`ScrollStore`]: the bounded value/page/upper triple backing a scrollbar,
//!   with change notifications and an RAII suppression guard
//! - [`GridController`]: the anchoring protocol that keeps one item
//!   pixel-stable across relayouts, viewport resizes, collection mutations,
//!   and column-count changes
//!
//! This crate is intentionally framework-agnostic (no toolkit bindings).
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod controller;
mod store;

#[cfg(test)]
mod tests;

pub use controller::{Anchor, GridController, MIN_VISIBLE_ROWS, RealizeWindow, ReconcileState};
pub use store::{ScrollStore, SuppressGuard, ValueChangedCallback};
