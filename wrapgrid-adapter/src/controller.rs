use wrapgrid::{
    Axis, ElementId, ElementPool, GridEngine, GridOptions, Orientation, PixelRect, SizeRequest,
    TextDirection,
};

use crate::ScrollStore;

/// Minimum number of rows worth of items the recycler is asked to keep
/// realized around the anchor, scaled by the column bound so at least this
/// many rows stay coverable.
pub const MIN_VISIBLE_ROWS: usize = 30;

/// The item kept pixel-stable, and where in the viewport it sticks.
///
/// `align_*` is the fraction of the page at which the anchored edge sits;
/// `start_*` picks the leading or trailing edge of the item's cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    /// Anchored item, or `None` while the collection is empty.
    pub position: Option<usize>,
    pub align_primary: f64,
    pub start_primary: bool,
    pub align_cross: f64,
    pub start_cross: bool,
}

impl Anchor {
    fn origin() -> Self {
        Self {
            position: Some(0),
            align_primary: 0.0,
            start_primary: true,
            align_cross: 0.0,
            start_cross: true,
        }
    }

    fn vacant() -> Self {
        Self {
            position: None,
            ..Self::origin()
        }
    }
}

/// Which reconciliation, if any, an axis is currently running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReconcileState {
    #[default]
    Idle,
    /// An external store value is being turned into a new anchor.
    ReconcilingFromScroll,
    /// A re-layout is pushing an anchor-derived value into the store.
    ReconcilingFromLayout,
}

/// The span of items the recycler should keep realized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RealizeWindow {
    pub position: usize,
    pub n_before: usize,
    pub n_after: usize,
}

/// Ties a [`GridEngine`] to two scroll-position stores and keeps an anchored
/// item pixel-stable across relayouts.
///
/// The host drives it by calling:
/// - [`items_changed`](Self::items_changed) for collection mutations
/// - [`set_scroll_value`](Self::set_scroll_value) for external scrolling
/// - [`measure`](Self::measure)/[`allocate`](Self::allocate) from its layout
///   hooks, re-allocating whenever [`needs_allocate`](Self::needs_allocate)
///   reports true
///
/// Realization is reported straight to the engine via
/// [`engine_mut`](Self::engine_mut); [`realize_window`](Self::realize_window)
/// tells the recycler which items are worth keeping alive.
#[derive(Clone, Debug)]
pub struct GridController<E = ElementId> {
    engine: GridEngine<E>,
    stores: [ScrollStore; 2],
    direction: TextDirection,
    anchor: Anchor,
    state: [ReconcileState; 2],
    needs_allocate: bool,
}

impl<E: Copy> GridController<E> {
    pub fn new(options: GridOptions) -> Self {
        Self {
            engine: GridEngine::new(options),
            stores: [ScrollStore::new(), ScrollStore::new()],
            direction: TextDirection::Ltr,
            anchor: Anchor::vacant(),
            state: [ReconcileState::Idle; 2],
            needs_allocate: false,
        }
    }

    pub fn engine(&self) -> &GridEngine<E> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GridEngine<E> {
        &mut self.engine
    }

    pub fn store(&self, axis: Axis) -> &ScrollStore {
        &self.stores[axis as usize]
    }

    pub fn connect_value_changed(&mut self, axis: Axis, f: impl Fn(i64) + Send + Sync + 'static) {
        self.stores[axis as usize].connect_value_changed(f);
    }

    pub fn direction(&self) -> TextDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: TextDirection) {
        if self.direction == direction {
            return;
        }
        self.direction = direction;
        self.needs_allocate = true;
    }

    pub fn set_min_columns(&mut self, min_columns: usize) {
        self.engine.set_min_columns(min_columns);
        self.needs_allocate = true;
    }

    pub fn set_max_columns(&mut self, max_columns: usize) {
        self.engine.set_max_columns(max_columns);
        self.needs_allocate = true;
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn anchor_position(&self) -> Option<usize> {
        self.anchor.position
    }

    /// Whether state changed since the last [`allocate`](Self::allocate).
    pub fn needs_allocate(&self) -> bool {
        self.needs_allocate
    }

    /// The items the recycler should keep realized, centered on the anchor
    /// and weighted by its alignment.
    pub fn realize_window(&self) -> Option<RealizeWindow> {
        let position = self.anchor.position?;
        let rows = MIN_VISIBLE_ROWS as f64;
        let columns = self.engine.options().max_columns as f64;
        Some(RealizeWindow {
            position,
            n_before: ((rows * self.anchor.align_primary + 1.0) * columns) as usize,
            n_after: ((rows * (1.0 - self.anchor.align_primary) + 1.0) * columns) as usize,
        })
    }

    /// Applies an ordered collection change and moves the anchor with the
    /// item it tracks.
    pub fn items_changed(&mut self, start: usize, removed: usize, added: usize) {
        self.engine.splice(start, removed, added);
        let n_items = self.engine.n_items();
        match self.anchor.position {
            None => {
                if n_items > 0 {
                    self.anchor = Anchor::origin();
                }
            }
            Some(position) => {
                if n_items == 0 {
                    self.anchor = Anchor::vacant();
                } else if position >= start + removed {
                    self.anchor.position = Some(position + added - removed);
                } else if position >= start {
                    // the anchored item went away; degrade to the splice point
                    self.anchor.position = Some(start.min(n_items - 1));
                }
            }
        }
        self.needs_allocate = true;
    }

    /// Size request of the grid along `orientation` for `for_size` pixels in
    /// the opposite axis (`-1` = unconstrained).
    pub fn measure(
        &self,
        pool: &impl ElementPool<E>,
        orientation: Orientation,
        for_size: i64,
    ) -> SizeRequest {
        self.engine.measure(pool, orientation, for_size)
    }

    /// Reports an external scroll-position change (wheel, drag, scrollbar)
    /// and re-derives the anchor from the new value.
    ///
    /// Changes arriving while a reconciliation for the axis is already in
    /// flight are ignored; that is the re-entrancy guard.
    pub fn set_scroll_value(&mut self, axis: Axis, value: i64) {
        if self.state[axis as usize] != ReconcileState::Idle {
            return;
        }
        if !self.stores[axis as usize].set_value(value) {
            return;
        }
        self.state[axis as usize] = ReconcileState::ReconcilingFromScroll;
        self.reconcile_from_scroll(axis);
        self.state[axis as usize] = ReconcileState::Idle;
        self.needs_allocate = true;
    }

    /// Runs a full layout pass: re-layout the engine for the given widget
    /// size, push anchor-derived values into both stores, and report a
    /// placement rectangle for every realized element.
    pub fn allocate(
        &mut self,
        pool: &impl ElementPool<E>,
        width: i64,
        height: i64,
        mut place: impl FnMut(E, PixelRect),
    ) {
        self.needs_allocate = false;
        let orientation = self.engine.options().orientation;
        let (primary_page, cross_page) = match orientation {
            Orientation::Vertical => (height, width),
            Orientation::Horizontal => (width, height),
        };

        self.engine.update_layout(pool, cross_page);

        let x = -self.update_store(Axis::Cross, cross_page);
        let y = -self.update_store(Axis::Primary, primary_page);

        let viewport = self.engine.viewport();
        let n = viewport.n_columns.max(1);
        let column_width = viewport.column_width;
        let mut position = 0usize;
        let mut run = self.engine.first_run();
        while let Some(r) = run {
            if let Some(element) = self.engine.run_element(r) {
                if let Some(span) = self.engine.offset_of_position(position) {
                    let col = (position % n) as f64;
                    let cross_pos = (column_width * col).ceil() as i64;
                    let cross_size = (column_width * (col + 1.0)).ceil() as i64 - cross_pos;
                    place(
                        element,
                        self.widget_rect(
                            width,
                            y + span.offset,
                            x + cross_pos,
                            span.size,
                            cross_size,
                        ),
                    );
                }
            }
            position += self.engine.run_items(r);
            run = self.engine.next_run(r);
        }
    }

    /// Whether the physically-horizontal store of `axis` runs right-to-left.
    fn is_flipped(&self, axis: Axis) -> bool {
        let horizontal = matches!(
            (self.engine.options().orientation, axis),
            (Orientation::Vertical, Axis::Cross) | (Orientation::Horizontal, Axis::Primary)
        );
        horizontal && self.direction == TextDirection::Rtl
    }

    fn widget_rect(
        &self,
        widget_width: i64,
        main_pos: i64,
        cross_pos: i64,
        main_size: i64,
        cross_size: i64,
    ) -> PixelRect {
        match (self.engine.options().orientation, self.direction) {
            (Orientation::Vertical, _) => PixelRect {
                x: cross_pos,
                y: main_pos,
                width: cross_size,
                height: main_size,
            },
            (Orientation::Horizontal, TextDirection::Ltr) => PixelRect {
                x: main_pos,
                y: cross_pos,
                width: main_size,
                height: cross_size,
            },
            (Orientation::Horizontal, TextDirection::Rtl) => PixelRect {
                x: widget_width - main_pos - main_size,
                y: cross_pos,
                width: main_size,
                height: cross_size,
            },
        }
    }

    /// Store→anchor: find the item at the aligned page offset and re-derive
    /// the anchor so that recomputing the value later is pixel-exact.
    fn reconcile_from_scroll(&mut self, axis: Axis) {
        let n_items = self.engine.n_items();
        if n_items == 0 {
            self.anchor = Anchor::vacant();
            return;
        }
        let viewport = self.engine.viewport();
        let n = viewport.n_columns.max(1);
        let store = &self.stores[axis as usize];
        let page = store.page_size();
        let upper = store.upper();
        let mut value = store.value();
        if self.is_flipped(axis) {
            value = upper - page - value;
        }
        let scrollable = (upper - page).max(0);
        let anchor_pos = self.anchor.position.unwrap_or(0);

        let mut align_primary = self.anchor.align_primary;
        let mut start_primary = self.anchor.start_primary;
        let mut align_cross = self.anchor.align_cross;
        let mut start_cross = self.anchor.start_cross;
        let mut position;

        // How far along the page the scrolled-to content sits; the cell at
        // that pixel becomes the anchor so the round trip reproduces `value`.
        let estimate = if scrollable > 0 {
            value as f64 / scrollable as f64
        } else {
            0.0
        };
        let from_start = (estimate * page as f64).round() as i64;

        if axis == Axis::Primary {
            if let Some(hit) = self.engine.cell_at_offset(value + from_start) {
                let top = from_start - hit.offset;
                let bottom = top + hit.size;
                // prefer an edge inside the visible page
                start_primary = if top > 0 && bottom < page {
                    from_start - top <= bottom - from_start
                } else if top > 0 {
                    true
                } else if bottom < page {
                    false
                } else {
                    // the cell spans the whole page; the alignment may leave [0..1]
                    from_start - top <= bottom - from_start
                };
                let edge = if start_primary { top } else { bottom };
                align_primary = if page > 0 { edge as f64 / page as f64 } else { 0.0 };
                position = hit.position;
            } else {
                // scrolled past the last cell; anchor the end of the last row
                position = (n_items - 1) - (n_items - 1) % n;
                align_primary = 1.0;
                start_primary = false;
            }
            // keep the column component of the anchor intact
            position += anchor_pos % n;
        } else {
            let column_width = viewport.column_width.max(1.0);
            let col = ((value + from_start) as f64 / column_width).floor() as i64;
            let col = col.max(0) as usize;
            if col >= n {
                // scrolling to the end lands exactly one column past
                position = n - 1;
                start_cross = false;
                align_cross = 1.0;
            } else {
                let top = (column_width * col as f64).ceil() as i64 - value;
                let bottom = (column_width * (col as f64 + 1.0)).ceil() as i64 - value;
                start_cross = if top > 0 && bottom < page {
                    from_start - top <= bottom - from_start
                } else if top > 0 {
                    true
                } else if bottom < page {
                    false
                } else {
                    from_start - top <= bottom - from_start
                };
                let edge = if start_cross { top } else { bottom };
                align_cross = if page > 0 { edge as f64 / page as f64 } else { 0.0 };
                position = col;
            }
            // keep the row component of the anchor intact
            position += anchor_pos - anchor_pos % n;
        }

        if position >= n_items {
            // the anchor column points into the trailing, incomplete row;
            // clamp to the last item and realign against the cross store,
            // whose row is visually short
            let cross = &self.stores[Axis::Cross as usize];
            position = n_items - 1;
            start_cross = false;
            let edge = (viewport.column_width * ((position % n) as f64 + 1.0)).ceil() as i64
                - cross.value();
            align_cross = if cross.page_size() > 0 {
                edge as f64 / cross.page_size() as f64
            } else {
                0.0
            };
        }

        gtrace!(
            position,
            align_primary,
            align_cross,
            "reconcile_from_scroll"
        );
        self.anchor = Anchor {
            position: Some(position),
            align_primary,
            start_primary,
            align_cross,
            start_cross,
        };
    }

    /// Layout→store: place the anchor's aligned edge at `align * page_size`
    /// and push the resulting value and bounds, notifications suppressed.
    ///
    /// Returns the pushed value (post-flip), which is also the content origin
    /// used for placement.
    fn update_store(&mut self, axis: Axis, page_size: i64) -> i64 {
        let Some(anchor_pos) = self.anchor.position else {
            return self.configure_store(axis, 0, 0, 0);
        };
        let viewport = self.engine.viewport();
        let (value, upper) = if axis == Axis::Primary {
            let Some(span) = self.engine.offset_of_position(anchor_pos) else {
                debug_assert!(false, "anchor {anchor_pos} has no row");
                return self.configure_store(axis, 0, 0, 0);
            };
            let mut edge = span.offset;
            if !self.anchor.start_primary {
                edge += span.size;
            }
            let value =
                (edge as f64 - self.anchor.align_primary * page_size as f64).round() as i64;
            (value, self.engine.total_size())
        } else {
            let n = viewport.n_columns.max(1);
            let col = (anchor_pos % n) as f64;
            let edge = if self.anchor.start_cross {
                (viewport.column_width * col).ceil()
            } else {
                (viewport.column_width * (col + 1.0)).ceil()
            };
            let value = (edge - self.anchor.align_cross * page_size as f64).round() as i64;
            (value, self.engine.cross_size())
        };
        self.configure_store(axis, value, upper, page_size)
    }

    fn configure_store(&mut self, axis: Axis, value: i64, upper: i64, page_size: i64) -> i64 {
        let upper = upper.max(page_size);
        let mut value = value.max(0).min(upper - page_size);
        if self.is_flipped(axis) {
            value = upper - page_size - value;
        }
        gdebug!(value, upper, page_size, "configure_store");
        self.state[axis as usize] = ReconcileState::ReconcilingFromLayout;
        {
            let store = &self.stores[axis as usize];
            let _suppress = store.suppress();
            store.configure(value, upper, page_size);
        }
        self.state[axis as usize] = ReconcileState::Idle;
        value
    }
}
