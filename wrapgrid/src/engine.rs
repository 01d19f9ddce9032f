use crate::columns::{column_width, compute_n_columns};
use crate::estimate::{RowHeightEstimator, lower_median};
use crate::tree::{RunId, RunTree};
use crate::{
    Axis, CellAtOffset, ElementId, GridOptions, Orientation, RowSpan, ScrollPolicy, SizeRequest,
    ViewportState,
};

/// Measurement interface to the realized-element pool.
///
/// The engine owns no visual elements; whoever recycles them implements this
/// to report per-element size requests. `for_size` is the known extent in the
/// opposite axis, or `-1` when unconstrained.
pub trait ElementPool<E> {
    fn measure(&self, element: E, orientation: Orientation, for_size: i64) -> SizeRequest;
}

/// The grid-geometry engine.
///
/// Holds the interval index over item runs plus the per-pass viewport state
/// (column count, column width, estimated row height), and answers the
/// offset ↔ position queries everything else is built on.
///
/// The engine is driven from outside:
/// - the collection reports changes through [`splice`](Self::splice)
/// - the recycler reports realization through [`realize`](Self::realize) and
///   [`unrealize`](Self::unrealize), and walks runs with
///   [`first_run`](Self::first_run)/[`next_run`](Self::next_run)
/// - the host runs [`update_layout`](Self::update_layout) whenever the
///   collection, the realization set, or the available size changed
#[derive(Clone, Debug)]
pub struct GridEngine<E = ElementId> {
    tree: RunTree<E>,
    options: GridOptions,
    viewport: ViewportState,
    estimator: RowHeightEstimator,
}

impl<E: Copy> GridEngine<E> {
    pub fn new(options: GridOptions) -> Self {
        gdebug!(
            min_columns = options.min_columns,
            max_columns = options.max_columns,
            "GridEngine::new"
        );
        let estimator = RowHeightEstimator::new();
        Self {
            tree: RunTree::new(),
            viewport: ViewportState {
                n_columns: options.min_columns.max(1),
                column_width: 0.0,
                unknown_row_height: estimator.height(),
            },
            options,
            estimator,
        }
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Layout state derived by the most recent [`update_layout`](Self::update_layout).
    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    pub fn n_items(&self) -> usize {
        self.tree.total_items()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Total extent of the content along the primary axis, as of the most
    /// recent layout pass.
    pub fn total_size(&self) -> i64 {
        self.tree.total_size()
    }

    /// Total extent of the content along the cross axis.
    pub fn cross_size(&self) -> i64 {
        (self.viewport.column_width * self.viewport.n_columns as f64).round() as i64
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.options.orientation = orientation;
    }

    pub fn set_min_columns(&mut self, min_columns: usize) {
        self.options.min_columns = min_columns.max(1);
    }

    pub fn set_max_columns(&mut self, max_columns: usize) {
        self.options.max_columns = max_columns.max(1);
    }

    pub fn set_scroll_policy(&mut self, axis: Axis, policy: ScrollPolicy) {
        self.options.scroll_policy[axis as usize] = policy;
    }

    // --- collection changes -------------------------------------------------

    /// Applies an ordered collection change: `removed` items starting at
    /// `start` are replaced by `added` new (unrealized) items.
    ///
    /// Run sizes touched by the splice are stale until the next layout pass.
    pub fn splice(&mut self, start: usize, removed: usize, added: usize) {
        let total = self.tree.total_items();
        debug_assert!(
            start <= total && removed <= total.saturating_sub(start),
            "splice out of bounds (start={start}, removed={removed}, total={total})"
        );
        let start = start.min(total);
        let removed = removed.min(total - start);
        gdebug!(start, removed, added, "splice");

        if removed > 0 {
            if let Some((run, _, in_run)) = self.tree.run_at_position(start) {
                let mut to_remove = removed;
                let mut cur = run;
                if in_run > 0 {
                    let n = self.tree.n_items(run);
                    let take = (n - in_run).min(to_remove);
                    self.tree.set_items(run, n - take);
                    to_remove -= take;
                    cur = self.tree.next(run);
                }
                while to_remove > 0 && !cur.is_nil() {
                    let n = self.tree.n_items(cur);
                    let next = self.tree.next(cur);
                    if n <= to_remove {
                        to_remove -= n;
                        self.tree.remove(cur);
                    } else {
                        self.tree.set_items(cur, n - to_remove);
                        to_remove = 0;
                    }
                    cur = next;
                }
            }
        }

        if added > 0 {
            match self.tree.run_at_position(start) {
                Some((run, _, in_run)) if in_run > 0 => {
                    // the splice point lies inside an unrealized run
                    let n = self.tree.n_items(run);
                    self.tree.set_items(run, n + added);
                }
                Some((run, _, _)) => {
                    let prev = self.tree.prev(run);
                    if !prev.is_nil() && self.tree.element(prev).is_none() {
                        let n = self.tree.n_items(prev);
                        self.tree.set_items(prev, n + added);
                    } else if self.tree.element(run).is_none() {
                        let n = self.tree.n_items(run);
                        self.tree.set_items(run, n + added);
                    } else {
                        self.tree.insert_before(run, added, 0, None);
                    }
                }
                None => {
                    let last = self.tree.last();
                    if !last.is_nil() && self.tree.element(last).is_none() {
                        let n = self.tree.n_items(last);
                        self.tree.set_items(last, n + added);
                    } else {
                        self.tree.insert_before(RunId::NIL, added, 0, None);
                    }
                }
            }
        }

        self.coalesce_around(start);
    }

    // --- realization --------------------------------------------------------

    /// Binds a realized element to the item at `position`, splitting the
    /// covering run at the realization boundary.
    pub fn realize(&mut self, position: usize, element: E) {
        let Some((run, _, in_run)) = self.tree.run_at_position(position) else {
            debug_assert!(false, "realize past the end (position={position})");
            return;
        };
        if self.tree.element(run).is_some() {
            // rebinding an already realized item
            self.tree.set_element(run, Some(element));
            return;
        }
        gtrace!(position, "realize");
        let run = if in_run > 0 {
            let n = self.tree.n_items(run);
            self.tree.set_items(run, in_run);
            let next = self.tree.next(run);
            self.tree.insert_before(next, n - in_run, 0, None)
        } else {
            run
        };
        let n = self.tree.n_items(run);
        if n > 1 {
            let next = self.tree.next(run);
            self.tree.insert_before(next, n - 1, 0, None);
            self.tree.set_items(run, 1);
        }
        self.tree.set_element(run, Some(element));
    }

    /// Drops the realized element at `position` and merges the run back into
    /// its unrealized neighbors.
    pub fn unrealize(&mut self, position: usize) {
        let Some((run, _, in_run)) = self.tree.run_at_position(position) else {
            debug_assert!(false, "unrealize past the end (position={position})");
            return;
        };
        if self.tree.element(run).is_none() {
            return;
        }
        debug_assert!(in_run == 0, "realized runs cover a single item");
        gtrace!(position, "unrealize");
        self.tree.set_element(run, None);
        let mut run = run;
        let prev = self.tree.prev(run);
        if self.merge_unrealized(prev, run) {
            run = prev;
        }
        let next = self.tree.next(run);
        self.merge_unrealized(run, next);
    }

    /// Merges `b` into `a` when both are live and unrealized.
    fn merge_unrealized(&mut self, a: RunId, b: RunId) -> bool {
        if a.is_nil() || b.is_nil() {
            return false;
        }
        if self.tree.element(a).is_some() || self.tree.element(b).is_some() {
            return false;
        }
        let items = self.tree.n_items(a) + self.tree.n_items(b);
        let size = self.tree.size(a) + self.tree.size(b);
        self.tree.set_items(a, items);
        self.tree.set_size(a, size);
        self.tree.remove(b);
        true
    }

    fn coalesce_around(&mut self, position: usize) {
        let mut run = match self.tree.run_at_position(position) {
            Some((run, _, _)) => run,
            None => self.tree.last(),
        };
        if run.is_nil() {
            return;
        }
        let prev = self.tree.prev(run);
        if self.merge_unrealized(prev, run) {
            run = prev;
        }
        let next = self.tree.next(run);
        self.merge_unrealized(run, next);
    }

    // --- run iteration (consumed by the recycler) ---------------------------

    pub fn first_run(&self) -> Option<RunId> {
        let first = self.tree.first();
        (!first.is_nil()).then_some(first)
    }

    pub fn next_run(&self, run: RunId) -> Option<RunId> {
        let next = self.tree.next(run);
        (!next.is_nil()).then_some(next)
    }

    pub fn run_items(&self, run: RunId) -> usize {
        self.tree.n_items(run)
    }

    pub fn run_size(&self, run: RunId) -> i64 {
        self.tree.size(run)
    }

    pub fn run_element(&self, run: RunId) -> Option<E> {
        self.tree.element(run)
    }

    // --- measurement --------------------------------------------------------

    /// Size request of the whole grid along `orientation`, given `for_size`
    /// pixels in the opposite axis (`-1` = unconstrained).
    pub fn measure(
        &self,
        pool: &impl ElementPool<E>,
        orientation: Orientation,
        for_size: i64,
    ) -> SizeRequest {
        if orientation == self.options.orientation {
            self.measure_primary(pool, for_size)
        } else {
            self.measure_across(pool)
        }
    }

    fn measure_across(&self, pool: &impl ElementPool<E>) -> SizeRequest {
        let (min, nat) = self.measure_column_size(pool);
        SizeRequest {
            minimum: min * self.options.min_columns as i64,
            natural: nat * self.options.max_columns as i64,
        }
    }

    fn measure_primary(&self, pool: &impl ElementPool<E>, for_size: i64) -> SizeRequest {
        let (col_min, col_nat) = self.measure_column_size(pool);
        let for_size = for_size.max(col_min * self.options.min_columns as i64);
        let n = compute_n_columns(
            for_size,
            col_min,
            col_nat,
            self.options.scroll_policy[Axis::Cross as usize],
            self.options.min_columns,
            self.options.max_columns,
        );
        let column_size = for_size / n as i64;

        let mut heights = Vec::new();
        let mut n_unknown = 0usize;
        let mut height = 0i64;
        let mut i = 0usize;
        let mut row_height = 0i64;
        let mut measured = false;
        let mut run = self.tree.first();
        while !run.is_nil() {
            if let Some(element) = self.tree.element(run) {
                let req = pool.measure(element, self.options.orientation, column_size);
                row_height = row_height.max(self.pick(req, Axis::Primary));
                measured = true;
            }
            i += self.tree.n_items(run);
            if i >= n {
                if measured {
                    heights.push(row_height);
                    i -= n;
                    height += row_height;
                    measured = false;
                    row_height = 0;
                }
                n_unknown += i / n;
                i %= n;
            }
            run = self.tree.next(run);
        }
        if i > 0 {
            if measured {
                heights.push(row_height);
                height += row_height;
            } else {
                n_unknown += 1;
            }
        }
        if n_unknown > 0 {
            let unknown = lower_median(&mut heights).unwrap_or(self.estimator.height());
            height += n_unknown as i64 * unknown;
        }
        SizeRequest {
            minimum: height,
            natural: height,
        }
    }

    /// Cross-axis size request of a single column: the max over all realized
    /// elements.
    fn measure_column_size(&self, pool: &impl ElementPool<E>) -> (i64, i64) {
        let opposite = self.options.orientation.opposite();
        let mut min = 0i64;
        let mut nat = 0i64;
        let mut run = self.tree.first();
        while !run.is_nil() {
            if let Some(element) = self.tree.element(run) {
                let req = pool.measure(element, opposite, -1);
                min = min.max(req.minimum);
                nat = nat.max(req.natural);
            }
            run = self.tree.next(run);
        }
        (min, nat)
    }

    fn pick(&self, req: SizeRequest, axis: Axis) -> i64 {
        match self.options.scroll_policy[axis as usize] {
            ScrollPolicy::Minimum => req.minimum,
            ScrollPolicy::Natural => req.natural,
        }
    }

    // --- layout -------------------------------------------------------------

    /// Runs a full re-layout pass for `available` pixels of cross-axis space:
    /// solves the column count and width, re-measures realized rows, updates
    /// the row-height estimate, and rewrites every run's pixel size.
    pub fn update_layout(&mut self, pool: &impl ElementPool<E>, available: i64) {
        if self.tree.is_empty() {
            return;
        }

        let (col_min, col_nat) = self.measure_column_size(pool);
        let n = compute_n_columns(
            available,
            col_min,
            col_nat,
            self.options.scroll_policy[Axis::Cross as usize],
            self.options.min_columns,
            self.options.max_columns,
        );
        self.viewport.n_columns = n;
        self.viewport.column_width = column_width(available, n, col_min);
        let for_size = self.viewport.column_width as i64;

        // Measured rows: every run's size is rewritten; a row's height goes to
        // the run containing the row's first item.
        let mut heights = Vec::new();
        let mut i = 0usize;
        let mut row_height = 0i64;
        let mut measured = false;
        let mut start = RunId::NIL;
        let mut run = self.tree.first();
        while !run.is_nil() {
            if i == 0 {
                start = run;
            }
            if let Some(element) = self.tree.element(run) {
                let req = pool.measure(element, self.options.orientation, for_size);
                row_height = row_height.max(self.pick(req, Axis::Primary));
                measured = true;
            }
            self.tree.set_size(run, 0);
            i += self.tree.n_items(run);
            if i >= n {
                i %= n;
                if measured {
                    heights.push(row_height);
                }
                let size = self.tree.size(start);
                self.tree.set_size(start, size + row_height);
                start = run;
                row_height = 0;
                measured = false;
            }
            run = self.tree.next(run);
        }
        if i > 0 {
            if measured {
                heights.push(row_height);
            }
            let size = self.tree.size(start);
            self.tree.set_size(start, size + row_height);
        }

        // Rows with no realized item get the estimated height.
        self.viewport.unknown_row_height = self.estimator.observe(&mut heights);
        let unknown = self.viewport.unknown_row_height;
        gdebug!(
            n_columns = n,
            unknown_row_height = unknown,
            "update_layout"
        );

        let mut i = 0usize;
        let mut known = false;
        let mut start = RunId::NIL;
        let mut run = self.tree.first();
        while !run.is_nil() {
            if i == 0 {
                start = run;
            }
            if self.tree.element(run).is_some() {
                known = true;
            }
            i += self.tree.n_items(run);
            if i >= n {
                if !known {
                    let size = self.tree.size(start);
                    self.tree.set_size(start, size + unknown);
                }
                i -= n;
                known = false;
                if i >= n {
                    let size = self.tree.size(run);
                    self.tree.set_size(run, size + (i / n) as i64 * unknown);
                    i %= n;
                }
                start = run;
            }
            run = self.tree.next(run);
        }
        if i > 0 && !known {
            let size = self.tree.size(start);
            self.tree.set_size(start, size + unknown);
        }
    }

    // --- geometry queries ---------------------------------------------------

    /// The row occupying pixel `offset` along the primary axis.
    ///
    /// Returns the position of the row's first item, the remaining offset
    /// into the row, and the row's height. `None` when `offset` lies beyond
    /// the content (or the grid is empty); callers use this as an existence
    /// test.
    pub fn cell_at_offset(&self, offset: i64) -> Option<CellAtOffset> {
        let n = self.viewport.n_columns.max(1);
        let (run, mut position, mut offset) = self.tree.run_at_offset(offset)?;
        let mut n_items = self.tree.n_items(run);

        // The run may begin mid-row; those items finish a row whose height
        // lives in an earlier run.
        let rem = position % n;
        if rem != 0 {
            let skip = n - rem;
            debug_assert!(n_items > skip, "a run with extent contains a row start");
            n_items -= skip.min(n_items.saturating_sub(1));
            position += skip;
        }

        // Step over whole rows of estimated height.
        let unknown = self.viewport.unknown_row_height.max(1);
        let no_widget_rows = (n_items - 1) / n;
        let skip = ((offset / unknown) as usize).min(no_widget_rows);
        offset -= skip as i64 * unknown;
        position += n * skip;
        let size = if skip < no_widget_rows {
            unknown
        } else {
            self.tree.size(run) - no_widget_rows as i64 * unknown
        };
        Some(CellAtOffset {
            position,
            offset,
            size,
        })
    }

    /// The pixel span of the row containing item `position`.
    ///
    /// `None` when `position` lies beyond the collection.
    pub fn offset_of_position(&self, position: usize) -> Option<RowSpan> {
        if position >= self.tree.total_items() {
            return None;
        }
        let n = self.viewport.n_columns.max(1);
        // the index tracks row-granularity extents; query the row's leader
        let position = position - position % n;
        let (run, mut offset, mut rel) = self.tree.run_at_position(position)?;
        let mut n_items = self.tree.n_items(run);

        // Leading items that finish a row starting in an earlier run.
        let lead = rel % n;
        if lead != 0 {
            n_items -= lead;
            rel -= lead;
        }

        let unknown = self.viewport.unknown_row_height;
        let skip = rel / n;
        n_items -= skip * n;
        offset += skip as i64 * unknown;
        let size = if n_items > n {
            unknown
        } else {
            self.tree.size(run) - skip as i64 * unknown
        };
        Some(RowSpan { offset, size })
    }
}
