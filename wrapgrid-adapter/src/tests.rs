use crate::*;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use wrapgrid::{
    Axis, ElementId, ElementPool, GridOptions, Orientation, PixelRect, SizeRequest, TextDirection,
};

/// Every element measures the same: `width` across, `height` along.
struct UniformPool {
    width: i64,
    height: i64,
}

impl ElementPool<ElementId> for UniformPool {
    fn measure(&self, _element: ElementId, orientation: Orientation, _for_size: i64) -> SizeRequest {
        let size = match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        };
        SizeRequest {
            minimum: size,
            natural: size,
        }
    }
}

/// 12 items, 6 realized, 30px wide and 10px tall cells in a 90px-wide
/// viewport: 3 columns, 4 rows, 40px of content.
fn small_grid() -> (GridController, UniformPool) {
    let mut controller = GridController::new(GridOptions::new());
    controller.items_changed(0, 0, 12);
    for position in 0..6 {
        controller.engine_mut().realize(position, position as ElementId);
    }
    (
        controller,
        UniformPool {
            width: 30,
            height: 10,
        },
    )
}

fn collect_placements(
    controller: &mut GridController,
    pool: &UniformPool,
    width: i64,
    height: i64,
) -> Vec<(ElementId, PixelRect)> {
    let mut out = Vec::new();
    controller.allocate(pool, width, height, |element, rect| {
        out.push((element, rect));
    });
    out
}

#[test]
fn allocate_places_realized_elements() {
    let (mut controller, pool) = small_grid();
    let placements = collect_placements(&mut controller, &pool, 90, 25);

    assert_eq!(placements.len(), 6);
    for (element, rect) in placements {
        let position = element as usize;
        assert_eq!(
            rect,
            PixelRect {
                x: (position % 3) as i64 * 30,
                y: (position / 3) as i64 * 10,
                width: 30,
                height: 10,
            }
        );
    }

    let primary = controller.store(Axis::Primary);
    assert_eq!(primary.value(), 0);
    assert_eq!(primary.upper(), 40);
    assert_eq!(primary.page_size(), 25);
    assert!(!controller.needs_allocate());
}

#[test]
fn anchor_round_trip_is_pixel_exact() {
    let (mut controller, pool) = small_grid();
    controller.allocate(&pool, 90, 25, |_, _| {});
    let max = controller.store(Axis::Primary).max_value();
    assert_eq!(max, 15);

    for value in [0, 7, 11, max] {
        controller.set_scroll_value(Axis::Primary, value);
        assert_eq!(controller.store(Axis::Primary).value(), value);
        controller.allocate(&pool, 90, 25, |_, _| {});
        assert_eq!(
            controller.store(Axis::Primary).value(),
            value,
            "relayout must reproduce the scrolled-to value"
        );
    }
}

#[test]
fn scrolling_to_the_end_anchors_the_last_row() {
    let (mut controller, pool) = small_grid();
    controller.allocate(&pool, 90, 25, |_, _| {});
    let max = controller.store(Axis::Primary).max_value();

    controller.set_scroll_value(Axis::Primary, max);
    let anchor = controller.anchor();
    // the query one pixel past the content clamps to the last row's leader
    assert_eq!(anchor.position, Some(9));
    assert_eq!(anchor.align_primary, 1.0);
    assert!(!anchor.start_primary);
}

#[test]
fn column_count_change_preserves_anchor_identity() {
    let (mut controller, pool) = small_grid();
    controller.allocate(&pool, 90, 25, |_, _| {});
    controller.set_scroll_value(Axis::Primary, 11);
    let anchored = controller.anchor_position().unwrap();
    assert!(controller.needs_allocate());

    // widening the viewport changes the column count, not the anchored item
    controller.allocate(&pool, 150, 25, |_, _| {});
    assert_eq!(controller.engine().viewport().n_columns, 5);
    assert_eq!(controller.anchor_position(), Some(anchored));
}

#[test]
fn layout_pushes_are_suppressed_external_scrolls_notify() {
    let (mut controller, pool) = small_grid();
    let fired = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&fired);
    controller.connect_value_changed(Axis::Primary, move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    controller.allocate(&pool, 90, 25, |_, _| {});
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    controller.set_scroll_value(Axis::Primary, 8);
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // growing the collection above the anchor moves the content, and the
    // corrected value is pushed without echoing back
    controller.items_changed(0, 0, 6);
    controller.allocate(&pool, 90, 25, |_, _| {});
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // the suppression guard released: external scrolls still notify
    controller.set_scroll_value(Axis::Primary, 3);
    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[test]
fn items_changed_moves_the_anchor_with_its_item() {
    let (mut controller, pool) = small_grid();
    controller.allocate(&pool, 90, 25, |_, _| {});
    controller.set_scroll_value(Axis::Primary, 11);
    let anchored = controller.anchor_position().unwrap();

    controller.items_changed(0, 0, 9);
    assert_eq!(controller.anchor_position(), Some(anchored + 9));

    // removing the anchored item degrades the anchor to the splice point
    controller.items_changed(anchored + 9, 1, 0);
    assert_eq!(controller.anchor_position(), Some(anchored + 9));

    // emptying the collection vacates it
    controller.items_changed(0, 20, 0);
    assert_eq!(controller.anchor_position(), None);

    // and the first insertion re-creates it at the origin
    controller.items_changed(0, 0, 4);
    let anchor = controller.anchor();
    assert_eq!(anchor.position, Some(0));
    assert_eq!(anchor.align_primary, 0.0);
    assert!(anchor.start_primary);
}

#[test]
fn empty_collection_zeroes_the_stores() {
    let (mut controller, pool) = small_grid();
    controller.allocate(&pool, 90, 25, |_, _| {});
    assert_eq!(controller.store(Axis::Primary).upper(), 40);

    controller.items_changed(0, 12, 0);
    let placements = collect_placements(&mut controller, &pool, 90, 25);
    assert!(placements.is_empty());
    assert_eq!(controller.store(Axis::Primary).upper(), 0);
    assert_eq!(controller.store(Axis::Primary).value(), 0);
    assert_eq!(controller.engine().cell_at_offset(0), None);
}

/// 23 items in a forced 5-column layout whose columns overflow the 90px
/// viewport: both axes scroll, and the last row holds only 3 items.
fn wide_grid() -> (GridController, UniformPool) {
    let options = GridOptions::new().with_min_columns(5);
    let mut controller = GridController::new(options);
    controller.items_changed(0, 0, 23);
    for position in 0..5 {
        controller.engine_mut().realize(position, position as ElementId);
    }
    (
        controller,
        UniformPool {
            width: 30,
            height: 10,
        },
    )
}

#[test]
fn cross_axis_round_trip_is_pixel_exact() {
    let (mut controller, pool) = wide_grid();
    controller.allocate(&pool, 90, 30, |_, _| {});
    let cross = controller.store(Axis::Cross);
    // 5 columns of 30px against a 90px page
    assert_eq!(cross.upper(), 150);
    assert_eq!(cross.max_value(), 60);

    for value in [25, 0, 60] {
        controller.set_scroll_value(Axis::Cross, value);
        controller.allocate(&pool, 90, 30, |_, _| {});
        assert_eq!(controller.store(Axis::Cross).value(), value);
    }
}

#[test]
fn trailing_short_row_clamps_to_the_last_item() {
    let (mut controller, pool) = wide_grid();
    controller.allocate(&pool, 90, 30, |_, _| {});

    // anchor the rightmost column, then scroll to the bottom: the anchor
    // column points past the 3-item trailing row
    controller.set_scroll_value(Axis::Cross, 60);
    assert_eq!(controller.anchor_position(), Some(4));
    controller.allocate(&pool, 90, 30, |_, _| {});

    let max = controller.store(Axis::Primary).max_value();
    controller.set_scroll_value(Axis::Primary, max);

    let anchor = controller.anchor();
    assert_eq!(anchor.position, Some(22));
    assert!(!anchor.start_cross);
    // realigned against the cross store: trailing edge of column 2 at
    // ceil(30 * 3) = 90px, minus the 60px scroll, over the 90px page
    assert_eq!(anchor.align_cross, (90.0 - 60.0) / 90.0);
}

#[test]
fn rtl_inverts_the_horizontal_store() {
    let (mut controller, pool) = wide_grid();
    controller.set_direction(TextDirection::Rtl);
    controller.allocate(&pool, 90, 30, |_, _| {});

    // anchored to the leading (right) edge: the stored value sits at the
    // far end of the flipped range
    let cross = controller.store(Axis::Cross);
    assert_eq!(cross.upper(), 150);
    assert_eq!(cross.value(), 60);

    // the vertical store is unaffected
    assert_eq!(controller.store(Axis::Primary).value(), 0);
}

#[test]
fn realize_window_follows_the_anchor_alignment() {
    let (mut controller, pool) = small_grid();
    controller.allocate(&pool, 90, 25, |_, _| {});

    let window = controller.realize_window().unwrap();
    assert_eq!(window.position, 0);
    // top-aligned: one row of slack before, the full window after
    assert_eq!(window.n_before, wrapgrid::DEFAULT_MAX_COLUMNS);
    assert_eq!(
        window.n_after,
        (MIN_VISIBLE_ROWS + 1) * wrapgrid::DEFAULT_MAX_COLUMNS
    );

    controller.set_scroll_value(Axis::Primary, controller.store(Axis::Primary).max_value());
    let window = controller.realize_window().unwrap();
    // bottom-aligned: the window flips to the rows above
    assert_eq!(
        window.n_before,
        (MIN_VISIBLE_ROWS + 1) * wrapgrid::DEFAULT_MAX_COLUMNS
    );
    assert_eq!(window.n_after, wrapgrid::DEFAULT_MAX_COLUMNS);
}

#[test]
fn horizontal_orientation_swaps_placement_axes() {
    let options = GridOptions::new().with_orientation(Orientation::Horizontal);
    let mut controller: GridController = GridController::new(options);
    controller.items_changed(0, 0, 6);
    for position in 0..6 {
        controller.engine_mut().realize(position, position as ElementId);
    }
    // cells are 30px tall (cross) and 10px long (primary); a 90px-tall
    // viewport wraps into 3 rows of columns
    struct Sideways;
    impl ElementPool<ElementId> for Sideways {
        fn measure(
            &self,
            _element: ElementId,
            orientation: Orientation,
            _for_size: i64,
        ) -> SizeRequest {
            let size = match orientation {
                Orientation::Vertical => 30,
                Orientation::Horizontal => 10,
            };
            SizeRequest {
                minimum: size,
                natural: size,
            }
        }
    }

    let mut placements = Vec::new();
    controller.allocate(&Sideways, 25, 90, |element, rect| {
        placements.push((element, rect));
    });
    assert_eq!(placements.len(), 6);
    for (element, rect) in placements {
        let position = element as usize;
        assert_eq!(
            rect,
            PixelRect {
                x: (position / 3) as i64 * 10,
                y: (position % 3) as i64 * 30,
                width: 10,
                height: 30,
            }
        );
    }
}
