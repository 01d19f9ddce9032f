//! Simulates a scrolling session: the controller keeps the anchor stable
//! while the "user" drags the scrollbar and the collection mutates.

use wrapgrid::{Axis, ElementId, ElementPool, GridOptions, Orientation, SizeRequest};
use wrapgrid_adapter::GridController;

struct Pool;

impl ElementPool<ElementId> for Pool {
    fn measure(&self, _element: ElementId, orientation: Orientation, _for_size: i64) -> SizeRequest {
        let size = match orientation {
            Orientation::Horizontal => 50,
            Orientation::Vertical => 30,
        };
        SizeRequest {
            minimum: size,
            natural: size,
        }
    }
}

const WIDTH: i64 = 200;
const HEIGHT: i64 = 120;

fn relayout(controller: &mut GridController) {
    let mut shown = 0;
    controller.allocate(&Pool, WIDTH, HEIGHT, |_, _| shown += 1);
    let store = controller.store(Axis::Primary);
    println!(
        "  placed {shown} elements, scroll {}..{} of {}",
        store.value(),
        store.value() + store.page_size(),
        store.upper(),
    );
}

fn main() {
    let mut controller = GridController::new(GridOptions::new());
    controller.connect_value_changed(Axis::Primary, |value| {
        println!("  scrollbar moved to {value}");
    });

    controller.items_changed(0, 0, 500);
    let window = controller.realize_window().unwrap();
    for position in window.position..(window.position + window.n_after).min(500) {
        controller.engine_mut().realize(position, position as ElementId);
    }
    relayout(&mut controller);

    println!("user scrolls down:");
    controller.set_scroll_value(Axis::Primary, 1_000);
    relayout(&mut controller);
    println!("anchored to item {:?}", controller.anchor_position());

    println!("50 items arrive above the viewport:");
    controller.items_changed(0, 0, 50);
    relayout(&mut controller);
    println!(
        "anchored item followed its content to {:?}",
        controller.anchor_position()
    );
}
