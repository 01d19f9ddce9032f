//! Drives the engine by hand: splice a collection in, realize a few items,
//! run a layout pass, and poke at the geometry queries.

use wrapgrid::{ElementId, ElementPool, GridEngine, GridOptions, Orientation, SizeRequest};

struct Pool;

impl ElementPool<ElementId> for Pool {
    fn measure(&self, element: ElementId, orientation: Orientation, _for_size: i64) -> SizeRequest {
        let size = match orientation {
            // all cells are 40px wide
            Orientation::Horizontal => 40,
            // heights vary a little by element
            Orientation::Vertical => 24 + (element % 3) as i64 * 4,
        };
        SizeRequest {
            minimum: size,
            natural: size,
        }
    }
}

fn main() {
    let mut engine: GridEngine = GridEngine::new(GridOptions::new());
    engine.splice(0, 0, 10_000);
    for position in 0..12 {
        engine.realize(position, position as ElementId);
    }

    engine.update_layout(&Pool, 200);
    let viewport = engine.viewport();
    println!(
        "{} items wrap into {} columns of {}px, estimated row height {}px",
        engine.n_items(),
        viewport.n_columns,
        viewport.column_width,
        viewport.unknown_row_height,
    );
    println!("total content height: {}px", engine.total_size());

    for position in [0, 7, 4_999, 9_999] {
        let span = engine.offset_of_position(position).unwrap();
        println!(
            "item {position}: row at {}px, {}px tall",
            span.offset, span.size
        );
    }

    let hit = engine.cell_at_offset(engine.total_size() / 2).unwrap();
    println!(
        "halfway down sits the row leading with item {} ({}px into it)",
        hit.position, hit.offset
    );
}
