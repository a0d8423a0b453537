use std::hint::black_box;
use std::time::Instant;

use blockworld_common::{BlockKind, Direction, GridPosition};
use blockworld_kernel::{BlockWorld, Tile, WorldModel};
use blockworld_render::{
    BuilderVariant, DrawList, Projection, RenderView, Renderer, SpriteRenderer, ViewConfig,
    ViewportWindower, paint,
};

/// Square `side` x `side` world, every tile linked to its east and south
/// neighbours both ways, with stacks of varying height.
fn make_world(side: i32) -> BlockWorld {
    let stack = |x: i32, y: i32| -> Vec<BlockKind> {
        let mut blocks = vec![BlockKind::Soil; ((x + y) % 3) as usize];
        if (x * y) % 4 == 0 {
            blocks.push(BlockKind::Wood);
        }
        blocks
    };
    let tile = |x, y| Tile::new(GridPosition::new(x, y), stack(x, y)).expect("valid stack");

    let mut world = BlockWorld::new("Bench", tile(0, 0));
    for x in 0..side {
        for y in 0..side {
            if (x, y) != (0, 0) {
                world.add_tile(tile(x, y)).expect("fresh position");
            }
        }
    }
    for x in 0..side {
        for y in 0..side {
            let here = world.tile_at(GridPosition::new(x, y)).expect("tile");
            for d in [Direction::East, Direction::South] {
                let neighbour = GridPosition::new(x, y).step(d);
                if let Some(next) = neighbour.and_then(|p| world.tile_at(p)) {
                    world.link(here, d, next).expect("aligned");
                }
            }
        }
    }
    world
}

fn bench_windower(side: i32, radius: u32, iterations: usize) {
    let world = make_world(side);
    let windower = ViewportWindower::new(radius);
    let center = GridPosition::new(side / 2, side / 2);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(windower.cells(
            black_box(&world),
            black_box(center),
            BuilderVariant::Plain,
        ));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  cells ({side}x{side}, r={radius}, n={iterations}): {per_iter:?}/iter, {elapsed:?} total"
    );
}

fn bench_paint(radius: u32, iterations: usize) {
    let world = make_world(32);
    let cells =
        ViewportWindower::new(radius).cells(&world, GridPosition::new(0, 0), BuilderVariant::Hat);
    let projection = Projection::default();
    let mut list = DrawList::new();

    let start = Instant::now();
    for _ in 0..iterations {
        paint(black_box(&cells), &projection, &mut list);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  paint (r={radius}, {} draws, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        list.len()
    );
}

fn bench_full_frame(iterations: usize) {
    let world = make_world(64);
    let renderer = SpriteRenderer::new(ViewConfig::default());

    let start = Instant::now();
    for i in 0..iterations {
        // Walk the center along the diagonal
        let c = (i % 64) as i32;
        let view = RenderView::new(GridPosition::new(c, c));
        let _ = black_box(renderer.render(black_box(&world), &view));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  full frame (64x64 world, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Viewport Benchmarks ===\n");

    println!("Windower:");
    bench_windower(16, 4, 10000);
    bench_windower(64, 4, 10000);
    bench_windower(64, 16, 1000);

    println!("\nPaint:");
    bench_paint(4, 10000);
    bench_paint(16, 1000);

    println!("\nFull frame:");
    bench_full_frame(10000);

    println!("\n=== Done ===");
}
