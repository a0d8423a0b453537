//! World Kernel: the world model contract plus the reference block world.
//!
//! # Invariants
//! - Every mutation goes through a `WorldModel` operation and records a
//!   `WorldEvent` until the owner drains it.
//! - A rejected operation leaves the world unchanged.
//! - Tile positions agree with exit directions: an exit `d` from `a` leads to
//!   the tile at `a.step(d)`. No exit points past the edge of the `i32` grid.

pub mod block;
pub mod model;
pub mod world;

pub use block::BlockProperties;
pub use model::{TileId, WorldError, WorldModel};
pub use world::{BlockWorld, Builder, Tile, WorldEvent};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
