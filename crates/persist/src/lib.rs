//! Persistence: map text files and integrity-checked JSON snapshots.
//!
//! # Invariants
//! - Loading either returns a complete, rule-abiding world or an error; a
//!   partially built world is never handed out.
//! - Saving then loading reproduces the same `state_hash`, with the builder's
//!   current tile as the new start.
//! - Snapshots are content-addressed and verified on load.

mod error;
mod mapfile;
mod snapshot;
mod store;

pub use error::StoreError;
pub use mapfile::{parse_map, write_map};
pub use snapshot::{SNAPSHOT_SCHEMA_VERSION, Snapshot, SnapshotBody, TileRecord};
pub use store::{MapFormat, load_world, read_world, save_world, write_world};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
