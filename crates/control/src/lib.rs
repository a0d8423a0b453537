//! Control layer: turns intents into world calls and keeps the view in step.
//!
//! # Invariants
//! - The view center moves only when the builder moves successfully, and by
//!   exactly one unit in the move direction.
//! - Every intent handled while a world is loaded repaints the view exactly
//!   once, after the world call returns.
//! - World rejections become fixed player-facing messages; nothing here is
//!   fatal.
//! - A failed load keeps the previous world and view.

pub mod controller;
pub mod dispatcher;
pub mod sync;

pub use controller::{Controller, Notice};
pub use dispatcher::{Dispatcher, FailureKind, Outcome, Session};
pub use sync::{InventoryEntry, MANY_STEPS, Panel, STEP_DISPLAY_LIMIT, steps_label, synchronize};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
