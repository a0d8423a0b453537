//! Input layer: raw presses and typed commands become [`Intent`] values.
//!
//! # Invariants
//! - The set of intents is closed; the control layer matches on it
//!   exhaustively.
//! - Key and button mapping never consults world state.

pub mod bindings;
pub mod intent;

pub use bindings::{InputMapper, Key, PadButton};
pub use intent::{Intent, ParseIntentError};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
