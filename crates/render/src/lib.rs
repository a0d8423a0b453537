//! Rendering Adapter: isometric projection, viewport windowing and
//! renderer-agnostic draw instructions.
//!
//! # Invariants
//! - Renderers only read the world model; they never mutate it.
//! - A frame is a pure function of the world, the view center and the
//!   caller-supplied builder variant.
//! - Cells are emitted in a fixed scan order (x outer, y inner, ascending);
//!   that order is the painter's order.

mod config;
mod draw;
mod projection;
mod renderer;
mod window;

pub use config::ViewConfig;
pub use draw::{DrawInstruction, DrawList, DrawSurface, SpriteTag, paint};
pub use projection::{GROUND_LEVEL, Projection, ScreenRect};
pub use renderer::{DebugTextRenderer, RenderView, Renderer, SpriteRenderer};
pub use window::{
    BuilderVariant, ExitMarker, LayerKind, LayerSprite, MARKER_LIFT, RenderCell, ViewportWindower,
};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
