use crate::config::ViewConfig;
use crate::draw::{paint, DrawList};
use crate::window::{BuilderVariant, LayerKind, ViewportWindower};
use blockworld_common::GridPosition;
use blockworld_kernel::WorldModel;

/// What to draw: the view center and the builder's look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderView {
    pub center: GridPosition,
    pub variant: BuilderVariant,
}

impl RenderView {
    pub fn new(center: GridPosition) -> Self {
        Self {
            center,
            variant: BuilderVariant::Plain,
        }
    }

    pub fn with_variant(mut self, variant: BuilderVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// Renderer-agnostic interface.
///
/// A renderer reads world state through [`WorldModel`] queries and never
/// mutates it.
pub trait Renderer {
    type Output;

    fn render<W: WorldModel + ?Sized>(&self, world: &W, view: &RenderView) -> Self::Output;
}

/// Produces the isometric draw list for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteRenderer {
    pub config: ViewConfig,
}

impl SpriteRenderer {
    pub fn new(config: ViewConfig) -> Self {
        Self { config }
    }
}

impl Renderer for SpriteRenderer {
    type Output = DrawList;

    fn render<W: WorldModel + ?Sized>(&self, world: &W, view: &RenderView) -> DrawList {
        let cells = self.config.windower().cells(world, view.center, view.variant);
        let mut list = DrawList::new();
        paint(&cells, &self.config.projection, &mut list);
        list
    }
}

/// Top-down text view of the window, one character per cell.
///
/// `.` no tile, `0`-`8` stack height, `@` builder (`^` with hat). Exits of
/// the builder's tile are listed below the grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugTextRenderer {
    pub windower: ViewportWindower,
}

impl DebugTextRenderer {
    pub fn new(windower: ViewportWindower) -> Self {
        Self { windower }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render<W: WorldModel + ?Sized>(&self, world: &W, view: &RenderView) -> String {
        let cells = self.windower.cells(world, view.center, view.variant);
        let side = (2 * self.windower.radius() + 1) as usize;
        let mut grid = vec![vec!['.'; side]; side];
        let mut exits = Vec::new();

        for cell in &cells {
            let col = (cell.offset.x + self.windower.radius()) as usize;
            let row = (cell.offset.y + self.windower.radius()) as usize;
            if !cell.exists {
                continue;
            }
            let ch = match cell.layers.last().map(|l| l.kind) {
                Some(LayerKind::Builder(BuilderVariant::Plain)) => '@',
                Some(LayerKind::Builder(BuilderVariant::Hat)) => '^',
                _ => char::from_digit(cell.stack_height() as u32, 10).unwrap_or('#'),
            };
            grid[row][col] = ch;
            exits.extend(cell.exit_markers.iter().map(|d| d.name()));
        }

        let mut out = format!("=== View at {} ===\n", view.center);
        for row in grid {
            out.extend(row);
            out.push('\n');
        }
        out.push_str(&format!("Exits: {}\n", exits.join(", ")));
        out
    }
}
