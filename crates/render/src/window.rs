use crate::projection::GROUND_LEVEL;
use blockworld_common::{BlockKind, Direction, GridPosition};
use blockworld_kernel::WorldModel;
use glam::IVec2;
use std::collections::BTreeSet;

/// Exit markers float this many levels above the builder.
pub const MARKER_LIFT: i32 = 2;

/// Decorative look of the builder sprite, chosen by the caller each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BuilderVariant {
    #[default]
    Plain,
    Hat,
}

impl BuilderVariant {
    pub fn toggled(self) -> Self {
        match self {
            BuilderVariant::Plain => BuilderVariant::Hat,
            BuilderVariant::Hat => BuilderVariant::Plain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Ground,
    Block(BlockKind),
    Builder(BuilderVariant),
}

/// One sprite in a tile's stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSprite {
    pub kind: LayerKind,
    pub level: i32,
}

/// Arrow drawn next to the builder for one exit of its tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitMarker {
    pub direction: Direction,
    /// Offset from the view center of the tile the arrow is drawn over.
    pub offset: IVec2,
    pub level: i32,
}

/// Derived visual content of one grid cell for a single frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCell {
    /// Offset from the view center.
    pub offset: IVec2,
    pub exists: bool,
    /// Bottom to top.
    pub layers: Vec<LayerSprite>,
    /// Exits of the builder's tile. Empty for every other cell.
    pub exit_markers: BTreeSet<Direction>,
}

impl RenderCell {
    fn absent(offset: IVec2) -> Self {
        Self {
            offset,
            exists: false,
            layers: Vec::new(),
            exit_markers: BTreeSet::new(),
        }
    }

    /// Level of the builder sprite, if the builder stands here.
    pub fn builder_level(&self) -> Option<i32> {
        self.layers
            .iter()
            .find(|l| matches!(l.kind, LayerKind::Builder(_)))
            .map(|l| l.level)
    }

    /// Placed exit markers: one unit towards each exit, lifted above the builder.
    pub fn markers(&self) -> impl Iterator<Item = ExitMarker> + '_ {
        let level = self.builder_level().unwrap_or(0) + MARKER_LIFT;
        self.exit_markers.iter().map(move |&direction| ExitMarker {
            direction,
            offset: self.offset + direction.delta(),
            level,
        })
    }

    /// Number of blocks in the stack (ground and builder excluded).
    pub fn stack_height(&self) -> usize {
        self.layers
            .iter()
            .filter(|l| matches!(l.kind, LayerKind::Block(_)))
            .count()
    }
}

/// Picks the square neighbourhood of the view center that gets drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportWindower {
    radius: i32,
}

impl Default for ViewportWindower {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RADIUS)
    }
}

impl ViewportWindower {
    /// 9x9 window.
    pub const DEFAULT_RADIUS: u32 = 4;

    pub fn new(radius: u32) -> Self {
        Self {
            radius: i32::try_from(radius).unwrap_or(i32::MAX / 2),
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Cells per frame: `(2R + 1)^2`.
    pub fn cell_count(&self) -> usize {
        let side = (2 * self.radius + 1) as usize;
        side * side
    }

    /// Build every cell of the window around `center`, x outer and y inner,
    /// both ascending.
    pub fn cells<W: WorldModel + ?Sized>(
        &self,
        world: &W,
        center: GridPosition,
        variant: BuilderVariant,
    ) -> Vec<RenderCell> {
        let builder_tile = world.builder_tile();
        let mut cells = Vec::with_capacity(self.cell_count());

        for dx in -self.radius..=self.radius {
            for dy in -self.radius..=self.radius {
                let offset = IVec2::new(dx, dy);
                // Positions past the coordinate range hold no tiles.
                let Some(tile) = center.offset(offset).and_then(|p| world.tile_at(p)) else {
                    cells.push(RenderCell::absent(offset));
                    continue;
                };

                let blocks = world.blocks(tile);
                let mut layers = Vec::with_capacity(blocks.len() + 2);
                layers.push(LayerSprite {
                    kind: LayerKind::Ground,
                    level: GROUND_LEVEL,
                });
                layers.extend(blocks.iter().zip(0..).map(|(kind, level)| LayerSprite {
                    kind: LayerKind::Block(*kind),
                    level,
                }));

                let mut exit_markers = BTreeSet::new();
                if tile == builder_tile {
                    layers.push(LayerSprite {
                        kind: LayerKind::Builder(variant),
                        level: blocks.len() as i32,
                    });
                    exit_markers.extend(world.exits(tile));
                }

                cells.push(RenderCell {
                    offset,
                    exists: true,
                    layers,
                    exit_markers,
                });
            }
        }

        tracing::trace!(%center, cells = cells.len(), "viewport windowed");
        cells
    }
}
