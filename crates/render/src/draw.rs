//! Draw instructions and the surfaces that receive them.

use crate::projection::{Projection, ScreenRect};
use crate::window::{BuilderVariant, LayerKind, RenderCell};
use blockworld_common::{BlockKind, Direction};

/// Sprite to draw at an instruction's rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteTag {
    Ground,
    Block(BlockKind),
    Builder(BuilderVariant),
    Arrow(Direction),
}

impl SpriteTag {
    /// Asset name for the sprite, e.g. `"wood"` or `"north"`.
    pub fn name(&self) -> &'static str {
        match self {
            SpriteTag::Ground => "ground",
            SpriteTag::Block(kind) => kind.tag(),
            SpriteTag::Builder(BuilderVariant::Plain) => "builder",
            SpriteTag::Builder(BuilderVariant::Hat) => "hatbuilder",
            SpriteTag::Arrow(d) => d.name(),
        }
    }
}

impl From<LayerKind> for SpriteTag {
    fn from(kind: LayerKind) -> Self {
        match kind {
            LayerKind::Ground => SpriteTag::Ground,
            LayerKind::Block(b) => SpriteTag::Block(b),
            LayerKind::Builder(v) => SpriteTag::Builder(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawInstruction {
    pub rect: ScreenRect,
    pub sprite: SpriteTag,
}

/// External drawing target. The core never touches pixels itself.
pub trait DrawSurface {
    fn clear(&mut self);
    fn draw(&mut self, instruction: DrawInstruction);
}

/// Surface that records what it was asked to draw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawList {
    pub instructions: Vec<DrawInstruction>,
    pub clears: usize,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawInstruction> {
        self.instructions.iter()
    }
}

impl DrawSurface for DrawList {
    fn clear(&mut self) {
        self.instructions.clear();
        self.clears += 1;
    }

    fn draw(&mut self, instruction: DrawInstruction) {
        self.instructions.push(instruction);
    }
}

/// Clear `surface` and emit every cell in scan order. Within a cell layers go
/// bottom to top; exit arrows follow the builder layer.
pub fn paint<S: DrawSurface + ?Sized>(
    cells: &[RenderCell],
    projection: &Projection,
    surface: &mut S,
) {
    surface.clear();
    for cell in cells {
        for layer in &cell.layers {
            surface.draw(DrawInstruction {
                rect: projection.project(cell.offset, layer.level),
                sprite: layer.kind.into(),
            });
            if matches!(layer.kind, LayerKind::Builder(_)) {
                for marker in cell.markers() {
                    surface.draw(DrawInstruction {
                        rect: projection.project(marker.offset, marker.level),
                        sprite: SpriteTag::Arrow(marker.direction),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{LayerSprite, ViewportWindower};
    use blockworld_common::GridPosition;
    use blockworld_kernel::{BlockWorld, Tile, TileId};
    use glam::IVec2;

    fn world() -> BlockWorld {
        let mut w = BlockWorld::new(
            "Dee",
            Tile::new(GridPosition::new(0, 0), vec![BlockKind::Grass]).unwrap(),
        );
        let s = w
            .add_tile(Tile::new(GridPosition::new(0, 1), vec![]).unwrap())
            .unwrap();
        w.link(TileId(0), Direction::South, s).unwrap();
        w
    }

    #[test]
    fn sprite_names() {
        assert_eq!(SpriteTag::Ground.name(), "ground");
        assert_eq!(SpriteTag::Block(BlockKind::Stone).name(), "stone");
        assert_eq!(SpriteTag::Builder(BuilderVariant::Hat).name(), "hatbuilder");
        assert_eq!(SpriteTag::Arrow(Direction::West).name(), "west");
    }

    #[test]
    fn paint_clears_first() {
        let mut list = DrawList::new();
        list.draw(DrawInstruction {
            rect: Projection::default().project(IVec2::ZERO, 0),
            sprite: SpriteTag::Ground,
        });
        paint(&[], &Projection::default(), &mut list);
        assert!(list.is_empty());
        assert_eq!(list.clears, 1);
    }

    #[test]
    fn paint_emits_layers_then_arrows() {
        let w = world();
        let origin = GridPosition::default();
        let cells = ViewportWindower::new(1).cells(&w, origin, BuilderVariant::Plain);
        let mut list = DrawList::new();
        paint(&cells, &Projection::default(), &mut list);

        let tags: Vec<&str> = list.iter().map(|i| i.sprite.name()).collect();
        // (0, 0) is scanned before (0, 1).
        assert_eq!(tags, vec!["ground", "grass", "builder", "south", "ground"]);
    }

    #[test]
    fn arrow_sits_over_neighbour_two_levels_up() {
        let w = world();
        let origin = GridPosition::default();
        let cells = ViewportWindower::new(1).cells(&w, origin, BuilderVariant::Plain);
        let mut list = DrawList::new();
        let p = Projection::default();
        paint(&cells, &p, &mut list);

        let arrow = list
            .iter()
            .find(|i| i.sprite == SpriteTag::Arrow(Direction::South))
            .unwrap();
        // Builder stands on one block, so it is at level 1 and the arrow at 3.
        assert_eq!(arrow.rect, p.project(IVec2::new(0, 1), 3));
    }

    #[test]
    fn non_builder_cells_have_no_arrows() {
        let cell = RenderCell {
            offset: IVec2::new(2, 2),
            exists: true,
            layers: vec![LayerSprite {
                kind: LayerKind::Ground,
                level: -1,
            }],
            exit_markers: Default::default(),
        };
        let mut list = DrawList::new();
        paint(std::slice::from_ref(&cell), &Projection::default(), &mut list);
        assert_eq!(list.len(), 1);
    }
}
