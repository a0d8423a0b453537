use blockworld_common::{BlockKind, Direction, GridPosition};
use serde::{Deserialize, Serialize};

/// Opaque handle to a tile owned by a world model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub usize);

/// Rejections a world model reports for queries and mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("no exit to the {0}")]
    NoExit(Direction),
    #[error("destination is too high or too low to step onto")]
    HeightMismatch,
    #[error("top block cannot be lifted")]
    NotLiftable(Option<BlockKind>),
    #[error("destination tile is too high")]
    DestinationTooHigh,
    #[error("{0} cannot be dug")]
    NotDiggable(BlockKind),
    #[error("nothing left to dig")]
    TooLow,
    #[error("no block at inventory index {0}")]
    NotPlaceable(usize),
    #[error("stack would be too high")]
    TooHigh,
    #[error("a tile already exists at {0}")]
    PositionTaken(GridPosition),
    #[error("unknown tile {0:?}")]
    UnknownTile(TileId),
    #[error("no grid position {direction} of {from}")]
    OffGrid {
        from: GridPosition,
        direction: Direction,
    },
    #[error("exit {direction} from {from} does not lead to {to}")]
    Misaligned {
        from: GridPosition,
        direction: Direction,
        to: GridPosition,
    },
}

/// Capability contract the presentation layer needs from a world.
///
/// Queries are side-effect free. Each mutation either succeeds completely or
/// returns an error and leaves the world untouched.
pub trait WorldModel {
    /// Tile at a grid position, if one exists.
    fn tile_at(&self, position: GridPosition) -> Option<TileId>;

    /// Grid position the builder stands on.
    fn builder_position(&self) -> GridPosition;

    /// Tile the builder stands on.
    fn builder_tile(&self) -> TileId;

    /// Block stack of a tile, bottom to top. Unknown tiles have no blocks.
    fn blocks(&self, tile: TileId) -> &[BlockKind];

    /// Destination of a tile's exit, if the exit exists.
    fn exit(&self, tile: TileId, direction: Direction) -> Option<TileId>;

    /// Directions in which a tile exposes an exit, in canonical order.
    fn exits(&self, tile: TileId) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| self.exit(tile, *d).is_some())
            .collect()
    }

    /// Whether the builder could step onto `tile` right now.
    fn can_enter(&self, tile: TileId) -> bool;

    /// Carried blocks in pick-up order.
    fn inventory(&self) -> &[BlockKind];

    /// Walk the builder through the exit in `direction`.
    fn move_builder(&mut self, direction: Direction) -> Result<(), WorldError>;

    /// Push the top block of the builder's tile through the exit in `direction`.
    fn move_block(&mut self, direction: Direction) -> Result<(), WorldError>;

    /// Remove the top block of the builder's tile. Returns the removed block.
    fn dig(&mut self) -> Result<BlockKind, WorldError>;

    /// Place the inventory block at `index` on top of the builder's tile.
    fn drop_block(&mut self, index: usize) -> Result<(), WorldError>;
}
