use crate::block::BlockProperties;
use crate::model::{TileId, WorldError, WorldModel};
use blockworld_common::{BlockKind, Direction, GridPosition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An event record produced by every successful mutation of the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Builder walked from one tile to a neighbour.
    BuilderMoved {
        from: GridPosition,
        to: GridPosition,
    },
    /// Top block was pushed onto a neighbouring tile.
    BlockMoved {
        kind: BlockKind,
        from: GridPosition,
        to: GridPosition,
    },
    /// Top block was dug up. `kept` is true if it went into the inventory.
    Dug {
        kind: BlockKind,
        at: GridPosition,
        kept: bool,
    },
    /// Inventory block was placed on a tile.
    Dropped { kind: BlockKind, at: GridPosition },
}

/// A single stack of blocks on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    position: GridPosition,
    blocks: Vec<BlockKind>,
    exits: BTreeMap<Direction, TileId>,
}

impl Tile {
    /// Maximum number of blocks a tile can hold.
    pub const MAX_HEIGHT: usize = 8;
    /// Ground blocks may only occupy layers below this height.
    pub const GROUND_LIMIT: usize = 3;

    /// Create a tile with an initial stack, checking the stacking rules.
    pub fn new(position: GridPosition, blocks: Vec<BlockKind>) -> Result<Self, WorldError> {
        let mut tile = Self {
            position,
            blocks: Vec::with_capacity(blocks.len()),
            exits: BTreeMap::new(),
        };
        for kind in blocks {
            tile.check_placement(kind)?;
            tile.blocks.push(kind);
        }
        Ok(tile)
    }

    pub fn position(&self) -> GridPosition {
        self.position
    }

    /// Blocks bottom to top.
    pub fn blocks(&self) -> &[BlockKind] {
        &self.blocks
    }

    pub fn height(&self) -> usize {
        self.blocks.len()
    }

    pub fn exits(&self) -> &BTreeMap<Direction, TileId> {
        &self.exits
    }

    fn check_placement(&self, kind: BlockKind) -> Result<(), WorldError> {
        let height = self.blocks.len();
        if height >= Self::MAX_HEIGHT
            || (BlockProperties::of(kind).ground && height >= Self::GROUND_LIMIT)
        {
            return Err(WorldError::TooHigh);
        }
        Ok(())
    }
}

/// The builder: where it stands and what it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Builder {
    pub name: String,
    pub tile: TileId,
    pub inventory: Vec<BlockKind>,
}

/// Reference world model: a set of tiles keyed by grid position, linked by
/// named exits, with a single builder.
///
/// Uses BTreeMap for deterministic iteration order across all platforms.
#[derive(Debug, Clone)]
pub struct BlockWorld {
    tiles: Vec<Tile>,
    by_position: BTreeMap<GridPosition, TileId>,
    builder: Builder,
    /// Mutations since the last `drain_events`.
    event_log: Vec<WorldEvent>,
}

impl BlockWorld {
    /// Create a world holding only `start`, with the builder standing on it.
    pub fn new(builder_name: impl Into<String>, start: Tile) -> Self {
        let mut by_position = BTreeMap::new();
        by_position.insert(start.position, TileId(0));
        Self {
            tiles: vec![start],
            by_position,
            builder: Builder {
                name: builder_name.into(),
                tile: TileId(0),
                inventory: Vec::new(),
            },
            event_log: Vec::new(),
        }
    }

    /// Add a tile. Fails if its position is already occupied.
    pub fn add_tile(&mut self, tile: Tile) -> Result<TileId, WorldError> {
        if self.by_position.contains_key(&tile.position) {
            return Err(WorldError::PositionTaken(tile.position));
        }
        let id = TileId(self.tiles.len());
        self.by_position.insert(tile.position, id);
        self.tiles.push(tile);
        Ok(id)
    }

    /// Add a one-way exit. The destination must be the grid neighbour of
    /// `from` in `direction`.
    pub fn add_exit(
        &mut self,
        from: TileId,
        direction: Direction,
        to: TileId,
    ) -> Result<(), WorldError> {
        let from_pos = self.tile(from).ok_or(WorldError::UnknownTile(from))?.position;
        let to_pos = self.tile(to).ok_or(WorldError::UnknownTile(to))?.position;
        let neighbour = from_pos.step(direction).ok_or(WorldError::OffGrid {
            from: from_pos,
            direction,
        })?;
        if neighbour != to_pos {
            return Err(WorldError::Misaligned {
                from: from_pos,
                direction,
                to: to_pos,
            });
        }
        self.tiles[from.0].exits.insert(direction, to);
        Ok(())
    }

    /// Add exits both ways between two neighbouring tiles.
    pub fn link(&mut self, a: TileId, direction: Direction, b: TileId) -> Result<(), WorldError> {
        self.add_exit(a, direction, b)?;
        self.add_exit(b, direction.opposite(), a)
    }

    pub fn set_inventory(&mut self, inventory: Vec<BlockKind>) {
        self.builder.inventory = inventory;
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0)
    }

    /// All tiles in insertion order; `TileId(i)` is the i-th.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Drain and return the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Deterministic FNV-1a digest of tiles, exits, builder and inventory.
    /// Tiles are visited in position order, so insertion order does not matter.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= u64::from(b);
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for (pos, id) in &self.by_position {
            let tile = &self.tiles[id.0];
            mix(&mut h, &pos.x.to_le_bytes());
            mix(&mut h, &pos.y.to_le_bytes());
            for kind in &tile.blocks {
                mix(&mut h, kind.tag().as_bytes());
            }
            mix(&mut h, b"|");
            for (dir, dest) in &tile.exits {
                let to = self.tiles[dest.0].position;
                mix(&mut h, dir.name().as_bytes());
                mix(&mut h, &to.x.to_le_bytes());
                mix(&mut h, &to.y.to_le_bytes());
            }
            mix(&mut h, b";");
        }
        let at = self.builder_position();
        mix(&mut h, &at.x.to_le_bytes());
        mix(&mut h, &at.y.to_le_bytes());
        for kind in &self.builder.inventory {
            mix(&mut h, kind.tag().as_bytes());
        }
        h
    }

    fn current(&self) -> &Tile {
        &self.tiles[self.builder.tile.0]
    }
}

impl WorldModel for BlockWorld {
    fn tile_at(&self, position: GridPosition) -> Option<TileId> {
        self.by_position.get(&position).copied()
    }

    fn builder_position(&self) -> GridPosition {
        self.current().position
    }

    fn builder_tile(&self) -> TileId {
        self.builder.tile
    }

    fn blocks(&self, tile: TileId) -> &[BlockKind] {
        self.tile(tile).map_or(&[], |t| t.blocks())
    }

    fn exit(&self, tile: TileId, direction: Direction) -> Option<TileId> {
        self.tile(tile)?.exits.get(&direction).copied()
    }

    fn can_enter(&self, tile: TileId) -> bool {
        let current = self.current();
        let Some(dest) = self.tile(tile) else {
            return false;
        };
        current.exits.values().any(|id| *id == tile)
            && current.height().abs_diff(dest.height()) <= 1
    }

    fn inventory(&self) -> &[BlockKind] {
        &self.builder.inventory
    }

    fn move_builder(&mut self, direction: Direction) -> Result<(), WorldError> {
        let dest = self
            .exit(self.builder.tile, direction)
            .ok_or(WorldError::NoExit(direction))?;
        if !self.can_enter(dest) {
            return Err(WorldError::HeightMismatch);
        }
        let from = self.builder_position();
        self.builder.tile = dest;
        let to = self.builder_position();
        tracing::trace!(%from, %to, "builder moved");
        self.event_log.push(WorldEvent::BuilderMoved { from, to });
        Ok(())
    }

    fn move_block(&mut self, direction: Direction) -> Result<(), WorldError> {
        let src = self.builder.tile;
        let dest = self
            .exit(src, direction)
            .ok_or(WorldError::NoExit(direction))?;
        let kind = match self.current().blocks.last().copied() {
            Some(kind) if BlockProperties::of(kind).moveable => kind,
            top => return Err(WorldError::NotLiftable(top)),
        };
        let dest_tile = &self.tiles[dest.0];
        if dest_tile.height() >= self.tiles[src.0].height() {
            return Err(WorldError::DestinationTooHigh);
        }
        dest_tile
            .check_placement(kind)
            .map_err(|_| WorldError::DestinationTooHigh)?;

        self.tiles[src.0].blocks.pop();
        self.tiles[dest.0].blocks.push(kind);
        self.event_log.push(WorldEvent::BlockMoved {
            kind,
            from: self.tiles[src.0].position,
            to: self.tiles[dest.0].position,
        });
        Ok(())
    }

    fn dig(&mut self) -> Result<BlockKind, WorldError> {
        let kind = *self.current().blocks.last().ok_or(WorldError::TooLow)?;
        if !BlockProperties::of(kind).diggable {
            return Err(WorldError::NotDiggable(kind));
        }
        let tile = &mut self.tiles[self.builder.tile.0];
        tile.blocks.pop();
        let at = tile.position;
        let kept = BlockProperties::of(kind).carryable;
        if kept {
            self.builder.inventory.push(kind);
        }
        self.event_log.push(WorldEvent::Dug { kind, at, kept });
        Ok(kind)
    }

    fn drop_block(&mut self, index: usize) -> Result<(), WorldError> {
        let kind = *self
            .builder
            .inventory
            .get(index)
            .ok_or(WorldError::NotPlaceable(index))?;
        self.current().check_placement(kind)?;

        self.builder.inventory.remove(index);
        let tile = &mut self.tiles[self.builder.tile.0];
        tile.blocks.push(kind);
        let at = tile.position;
        self.event_log.push(WorldEvent::Dropped { kind, at });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BlockKind::*;

    fn tile(x: i32, y: i32, blocks: &[BlockKind]) -> Tile {
        Tile::new(GridPosition::new(x, y), blocks.to_vec()).unwrap()
    }

    /// Start tile at origin with a north neighbour of the given stack.
    fn two_tiles(start: &[BlockKind], north: &[BlockKind]) -> (BlockWorld, TileId) {
        let mut w = BlockWorld::new("Bob", tile(0, 0, start));
        let n = w.add_tile(tile(0, -1, north)).unwrap();
        w.link(TileId(0), Direction::North, n).unwrap();
        (w, n)
    }

    #[test]
    fn tile_rejects_ground_above_limit() {
        let pos = GridPosition::default();
        assert!(Tile::new(pos, vec![Soil, Soil, Grass]).is_ok());
        assert_eq!(
            Tile::new(pos, vec![Soil, Soil, Soil, Grass]).unwrap_err(),
            WorldError::TooHigh
        );
        assert!(Tile::new(pos, vec![Soil, Soil, Soil, Wood, Stone]).is_ok());
    }

    #[test]
    fn tile_rejects_more_than_max_height() {
        let pos = GridPosition::default();
        assert!(Tile::new(pos, vec![Wood; 8]).is_ok());
        assert_eq!(Tile::new(pos, vec![Wood; 9]).unwrap_err(), WorldError::TooHigh);
    }

    #[test]
    fn add_tile_rejects_duplicate_position() {
        let mut w = BlockWorld::new("Bob", tile(0, 0, &[]));
        assert_eq!(
            w.add_tile(tile(0, 0, &[Wood])).unwrap_err(),
            WorldError::PositionTaken(GridPosition::new(0, 0))
        );
    }

    #[test]
    fn add_exit_checks_alignment() {
        let mut w = BlockWorld::new("Bob", tile(0, 0, &[]));
        let far = w.add_tile(tile(5, 5, &[])).unwrap();
        assert!(matches!(
            w.add_exit(TileId(0), Direction::East, far),
            Err(WorldError::Misaligned { .. })
        ));
    }

    #[test]
    fn move_builder_through_exit() {
        let (mut w, n) = two_tiles(&[Soil], &[Soil, Soil]);
        w.move_builder(Direction::North).unwrap();
        assert_eq!(w.builder_tile(), n);
        assert_eq!(w.builder_position(), GridPosition::new(0, -1));
        assert_eq!(
            w.drain_events(),
            vec![WorldEvent::BuilderMoved {
                from: GridPosition::new(0, 0),
                to: GridPosition::new(0, -1),
            }]
        );
    }

    #[test]
    fn move_builder_without_exit_fails() {
        let (mut w, _) = two_tiles(&[], &[]);
        assert_eq!(
            w.move_builder(Direction::East).unwrap_err(),
            WorldError::NoExit(Direction::East)
        );
        assert_eq!(w.builder_tile(), TileId(0));
    }

    #[test]
    fn move_builder_blocked_by_height() {
        let (mut w, n) = two_tiles(&[], &[Soil, Soil]);
        assert!(!w.can_enter(n));
        assert_eq!(
            w.move_builder(Direction::North).unwrap_err(),
            WorldError::HeightMismatch
        );
        assert!(w.drain_events().is_empty());
    }

    #[test]
    fn can_enter_requires_exit_from_current_tile() {
        let mut w = BlockWorld::new("Bob", tile(0, 0, &[]));
        let e = w.add_tile(tile(1, 0, &[])).unwrap();
        assert!(!w.can_enter(e));
        w.add_exit(TileId(0), Direction::East, e).unwrap();
        assert!(w.can_enter(e));
        assert!(!w.can_enter(TileId(99)));
    }

    #[test]
    fn move_block_pushes_wood_down() {
        let (mut w, n) = two_tiles(&[Soil, Wood], &[Soil]);
        w.move_block(Direction::North).unwrap();
        assert_eq!(w.blocks(TileId(0)), &[Soil]);
        assert_eq!(w.blocks(n), &[Soil, Wood]);
    }

    #[test]
    fn move_block_rejections() {
        let (mut w, _) = two_tiles(&[Soil, Stone], &[]);
        assert_eq!(
            w.move_block(Direction::North).unwrap_err(),
            WorldError::NotLiftable(Some(Stone))
        );
        assert_eq!(
            w.move_block(Direction::South).unwrap_err(),
            WorldError::NoExit(Direction::South)
        );

        let (mut w, _) = two_tiles(&[Wood], &[Soil]);
        assert_eq!(
            w.move_block(Direction::North).unwrap_err(),
            WorldError::DestinationTooHigh
        );

        let (mut w, _) = two_tiles(&[], &[]);
        assert_eq!(
            w.move_block(Direction::North).unwrap_err(),
            WorldError::NotLiftable(None)
        );
    }

    #[test]
    fn dig_keeps_carryable_blocks() {
        let mut w = BlockWorld::new("Bob", tile(0, 0, &[Grass, Soil, Wood]));
        assert_eq!(w.dig().unwrap(), Wood);
        assert_eq!(w.dig().unwrap(), Soil);
        assert_eq!(w.dig().unwrap(), Grass);
        assert_eq!(w.inventory(), &[Wood, Soil]);
        assert_eq!(w.dig().unwrap_err(), WorldError::TooLow);
    }

    #[test]
    fn dig_refuses_stone() {
        let mut w = BlockWorld::new("Bob", tile(0, 0, &[Soil, Stone]));
        assert_eq!(w.dig().unwrap_err(), WorldError::NotDiggable(Stone));
        assert_eq!(w.blocks(TileId(0)), &[Soil, Stone]);
        assert!(w.inventory().is_empty());
    }

    #[test]
    fn drop_block_places_on_top() {
        let mut w = BlockWorld::new("Bob", tile(0, 0, &[Soil]));
        w.set_inventory(vec![Wood, Soil]);
        w.drop_block(1).unwrap();
        assert_eq!(w.blocks(TileId(0)), &[Soil, Soil]);
        assert_eq!(w.inventory(), &[Wood]);
    }

    #[test]
    fn drop_block_rejections() {
        let mut w = BlockWorld::new("Bob", tile(0, 0, &[Soil, Soil, Soil]));
        w.set_inventory(vec![Soil, Wood]);
        assert_eq!(w.drop_block(2).unwrap_err(), WorldError::NotPlaceable(2));
        assert_eq!(w.drop_block(0).unwrap_err(), WorldError::TooHigh);
        assert_eq!(w.inventory().len(), 2);
        w.drop_block(1).unwrap();
        assert_eq!(w.blocks(TileId(0)).len(), 4);
    }

    #[test]
    fn state_hash_ignores_insertion_order() {
        let mut a = BlockWorld::new("Bob", tile(0, 0, &[Wood]));
        let a1 = a.add_tile(tile(1, 0, &[Soil])).unwrap();
        let a2 = a.add_tile(tile(0, 1, &[])).unwrap();
        a.link(TileId(0), Direction::East, a1).unwrap();
        a.link(TileId(0), Direction::South, a2).unwrap();

        let mut b = BlockWorld::new("Bob", tile(0, 0, &[Wood]));
        let b2 = b.add_tile(tile(0, 1, &[])).unwrap();
        let b1 = b.add_tile(tile(1, 0, &[Soil])).unwrap();
        b.link(TileId(0), Direction::South, b2).unwrap();
        b.link(TileId(0), Direction::East, b1).unwrap();

        assert_eq!(a.state_hash(), b.state_hash());
        a.dig().unwrap();
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn drain_events_clears_log() {
        let mut w = BlockWorld::new("Bob", tile(0, 0, &[Wood]));
        w.dig().unwrap();
        let events = w.drain_events();
        assert_eq!(events.len(), 1);
        assert!(w.drain_events().is_empty());
    }

    #[test]
    fn add_exit_off_the_coordinate_range() {
        let edge = GridPosition::new(i32::MAX, 0);
        let mut w = BlockWorld::new("Bob", Tile::new(edge, vec![]).unwrap());
        let west = w.add_tile(tile(i32::MAX - 1, 0, &[])).unwrap();
        assert_eq!(
            w.add_exit(TileId(0), Direction::East, west).unwrap_err(),
            WorldError::OffGrid {
                from: edge,
                direction: Direction::East,
            }
        );
        assert!(w.link(TileId(0), Direction::West, west).is_ok());
    }
}
