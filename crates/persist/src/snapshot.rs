use crate::error::StoreError;
use blockworld_common::{BlockKind, Direction, GridPosition};
use blockworld_kernel::{BlockWorld, Tile, TileId, WorldModel};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Current snapshot schema version.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// One tile as stored in a snapshot. Exits point at positions, not ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    pub position: GridPosition,
    pub blocks: Vec<BlockKind>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub exits: BTreeMap<Direction, GridPosition>,
}

/// Canonical world content covered by the snapshot hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotBody {
    pub builder_name: String,
    pub builder: GridPosition,
    pub inventory: Vec<BlockKind>,
    /// Sorted by position.
    pub tiles: Vec<TileRecord>,
}

/// A content-addressed JSON snapshot of a block world.
///
/// The hash is the SHA-256 of the serialized body, enabling corruption
/// detection on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub schema_version: u32,
    pub sha256: String,
    pub world: SnapshotBody,
}

impl Snapshot {
    /// Capture the current world state.
    pub fn capture(world: &BlockWorld) -> Result<Self, StoreError> {
        let mut tiles: Vec<TileRecord> = world
            .tiles()
            .iter()
            .map(|tile| TileRecord {
                position: tile.position(),
                blocks: tile.blocks().to_vec(),
                exits: tile
                    .exits()
                    .iter()
                    .filter_map(|(d, id)| Some((*d, world.tile(*id)?.position())))
                    .collect(),
            })
            .collect();
        tiles.sort_by_key(|t| t.position);

        let world = SnapshotBody {
            builder_name: world.builder().name.clone(),
            builder: world.builder_position(),
            inventory: world.inventory().to_vec(),
            tiles,
        };
        let sha256 = body_hash(&world)?;
        Ok(Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            sha256,
            world,
        })
    }

    /// Check the schema version and recompute the content hash.
    pub fn verify(&self) -> Result<(), StoreError> {
        if self.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                file_version: self.schema_version,
                expected_version: SNAPSHOT_SCHEMA_VERSION,
            });
        }
        let actual = body_hash(&self.world)?;
        if actual != self.sha256 {
            return Err(StoreError::IntegrityMismatch {
                expected: self.sha256.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Rebuild a world from a verified snapshot. The builder's tile becomes
    /// `TileId(0)`.
    pub fn restore(&self) -> Result<BlockWorld, StoreError> {
        self.verify()?;
        let body = &self.world;
        let Some(start) = body.tiles.iter().find(|t| t.position == body.builder) else {
            return Err(StoreError::Inconsistent(format!(
                "builder stands at {} but no tile is there",
                body.builder
            )));
        };

        let mut world = BlockWorld::new(
            body.builder_name.clone(),
            Tile::new(start.position, start.blocks.clone())?,
        );
        let mut ids = BTreeMap::from([(start.position, TileId(0))]);
        for record in body.tiles.iter().filter(|t| t.position != body.builder) {
            let id = world.add_tile(Tile::new(record.position, record.blocks.clone())?)?;
            ids.insert(record.position, id);
        }
        for record in &body.tiles {
            let from = ids[&record.position];
            for (direction, to) in &record.exits {
                let to = ids.get(to).copied().ok_or_else(|| {
                    StoreError::Inconsistent(format!("exit from {} leads nowhere", record.position))
                })?;
                world.add_exit(from, *direction, to)?;
            }
        }
        world.set_inventory(body.inventory.clone());
        Ok(world)
    }
}

fn body_hash(body: &SnapshotBody) -> Result<String, StoreError> {
    let bytes = serde_json::to_vec(body)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
