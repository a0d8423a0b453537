use blockworld_common::BlockKind;

/// What the reference rules allow a builder to do with a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockProperties {
    /// Can be removed from the top of a tile with a dig.
    pub diggable: bool,
    /// Can be pushed onto a neighbouring tile.
    pub moveable: bool,
    /// Ends up in the inventory after being dug.
    pub carryable: bool,
    /// Ground blocks only sit in the lowest layers of a tile.
    pub ground: bool,
}

impl BlockProperties {
    pub fn of(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Grass => Self {
                diggable: true,
                moveable: false,
                carryable: false,
                ground: true,
            },
            BlockKind::Soil => Self {
                diggable: true,
                moveable: false,
                carryable: true,
                ground: true,
            },
            BlockKind::Wood => Self {
                diggable: true,
                moveable: true,
                carryable: true,
                ground: false,
            },
            BlockKind::Stone => Self {
                diggable: false,
                moveable: false,
                carryable: false,
                ground: false,
            },
        }
    }
}
