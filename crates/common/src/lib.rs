//! Shared types for the blockworld engine: grid positions, cardinal
//! directions and block material tags.

mod types;

pub use types::{
    BlockKind, Direction, GridPosition, ParseBlockKindError, ParseDirectionError,
};
