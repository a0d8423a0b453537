use blockworld_common::{Direction, GridPosition};
use blockworld_input::Intent;
use blockworld_kernel::{BlockWorld, WorldError, WorldEvent, WorldModel};
use std::fmt;

pub(crate) const MOVED: &str = "You moved";
pub(crate) const NO_EXIT: &str = "No exit that way";
pub(crate) const HEIGHT_MISMATCH: &str = "Tile too high / low";
pub(crate) const BLOCK_MOVED: &str = "You moved a block";
pub(crate) const BLOCK_TOO_HEAVY: &str = "Too weak to move that stone block";
pub(crate) const DESTINATION_TOO_HIGH: &str = "That tile's too high";
pub(crate) const NO_EXIT_FOR_BLOCK: &str = "There's no exit that way";
pub(crate) const DUG: &str = "You dug something up.";
pub(crate) const NOT_DIGGABLE: &str = "Too weak to remove that block";
pub(crate) const UNSAFE_DIG: &str = "You might not want to dig that";
pub(crate) const DROPPED: &str = "You dropped something";
pub(crate) const NOT_PLACEABLE: &str = "You can't drop that there";
pub(crate) const STACK_TOO_HIGH: &str = "You're getting too high there";
pub(crate) const NO_SELECTION: &str = "Select a block first.";
pub(crate) const NO_WORLD: &str = "Load a map first";
pub(crate) const SELECTED: &str = "Try placing that.";
pub(crate) const WELCOME: &str = "Welcome, to uhh... somewhere in the sky?";

/// Why an intent was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NoWorldLoaded,
    NoSuchExit,
    HeightViolation,
    BlockNotLiftable,
    BlockNotDiggable,
    UnsafeDig,
    BlockNotPlaceable,
    StackTooHigh,
    NoSelection,
    LoadFailure,
    SaveFailure,
}

/// User-facing result of one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure { kind: FailureKind, message: String },
}

impl Outcome {
    pub fn success(message: impl Into<String>) -> Self {
        Outcome::Success(message.into())
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Outcome::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Outcome::Success(m) | Outcome::Failure { message: m, .. } => m,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Presentation state that lives alongside a loaded world. Replaced as one
/// value on load.
#[derive(Debug, Clone)]
pub struct Session<W> {
    pub world: W,
    /// Tracks the builder's position; moves only on successful builder moves.
    pub center: GridPosition,
    pub steps: u64,
    pub selection: Option<usize>,
}

impl<W: WorldModel> Session<W> {
    pub fn new(world: W) -> Self {
        Self {
            center: world.builder_position(),
            world,
            steps: 0,
            selection: None,
        }
    }
}

/// Routes intents to the world model and turns its answers into outcomes.
///
/// Idle until a world is loaded; every world intent while idle fails with
/// [`FailureKind::NoWorldLoaded`] and changes nothing.
#[derive(Debug, Clone)]
pub struct Dispatcher<W> {
    session: Option<Session<W>>,
}

impl<W> Default for Dispatcher<W> {
    fn default() -> Self {
        Self { session: None }
    }
}

impl<W: WorldModel> Dispatcher<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session<W>> {
        self.session.as_ref()
    }

    pub fn world(&self) -> Option<&W> {
        self.session.as_ref().map(|s| &s.world)
    }

    /// Install a freshly loaded world. Center, step count and selection are
    /// all reset together.
    pub fn load(&mut self, world: W) -> Outcome {
        let session = Session::new(world);
        tracing::debug!(center = %session.center, "world installed");
        self.session = Some(session);
        Outcome::success(WELCOME)
    }

    /// Handle a world intent. Returns `None` for intents owned by the caller
    /// (load, save, hat).
    pub fn dispatch(&mut self, intent: &Intent) -> Option<Outcome> {
        let outcome = match intent {
            Intent::MoveBuilder(d) => self.move_builder(*d),
            Intent::MoveBlock(d) => self.move_block(*d),
            Intent::Dig => self.dig(),
            Intent::SelectBlock(i) => self.select(*i),
            Intent::Drop => self.drop_selected(),
            Intent::Load(_) | Intent::Save(_) | Intent::ToggleHat => return None,
        };
        match &outcome {
            Outcome::Success(reply) => tracing::debug!(%intent, %reply, "intent applied"),
            Outcome::Failure { kind, message } => {
                tracing::debug!(%intent, ?kind, reply = %message, "intent refused")
            }
        }
        Some(outcome)
    }

    fn ready(&mut self) -> Result<&mut Session<W>, Outcome> {
        self.session
            .as_mut()
            .ok_or_else(|| Outcome::failure(FailureKind::NoWorldLoaded, NO_WORLD))
    }

    pub fn move_builder(&mut self, direction: Direction) -> Outcome {
        let s = match self.ready() {
            Ok(s) => s,
            Err(outcome) => return outcome,
        };
        let tile = s.world.builder_tile();
        if s.world.exit(tile, direction).is_none() {
            return Outcome::failure(FailureKind::NoSuchExit, NO_EXIT);
        }
        match s.world.move_builder(direction) {
            Ok(()) => {
                s.center = s.world.builder_position();
                s.steps += 1;
                Outcome::success(MOVED)
            }
            Err(WorldError::NoExit(_)) => Outcome::failure(FailureKind::NoSuchExit, NO_EXIT),
            Err(_) => Outcome::failure(FailureKind::HeightViolation, HEIGHT_MISMATCH),
        }
    }

    pub fn move_block(&mut self, direction: Direction) -> Outcome {
        let s = match self.ready() {
            Ok(s) => s,
            Err(outcome) => return outcome,
        };
        match s.world.move_block(direction) {
            Ok(()) => Outcome::success(BLOCK_MOVED),
            Err(WorldError::NoExit(_)) => {
                Outcome::failure(FailureKind::NoSuchExit, NO_EXIT_FOR_BLOCK)
            }
            Err(WorldError::NotLiftable(_)) => {
                Outcome::failure(FailureKind::BlockNotLiftable, BLOCK_TOO_HEAVY)
            }
            Err(_) => Outcome::failure(FailureKind::HeightViolation, DESTINATION_TOO_HIGH),
        }
    }

    pub fn dig(&mut self) -> Outcome {
        let s = match self.ready() {
            Ok(s) => s,
            Err(outcome) => return outcome,
        };
        match s.world.dig() {
            Ok(_) => Outcome::success(DUG),
            Err(WorldError::TooLow) => Outcome::failure(FailureKind::UnsafeDig, UNSAFE_DIG),
            Err(_) => Outcome::failure(FailureKind::BlockNotDiggable, NOT_DIGGABLE),
        }
    }

    /// Remember an inventory slot for the next drop. The index is checked by
    /// the world model when the drop happens.
    pub fn select(&mut self, index: usize) -> Outcome {
        let s = match self.ready() {
            Ok(s) => s,
            Err(outcome) => return outcome,
        };
        s.selection = Some(index);
        Outcome::success(SELECTED)
    }

    /// Drop the selected block. The selection is cleared whatever happens.
    pub fn drop_selected(&mut self) -> Outcome {
        let s = match self.ready() {
            Ok(s) => s,
            Err(outcome) => return outcome,
        };
        let Some(index) = s.selection.take() else {
            return Outcome::failure(FailureKind::NoSelection, NO_SELECTION);
        };
        match s.world.drop_block(index) {
            Ok(()) => Outcome::success(DROPPED),
            Err(WorldError::TooHigh) => Outcome::failure(FailureKind::StackTooHigh, STACK_TOO_HIGH),
            Err(_) => Outcome::failure(FailureKind::BlockNotPlaceable, NOT_PLACEABLE),
        }
    }
}

impl Dispatcher<BlockWorld> {
    /// Take the events the world recorded since the last call.
    pub(crate) fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.session
            .as_mut()
            .map(|s| s.world.drain_events())
            .unwrap_or_default()
    }
}
