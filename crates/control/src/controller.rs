use crate::dispatcher::{Dispatcher, FailureKind, NO_WORLD, Outcome};
use crate::sync::{Panel, synchronize};
use blockworld_input::Intent;
use blockworld_kernel::BlockWorld;
use blockworld_persist::{load_world, save_world};
use blockworld_render::{BuilderVariant, DrawList, ViewConfig};
use std::path::Path;

const LOAD_FAILED: &str = "Haha, did you choose a bad file?";
const SAVE_FAILED: &str = "Problem Saving File";
const HAT_ON: &str = "Builder is now much more fancy";
const HAT_OFF: &str = "Builder back to normal";

/// Blocking message for the player, shown on top of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    /// Underlying error, for logs and verbose frontends.
    pub detail: String,
}

/// Owns the game loop state: the dispatcher, the persistence calls and the
/// most recent frame.
#[derive(Debug)]
pub struct Controller {
    dispatcher: Dispatcher<BlockWorld>,
    config: ViewConfig,
    variant: BuilderVariant,
    alert: String,
    surface: DrawList,
    panel: Option<Panel>,
    notice: Option<Notice>,
    frames: u64,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl Controller {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            config,
            variant: BuilderVariant::Plain,
            alert: String::new(),
            surface: DrawList::new(),
            panel: None,
            notice: None,
            frames: 0,
        }
    }

    /// Apply one intent, refresh the view if a world is loaded, and return
    /// the outcome shown to the player.
    pub fn handle(&mut self, intent: Intent) -> Outcome {
        let outcome = if intent.needs_world() && !self.dispatcher.is_ready() {
            Outcome::failure(FailureKind::NoWorldLoaded, NO_WORLD)
        } else {
            match &intent {
                Intent::Load(path) => self.load(path),
                Intent::Save(path) => self.save(path),
                Intent::ToggleHat => self.toggle_hat(),
                world_intent => self
                    .dispatcher
                    .dispatch(world_intent)
                    .unwrap_or_else(|| Outcome::failure(FailureKind::NoWorldLoaded, NO_WORLD)),
            }
        };
        self.refresh();
        self.alert = outcome.message().to_string();
        outcome
    }

    /// Install an already built world, as a successful load would.
    pub fn install(&mut self, world: BlockWorld) -> Outcome {
        let outcome = self.dispatcher.load(world);
        self.refresh();
        self.alert = outcome.message().to_string();
        outcome
    }

    fn load(&mut self, path: &Path) -> Outcome {
        match load_world(path) {
            Ok(world) => self.dispatcher.load(world),
            Err(e) => {
                self.notice = Some(Notice {
                    title: "Invalid File".to_string(),
                    body: "That's not a valid map file\nChoose another one".to_string(),
                    detail: e.to_string(),
                });
                Outcome::failure(FailureKind::LoadFailure, LOAD_FAILED)
            }
        }
    }

    fn save(&mut self, path: &Path) -> Outcome {
        let Some(world) = self.dispatcher.world() else {
            return Outcome::failure(FailureKind::NoWorldLoaded, NO_WORLD);
        };
        match save_world(world, path) {
            Ok(()) => Outcome::success(format!("Saved to {}", path.display())),
            Err(e) => {
                self.notice = Some(Notice {
                    title: "Save Failed".to_string(),
                    body: "Something went wrong!".to_string(),
                    detail: e.to_string(),
                });
                Outcome::failure(FailureKind::SaveFailure, SAVE_FAILED)
            }
        }
    }

    fn toggle_hat(&mut self) -> Outcome {
        self.variant = self.variant.toggled();
        match self.variant {
            BuilderVariant::Hat => Outcome::success(HAT_ON),
            BuilderVariant::Plain => Outcome::success(HAT_OFF),
        }
    }

    fn refresh(&mut self) {
        for event in self.dispatcher.drain_events() {
            tracing::debug!(?event, "world changed");
        }
        if let Some(session) = self.dispatcher.session() {
            self.panel = Some(synchronize(session, self.variant, &self.config, &mut self.surface));
            self.frames += 1;
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<BlockWorld> {
        &self.dispatcher
    }

    pub fn world(&self) -> Option<&BlockWorld> {
        self.dispatcher.world()
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn variant(&self) -> BuilderVariant {
        self.variant
    }

    /// Message from the last intent.
    pub fn alert(&self) -> &str {
        &self.alert
    }

    /// Draw instructions of the last frame.
    pub fn draws(&self) -> &DrawList {
        &self.surface
    }

    pub fn panel(&self) -> Option<&Panel> {
        self.panel.as_ref()
    }

    /// Pending blocking message, cleared once taken.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Number of frames synchronized so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockworld_common::{BlockKind, Direction, GridPosition};
    use blockworld_kernel::{Tile, TileId};

    fn world() -> BlockWorld {
        let mut w = BlockWorld::new(
            "Ivy",
            Tile::new(GridPosition::new(2, 2), vec![BlockKind::Grass]).unwrap(),
        );
        let e = w
            .add_tile(Tile::new(GridPosition::new(3, 2), vec![BlockKind::Soil]).unwrap())
            .unwrap();
        w.link(TileId(0), Direction::East, e).unwrap();
        w
    }

    #[test]
    fn idle_intents_do_not_sync() {
        let mut c = Controller::default();
        let outcome = c.handle(Intent::Dig);
        assert_eq!(outcome.failure_kind(), Some(FailureKind::NoWorldLoaded));
        assert_eq!(c.frames(), 0);
        assert!(c.panel().is_none());
        assert_eq!(c.alert(), NO_WORLD);
    }

    #[test]
    fn every_ready_intent_syncs_once() {
        let mut c = Controller::default();
        c.install(world());
        assert_eq!(c.frames(), 1);
        c.handle(Intent::MoveBuilder(Direction::East));
        c.handle(Intent::MoveBuilder(Direction::East));
        c.handle(Intent::Drop);
        c.handle(Intent::ToggleHat);
        assert_eq!(c.frames(), 5);
        assert_eq!(c.draws().clears, 5);
    }

    #[test]
    fn hat_toggle_changes_builder_sprite() {
        let mut c = Controller::default();
        assert_eq!(c.handle(Intent::ToggleHat).message(), HAT_ON);
        c.install(world());
        assert!(c.draws().iter().any(|i| i.sprite.name() == "hatbuilder"));
        assert_eq!(c.handle(Intent::ToggleHat).message(), HAT_OFF);
        assert!(c.draws().iter().any(|i| i.sprite.name() == "builder"));
    }

    #[test]
    fn world_events_do_not_pile_up() {
        let mut c = Controller::default();
        c.install(world());
        for i in 0..500 {
            let d = if i % 2 == 0 { Direction::East } else { Direction::West };
            assert!(c.handle(Intent::MoveBuilder(d)).is_success());
        }
        assert!(c.handle(Intent::Dig).is_success());
        let mut world = c.world().unwrap().clone();
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn save_while_idle() {
        let tmp = tempfile::tempdir().unwrap();
        let mut c = Controller::default();
        let outcome = c.handle(Intent::Save(tmp.path().join("x.txt")));
        assert_eq!(outcome.failure_kind(), Some(FailureKind::NoWorldLoaded));
        assert!(!tmp.path().join("x.txt").exists());
    }

    #[test]
    fn save_failure_raises_notice() {
        let tmp = tempfile::tempdir().unwrap();
        let mut c = Controller::default();
        c.install(world());
        let outcome = c.handle(Intent::Save(tmp.path().join("missing/dir/x.txt")));
        assert_eq!(outcome.failure_kind(), Some(FailureKind::SaveFailure));
        let notice = c.take_notice().unwrap();
        assert_eq!(notice.body, "Something went wrong!");
        assert!(c.take_notice().is_none());
    }

    #[test]
    fn save_then_load_recenters() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("walk.txt");
        let mut c = Controller::default();
        c.install(world());
        assert!(c.handle(Intent::MoveBuilder(Direction::East)).is_success());
        assert!(c.handle(Intent::Save(path.clone())).is_success());

        let mut other = Controller::default();
        assert!(other.handle(Intent::Load(path)).is_success());
        let session = other.dispatcher().session().unwrap();
        assert_eq!(session.center, GridPosition::new(3, 2));
        assert_eq!(session.steps, 0);
    }
}
