//! Rebuilds everything the player sees after an intent.

use crate::dispatcher::Session;
use blockworld_common::{BlockKind, Direction};
use blockworld_kernel::WorldModel;
use blockworld_render::{BuilderVariant, DrawSurface, ViewConfig, paint};
use std::collections::BTreeMap;

pub(crate) const NO_SELECTION_LABEL: &str = "No Block Currently Selected";

/// Step counts above this are shown as [`MANY_STEPS`].
pub const STEP_DISPLAY_LIMIT: u64 = 999;
pub const MANY_STEPS: &str = "A lot";

/// One selectable inventory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryEntry {
    pub index: usize,
    pub kind: BlockKind,
}

/// Widget state derived from a session. The sprites go to the draw surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub inventory: Vec<InventoryEntry>,
    pub selection_label: String,
    /// Whether each move control is usable right now.
    pub enabled: BTreeMap<Direction, bool>,
    pub status: String,
}

impl Panel {
    pub fn is_enabled(&self, direction: Direction) -> bool {
        self.enabled.get(&direction).copied().unwrap_or(false)
    }
}

pub fn steps_label(steps: u64) -> String {
    if steps > STEP_DISPLAY_LIMIT {
        MANY_STEPS.to_string()
    } else {
        steps.to_string()
    }
}

/// Repaint the window around the session's center and rebuild the panel.
pub fn synchronize<W, S>(
    session: &Session<W>,
    variant: BuilderVariant,
    config: &ViewConfig,
    surface: &mut S,
) -> Panel
where
    W: WorldModel,
    S: DrawSurface + ?Sized,
{
    let world = &session.world;

    let cells = config.windower().cells(world, session.center, variant);
    paint(&cells, &config.projection, surface);

    let inventory: Vec<InventoryEntry> = world
        .inventory()
        .iter()
        .enumerate()
        .map(|(index, kind)| InventoryEntry { index, kind: *kind })
        .collect();

    let selection_label = match session.selection {
        None => NO_SELECTION_LABEL.to_string(),
        Some(i) => match world.inventory().get(i) {
            Some(kind) => format!("You selected a {kind} block"),
            None => format!("Slot {i} is empty"),
        },
    };

    let here = world.builder_tile();
    let enabled = Direction::ALL
        .into_iter()
        .map(|d| {
            let open = world.exit(here, d).is_some_and(|dest| world.can_enter(dest));
            (d, open)
        })
        .collect();

    let height = world.blocks(here).len();
    let status = format!(
        "Currently {height} blocks high.\nTotal Steps Taken: {}",
        steps_label(session.steps)
    );

    tracing::trace!(cells = cells.len(), slots = inventory.len(), "view synchronized");
    Panel {
        inventory,
        selection_label,
        enabled,
        status,
    }
}
