use crate::intent::Intent;
use blockworld_common::Direction;

/// Keyboard keys the game listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
}

impl Key {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Key::W),
            'a' => Some(Key::A),
            's' => Some(Key::S),
            'd' => Some(Key::D),
            _ => None,
        }
    }
}

/// On-screen direction pad. The pad is laid out for the isometric view, so
/// its labels do not line up with compass directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadButton {
    Up,
    Left,
    Down,
    Right,
}

impl PadButton {
    pub const ALL: [PadButton; 4] = [
        PadButton::Up,
        PadButton::Left,
        PadButton::Down,
        PadButton::Right,
    ];

    pub fn direction(self) -> Direction {
        match self {
            PadButton::Up => Direction::North,
            PadButton::Left => Direction::East,
            PadButton::Down => Direction::South,
            PadButton::Right => Direction::West,
        }
    }
}

/// Turns raw presses into intents.
///
/// Pad buttons honour the move-block toggle; keys always move the builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputMapper {
    move_block_mode: bool,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_move_block_mode(&mut self, on: bool) {
        self.move_block_mode = on;
        tracing::debug!(on, "move-block mode");
    }

    pub fn toggle_move_block_mode(&mut self) -> bool {
        self.set_move_block_mode(!self.move_block_mode);
        self.move_block_mode
    }

    pub fn key(&self, key: Key) -> Intent {
        let direction = match key {
            Key::W => Direction::North,
            Key::D => Direction::East,
            Key::S => Direction::South,
            Key::A => Direction::West,
        };
        Intent::MoveBuilder(direction)
    }

    pub fn button(&self, button: PadButton) -> Intent {
        let direction = button.direction();
        if self.move_block_mode {
            Intent::MoveBlock(direction)
        } else {
            Intent::MoveBuilder(direction)
        }
    }
}
