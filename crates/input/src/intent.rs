use blockworld_common::{Direction, ParseDirectionError};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Everything a player can ask the game to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    MoveBuilder(Direction),
    MoveBlock(Direction),
    Dig,
    /// Pick an inventory slot for the next drop.
    SelectBlock(usize),
    Drop,
    Load(PathBuf),
    Save(PathBuf),
    ToggleHat,
}

impl Intent {
    /// Intents that need a loaded world to mean anything.
    pub fn needs_world(&self) -> bool {
        !matches!(self, Intent::Load(_) | Intent::ToggleHat)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::MoveBuilder(d) => write!(f, "move {d}"),
            Intent::MoveBlock(d) => write!(f, "push {d}"),
            Intent::Dig => f.write_str("dig"),
            Intent::SelectBlock(i) => write!(f, "select {i}"),
            Intent::Drop => f.write_str("drop"),
            Intent::Load(p) => write!(f, "load {}", p.display()),
            Intent::Save(p) => write!(f, "save {}", p.display()),
            Intent::ToggleHat => f.write_str("hat"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseIntentError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    BadDirection(#[from] ParseDirectionError),
    #[error("not an inventory index: {0}")]
    BadIndex(String),
}

/// Parses one line of the text command language:
///
/// ```text
/// w | a | s | d            move north / west / south / east
/// move <dir> | go <dir>    move the builder
/// push <dir>               move the top block
/// dig | drop | hat
/// select <index>
/// load <path> | save <path>
/// ```
impl FromStr for Intent {
    type Err = ParseIntentError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };
        let arg = |name: &'static str| {
            if rest.is_empty() {
                Err(ParseIntentError::MissingArgument(name))
            } else {
                Ok(rest)
            }
        };

        let intent = match command.to_ascii_lowercase().as_str() {
            "" => return Err(ParseIntentError::Empty),
            "w" => Intent::MoveBuilder(Direction::North),
            "d" => Intent::MoveBuilder(Direction::East),
            "s" => Intent::MoveBuilder(Direction::South),
            "a" => Intent::MoveBuilder(Direction::West),
            "move" | "go" => Intent::MoveBuilder(arg("move")?.parse()?),
            "push" => Intent::MoveBlock(arg("push")?.parse()?),
            "dig" => Intent::Dig,
            "drop" => Intent::Drop,
            "hat" => Intent::ToggleHat,
            "select" => {
                let raw = arg("select")?;
                let index = raw
                    .parse()
                    .map_err(|_| ParseIntentError::BadIndex(raw.to_string()))?;
                Intent::SelectBlock(index)
            }
            "load" => Intent::Load(PathBuf::from(arg("load")?)),
            "save" => Intent::Save(PathBuf::from(arg("save")?)),
            other => return Err(ParseIntentError::UnknownCommand(other.to_string())),
        };
        Ok(intent)
    }
}
