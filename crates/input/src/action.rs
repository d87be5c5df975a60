use std::fmt;
use std::str::FromStr;

/// A discrete, high-level action produced by any front end.
///
/// The core consumes actions, never raw key events, so every front end
/// shares the same world logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    MoveUp,
    MoveDown,
    RotateLeft,
    RotateRight,
    /// Place the selected inventory item in front of the camera.
    Place,
    /// Break the block nearest to the look point.
    Break,
    ToggleCrafting,
    TogglePause,
    /// Switch between survival and creative.
    ToggleMode,
    /// Craft the recipe at this index.
    Craft(usize),
    /// Select a hotbar slot (zero-based).
    SelectSlot(usize),
    /// Input that is not bound to anything.
    Noop,
}

impl Action {
    /// Whether this action only moves or turns the camera.
    pub fn is_camera(&self) -> bool {
        matches!(
            self,
            Action::MoveForward
                | Action::MoveBackward
                | Action::StrafeLeft
                | Action::StrafeRight
                | Action::MoveUp
                | Action::MoveDown
                | Action::RotateLeft
                | Action::RotateRight
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::MoveForward => f.write_str("forward"),
            Action::MoveBackward => f.write_str("back"),
            Action::StrafeLeft => f.write_str("left"),
            Action::StrafeRight => f.write_str("right"),
            Action::MoveUp => f.write_str("up"),
            Action::MoveDown => f.write_str("down"),
            Action::RotateLeft => f.write_str("turn-left"),
            Action::RotateRight => f.write_str("turn-right"),
            Action::Place => f.write_str("place"),
            Action::Break => f.write_str("break"),
            Action::ToggleCrafting => f.write_str("crafting"),
            Action::TogglePause => f.write_str("pause"),
            Action::ToggleMode => f.write_str("mode"),
            Action::Craft(i) => write!(f, "craft{i}"),
            Action::SelectSlot(i) => write!(f, "slot{}", i + 1),
            Action::Noop => f.write_str("noop"),
        }
    }
}

/// Returned when a script token names no action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0:?}")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    /// Parses script tokens such as `forward`, `turn-left`, `slot3` (one-based)
    /// or `craft0`. Matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        let err = || ParseActionError(s.to_string());
        let action = match token.as_str() {
            "forward" | "w" => Action::MoveForward,
            "back" | "backward" | "s" => Action::MoveBackward,
            "left" | "a" => Action::StrafeLeft,
            "right" | "d" => Action::StrafeRight,
            "up" => Action::MoveUp,
            "down" => Action::MoveDown,
            "turn-left" | "rotate-left" => Action::RotateLeft,
            "turn-right" | "rotate-right" => Action::RotateRight,
            "place" => Action::Place,
            "break" => Action::Break,
            "crafting" => Action::ToggleCrafting,
            "pause" => Action::TogglePause,
            "mode" => Action::ToggleMode,
            "craft" => Action::Craft(0),
            "noop" => Action::Noop,
            other => {
                if let Some(n) = other.strip_prefix("slot") {
                    let n: usize = n.parse().map_err(|_| err())?;
                    Action::SelectSlot(n.checked_sub(1).ok_or_else(err)?)
                } else if let Some(n) = other.strip_prefix("craft") {
                    Action::Craft(n.parse().map_err(|_| err())?)
                } else {
                    return Err(err());
                }
            }
        };
        Ok(action)
    }
}

/// Parse a comma- or whitespace-separated action script.
pub fn parse_script(script: &str) -> Result<Vec<Action>, ParseActionError> {
    script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::parse)
        .collect()
}
