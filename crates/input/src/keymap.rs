use std::collections::HashMap;

use blockworld_common::Camera;
use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Per-event magnitudes for camera actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// World units per movement event.
    pub move_step: f32,
    /// Radians per rotation event.
    pub rotate_step: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            move_step: 0.5,
            rotate_step: 0.08,
        }
    }
}

/// Mouse buttons the canvas listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

/// Fixed key/button to action table.
///
/// Keys are matched by their lowercase name (`"w"`, `" "`, `"shift"`,
/// `"arrowleft"`, `"escape"`, ...), the way browsers report `KeyboardEvent.key`.
#[derive(Debug, Clone)]
pub struct KeyMap {
    keys: HashMap<String, Action>,
    mouse: HashMap<MouseButton, Action>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut keys = HashMap::new();
        for (key, action) in [
            ("w", Action::MoveForward),
            ("s", Action::MoveBackward),
            ("a", Action::StrafeLeft),
            ("d", Action::StrafeRight),
            (" ", Action::MoveUp),
            ("space", Action::MoveUp),
            ("shift", Action::MoveDown),
            ("arrowleft", Action::RotateLeft),
            ("arrowright", Action::RotateRight),
            ("e", Action::ToggleCrafting),
            ("escape", Action::TogglePause),
            ("m", Action::ToggleMode),
        ] {
            keys.insert(key.to_string(), action);
        }
        for slot in 0..9 {
            keys.insert((slot + 1).to_string(), Action::SelectSlot(slot));
        }

        let mouse = HashMap::from([
            (MouseButton::Left, Action::Place),
            (MouseButton::Right, Action::Break),
        ]);

        Self { keys, mouse }
    }
}

impl KeyMap {
    /// Action bound to a key name, or `Noop`.
    pub fn action_for_key(&self, key: &str) -> Action {
        let lookup = if key == " " {
            key.to_string()
        } else {
            key.trim().to_ascii_lowercase()
        };
        self.keys.get(&lookup).copied().unwrap_or(Action::Noop)
    }

    pub fn action_for_mouse(&self, button: MouseButton) -> Action {
        self.mouse.get(&button).copied().unwrap_or(Action::Noop)
    }

    /// Rebind a key, returning the action it previously mapped to.
    pub fn bind(&mut self, key: &str, action: Action) -> Option<Action> {
        self.keys.insert(key.to_ascii_lowercase(), action)
    }
}

/// Apply a movement or rotation action to the camera.
///
/// Performs exactly one camera operation and returns `true`, or returns
/// `false` for actions that are not camera actions.
pub fn apply_camera_action(camera: &mut Camera, action: Action, config: &InputConfig) -> bool {
    let step = config.move_step;
    match action {
        Action::MoveForward => camera.move_forward(step),
        Action::MoveBackward => camera.move_backward(step),
        Action::StrafeLeft => camera.strafe_left(step),
        Action::StrafeRight => camera.strafe_right(step),
        Action::MoveUp => camera.move_up(step),
        Action::MoveDown => camera.move_down(step),
        Action::RotateLeft => camera.rotate(-config.rotate_step),
        Action::RotateRight => camera.rotate(config.rotate_step),
        _ => return false,
    }
    tracing::trace!(%action, position = ?camera.position, rot_y = camera.rot_y, "camera moved");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockworld_common::Camera;

    #[test]
    fn default_table_matches_controls() {
        let map = KeyMap::default();
        assert_eq!(map.action_for_key("w"), Action::MoveForward);
        assert_eq!(map.action_for_key("W"), Action::MoveForward);
        assert_eq!(map.action_for_key(" "), Action::MoveUp);
        assert_eq!(map.action_for_key("Shift"), Action::MoveDown);
        assert_eq!(map.action_for_key("ArrowRight"), Action::RotateRight);
        assert_eq!(map.action_for_key("Escape"), Action::TogglePause);
        assert_eq!(map.action_for_key("e"), Action::ToggleCrafting);
        assert_eq!(map.action_for_key("3"), Action::SelectSlot(2));
        assert_eq!(map.action_for_key("q"), Action::Noop);
        assert_eq!(map.action_for_mouse(MouseButton::Left), Action::Place);
        assert_eq!(map.action_for_mouse(MouseButton::Right), Action::Break);
    }

    #[test]
    fn bind_overrides_entry() {
        let mut map = KeyMap::default();
        assert_eq!(map.bind("Q", Action::RotateLeft), None);
        assert_eq!(map.action_for_key("q"), Action::RotateLeft);
    }

    #[test]
    fn camera_actions_use_configured_steps() {
        let config = InputConfig::default();
        let mut camera = Camera::new(glam::Vec3::ZERO, 0.0);

        assert!(apply_camera_action(&mut camera, Action::MoveForward, &config));
        assert!((camera.position.z - 0.5).abs() < 1e-6);

        assert!(apply_camera_action(&mut camera, Action::RotateRight, &config));
        assert!((camera.rot_y - 0.08).abs() < 1e-6);
        assert!(apply_camera_action(&mut camera, Action::RotateLeft, &config));
        assert!(camera.rot_y.abs() < 1e-6);

        assert!(apply_camera_action(&mut camera, Action::MoveUp, &config));
        assert!((camera.position.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn non_camera_actions_leave_camera_alone() {
        let config = InputConfig::default();
        let mut camera = Camera::default();
        let before = camera;
        for action in [Action::Place, Action::Break, Action::TogglePause, Action::Noop] {
            assert!(!apply_camera_action(&mut camera, action, &config));
        }
        assert_eq!(camera, before);
    }
}
