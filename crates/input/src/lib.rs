//! Input mapping: raw keys and buttons become shared [`Action`]s.
//!
//! # Invariants
//! - Every bound key or button yields exactly one action per event.
//! - Camera actions perform exactly one camera operation with a fixed magnitude.

pub mod action;
pub mod keymap;

pub use action::{Action, ParseActionError, parse_script};
pub use keymap::{InputConfig, KeyMap, MouseButton, apply_camera_action};
