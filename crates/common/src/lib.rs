//! Shared types for the blockworld core: block values, colors and the camera.

mod camera;
mod types;

pub use camera::Camera;
pub use types::{Block, BlockKind, ParseBlockKindError, Rgb};
