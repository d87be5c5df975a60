//! Visibility & projection: turns the voxel store into a far-to-near draw
//! list for one camera, plus the sinks that consume it.
//!
//! # Invariants
//! - Renderers cannot mutate the store.
//! - Blocks behind the near plane, outside the visibility radius, or of kind
//!   air never reach a draw list.
//! - Draw lists are ordered by non-increasing XZ distance from the camera.

mod framebuffer;
mod projection;
mod renderer;

pub use framebuffer::{Framebuffer, Painter};
pub use projection::{
    CullStats, DrawList, ProjectedBlock, ProjectionConfig, Projector, ScreenRect, Viewport,
    project,
};
pub use renderer::{DebugTextRenderer, FrameRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "blockworld-render v0.1.0"
}
