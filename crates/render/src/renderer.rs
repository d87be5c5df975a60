use blockworld_common::Camera;
use blockworld_kernel::VoxelStore;

use crate::framebuffer::{Framebuffer, Painter};
use crate::projection::{ProjectionConfig, Projector, Viewport};

/// Renderer-agnostic interface. All render sinks implement this trait.
///
/// A renderer reads the store and camera and produces output. It never
/// mutates the store.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, store: &VoxelStore, camera: &Camera) -> Self::Output;
}

/// Text dump of the draw list, one line per block in paint order.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    projector: Projector,
    viewport: Viewport,
}

impl DebugTextRenderer {
    pub fn new(config: ProjectionConfig, viewport: Viewport) -> Self {
        Self {
            projector: Projector::new(config),
            viewport,
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, store: &VoxelStore, camera: &Camera) -> String {
        let list = self.projector.project(store, camera, self.viewport);
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame {}x{} (blocks={}, drawn={}, culled={}) ===\n",
            self.viewport.width,
            self.viewport.height,
            store.len(),
            list.stats.drawn,
            list.stats.culled()
        ));
        out.push_str(&format!(
            "Camera: pos=({:.2}, {:.2}, {:.2}) yaw={:.3}\n",
            camera.position.x, camera.position.y, camera.position.z, camera.rot_y
        ));
        for p in &list.items {
            out.push_str(&format!(
                "  {:<6} ({:>4}, {:>4}, {:>4}) -> screen=({:.1}, {:.1}) size={:.1} light={:.2} {}\n",
                p.block.kind.name(),
                p.block.pos.x,
                p.block.pos.y,
                p.block.pos.z,
                p.screen_x,
                p.screen_y,
                p.size,
                p.brightness,
                p.fill_color().to_hex()
            ));
        }
        out
    }
}

/// Projects and rasterises a frame into a [`Framebuffer`].
#[derive(Debug, Clone, Default)]
pub struct FrameRenderer {
    projector: Projector,
    painter: Painter,
    viewport: Viewport,
}

impl FrameRenderer {
    pub fn new(config: ProjectionConfig, viewport: Viewport) -> Self {
        Self {
            painter: Painter::new(config.clone()),
            projector: Projector::new(config),
            viewport,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl Renderer for FrameRenderer {
    type Output = Framebuffer;

    fn render(&self, store: &VoxelStore, camera: &Camera) -> Framebuffer {
        let list = self.projector.project(store, camera, self.viewport);
        self.painter.paint(&list, self.viewport)
    }
}
