use blockworld_common::Rgb;

use crate::projection::{DrawList, ProjectionConfig, ScreenRect, Viewport};

/// Half-length and half-thickness of the crosshair arms, in pixels.
const CROSSHAIR_HALF_LEN: f32 = 10.0;
const CROSSHAIR_HALF_THICK: f32 = 2.0;
const CROSSHAIR_OPACITY: f32 = 0.8;

/// Row-major RGB pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, clear: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![clear; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Overwrite every pixel whose centre lies inside `rect`.
    pub fn fill_rect(&mut self, rect: ScreenRect, color: Rgb) {
        self.apply_rect(rect, |_| color);
    }

    /// Composite `color` at `alpha` over every pixel inside `rect`.
    pub fn blend_rect(&mut self, rect: ScreenRect, color: Rgb, alpha: f32) {
        self.apply_rect(rect, |base| base.blend(color, alpha));
    }

    /// One-pixel outline of `rect`, blended over what is underneath.
    pub fn stroke_rect(&mut self, rect: ScreenRect, color: Rgb, alpha: f32) {
        let ScreenRect {
            x,
            y,
            width,
            height,
        } = rect;
        let edges = [
            ScreenRect { x, y, width, height: 1.0 },
            ScreenRect { x, y: y + height - 1.0, width, height: 1.0 },
            ScreenRect { x, y: y + 1.0, width: 1.0, height: height - 2.0 },
            ScreenRect { x: x + width - 1.0, y: y + 1.0, width: 1.0, height: height - 2.0 },
        ];
        for edge in edges {
            self.blend_rect(edge, color, alpha);
        }
    }

    fn apply_rect(&mut self, rect: ScreenRect, mut f: impl FnMut(Rgb) -> Rgb) {
        let Some((x0, x1)) = pixel_span(rect.x, rect.x + rect.width, self.width) else {
            return;
        };
        let Some((y0, y1)) = pixel_span(rect.y, rect.y + rect.height, self.height) else {
            return;
        };
        let stride = self.width as usize;
        for y in y0..y1 {
            let row = &mut self.pixels[y * stride..(y + 1) * stride];
            for px in &mut row[x0..x1] {
                *px = f(*px);
            }
        }
    }

    /// Packed `R, G, B` bytes, row-major, for image encoders.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_array()).collect()
    }
}

/// Clamp a float interval to whole pixel indices `[lo, hi)` within `limit`.
fn pixel_span(start: f32, end: f32, limit: u32) -> Option<(usize, usize)> {
    if !start.is_finite() && !end.is_finite() {
        return None;
    }
    let clamp = |v: f32| v.round().clamp(0.0, limit as f32) as usize;
    let (lo, hi) = (clamp(start), clamp(end));
    (lo < hi).then_some((lo, hi))
}

/// Rasterises a draw list the way the browser canvas did: sky fill, one
/// shaded square per block in list order, then a crosshair.
#[derive(Debug, Clone)]
pub struct Painter {
    config: ProjectionConfig,
    background: Rgb,
}

impl Painter {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            config,
            background: Rgb::SKY,
        }
    }

    pub fn with_background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    pub fn paint(&self, list: &DrawList, viewport: Viewport) -> Framebuffer {
        let mut fb = Framebuffer::new(viewport.width, viewport.height, self.background);
        for p in &list.items {
            fb.fill_rect(p.bounds(), p.fill_color());
            fb.fill_rect(
                p.shadow_band(self.config.shadow_fraction),
                p.shadow_color(self.config.shadow_opacity),
            );
            fb.stroke_rect(p.bounds(), Rgb::BLACK, self.config.border_opacity);
        }
        draw_crosshair(&mut fb, viewport);
        fb
    }
}

impl Default for Painter {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}

fn draw_crosshair(fb: &mut Framebuffer, viewport: Viewport) {
    let (cx, cy) = viewport.center();
    let horizontal = ScreenRect {
        x: cx - CROSSHAIR_HALF_LEN,
        y: cy - CROSSHAIR_HALF_THICK,
        width: CROSSHAIR_HALF_LEN * 2.0,
        height: CROSSHAIR_HALF_THICK * 2.0,
    };
    let vertical = ScreenRect {
        x: cx - CROSSHAIR_HALF_THICK,
        y: cy - CROSSHAIR_HALF_LEN,
        width: CROSSHAIR_HALF_THICK * 2.0,
        height: CROSSHAIR_HALF_LEN * 2.0,
    };
    fb.blend_rect(horizontal, Rgb::WHITE, CROSSHAIR_OPACITY);
    fb.blend_rect(vertical, Rgb::WHITE, CROSSHAIR_OPACITY);
}
