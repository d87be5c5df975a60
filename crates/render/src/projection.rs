use blockworld_common::{Block, Camera, Rgb};
use blockworld_kernel::{BlockId, Metric, VoxelStore};
use serde::{Deserialize, Serialize};

/// Culling, projection and shading constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Blocks with `|dx| + |dz|` at or beyond this are dropped.
    pub visibility_radius: f32,
    /// Coarse pass keeps blocks with rotated depth above `-behind_slack`.
    pub behind_slack: f32,
    /// Blocks with rotated depth below this are never projected.
    pub near_plane: f32,
    pub focal_length: f32,
    /// Edge length of one block in screen units at unit perspective.
    pub block_size: f32,
    /// Projected squares at or below this edge length are skipped.
    pub min_size: f32,
    /// Depth at which brightness would reach zero before flooring.
    pub brightness_falloff: f32,
    pub min_brightness: f32,
    /// Height of the ground-contact band as a fraction of the block edge.
    pub shadow_fraction: f32,
    /// Black overlay opacity applied to the ground-contact band.
    pub shadow_opacity: f32,
    /// Black overlay opacity applied to the border stroke.
    pub border_opacity: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            visibility_radius: 30.0,
            behind_slack: 5.0,
            near_plane: 0.5,
            focal_length: 600.0,
            block_size: 40.0,
            min_size: 1.0,
            brightness_falloff: 30.0,
            min_brightness: 0.4,
            shadow_fraction: 0.2,
            shadow_opacity: 0.1,
            border_opacity: 0.3,
        }
    }
}

/// Target surface dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// Axis-aligned rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One entry of the per-frame draw list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedBlock {
    /// Screen-space centre of the square.
    pub screen_x: f32,
    pub screen_y: f32,
    /// Edge length of the square.
    pub size: f32,
    /// Depth shading factor in `[min_brightness, 1]`.
    pub brightness: f32,
    /// Camera-relative depth after yaw rotation.
    pub depth: f32,
    /// Distance from the camera in the XZ plane; the sort key.
    pub distance_xz: f32,
    pub id: BlockId,
    pub block: Block,
}

impl ProjectedBlock {
    pub fn bounds(&self) -> ScreenRect {
        ScreenRect {
            x: self.screen_x - self.size / 2.0,
            y: self.screen_y - self.size / 2.0,
            width: self.size,
            height: self.size,
        }
    }

    /// Bottom band of the square that receives the ground-contact darkening.
    pub fn shadow_band(&self, fraction: f32) -> ScreenRect {
        let band = self.size * fraction.clamp(0.0, 1.0);
        ScreenRect {
            x: self.screen_x - self.size / 2.0,
            y: self.screen_y + self.size / 2.0 - band,
            width: self.size,
            height: band,
        }
    }

    /// Kind color darkened by depth.
    pub fn fill_color(&self) -> Rgb {
        self.block
            .kind
            .color()
            .unwrap_or(Rgb::BLACK)
            .scale(self.brightness)
    }

    pub fn shadow_color(&self, opacity: f32) -> Rgb {
        self.fill_color().blend(Rgb::BLACK, opacity)
    }
}

/// How many blocks each stage dropped in one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullStats {
    /// Blocks offered by the spatial index around the camera.
    pub candidates: usize,
    pub air: usize,
    pub out_of_radius: usize,
    pub behind: usize,
    pub near_plane: usize,
    pub too_small: usize,
    pub off_screen: usize,
    pub drawn: usize,
}

impl CullStats {
    pub fn culled(&self) -> usize {
        self.air + self.out_of_radius + self.behind + self.near_plane + self.too_small + self.off_screen
    }
}

/// Far-to-near ordered draw list for one frame.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub items: Vec<ProjectedBlock>,
    pub stats: CullStats,
}

struct Candidate {
    id: BlockId,
    block: Block,
    dy: f32,
    rot_dx: f32,
    rot_dz: f32,
    distance_xz: f32,
}

/// Turns the store into a screen-space draw list for one camera and viewport.
#[derive(Debug, Clone, Default)]
pub struct Projector {
    config: ProjectionConfig,
}

impl Projector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project every visible block, farthest first.
    ///
    /// Pure with respect to its inputs; the shared borrow of `store` rules out
    /// mutation while a frame is being built.
    pub fn project(&self, store: &VoxelStore, camera: &Camera, viewport: Viewport) -> DrawList {
        let _span = tracing::info_span!("project_frame").entered();
        let cfg = &self.config;
        let mut stats = CullStats::default();

        let near = store.query_near(
            camera.position,
            cfg.visibility_radius,
            Metric::ManhattanXz,
            None,
        );
        stats.candidates = near.len();

        let (sin, cos) = camera.rot_y.sin_cos();
        let mut visible = Vec::with_capacity(near.len());
        for (id, block) in near {
            if block.kind.is_air() {
                stats.air += 1;
                continue;
            }
            let d = block.pos.as_vec3() - camera.position;
            let in_radius = d.x.abs() + d.z.abs() < cfg.visibility_radius;
            if !in_radius {
                stats.out_of_radius += 1;
                continue;
            }
            let rot_dx = d.x * cos - d.z * sin;
            let rot_dz = d.x * sin + d.z * cos;
            let in_front = rot_dz > -cfg.behind_slack;
            if !in_front {
                stats.behind += 1;
                continue;
            }
            visible.push(Candidate {
                id,
                block,
                dy: d.y,
                rot_dx,
                rot_dz,
                distance_xz: (d.x * d.x + d.z * d.z).sqrt(),
            });
        }

        // Painter's order. The sort is stable, so ties keep insertion order.
        visible.sort_by(|a, b| b.distance_xz.total_cmp(&a.distance_xz));

        let (half_w, half_h) = viewport.center();
        let width = viewport.width as f32;
        let mut items = Vec::with_capacity(visible.len());
        for c in visible {
            // Checked before dividing, so depth is never near zero below.
            let past_near = c.rot_dz >= cfg.near_plane;
            if !past_near {
                stats.near_plane += 1;
                continue;
            }
            let perspective = cfg.focal_length / c.rot_dz;
            let screen_x = c.rot_dx * perspective + half_w;
            let screen_y = -c.dy * perspective + half_h;
            let size = cfg.block_size * perspective;

            let resolvable = size > cfg.min_size;
            if !resolvable {
                stats.too_small += 1;
                continue;
            }
            let on_screen = screen_x > -size && screen_x < width + size;
            if !on_screen {
                stats.off_screen += 1;
                continue;
            }

            let brightness = (1.0 - c.rot_dz / cfg.brightness_falloff)
                .max(cfg.min_brightness)
                .min(1.0);
            items.push(ProjectedBlock {
                screen_x,
                screen_y,
                size,
                brightness,
                depth: c.rot_dz,
                distance_xz: c.distance_xz,
                id: c.id,
                block: c.block,
            });
        }
        stats.drawn = items.len();

        tracing::trace!(
            candidates = stats.candidates,
            drawn = stats.drawn,
            culled = stats.culled(),
            "frame projected"
        );

        DrawList { items, stats }
    }
}

/// Project with the reference constants.
pub fn project(store: &VoxelStore, camera: &Camera, viewport: Viewport) -> Vec<ProjectedBlock> {
    Projector::default().project(store, camera, viewport).items
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockworld_common::BlockKind;
    use blockworld_kernel::{WorldGenConfig, generate};
    use glam::Vec3;

    const EPS: f32 = 1e-3;

    fn single(block: Block) -> VoxelStore {
        VoxelStore::from_blocks([block])
    }

    #[test]
    fn empty_store_projects_nothing() {
        let store = VoxelStore::new();
        let list = Projector::default().project(&store, &Camera::default(), Viewport::default());
        assert!(list.items.is_empty());
        assert_eq!(list.stats, CullStats::default());
    }

    #[test]
    fn block_straight_ahead_lands_at_center() {
        let store = single(Block::new(0, 6, 3, BlockKind::Stone));
        let camera = Camera::new(Vec3::new(0.0, 6.0, 0.0), 0.0);
        let viewport = Viewport::default();
        let out = project(&store, &camera, viewport);

        assert_eq!(out.len(), 1);
        let p = out[0];
        assert!((p.screen_x - 600.0).abs() < EPS);
        assert!((p.screen_y - 400.0).abs() < EPS);
        assert!((p.size - 8000.0).abs() < 0.1);
        assert!((p.brightness - 0.9).abs() < EPS);
        assert_eq!(p.block.kind, BlockKind::Stone);
    }

    #[test]
    fn camera_inside_block_is_near_culled() {
        let store = single(Block::new(2, 3, 4, BlockKind::Dirt));
        let camera = Camera::new(Vec3::new(2.0, 3.0, 4.0), 0.4);
        let list = Projector::default().project(&store, &camera, Viewport::default());
        assert!(list.items.is_empty());
        assert_eq!(list.stats.near_plane, 1);
    }

    #[test]
    fn blocks_behind_camera_are_dropped() {
        let store = VoxelStore::from_blocks([
            Block::new(0, 0, -10, BlockKind::Stone),
            Block::new(0, 0, -2, BlockKind::Stone),
        ]);
        let camera = Camera::new(Vec3::ZERO, 0.0);
        let list = Projector::default().project(&store, &camera, Viewport::default());
        assert!(list.items.is_empty());
        // -10 fails the coarse pass, -2 survives it but fails the near plane.
        assert_eq!(list.stats.behind, 1);
        assert_eq!(list.stats.near_plane, 1);
    }

    #[test]
    fn yaw_turns_the_view() {
        let store = single(Block::new(10, 0, 0, BlockKind::Stone));
        let facing_z = Camera::new(Vec3::ZERO, 0.0);
        let facing_x = Camera::new(Vec3::ZERO, std::f32::consts::FRAC_PI_2);

        let side = project(&store, &facing_z, Viewport::default());
        assert!(side.is_empty(), "block is at rotated depth 0");

        let ahead = project(&store, &facing_x, Viewport::default());
        assert_eq!(ahead.len(), 1);
        assert!((ahead[0].depth - 10.0).abs() < EPS);
        assert!((ahead[0].screen_x - 600.0).abs() < 0.1);
    }

    #[test]
    fn right_of_camera_projects_right_of_center() {
        let store = single(Block::new(2, 0, 10, BlockKind::Stone));
        let out = project(&store, &Camera::new(Vec3::ZERO, 0.0), Viewport::default());
        assert_eq!(out.len(), 1);
        assert!((out[0].screen_x - (600.0 + 2.0 * 60.0)).abs() < EPS);
    }

    #[test]
    fn higher_blocks_project_upward() {
        let store = single(Block::new(0, 2, 10, BlockKind::Stone));
        let out = project(&store, &Camera::new(Vec3::ZERO, 0.0), Viewport::default());
        assert!((out[0].screen_y - (400.0 - 2.0 * 60.0)).abs() < EPS);
    }

    #[test]
    fn air_never_drawn() {
        let store = VoxelStore::from_blocks([
            Block::new(0, 0, 5, BlockKind::Air),
            Block::new(1, 0, 5, BlockKind::Grass),
        ]);
        let list = Projector::default().project(&store, &Camera::new(Vec3::ZERO, 0.0), Viewport::default());
        assert_eq!(list.items.len(), 1);
        assert!(list.items.iter().all(|p| !p.block.kind.is_air()));
        assert_eq!(list.stats.air, 1);
    }

    #[test]
    fn radius_boundary_is_exclusive() {
        let store = VoxelStore::from_blocks([
            Block::new(0, 0, 30, BlockKind::Stone),
            Block::new(0, 0, 29, BlockKind::Stone),
        ]);
        let out = project(&store, &Camera::new(Vec3::ZERO, 0.0), Viewport::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].block.pos.z, 29);
    }

    #[test]
    fn tiny_squares_are_skipped() {
        let config = ProjectionConfig {
            visibility_radius: 100_000.0,
            ..ProjectionConfig::default()
        };
        // size = 40 * 600 / 30000 = 0.8, below the threshold.
        let store = single(Block::new(0, 0, 30_000, BlockKind::Stone));
        let list = Projector::new(config).project(&store, &Camera::new(Vec3::ZERO, 0.0), Viewport::default());
        assert!(list.items.is_empty());
        assert_eq!(list.stats.too_small, 1);
    }

    #[test]
    fn off_screen_squares_are_skipped() {
        // With reference constants the radius keeps every square on screen,
        // so shrink blocks: rot_dx = 20 at depth 1 lands far past the edge.
        let config = ProjectionConfig {
            block_size: 1.0,
            ..ProjectionConfig::default()
        };
        let store = single(Block::new(20, 0, 1, BlockKind::Stone));
        let list = Projector::new(config).project(&store, &Camera::new(Vec3::ZERO, 0.0), Viewport::new(100, 100));
        assert!(list.items.is_empty());
        assert_eq!(list.stats.off_screen, 1);
    }

    #[test]
    fn brightness_floors_at_minimum() {
        let store = single(Block::new(0, 0, 25, BlockKind::Stone));
        let out = project(&store, &Camera::new(Vec3::ZERO, 0.0), Viewport::default());
        assert!((out[0].brightness - (1.0 - 25.0 / 30.0f32).max(0.4)).abs() < EPS);
        assert!((out[0].brightness - 0.4).abs() < EPS);
    }

    #[test]
    fn generated_world_satisfies_frame_properties() {
        let mut store = VoxelStore::from_blocks(generate(&WorldGenConfig::default(), Some(7)));
        store.place(Block::new(0, 8, 0, BlockKind::Air));
        let cfg = ProjectionConfig::default();

        for step in 0..16 {
            let yaw = step as f32 * 0.4;
            let camera = Camera::new(Vec3::new(-3.0 + step as f32, 8.0, -12.0 + step as f32), yaw);
            let list = Projector::new(cfg.clone()).project(&store, &camera, Viewport::default());
            let (sin, cos) = yaw.sin_cos();

            for pair in list.items.windows(2) {
                assert!(pair[0].distance_xz >= pair[1].distance_xz, "far-to-near order");
            }
            for p in &list.items {
                let d = p.block.pos.as_vec3() - camera.position;
                let rot_dz = d.x * sin + d.z * cos;
                assert!(rot_dz >= cfg.near_plane);
                assert!(d.x.abs() + d.z.abs() < cfg.visibility_radius);
                assert!((0.4..=1.0).contains(&p.brightness));
                assert!(!p.block.kind.is_air());
                assert!(p.size > cfg.min_size);
            }
            assert_eq!(list.stats.drawn, list.items.len());
            assert_eq!(list.stats.candidates, list.stats.drawn + list.stats.culled());
        }
    }

    #[test]
    fn shadow_band_is_bottom_fifth() {
        let p = ProjectedBlock {
            screen_x: 100.0,
            screen_y: 100.0,
            size: 50.0,
            brightness: 1.0,
            depth: 1.0,
            distance_xz: 1.0,
            id: BlockId(0),
            block: Block::new(0, 0, 0, BlockKind::Stone),
        };
        let band = p.shadow_band(0.2);
        assert!((band.height - 10.0).abs() < EPS);
        assert!((band.y + band.height - (p.bounds().y + p.size)).abs() < EPS);
        assert_eq!(p.fill_color(), Rgb::new(0x7F, 0x7F, 0x7F));
        assert!(p.shadow_color(0.1).r < p.fill_color().r);
    }
}
