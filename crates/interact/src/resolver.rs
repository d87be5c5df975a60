use blockworld_common::{Block, BlockKind, Camera};
use blockworld_kernel::{Metric, VoxelStore};
use serde::{Deserialize, Serialize};

/// Reach and pick radius for place/break.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Distance of the look point in front of the camera.
    pub reach: f32,
    /// Blocks farther than this from the look point cannot be broken.
    pub break_radius: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            reach: 3.0,
            break_radius: 2.0,
        }
    }
}

/// Place a block of `kind` at the look point, rounded to the grid.
///
/// Never fails and never checks for an existing block at the target.
pub fn place_block(
    store: &mut VoxelStore,
    camera: &Camera,
    kind: BlockKind,
    config: &InteractionConfig,
) -> Block {
    let target = camera.look_point(config.reach).round().as_ivec3();
    let block = Block::at(target, kind);
    store.place(block);
    tracing::debug!(pos = ?target, %kind, "placed block");
    block
}

/// Remove the block nearest the look point, if one lies within the break
/// radius. Equal distances resolve to the earliest placed block.
pub fn break_block(
    store: &mut VoxelStore,
    camera: &Camera,
    config: &InteractionConfig,
) -> Option<Block> {
    let look = camera.look_point(config.reach);
    let (id, _) = store
        .query_near(look, config.break_radius, Metric::Euclidean, None)
        .into_iter()
        .map(|(id, block)| (id, block.pos.as_vec3().distance(look)))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;
    let block = store.remove(id)?;
    tracing::debug!(pos = ?block.pos, kind = %block.kind, "broke block");
    Some(block)
}
