use blockworld_common::{Block, BlockKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Terrain and decoration parameters for [`generate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    /// Columns span `[-world_size, world_size)` on both X and Z.
    pub world_size: i32,
    /// Amplitude of each of the two height waves.
    pub amplitude: f64,
    /// Angular frequency applied to X and Z.
    pub frequency: f64,
    /// Constant added before flooring.
    pub base_height: f64,
    /// Per-column probability of a tree.
    pub tree_chance: f64,
    /// Trees only grow on columns strictly higher than this.
    pub tree_min_height: i32,
    pub trunk_height: i32,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            world_size: 15,
            amplitude: 1.5,
            frequency: 0.2,
            base_height: 4.0,
            tree_chance: 0.03,
            tree_min_height: 2,
            trunk_height: 3,
        }
    }
}

impl WorldGenConfig {
    /// Surface height of column `(x, z)`.
    pub fn height(&self, x: i32, z: i32) -> i32 {
        let fx = x as f64 * self.frequency;
        let fz = z as f64 * self.frequency;
        (self.amplitude * fx.sin() + self.amplitude * fz.cos() + self.base_height).floor() as i32
    }
}

/// Generate the initial block set.
///
/// Terrain depends only on `config`. Tree placement draws from an RNG seeded
/// with `seed`, or from a fresh random seed when `None`.
pub fn generate(config: &WorldGenConfig, seed: Option<u64>) -> Vec<Block> {
    let seed = seed.unwrap_or_else(rand::random);
    let _span = tracing::info_span!("generate_world", seed, size = config.world_size).entered();
    let mut rng = StdRng::seed_from_u64(seed);
    // NaN would slip through `clamp` and panic in `gen_bool`.
    let chance = if config.tree_chance.is_finite() {
        config.tree_chance.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let size = config.world_size.max(0);
    let mut blocks = Vec::with_capacity((2 * size as usize).pow(2));
    let mut trees = 0usize;

    for x in -size..size {
        for z in -size..size {
            let h = config.height(x, z);
            blocks.push(Block::new(x, h, z, BlockKind::Grass));

            // Draw for every column so the sequence does not depend on terrain.
            let roll = rng.gen_bool(chance);
            if roll && h > config.tree_min_height {
                grow_tree(&mut blocks, x, h, z, config.trunk_height);
                trees += 1;
            }
        }
    }

    tracing::debug!(blocks = blocks.len(), trees, "world generated");
    blocks
}

fn grow_tree(blocks: &mut Vec<Block>, x: i32, h: i32, z: i32, trunk_height: i32) {
    for ty in 1..=trunk_height {
        blocks.push(Block::new(x, h + ty, z, BlockKind::Wood));
    }
    let canopy = h + trunk_height + 1;
    for lx in -1..=1 {
        for lz in -1..=1 {
            if lx != 0 || lz != 0 {
                blocks.push(Block::new(x + lx, canopy, z + lz, BlockKind::Leaves));
            }
        }
    }
}
