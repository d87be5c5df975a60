use std::path::Path;

use anyhow::{Context, bail};
use blockworld_input::InputConfig;
use blockworld_interact::InteractionConfig;
use blockworld_kernel::WorldGenConfig;
use blockworld_render::{ProjectionConfig, Viewport};
use serde::{Deserialize, Serialize};

/// Everything tunable from a config file. Missing sections and fields fall
/// back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockworldConfig {
    pub world: WorldGenConfig,
    pub projection: ProjectionConfig,
    pub viewport: Viewport,
    pub input: InputConfig,
    pub interaction: InteractionConfig,
}

impl BlockworldConfig {
    /// Load from YAML (`.yaml`/`.yml`) or JSON (anything else).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let config = match ext.as_deref() {
            Some("yaml" | "yml") => serde_yaml::from_str(&text)
                .with_context(|| format!("parsing YAML config {}", path.display()))?,
            _ => serde_json::from_str(&text)
                .with_context(|| format!("parsing JSON config {}", path.display()))?,
        };
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            bail!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width,
                self.viewport.height
            );
        }
        if self.world.world_size < 0 {
            bail!("world_size must be non-negative, got {}", self.world.world_size);
        }
        if !self.world.tree_chance.is_finite() {
            bail!("tree_chance must be a finite number, got {}", self.world.tree_chance);
        }
        Ok(())
    }
}
