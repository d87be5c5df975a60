use std::collections::BTreeMap;

use blockworld_common::{Block, BlockKind};
use blockworld_kernel::{BlockId, VoxelStore};
use glam::IVec3;

/// Store inspector for developer tooling.
///
/// Read-only queries against the voxel store for debugging and CLI output.
pub struct StoreInspector;

impl StoreInspector {
    /// Produce a summary of the store.
    pub fn summary(store: &VoxelStore) -> StoreSummary {
        let bounds = store.iter().fold(None, |acc: Option<(IVec3, IVec3)>, (_, b)| {
            Some(match acc {
                Some((lo, hi)) => (lo.min(b.pos), hi.max(b.pos)),
                None => (b.pos, b.pos),
            })
        });
        StoreSummary {
            blocks: store.len(),
            by_kind: store.count_by_kind(),
            bounds,
            cells: store.grid().cell_count(),
            pending_events: store.events().len(),
        }
    }

    /// Every block at a coordinate, duplicates included.
    pub fn inspect_at(store: &VoxelStore, pos: IVec3) -> Vec<BlockInfo> {
        store
            .blocks_at(pos)
            .into_iter()
            .map(|(id, block)| BlockInfo { id, block })
            .collect()
    }
}

/// Summary of store state for the inspector.
#[derive(Debug, Clone)]
pub struct StoreSummary {
    pub blocks: usize,
    pub by_kind: BTreeMap<BlockKind, usize>,
    /// Inclusive integer bounds, `None` for an empty store.
    pub bounds: Option<(IVec3, IVec3)>,
    /// Occupied spatial-index cells.
    pub cells: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for StoreSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Store: blocks={} cells={} pending_events={}",
            self.blocks, self.cells, self.pending_events
        )?;
        if let Some((lo, hi)) = self.bounds {
            write!(
                f,
                " bounds=({}, {}, {})..=({}, {}, {})",
                lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
            )?;
        }
        for (kind, count) in &self.by_kind {
            write!(f, "\n  {:<7} {}", kind.display_name(), count)?;
        }
        Ok(())
    }
}

/// A single block with its store id.
#[derive(Debug, Clone)]
pub struct BlockInfo {
    pub id: BlockId,
    pub block: Block,
}

impl std::fmt::Display for BlockInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.block.pos;
        write!(
            f,
            "Block #{} {} at ({}, {}, {})",
            self.id.0, self.block.kind, p.x, p.y, p.z
        )
    }
}
