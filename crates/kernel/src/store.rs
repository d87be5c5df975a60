use std::collections::BTreeMap;

use blockworld_common::{Block, BlockKind};
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::grid::GridIndex;

/// Default XZ cell size of the spatial index, in world units.
pub const DEFAULT_CELL_SIZE: i32 = 16;

/// Identifier handed out on placement. Ids grow monotonically, so ordering
/// by id is insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u64);

/// An event record produced by every mutation of the store.
///
/// The log is enough to rebuild an identical store via [`VoxelStore::replay`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreEvent {
    Placed { id: BlockId, block: Block },
    Removed { id: BlockId, block: Block },
}

/// Distance bound used by [`VoxelStore::query_near`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    /// `|dx| + |dz|`, ignoring height.
    ManhattanXz,
    /// Straight-line distance in 3D.
    Euclidean,
}

impl Metric {
    pub fn distance(self, a: Vec3, b: Vec3) -> f32 {
        let d = a - b;
        match self {
            Metric::ManhattanXz => d.x.abs() + d.z.abs(),
            Metric::Euclidean => d.length(),
        }
    }
}

/// Insertion-ordered collection of placed blocks.
///
/// No uniqueness is enforced per coordinate: several blocks may share a
/// position. Every operation is total.
#[derive(Debug, Clone)]
pub struct VoxelStore {
    blocks: BTreeMap<BlockId, Block>,
    next_id: u64,
    grid: GridIndex,
    event_log: Vec<StoreEvent>,
}

impl Default for VoxelStore {
    fn default() -> Self {
        Self::with_cell_size(DEFAULT_CELL_SIZE)
    }
}

impl VoxelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cell_size(cell_size: i32) -> Self {
        Self {
            blocks: BTreeMap::new(),
            next_id: 0,
            grid: GridIndex::new(cell_size),
            event_log: Vec::new(),
        }
    }

    /// Build a store from a block sequence, preserving its order.
    pub fn from_blocks(blocks: impl IntoIterator<Item = Block>) -> Self {
        let mut store = Self::new();
        store.extend(blocks);
        store
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    /// Append a block. Never de-duplicates.
    pub fn place(&mut self, block: Block) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        self.insert_with_id(id, block);
        self.event_log.push(StoreEvent::Placed { id, block });
        tracing::trace!(?id, pos = ?block.pos, kind = %block.kind, "block placed");
        id
    }

    pub fn extend(&mut self, blocks: impl IntoIterator<Item = Block>) {
        for block in blocks {
            self.place(block);
        }
    }

    fn insert_with_id(&mut self, id: BlockId, block: Block) {
        self.blocks.insert(id, block);
        self.grid.insert(id, block.pos);
    }

    fn take(&mut self, id: BlockId) -> Option<Block> {
        let block = self.blocks.remove(&id)?;
        self.grid.remove(id, block.pos);
        Some(block)
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    /// Remove a block by id, returning it if present.
    pub fn remove(&mut self, id: BlockId) -> Option<Block> {
        let block = self.take(id)?;
        self.event_log.push(StoreEvent::Removed { id, block });
        tracing::debug!(?id, pos = ?block.pos, kind = %block.kind, "block removed");
        Some(block)
    }

    /// Remove the first block (in insertion order) matching `predicate`.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&Block) -> bool) -> Option<Block> {
        let id = self
            .blocks
            .iter()
            .find(|(_, block)| predicate(block))
            .map(|(id, _)| *id)?;
        self.remove(id)
    }

    /// All blocks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, Block)> + '_ {
        self.blocks.iter().map(|(id, block)| (*id, *block))
    }

    /// Every block at exactly `pos`, duplicates included.
    pub fn blocks_at(&self, pos: IVec3) -> Vec<(BlockId, Block)> {
        self.grid
            .ids_in_cell(pos)
            .into_iter()
            .filter_map(|id| self.blocks.get(&id).map(|b| (id, *b)))
            .filter(|(_, b)| b.pos == pos)
            .collect()
    }

    /// Blocks whose distance to `point` under `metric` is at most `max`,
    /// in insertion order, truncated to `limit` when given.
    pub fn query_near(
        &self,
        point: Vec3,
        max: f32,
        metric: Metric,
        limit: Option<usize>,
    ) -> Vec<(BlockId, Block)> {
        let hits = self
            .grid
            .ids_near(point, max)
            .into_iter()
            .filter_map(|id| self.blocks.get(&id).map(|b| (id, *b)))
            .filter(|(_, b)| metric.distance(b.pos.as_vec3(), point) <= max);
        match limit {
            Some(n) => hits.take(n).collect(),
            None => hits.collect(),
        }
    }

    /// Number of blocks of each kind.
    pub fn count_by_kind(&self) -> BTreeMap<BlockKind, usize> {
        let mut counts = BTreeMap::new();
        for block in self.blocks.values() {
            *counts.entry(block.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[StoreEvent] {
        &self.event_log
    }

    /// Reconstruct a store from a sequence of events. The result carries an
    /// empty event log.
    pub fn replay(events: &[StoreEvent]) -> Self {
        let mut store = Self::new();
        for event in events {
            match event {
                StoreEvent::Placed { id, block } => {
                    store.insert_with_id(*id, *block);
                    store.next_id = store.next_id.max(id.0 + 1);
                }
                StoreEvent::Removed { id, .. } => {
                    store.take(*id);
                }
            }
        }
        store
    }

    /// Deterministic hash of the store contents in insertion order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for (id, block) in &self.blocks {
            mix(&mut h, &id.0.to_le_bytes());
            mix(&mut h, &block.pos.x.to_le_bytes());
            mix(&mut h, &block.pos.y.to_le_bytes());
            mix(&mut h, &block.pos.z.to_le_bytes());
            mix(&mut h, &[block.kind as u8]);
        }
        h
    }
}
