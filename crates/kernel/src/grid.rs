use std::collections::{BTreeSet, HashMap};

use glam::{IVec3, Vec3};

use crate::store::BlockId;

/// A 2D cell coordinate in the XZ plane (Y is not partitioned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub x: i32,
    pub z: i32,
}

impl CellCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Uniform XZ grid over block ids.
///
/// Kept in sync with the store on every place/remove so queries only visit
/// the cells overlapping their bound. Ids inside a cell are ordered, which
/// keeps query results in insertion order.
#[derive(Debug, Clone)]
pub struct GridIndex {
    cell_size: i32,
    cells: HashMap<CellCoord, BTreeSet<BlockId>>,
}

impl GridIndex {
    /// Sizes below one are raised to one.
    pub fn new(cell_size: i32) -> Self {
        Self {
            cell_size: cell_size.max(1),
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Cell containing an integer block position.
    pub fn cell_of(&self, pos: IVec3) -> CellCoord {
        CellCoord {
            x: pos.x.div_euclid(self.cell_size),
            z: pos.z.div_euclid(self.cell_size),
        }
    }

    fn cell_axis(&self, v: f32) -> i64 {
        (v / self.cell_size as f32).floor() as i64
    }

    pub fn insert(&mut self, id: BlockId, pos: IVec3) {
        let coord = self.cell_of(pos);
        self.cells.entry(coord).or_default().insert(id);
    }

    pub fn remove(&mut self, id: BlockId, pos: IVec3) {
        let coord = self.cell_of(pos);
        if let Some(ids) = self.cells.get_mut(&coord) {
            ids.remove(&id);
            if ids.is_empty() {
                self.cells.remove(&coord);
            }
        }
    }

    /// All ids in the cell holding `pos`.
    pub fn ids_in_cell(&self, pos: IVec3) -> BTreeSet<BlockId> {
        self.cells
            .get(&self.cell_of(pos))
            .cloned()
            .unwrap_or_default()
    }

    /// Ids in every cell that overlaps the XZ square of half-width `reach`
    /// around `center`, in insertion order.
    pub fn ids_near(&self, center: Vec3, reach: f32) -> BTreeSet<BlockId> {
        let mut result = BTreeSet::new();
        if reach.is_nan() || reach < 0.0 || !center.is_finite() {
            return result;
        }

        let (x0, x1) = (
            self.cell_axis(center.x - reach),
            self.cell_axis(center.x + reach),
        );
        let (z0, z1) = (
            self.cell_axis(center.z - reach),
            self.cell_axis(center.z + reach),
        );
        let span = x1
            .saturating_sub(x0)
            .saturating_add(1)
            .saturating_mul(z1.saturating_sub(z0).saturating_add(1));
        let in_i32 = |v: i64| (i32::MIN as i64..=i32::MAX as i64).contains(&v);

        // Huge bounds: walking the occupied cells is cheaper than the range.
        if span > self.cells.len() as i64 || ![x0, x1, z0, z1].into_iter().all(in_i32) {
            for (coord, ids) in &self.cells {
                let (cx, cz) = (coord.x as i64, coord.z as i64);
                if (x0..=x1).contains(&cx) && (z0..=z1).contains(&cz) {
                    result.extend(ids.iter().copied());
                }
            }
            return result;
        }

        for x in x0..=x1 {
            for z in z0..=z1 {
                let coord = CellCoord::new(x as i32, z as i32);
                if let Some(ids) = self.cells.get(&coord) {
                    result.extend(ids.iter().copied());
                }
            }
        }
        result
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of ids across all cells.
    pub fn total_placements(&self) -> usize {
        self.cells.values().map(|s| s.len()).sum()
    }
}
