//! World kernel: the authoritative voxel store and the world generator.
//!
//! # Invariants
//! - The store is insertion-ordered; ids grow monotonically.
//! - All mutations flow through `place`/`remove` and are logged.
//! - The spatial index always mirrors the block map.

pub mod generate;
pub mod grid;
pub mod store;

pub use generate::{WorldGenConfig, generate};
pub use grid::{CellCoord, GridIndex};
pub use store::{BlockId, Metric, StoreEvent, VoxelStore};
