//! Interaction: place/break resolution against the voxel store, inventory
//! and crafting bookkeeping, and the [`Session`] that routes actions.
//!
//! # Invariants
//! - Place always succeeds at the rounded look point, whether or not a block
//!   already occupies it.
//! - Break removes at most one block, the one nearest the look point within
//!   the break radius.
//! - Survival place consumes exactly one item and survival break credits
//!   exactly one; creative changes no counts.
//! - A paused session ignores every action except unpausing.

mod inventory;
mod resolver;
mod session;

pub use inventory::{
    CraftError, GameMode, HOTBAR_SLOTS, Inventory, InventoryError, Item, RECIPES, Recipe, craft,
};
pub use resolver::{InteractionConfig, break_block, place_block};
pub use session::{Outcome, Session, SessionError};
