use std::fmt;

use blockworld_common::BlockKind;
use serde::{Deserialize, Serialize};

/// Number of slots shown on the hotbar.
pub const HOTBAR_SLOTS: usize = 9;

/// A stack of one block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: BlockKind,
    pub count: u32,
}

impl Item {
    pub fn new(kind: BlockKind, count: u32) -> Self {
        Self { kind, count }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("slot {} is empty", .0 + 1)]
    EmptySlot(usize),
    #[error("slot {} is outside the hotbar", .0 + 1)]
    SlotOutOfRange(usize),
    #[error("need {needed} {kind}, have {available}")]
    Insufficient {
        kind: BlockKind,
        needed: u32,
        available: u32,
    },
}

/// Ordered item stacks plus the selected hotbar slot.
///
/// Stacks keep their position once added, even when their count drops to
/// zero, so hotbar slots never shift under the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
    selected: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_items([
            Item::new(BlockKind::Grass, 10),
            Item::new(BlockKind::Dirt, 10),
            Item::new(BlockKind::Stone, 10),
            Item::new(BlockKind::Wood, 5),
        ])
    }
}

impl Inventory {
    pub fn empty() -> Self {
        Self::with_items([])
    }

    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: items.into_iter().collect(),
            selected: 0,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The first [`HOTBAR_SLOTS`] stacks.
    pub fn hotbar(&self) -> &[Item] {
        &self.items[..self.items.len().min(HOTBAR_SLOTS)]
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_slot(&mut self, slot: usize) -> Result<(), InventoryError> {
        if slot >= HOTBAR_SLOTS {
            return Err(InventoryError::SlotOutOfRange(slot));
        }
        self.selected = slot;
        Ok(())
    }

    /// The stack in the selected slot, if the slot holds one.
    pub fn selected_item(&self) -> Option<Item> {
        self.items.get(self.selected).copied()
    }

    /// Total count held of `kind`.
    pub fn count_of(&self, kind: BlockKind) -> u32 {
        self.items
            .iter()
            .filter(|item| item.kind == kind)
            .map(|item| item.count)
            .sum()
    }

    /// Add `n` of `kind` to its existing stack, or append a new stack.
    pub fn credit(&mut self, kind: BlockKind, n: u32) {
        match self.items.iter_mut().find(|item| item.kind == kind) {
            Some(item) => item.count = item.count.saturating_add(n),
            None => self.items.push(Item::new(kind, n)),
        }
    }

    /// Remove `n` of `kind` from its stack. Leaves the inventory untouched
    /// on failure.
    pub fn take(&mut self, kind: BlockKind, n: u32) -> Result<(), InventoryError> {
        let available = self.count_of(kind);
        let item = self
            .items
            .iter_mut()
            .find(|item| item.kind == kind && item.count >= n)
            .ok_or(InventoryError::Insufficient {
                kind,
                needed: n,
                available,
            })?;
        item.count -= n;
        Ok(())
    }

    /// Decrement the selected stack by one.
    pub fn take_selected(&mut self) -> Result<BlockKind, InventoryError> {
        let slot = self.selected;
        let item = self
            .items
            .get_mut(slot)
            .filter(|item| item.count > 0)
            .ok_or(InventoryError::EmptySlot(slot))?;
        item.count -= 1;
        Ok(item.kind)
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.hotbar().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            let marker = if i == self.selected { "*" } else { "" };
            write!(f, "[{}{}:{} x{}]", marker, i + 1, item.kind.name(), item.count)?;
        }
        Ok(())
    }
}

/// Survival consumes and collects blocks; creative does neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
}

impl GameMode {
    pub fn toggle(self) -> Self {
        match self {
            GameMode::Survival => GameMode::Creative,
            GameMode::Creative => GameMode::Survival,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Survival => f.write_str("survival"),
            GameMode::Creative => f.write_str("creative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipe {
    pub input: Item,
    pub output: Item,
}

pub const RECIPES: &[Recipe] = &[Recipe {
    input: Item {
        kind: BlockKind::Wood,
        count: 2,
    },
    output: Item {
        kind: BlockKind::Stone,
        count: 4,
    },
}];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CraftError {
    #[error("no recipe at index {0}")]
    UnknownRecipe(usize),
    #[error("missing ingredients: need {needed} {kind}, have {available}")]
    Missing {
        kind: BlockKind,
        needed: u32,
        available: u32,
    },
}

/// Run recipe `index` against the inventory. Game mode plays no part.
pub fn craft(inventory: &mut Inventory, index: usize) -> Result<Recipe, CraftError> {
    let recipe = *RECIPES.get(index).ok_or(CraftError::UnknownRecipe(index))?;
    inventory
        .take(recipe.input.kind, recipe.input.count)
        .map_err(|_| CraftError::Missing {
            kind: recipe.input.kind,
            needed: recipe.input.count,
            available: inventory.count_of(recipe.input.kind),
        })?;
    inventory.credit(recipe.output.kind, recipe.output.count);
    tracing::debug!(
        input = %recipe.input.kind,
        output = %recipe.output.kind,
        "crafted"
    );
    Ok(recipe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_stock() {
        let inv = Inventory::default();
        assert_eq!(inv.count_of(BlockKind::Grass), 10);
        assert_eq!(inv.count_of(BlockKind::Dirt), 10);
        assert_eq!(inv.count_of(BlockKind::Stone), 10);
        assert_eq!(inv.count_of(BlockKind::Wood), 5);
        assert_eq!(inv.selected_item(), Some(Item::new(BlockKind::Grass, 10)));
    }

    #[test]
    fn credit_appends_unknown_kind() {
        let mut inv = Inventory::default();
        inv.credit(BlockKind::Leaves, 1);
        inv.credit(BlockKind::Leaves, 2);
        assert_eq!(inv.items().len(), 5);
        assert_eq!(inv.items()[4], Item::new(BlockKind::Leaves, 3));
    }

    #[test]
    fn take_never_underflows() {
        let mut inv = Inventory::default();
        let err = inv.take(BlockKind::Wood, 6).unwrap_err();
        assert_eq!(
            err,
            InventoryError::Insufficient {
                kind: BlockKind::Wood,
                needed: 6,
                available: 5
            }
        );
        assert_eq!(inv.count_of(BlockKind::Wood), 5);
        inv.take(BlockKind::Wood, 5).unwrap();
        assert_eq!(inv.count_of(BlockKind::Wood), 0);
    }

    #[test]
    fn emptied_stack_keeps_its_slot() {
        let mut inv = Inventory::with_items([Item::new(BlockKind::Dirt, 1), Item::new(BlockKind::Stone, 3)]);
        assert_eq!(inv.take_selected(), Ok(BlockKind::Dirt));
        assert_eq!(inv.take_selected(), Err(InventoryError::EmptySlot(0)));
        assert_eq!(inv.items()[1].kind, BlockKind::Stone);
    }

    #[test]
    fn selecting_slots() {
        let mut inv = Inventory::default();
        inv.select_slot(8).unwrap();
        assert_eq!(inv.selected_item(), None);
        assert_eq!(inv.select_slot(9), Err(InventoryError::SlotOutOfRange(9)));
        assert_eq!(inv.selected(), 8);
    }

    #[test]
    fn craft_converts_wood_to_stone() {
        let mut inv = Inventory::default();
        let recipe = craft(&mut inv, 0).unwrap();
        assert_eq!(recipe, RECIPES[0]);
        assert_eq!(inv.count_of(BlockKind::Wood), 3);
        assert_eq!(inv.count_of(BlockKind::Stone), 14);
    }

    #[test]
    fn craft_appends_output_stack() {
        let mut inv = Inventory::with_items([Item::new(BlockKind::Wood, 2)]);
        craft(&mut inv, 0).unwrap();
        assert_eq!(inv.items(), &[Item::new(BlockKind::Wood, 0), Item::new(BlockKind::Stone, 4)]);
    }

    #[test]
    fn craft_failures_leave_inventory_alone() {
        let mut inv = Inventory::with_items([Item::new(BlockKind::Wood, 1)]);
        let before = inv.clone();
        assert_eq!(
            craft(&mut inv, 0),
            Err(CraftError::Missing {
                kind: BlockKind::Wood,
                needed: 2,
                available: 1
            })
        );
        assert_eq!(craft(&mut inv, 7), Err(CraftError::UnknownRecipe(7)));
        assert_eq!(inv, before);
    }

    #[test]
    fn mode_toggles() {
        assert_eq!(GameMode::default().toggle(), GameMode::Creative);
        assert_eq!(GameMode::Creative.toggle(), GameMode::Survival);
    }

    #[test]
    fn display_marks_selected_slot() {
        let inv = Inventory::with_items([Item::new(BlockKind::Dirt, 2), Item::new(BlockKind::Wood, 1)]);
        assert_eq!(inv.to_string(), "[*1:dirt x2] [2:wood x1]");
    }
}
