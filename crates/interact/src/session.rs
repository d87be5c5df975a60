use std::fmt;

use blockworld_common::{Block, Camera};
use blockworld_input::{Action, InputConfig, apply_camera_action};
use blockworld_kernel::VoxelStore;
use blockworld_render::{DrawList, ProjectionConfig, Projector, Viewport};

use crate::inventory::{CraftError, GameMode, Inventory, InventoryError, Recipe, craft};
use crate::resolver::{InteractionConfig, break_block, place_block};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    Craft(#[from] CraftError),
}

/// What a handled action did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Camera moved or turned.
    Moved(Camera),
    Placed(Block),
    Broke(Block),
    /// Break found no block within reach.
    NothingToBreak,
    SlotSelected(usize),
    Crafted(Recipe),
    CraftingToggled(bool),
    PauseToggled(bool),
    ModeChanged(GameMode),
    /// Dropped because the session is paused, or the action is unbound.
    Ignored,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Moved(cam) => write!(
                f,
                "moved to ({:.2}, {:.2}, {:.2}) yaw {:.2}",
                cam.position.x, cam.position.y, cam.position.z, cam.rot_y
            ),
            Outcome::Placed(b) => write!(f, "placed {} at {}", b.kind, b.pos),
            Outcome::Broke(b) => write!(f, "broke {} at {}", b.kind, b.pos),
            Outcome::NothingToBreak => f.write_str("nothing to break"),
            Outcome::SlotSelected(slot) => write!(f, "selected slot {}", slot + 1),
            Outcome::Crafted(r) => write!(
                f,
                "crafted {} {} from {} {}",
                r.output.count, r.output.kind, r.input.count, r.input.kind
            ),
            Outcome::CraftingToggled(open) => {
                write!(f, "crafting {}", if *open { "open" } else { "closed" })
            }
            Outcome::PauseToggled(paused) => {
                write!(f, "{}", if *paused { "paused" } else { "resumed" })
            }
            Outcome::ModeChanged(mode) => write!(f, "mode {mode}"),
            Outcome::Ignored => f.write_str("ignored"),
        }
    }
}

/// One player's view of a world: the store, the camera, and the state the
/// HUD shows. All front ends drive it through [`Session::handle`].
#[derive(Debug)]
pub struct Session {
    store: VoxelStore,
    camera: Camera,
    inventory: Inventory,
    mode: GameMode,
    paused: bool,
    crafting_open: bool,
    input: InputConfig,
    interaction: InteractionConfig,
    projector: Projector,
    viewport: Viewport,
}

impl Session {
    pub fn new(store: VoxelStore, camera: Camera) -> Self {
        Self {
            store,
            camera,
            inventory: Inventory::default(),
            mode: GameMode::default(),
            paused: false,
            crafting_open: false,
            input: InputConfig::default(),
            interaction: InteractionConfig::default(),
            projector: Projector::default(),
            viewport: Viewport::default(),
        }
    }

    pub fn with_input(mut self, input: InputConfig) -> Self {
        self.input = input;
        self
    }

    pub fn with_interaction(mut self, interaction: InteractionConfig) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn with_projection(mut self, config: ProjectionConfig, viewport: Viewport) -> Self {
        self.projector = Projector::new(config);
        self.viewport = viewport;
        self
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn store(&self) -> &VoxelStore {
        &self.store
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn crafting_open(&self) -> bool {
        self.crafting_open
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Consume the session, handing back the world it edited.
    pub fn into_store(self) -> VoxelStore {
        self.store
    }

    /// Apply one action. Errors leave the session unchanged.
    pub fn handle(&mut self, action: Action) -> Result<Outcome, SessionError> {
        if self.paused && action != Action::TogglePause {
            tracing::trace!(%action, "ignored while paused");
            return Ok(Outcome::Ignored);
        }

        if apply_camera_action(&mut self.camera, action, &self.input) {
            return Ok(Outcome::Moved(self.camera));
        }

        let outcome = match action {
            Action::Place => Outcome::Placed(self.place()?),
            Action::Break => match break_block(&mut self.store, &self.camera, &self.interaction) {
                Some(block) => {
                    if self.mode == GameMode::Survival && !block.kind.is_air() {
                        self.inventory.credit(block.kind, 1);
                    }
                    Outcome::Broke(block)
                }
                None => Outcome::NothingToBreak,
            },
            Action::SelectSlot(slot) => {
                self.inventory.select_slot(slot)?;
                Outcome::SlotSelected(slot)
            }
            Action::Craft(index) => Outcome::Crafted(craft(&mut self.inventory, index)?),
            Action::ToggleCrafting => {
                self.crafting_open = !self.crafting_open;
                Outcome::CraftingToggled(self.crafting_open)
            }
            Action::TogglePause => {
                self.paused = !self.paused;
                Outcome::PauseToggled(self.paused)
            }
            Action::ToggleMode => {
                self.mode = self.mode.toggle();
                Outcome::ModeChanged(self.mode)
            }
            _ => Outcome::Ignored,
        };
        tracing::debug!(%action, %outcome, "handled action");
        Ok(outcome)
    }

    fn place(&mut self) -> Result<Block, InventoryError> {
        let kind = match self.mode {
            GameMode::Survival => self.inventory.take_selected()?,
            GameMode::Creative => {
                let slot = self.inventory.selected();
                self.inventory
                    .selected_item()
                    .filter(|item| item.count > 0)
                    .ok_or(InventoryError::EmptySlot(slot))?
                    .kind
            }
        };
        Ok(place_block(&mut self.store, &self.camera, kind, &self.interaction))
    }

    /// Project the current world for the session camera.
    pub fn frame(&self) -> DrawList {
        self.projector.project(&self.store, &self.camera, self.viewport)
    }
}
