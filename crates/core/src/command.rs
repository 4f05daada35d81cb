use crate::state::{EntityId, Offset, Position};

/// Index into an actor's inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventorySlot(pub u8);

impl InventorySlot {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Explicit target an item can be used against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectTarget {
    Fighter(EntityId),
    Tile(Position),
}

/// One intended action for one turn.
///
/// The payload shape depends on the variant, so every representable command
/// is valid by construction; the intake boundary only decides whether an
/// input symbol maps to one of these at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Step by a relative offset (direction keys, AI drift, AI bump attack).
    Walk { offset: Offset },
    /// Use the inventory item in `slot`, optionally at an explicit target.
    UseItem {
        slot: InventorySlot,
        target: Option<EffectTarget>,
    },
    /// Spend the turn doing nothing.
    Wait,
    /// Pick up whatever lies on the actor's own tile.
    Grab,
    /// Put the item in `slot` onto the actor's own tile.
    DropItem { slot: InventorySlot },
}

impl Command {
    pub fn walk(dx: i32, dy: i32) -> Self {
        Command::Walk {
            offset: Offset::new(dx, dy),
        }
    }

    pub fn use_item(slot: u8, target: Option<EffectTarget>) -> Self {
        Command::UseItem {
            slot: InventorySlot(slot),
            target,
        }
    }

    pub fn drop_item(slot: u8) -> Self {
        Command::DropItem {
            slot: InventorySlot(slot),
        }
    }
}
