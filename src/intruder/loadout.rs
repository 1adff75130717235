//! Equipped abilities under a capacity budget

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityId;
use crate::core::error::CommandError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    pub capacity: u32,
    pub max_slots: usize,
    equipped: Vec<AbilityId>,
}

impl Loadout {
    pub fn new(capacity: u32, max_slots: usize) -> Self {
        Self {
            capacity,
            max_slots,
            equipped: Vec::new(),
        }
    }

    /// Loadout with the standard opening abilities, skipping any that do not fit
    pub fn starting(capacity: u32, max_slots: usize) -> Self {
        let mut loadout = Self::new(capacity, max_slots);
        for id in AbilityId::starting_loadout() {
            if loadout.can_equip(id).is_ok() {
                loadout.equipped.push(id);
            }
        }
        loadout
    }

    pub fn equipped(&self) -> &[AbilityId] {
        &self.equipped
    }

    pub fn contains(&self, id: AbilityId) -> bool {
        self.equipped.contains(&id)
    }

    pub fn used(&self) -> u32 {
        self.equipped.iter().map(|id| id.def().loadout_cost).sum()
    }

    pub fn available(&self) -> u32 {
        self.capacity.saturating_sub(self.used())
    }

    /// Check that `id` could be equipped right now
    pub fn can_equip(&self, id: AbilityId) -> Result<(), CommandError> {
        if self.contains(id) {
            return Err(CommandError::AlreadyEquipped(id));
        }
        if self.equipped.len() >= self.max_slots {
            return Err(CommandError::LoadoutSlotsFull(self.max_slots));
        }
        let needed = id.def().loadout_cost;
        if needed > self.available() {
            return Err(CommandError::InsufficientLoadout {
                needed,
                available: self.available(),
            });
        }
        Ok(())
    }

    pub fn equip(&mut self, id: AbilityId) -> Result<(), CommandError> {
        self.can_equip(id)?;
        self.equipped.push(id);
        Ok(())
    }

    pub fn unequip(&mut self, id: AbilityId) -> Result<(), CommandError> {
        let index = self
            .equipped
            .iter()
            .position(|e| *e == id)
            .ok_or(CommandError::NotEquipped(id))?;
        self.equipped.remove(index);
        Ok(())
    }
}
