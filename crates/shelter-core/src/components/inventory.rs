//! Resource kinds and the inventory ledger shared by the colony and by
//! each colonist's personal pack.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Every stackable thing the shelter can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    // Staples
    Food,
    Water,
    Watt,

    // Materials
    Scrap,
    Steel,
    Silicon,
    Wire,
    Chip,

    // Medical
    Medkit,
    Stimpak,
    Radaway,

    // Crafted
    Turret,

    // Junk found on expeditions
    Screws,
    Springs,
    Gears,
    CircuitBoard,
    AluminumCan,
    GlassBottle,
}

impl Resource {
    pub const ALL: [Resource; 18] = [
        Resource::Food,
        Resource::Water,
        Resource::Watt,
        Resource::Scrap,
        Resource::Steel,
        Resource::Silicon,
        Resource::Wire,
        Resource::Chip,
        Resource::Medkit,
        Resource::Stimpak,
        Resource::Radaway,
        Resource::Turret,
        Resource::Screws,
        Resource::Springs,
        Resource::Gears,
        Resource::CircuitBoard,
        Resource::AluminumCan,
        Resource::GlassBottle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Food => "food",
            Resource::Water => "water",
            Resource::Watt => "watt",
            Resource::Scrap => "scrap",
            Resource::Steel => "steel",
            Resource::Silicon => "silicon",
            Resource::Wire => "wire",
            Resource::Chip => "chip",
            Resource::Medkit => "medkit",
            Resource::Stimpak => "stimpaks",
            Resource::Radaway => "radaways",
            Resource::Turret => "turret",
            Resource::Screws => "screws",
            Resource::Springs => "springs",
            Resource::Gears => "gears",
            Resource::CircuitBoard => "circuit_board",
            Resource::AluminumCan => "aluminum_can",
            Resource::GlassBottle => "glass_bottle",
        }
    }

    /// Junk is only ever found, never produced
    pub fn is_junk(&self) -> bool {
        matches!(
            self,
            Resource::Screws
                | Resource::Springs
                | Resource::Gears
                | Resource::CircuitBoard
                | Resource::AluminumCan
                | Resource::GlassBottle
        )
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == wanted || r.as_str().trim_end_matches('s') == wanted)
            .ok_or_else(|| s.to_string())
    }
}

/// Mapping of resource kind to a non-negative quantity.
///
/// Every mutation is all-or-nothing: a withdrawal that would take any entry
/// below zero is rejected and leaves the ledger untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    entries: BTreeMap<Resource, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(&self, resource: Resource) -> u32 {
        self.entries.get(&resource).copied().unwrap_or(0)
    }

    pub fn has(&self, resource: Resource, amount: u32) -> bool {
        self.quantity(resource) >= amount
    }

    /// Sum of all stacks
    pub fn total(&self) -> u32 {
        self.entries.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resource, u32)> + '_ {
        self.entries
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(r, qty)| (*r, *qty))
    }

    pub fn credit(&mut self, resource: Resource, amount: u32) {
        if amount == 0 {
            return;
        }
        let entry = self.entries.entry(resource).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    pub fn debit(&mut self, resource: Resource, amount: u32) -> Result<(), LedgerError> {
        self.debit_all(&[(resource, amount)])
    }

    /// Withdraw several stacks at once. Costs naming the same resource more
    /// than once are summed before checking.
    pub fn debit_all(&mut self, costs: &[(Resource, u32)]) -> Result<(), LedgerError> {
        let mut needed: BTreeMap<Resource, u32> = BTreeMap::new();
        for (resource, amount) in costs {
            *needed.entry(*resource).or_insert(0) += amount;
        }

        for (resource, amount) in &needed {
            let available = self.quantity(*resource);
            if available < *amount {
                return Err(LedgerError::Insufficient {
                    resource: *resource,
                    needed: *amount,
                    available,
                });
            }
        }

        for (resource, amount) in needed {
            if let Some(entry) = self.entries.get_mut(&resource) {
                *entry -= amount;
                if *entry == 0 {
                    self.entries.remove(&resource);
                }
            }
        }
        Ok(())
    }

    /// Remove and return every stack, leaving the ledger empty
    pub fn drain(&mut self) -> Vec<(Resource, u32)> {
        let drained = self.iter().collect();
        self.entries.clear();
        drained
    }
}

impl FromIterator<(Resource, u32)> for Inventory {
    fn from_iter<T: IntoIterator<Item = (Resource, u32)>>(iter: T) -> Self {
        let mut inventory = Inventory::new();
        for (resource, amount) in iter {
            inventory.credit(resource, amount);
        }
        inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_and_debit() {
        let mut inv = Inventory::new();
        inv.credit(Resource::Steel, 5);
        assert!(inv.debit(Resource::Steel, 3).is_ok());
        assert_eq!(inv.quantity(Resource::Steel), 2);
    }

    #[test]
    fn test_failed_debit_changes_nothing() {
        let mut inv: Inventory = [(Resource::Steel, 4), (Resource::Watt, 1)]
            .into_iter()
            .collect();
        let before = inv.clone();

        let err = inv
            .debit_all(&[(Resource::Steel, 2), (Resource::Watt, 2)])
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::Insufficient {
                resource: Resource::Watt,
                needed: 2,
                available: 1
            }
        );
        assert_eq!(inv, before);
    }

    #[test]
    fn test_repeated_costs_are_summed() {
        let mut inv: Inventory = [(Resource::Steel, 3)].into_iter().collect();
        let costs = [(Resource::Steel, 1); 4];
        assert!(inv.debit_all(&costs).is_err());
        assert_eq!(inv.quantity(Resource::Steel), 3);
    }

    #[test]
    fn test_resource_parsing() {
        assert_eq!("steel".parse::<Resource>(), Ok(Resource::Steel));
        assert_eq!("Circuit Board".parse::<Resource>(), Ok(Resource::CircuitBoard));
        assert_eq!("stimpak".parse::<Resource>(), Ok(Resource::Stimpak));
        assert!("unobtainium".parse::<Resource>().is_err());
    }

    #[test]
    fn test_drain_empties() {
        let mut inv: Inventory = [(Resource::Gears, 2), (Resource::Food, 1)]
            .into_iter()
            .collect();
        let drained = inv.drain();
        assert_eq!(drained.len(), 2);
        assert!(inv.is_empty());
    }
}
