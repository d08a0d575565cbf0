//! People-related components: Identity, Vitals, Attributes, Loadout, Satchel

use serde::{Deserialize, Serialize};

use super::inventory::Inventory;
use super::rooms::RoomKind;

/// Upper bound for every vital
pub const VITAL_MAX: f32 = 100.0;

/// Default number of slots in a personal pack
pub const PACK_CAPACITY: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    pub fn random(rng: &mut impl rand::Rng) -> Self {
        if rng.gen_bool(0.5) {
            Gender::M
        } else {
            Gender::F
        }
    }
}

/// Who a colonist is. Names are unique within the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub gender: Gender,
    pub age: u32,
}

impl Identity {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            name: name.into(),
            gender,
            age: 21,
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }
}

/// Health and needs - all values 0 to 100.
/// Health counts down toward death, the rest count up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub hunger: f32,
    pub thirst: f32,
    pub radiation: f32,
    pub alive: bool,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            health: VITAL_MAX,
            hunger: 0.0,
            thirst: 0.0,
            radiation: 0.0,
            alive: true,
        }
    }
}

impl Vitals {
    pub fn adjust_health(&mut self, delta: f32) {
        self.health = (self.health + delta).clamp(0.0, VITAL_MAX);
    }

    pub fn adjust_hunger(&mut self, delta: f32) {
        self.hunger = (self.hunger + delta).clamp(0.0, VITAL_MAX);
    }

    pub fn adjust_thirst(&mut self, delta: f32) {
        self.thirst = (self.thirst + delta).clamp(0.0, VITAL_MAX);
    }

    pub fn adjust_radiation(&mut self, delta: f32) {
        self.radiation = (self.radiation + delta).clamp(0.0, VITAL_MAX);
    }

    /// Starved, dehydrated or bled out
    pub fn is_fatal(&self) -> bool {
        self.hunger >= VITAL_MAX || self.thirst >= VITAL_MAX || self.health <= 0.0
    }

    pub fn kill(&mut self) {
        self.alive = false;
        self.health = 0.0;
    }
}

/// The seven S.P.E.C.I.A.L. stats, each 1-10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: u8,
    pub perception: u8,
    pub endurance: u8,
    pub charisma: u8,
    pub intelligence: u8,
    pub agility: u8,
    pub luck: u8,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            strength: 5,
            perception: 5,
            endurance: 5,
            charisma: 5,
            intelligence: 5,
            agility: 5,
            luck: 5,
        }
    }
}

impl Attributes {
    pub fn random(rng: &mut impl rand::Rng) -> Self {
        Self {
            strength: rng.gen_range(1..=10),
            perception: rng.gen_range(1..=10),
            endurance: rng.gen_range(1..=10),
            charisma: rng.gen_range(1..=10),
            intelligence: rng.gen_range(1..=10),
            agility: rng.gen_range(1..=10),
            luck: rng.gen_range(1..=10),
        }
    }

    pub fn get(&self, attribute: Attribute) -> u8 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Perception => self.perception,
            Attribute::Endurance => self.endurance,
            Attribute::Charisma => self.charisma,
            Attribute::Intelligence => self.intelligence,
            Attribute::Agility => self.agility,
            Attribute::Luck => self.luck,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Strength,
    Perception,
    Endurance,
    Charisma,
    Intelligence,
    Agility,
    Luck,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub min_damage: u32,
    pub max_damage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    pub name: String,
    pub bonus: Attribute,
    pub bonus_amount: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outfit {
    pub name: String,
}

/// Non-stackable equipment carried in a pack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gear {
    Weapon(Weapon),
    Armor(Armor),
}

/// Equipped items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    pub weapon: Option<Weapon>,
    pub armor: Option<Armor>,
    pub outfit: Option<Outfit>,
}

/// Personal belongings: a bounded pack, personal caps and medical supplies.
///
/// Expedition finds land here and stay with the colonist until they are
/// transferred into the colony stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Satchel {
    pub items: Inventory,
    pub gear: Vec<Gear>,
    pub capacity: u32,
    pub caps: u32,
    pub stimpaks: u32,
    pub radaways: u32,
}

impl Default for Satchel {
    fn default() -> Self {
        Self {
            items: Inventory::new(),
            gear: Vec::new(),
            capacity: PACK_CAPACITY,
            caps: 0,
            stimpaks: 0,
            radaways: 0,
        }
    }
}

impl Satchel {
    pub fn used(&self) -> u32 {
        self.items.total() + self.gear.len() as u32
    }

    pub fn free_slots(&self) -> u32 {
        self.capacity.saturating_sub(self.used())
    }
}

/// Present while a colonist works in a room. Removed on unassign and death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedTo(pub RoomKind);
