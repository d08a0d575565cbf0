//! Shelter structure: RoomKind, Room and the RoomRegistry

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::inventory::Resource;
use crate::catalog::{blueprint, RoomBlueprint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    // Living
    Living,
    Storage,

    // Production
    Generator,
    Kitchen,
    Water,
    SteelMill,
    ElectronicsLab,
    Workshop,

    // Services
    Trader,
    Radio,
}

impl RoomKind {
    pub const ALL: [RoomKind; 10] = [
        RoomKind::Living,
        RoomKind::Generator,
        RoomKind::Storage,
        RoomKind::Kitchen,
        RoomKind::Trader,
        RoomKind::Water,
        RoomKind::Radio,
        RoomKind::SteelMill,
        RoomKind::ElectronicsLab,
        RoomKind::Workshop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomKind::Living => "living",
            RoomKind::Generator => "generator",
            RoomKind::Storage => "storage",
            RoomKind::Kitchen => "kitchen",
            RoomKind::Trader => "trader",
            RoomKind::Water => "water",
            RoomKind::Radio => "radio",
            RoomKind::SteelMill => "steel_mill",
            RoomKind::ElectronicsLab => "electronics_lab",
            RoomKind::Workshop => "workshop",
        }
    }

    pub fn blueprint(&self) -> &'static RoomBlueprint {
        blueprint(*self)
    }
}

impl fmt::Display for RoomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        RoomKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| s.to_string())
    }
}

/// A room of the shelter. Capacity, production and power draw are computed
/// from the blueprint plus the number of extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub kind: RoomKind,
    pub built: bool,
    pub extensions: u32,
    /// Next settlement yields double, then the flag clears
    pub rushed: bool,
}

impl Room {
    pub fn new(kind: RoomKind) -> Self {
        Self {
            kind,
            built: false,
            extensions: 0,
            rushed: false,
        }
    }

    pub fn built(mut self) -> Self {
        self.built = true;
        self
    }

    pub fn blueprint(&self) -> &'static RoomBlueprint {
        self.kind.blueprint()
    }

    /// Maximum number of assigned colonists; each extension adds a slot
    pub fn capacity(&self) -> u32 {
        self.blueprint().assigned_limit + self.extensions
    }

    /// Units produced per daily settlement
    pub fn production(&self) -> u32 {
        let bp = self.blueprint();
        bp.base_production + self.extensions * bp.production_per_extension
    }

    /// Watt consumed per daily settlement
    pub fn power_usage(&self) -> u32 {
        let bp = self.blueprint();
        bp.base_power_usage + self.extensions * bp.power_per_extension
    }

    pub fn produces(&self) -> Option<Resource> {
        self.blueprint().produces
    }

    /// Steel and watt needed for the next extension
    pub fn extension_cost(&self) -> [(Resource, u32); 2] {
        let step = 2 + self.extensions;
        [(Resource::Steel, step), (Resource::Watt, step)]
    }
}

/// Owns every room of the shelter, one per kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRegistry {
    rooms: BTreeMap<RoomKind, Room>,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl RoomRegistry {
    /// Every catalog room, with `prebuilt` already standing
    pub fn new(prebuilt: &[RoomKind]) -> Self {
        let rooms = RoomKind::ALL
            .iter()
            .map(|kind| {
                let mut room = Room::new(*kind);
                room.built = prebuilt.contains(kind);
                (*kind, room)
            })
            .collect();
        Self { rooms }
    }

    pub fn from_rooms(rooms: impl IntoIterator<Item = Room>) -> Self {
        let mut registry = Self::new(&[]);
        for room in rooms {
            registry.rooms.insert(room.kind, room);
        }
        registry
    }

    pub fn get(&self, kind: RoomKind) -> &Room {
        // every kind is inserted on construction
        &self.rooms[&kind]
    }

    pub fn get_mut(&mut self, kind: RoomKind) -> &mut Room {
        self.rooms.entry(kind).or_insert_with(|| Room::new(kind))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn built(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values().filter(|r| r.built)
    }

    pub fn is_built(&self, kind: RoomKind) -> bool {
        self.get(kind).built
    }

    /// Living quarters capacity; zero while unbuilt
    pub fn living_capacity(&self) -> u32 {
        let living = self.get(RoomKind::Living);
        if living.built {
            living.capacity()
        } else {
            0
        }
    }
}
