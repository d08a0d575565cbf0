//! Static world data: room blueprints, crafting recipes and starting gear.
//!
//! These tables are read-only configuration; nothing in the engine mutates
//! them.

use crate::components::{Armor, Attribute, Loadout, Outfit, Resource, RoomKind, Weapon};

/// Build and running characteristics of a room kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomBlueprint {
    pub kind: RoomKind,
    /// Danger rating, 0 (safe) to 2
    pub risk: u8,
    /// Stat that makes a colonist good at working here
    pub attribute: Option<Attribute>,
    pub produces: Option<Resource>,
    /// Resources consumed one-for-one per unit produced
    pub inputs: &'static [Resource],
    /// Workers allowed before any extension; 0 means nobody works here
    pub assigned_limit: u32,
    pub base_production: u32,
    pub production_per_extension: u32,
    pub base_power_usage: u32,
    pub power_per_extension: u32,
    /// Materials needed to build
    pub components: &'static [(Resource, u32)],
    /// Crafting station
    pub crafting: bool,
}

static BLUEPRINTS: [RoomBlueprint; 10] = [
    RoomBlueprint {
        kind: RoomKind::Living,
        risk: 0,
        attribute: None,
        produces: None,
        inputs: &[],
        assigned_limit: 10,
        base_production: 0,
        production_per_extension: 0,
        base_power_usage: 5,
        power_per_extension: 2,
        components: &[],
        crafting: false,
    },
    RoomBlueprint {
        kind: RoomKind::Generator,
        risk: 2,
        attribute: Some(Attribute::Strength),
        produces: Some(Resource::Watt),
        inputs: &[],
        assigned_limit: 3,
        base_production: 8,
        production_per_extension: 4,
        base_power_usage: 0,
        power_per_extension: 0,
        components: &[(Resource::Steel, 4)],
        crafting: false,
    },
    RoomBlueprint {
        kind: RoomKind::Storage,
        risk: 0,
        attribute: None,
        produces: None,
        inputs: &[],
        assigned_limit: 0,
        base_production: 0,
        production_per_extension: 0,
        base_power_usage: 1,
        power_per_extension: 1,
        components: &[(Resource::Steel, 2)],
        crafting: false,
    },
    RoomBlueprint {
        kind: RoomKind::Kitchen,
        risk: 1,
        attribute: Some(Attribute::Agility),
        produces: Some(Resource::Food),
        inputs: &[],
        assigned_limit: 3,
        base_production: 5,
        production_per_extension: 2,
        base_power_usage: 10,
        power_per_extension: 3,
        components: &[],
        crafting: false,
    },
    RoomBlueprint {
        kind: RoomKind::Trader,
        risk: 0,
        attribute: Some(Attribute::Charisma),
        produces: None,
        inputs: &[],
        assigned_limit: 1,
        base_production: 0,
        production_per_extension: 0,
        base_power_usage: 2,
        power_per_extension: 1,
        components: &[(Resource::Scrap, 3), (Resource::Steel, 2)],
        crafting: false,
    },
    RoomBlueprint {
        kind: RoomKind::Water,
        risk: 2,
        attribute: Some(Attribute::Perception),
        produces: Some(Resource::Water),
        inputs: &[],
        assigned_limit: 3,
        base_production: 6,
        production_per_extension: 2,
        base_power_usage: 10,
        power_per_extension: 3,
        components: &[(Resource::Scrap, 2), (Resource::Steel, 1)],
        crafting: false,
    },
    RoomBlueprint {
        kind: RoomKind::Radio,
        risk: 0,
        attribute: Some(Attribute::Charisma),
        produces: None,
        inputs: &[],
        assigned_limit: 2,
        base_production: 0,
        production_per_extension: 0,
        base_power_usage: 15,
        power_per_extension: 5,
        components: &[(Resource::Scrap, 3), (Resource::Steel, 2)],
        crafting: false,
    },
    RoomBlueprint {
        kind: RoomKind::SteelMill,
        risk: 1,
        attribute: Some(Attribute::Strength),
        produces: Some(Resource::Steel),
        inputs: &[Resource::Scrap],
        assigned_limit: 2,
        base_production: 2,
        production_per_extension: 1,
        base_power_usage: 8,
        power_per_extension: 2,
        components: &[(Resource::Scrap, 3), (Resource::Watt, 1)],
        crafting: false,
    },
    RoomBlueprint {
        kind: RoomKind::ElectronicsLab,
        risk: 2,
        attribute: Some(Attribute::Intelligence),
        produces: Some(Resource::Chip),
        inputs: &[Resource::Wire, Resource::Silicon],
        assigned_limit: 2,
        base_production: 1,
        production_per_extension: 1,
        base_power_usage: 12,
        power_per_extension: 3,
        components: &[
            (Resource::Steel, 1),
            (Resource::Watt, 1),
            (Resource::Silicon, 1),
        ],
        crafting: false,
    },
    RoomBlueprint {
        kind: RoomKind::Workshop,
        risk: 2,
        attribute: Some(Attribute::Agility),
        produces: None,
        inputs: &[],
        assigned_limit: 2,
        base_production: 1,
        production_per_extension: 1,
        base_power_usage: 10,
        power_per_extension: 2,
        components: &[(Resource::Steel, 1), (Resource::Watt, 1)],
        crafting: true,
    },
];

pub fn blueprint(kind: RoomKind) -> &'static RoomBlueprint {
    BLUEPRINTS
        .iter()
        .find(|bp| bp.kind == kind)
        .unwrap_or(&BLUEPRINTS[0])
}

pub fn blueprints() -> &'static [RoomBlueprint] {
    &BLUEPRINTS
}

/// Something that can be crafted from colony stores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: &'static str,
    pub output: Resource,
    pub cost: &'static [(Resource, u32)],
}

static RECIPES: [Recipe; 1] = [Recipe {
    name: "turret",
    output: Resource::Turret,
    cost: &[(Resource::Steel, 3)],
}];

pub fn recipe(name: &str) -> Option<&'static Recipe> {
    let wanted = name.trim().to_ascii_lowercase();
    RECIPES.iter().find(|r| r.name == wanted)
}

/// The five kits handed to the founding colonists, in rotation
pub fn starting_loadout(index: usize) -> Loadout {
    let weapon = |name: &str, min_damage, max_damage| {
        Some(Weapon {
            name: name.to_string(),
            min_damage,
            max_damage,
        })
    };
    let armor = |name: &str, bonus, bonus_amount| {
        Some(Armor {
            name: name.to_string(),
            bonus,
            bonus_amount,
        })
    };
    let outfit = |name: &str| {
        Some(Outfit {
            name: name.to_string(),
        })
    };

    match index % 5 {
        0 => Loadout {
            weapon: weapon("Pipe Pistol", 4, 8),
            armor: armor("Leather Armor", Attribute::Endurance, 1),
            outfit: outfit("Vault Suit"),
        },
        1 => Loadout {
            weapon: weapon("Rusty Knife", 3, 6),
            armor: armor("Raider Armor", Attribute::Endurance, 2),
            outfit: outfit("Wasteland Gear"),
        },
        2 => Loadout {
            weapon: None,
            armor: armor("Lab Coat", Attribute::Intelligence, 1),
            outfit: outfit("Scientist Robes"),
        },
        3 => Loadout {
            weapon: weapon("Baseball Bat", 5, 10),
            armor: armor("Combat Armor", Attribute::Endurance, 3),
            outfit: outfit("Military Fatigues"),
        },
        _ => Loadout {
            weapon: None,
            armor: armor("Mercenary Gear", Attribute::Agility, 1),
            outfit: outfit("Tactical Vest"),
        },
    }
}
