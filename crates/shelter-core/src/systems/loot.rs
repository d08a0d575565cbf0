//! Completion loot - what a colonist brings home from an expedition

use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{Armor, Attribute, Attributes, Gear, Resource, Satchel, Weapon};

const JUNK: [Resource; 6] = [
    Resource::Screws,
    Resource::Springs,
    Resource::Gears,
    Resource::CircuitBoard,
    Resource::AluminumCan,
    Resource::GlassBottle,
];

const WEAPONS: [&str; 3] = ["Pipe Pistol", "Rusty Knife", "Baseball Bat"];
const ARMORS: [&str; 3] = ["Leather Armor", "Raider Armor", "Lab Coat"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LootItem {
    Junk(Resource),
    Caps(u32),
    Stimpak,
    Radaway,
    Gear(Gear),
}

impl LootItem {
    /// Pack slots taken; caps and medical supplies are carried separately
    pub fn slots(&self) -> u32 {
        match self {
            LootItem::Junk(_) | LootItem::Gear(_) => 1,
            LootItem::Caps(_) | LootItem::Stimpak | LootItem::Radaway => 0,
        }
    }
}

/// Roll the haul for `days` spent outside. Longer trips mean more rolls and
/// better odds, as do Perception and Luck.
pub fn roll_loot(attributes: &Attributes, days: f64, rng: &mut impl Rng) -> Vec<LootItem> {
    let perception = attributes.get(Attribute::Perception) as f64;
    let luck = attributes.get(Attribute::Luck) as f64;
    let intelligence = attributes.get(Attribute::Intelligence) as f64;

    let chance = (0.3 + days * 0.1).min(0.8) + perception * 0.05 + luck * 0.03;
    let rolls = rng.gen_range(1..=3) + days.max(0.0).floor() as u32;

    let mut loot = Vec::new();
    for _ in 0..rolls {
        if rng.gen::<f64>() > chance {
            continue;
        }
        let item = match rng.gen_range(1..=10) {
            1..=3 => JUNK.choose(rng).map(|junk| LootItem::Junk(*junk)),
            4..=5 => Some(LootItem::Caps(rng.gen_range(5..=25) + luck as u32 * 2)),
            6..=7 => {
                if rng.gen::<f64>() <= 0.2 + intelligence * 0.05 {
                    Some(LootItem::Stimpak)
                } else {
                    Some(LootItem::Radaway)
                }
            }
            8..=9 => {
                if rng.gen::<f64>() <= 0.1 + perception * 0.03 {
                    random_weapon(rng)
                } else {
                    None
                }
            }
            _ => {
                if rng.gen::<f64>() <= 0.05 + perception * 0.02 {
                    random_armor(rng)
                } else {
                    None
                }
            }
        };
        loot.extend(item);
    }
    loot
}

fn random_weapon(rng: &mut impl Rng) -> Option<LootItem> {
    let name = WEAPONS.choose(rng)?;
    let min_damage = rng.gen_range(3..=8);
    let max_damage = rng.gen_range(8..=15);
    Some(LootItem::Gear(Gear::Weapon(Weapon {
        name: name.to_string(),
        min_damage,
        max_damage,
    })))
}

fn random_armor(rng: &mut impl Rng) -> Option<LootItem> {
    let name = ARMORS.choose(rng)?;
    Some(LootItem::Gear(Gear::Armor(Armor {
        name: name.to_string(),
        bonus: Attribute::Endurance,
        bonus_amount: rng.gen_range(1..=3),
    })))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StowReport {
    pub stowed: Vec<LootItem>,
    pub discarded: Vec<LootItem>,
}

/// Pack loot into a satchel until it is full; the rest is left behind
pub fn stow(satchel: &mut Satchel, loot: Vec<LootItem>) -> StowReport {
    let mut report = StowReport::default();
    for item in loot {
        if item.slots() > satchel.free_slots() {
            report.discarded.push(item);
            continue;
        }
        match &item {
            LootItem::Junk(resource) => satchel.items.credit(*resource, 1),
            LootItem::Caps(amount) => satchel.caps += amount,
            LootItem::Stimpak => satchel.stimpaks += 1,
            LootItem::Radaway => satchel.radaways += 1,
            LootItem::Gear(gear) => satchel.gear.push(gear.clone()),
        }
        report.stowed.push(item);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_roll_count_grows_with_days() {
        let lucky = Attributes {
            perception: 10,
            luck: 10,
            ..Attributes::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        // chance is above 1, so only the weapon and armor sub-rolls can miss
        for _ in 0..20 {
            let loot = roll_loot(&lucky, 0.0, &mut rng);
            assert!(loot.len() <= 3);
        }
        let long_trip = roll_loot(&lucky, 10.0, &mut rng);
        assert!(long_trip.len() >= 4);
        assert!(long_trip.len() <= 13);
    }

    #[test]
    fn test_caps_scale_with_luck() {
        let attrs = Attributes {
            luck: 10,
            ..Attributes::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..50 {
            for item in roll_loot(&attrs, 2.0, &mut rng) {
                if let LootItem::Caps(amount) = item {
                    assert!((25..=45).contains(&amount));
                }
            }
        }
    }

    #[test]
    fn test_stow_discards_overflow() {
        let mut satchel = Satchel {
            capacity: 2,
            ..Satchel::default()
        };
        let loot = vec![
            LootItem::Junk(Resource::Screws),
            LootItem::Caps(10),
            LootItem::Junk(Resource::Gears),
            LootItem::Junk(Resource::Springs),
            LootItem::Stimpak,
        ];

        let report = stow(&mut satchel, loot);

        assert_eq!(report.discarded, vec![LootItem::Junk(Resource::Springs)]);
        assert_eq!(satchel.used(), 2);
        assert_eq!(satchel.caps, 10);
        assert_eq!(satchel.stimpaks, 1);
    }
}
