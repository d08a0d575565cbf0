//! Colony and colonist generation

use rand::Rng;

use super::names::{birth_name, wanderer_name};
use crate::catalog::starting_loadout;
use crate::colony::{ColonistRecord, Colony, ColonyResources};
use crate::components::*;
use crate::config::ColonyConfig;

/// The founders: fixed names, rotating starting kits and a few meds each
pub fn generate_founders(config: &ColonyConfig, rng: &mut impl Rng) -> Vec<ColonistRecord> {
    config
        .founders
        .iter()
        .enumerate()
        .map(|(i, founder)| {
            let mut record = ColonistRecord::new(
                Identity::new(founder.name.clone(), founder.gender),
                Attributes::random(rng),
            );
            record.loadout = starting_loadout(i);
            record.satchel.stimpaks = rng.gen_range(0..=2);
            record.satchel.radaways = rng.gen_range(0..=1);
            record
        })
        .collect()
}

/// A fresh colony as described by `config`. The arrival cooldown starts at
/// `now`.
pub fn generate_colony(
    config: &ColonyConfig,
    now: u64,
    wanderer_min_delay_ms: u64,
    rng: &mut impl Rng,
) -> Colony {
    let resources = ColonyResources {
        caps: config.caps,
        trader_caps: config.trader_caps,
        happiness: config.happiness,
        action_points: config.action_points,
        auto_feed: config.auto_feed,
        ..ColonyResources::default()
    };
    let mut colony = Colony::new(
        RoomRegistry::new(&config.prebuilt_rooms),
        config.inventory.iter().copied().collect(),
        resources,
    );
    colony.arrivals = ArrivalWindow::new(now, wanderer_min_delay_ms);

    for record in generate_founders(config, rng) {
        colony.colonists.spawn(record);
    }
    colony
}

/// A stranger with random stats, numbered after the living population
pub fn generate_wanderer(population: usize, now: u64, rng: &mut impl Rng) -> WandererCandidate {
    WandererCandidate {
        identity: Identity::new(wanderer_name(rng, population + 1), Gender::random(rng)),
        attributes: Attributes::random(rng),
        appeared_at: now,
    }
}

/// A newborn, numbered after the whole registry
pub fn generate_newborn(registry_size: usize, rng: &mut impl Rng) -> ColonistRecord {
    let name = birth_name(rng, registry_size + 1);
    ColonistRecord::new(
        Identity::new(name, Gender::random(rng)).with_age(0),
        Attributes::random(rng),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_colony() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let colony = generate_colony(&ColonyConfig::default(), 1_000, 120_000, &mut rng);

        assert_eq!(colony.colonists.len(), 3);
        assert!(colony.colonists.find("Thompson").is_some());
        assert!(colony.rooms.is_built(RoomKind::Living));
        assert!(!colony.rooms.is_built(RoomKind::Generator));
        assert_eq!(colony.inventory.quantity(Resource::Steel), 5);
        assert_eq!(colony.resources.caps, 100);
        assert_eq!(colony.arrivals.cooldown_until, 121_000);

        for record in colony.colonists.records() {
            assert!(record.satchel.stimpaks <= 2);
            assert!(record.satchel.radaways <= 1);
            assert!(record.loadout.outfit.is_some());
        }
    }

    #[test]
    fn test_newborn_is_age_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let child = generate_newborn(3, &mut rng);
        assert_eq!(child.identity.age, 0);
        assert!(child.identity.name.ends_with("_4"));
    }
}
