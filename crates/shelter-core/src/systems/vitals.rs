//! Vitals system - needs decay, expedition exposure and deaths

use hecs::{Entity, World};
use rand::Rng;

use crate::colony::Colony;
use crate::components::{Expedition, LogKind, Satchel, Vitals};
use crate::error::SimulationError;

pub const TICK_HUNGER: f32 = 0.5;
pub const TICK_THIRST: f32 = 0.3;
pub const DAY_HUNGER: f32 = 10.0;
pub const DAY_THIRST: f32 = 20.0;

/// Small per-tick rise in hunger and thirst for everyone alive
pub fn vitals_tick_system(world: &mut World) {
    for (_, vitals) in world.query_mut::<&mut Vitals>() {
        if !vitals.alive {
            continue;
        }
        vitals.adjust_hunger(TICK_HUNGER);
        vitals.adjust_thirst(TICK_THIRST);
    }
}

/// Daily needs progression. Colonists still heading out take exposure
/// damage and patch themselves up from their own supplies.
pub fn vitals_day_system(world: &mut World, rng: &mut impl Rng) {
    for (_, (vitals, satchel, expedition)) in
        world.query_mut::<(&mut Vitals, &mut Satchel, Option<&mut Expedition>)>()
    {
        if !vitals.alive {
            continue;
        }
        vitals.adjust_hunger(DAY_HUNGER);
        vitals.adjust_thirst(DAY_THIRST);

        let Some(expedition) = expedition else {
            continue;
        };
        if expedition.returning {
            continue;
        }
        expedition.days_out += 1;

        let damage = rng.gen_range(5..=15) as f32;
        let radiation = rng.gen_range(0..=5) as f32;
        vitals.adjust_health(-damage);
        vitals.adjust_radiation(radiation);

        if vitals.health < 50.0 && satchel.stimpaks > 0 {
            satchel.stimpaks -= 1;
            vitals.adjust_health(30.0);
        }
        if vitals.radiation > 20.0 && satchel.radaways > 0 {
            satchel.radaways -= 1;
            vitals.adjust_radiation(-15.0);
        }
    }
}

/// Kill everyone who starved, dried out or bled out. Returns their names.
pub fn resolve_deaths(colony: &mut Colony, now: u64) -> Result<Vec<String>, SimulationError> {
    let fatal: Vec<Entity> = colony
        .colonists
        .world()
        .query::<&Vitals>()
        .iter()
        .filter(|(_, vitals)| vitals.alive && vitals.is_fatal())
        .map(|(entity, _)| entity)
        .collect();

    let mut dead = Vec::with_capacity(fatal.len());
    for entity in fatal {
        let name = colony
            .colonists
            .name_of(entity)
            .unwrap_or_else(|| "Someone".to_string());
        colony.colonists.kill(entity)?;
        colony.note(now, format!("{name} has died."), LogKind::Danger);
        dead.push(name);
    }
    Ok(dead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::{ColonistRecord, ColonyResources};
    use crate::components::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn colony_with(records: Vec<ColonistRecord>) -> Colony {
        let mut colony = Colony::new(
            RoomRegistry::new(&[RoomKind::Living]),
            Inventory::new(),
            ColonyResources::default(),
        );
        for record in records {
            colony.colonists.spawn(record);
        }
        colony
    }

    fn person(name: &str) -> ColonistRecord {
        ColonistRecord::new(Identity::new(name, Gender::M), Attributes::default())
    }

    #[test]
    fn test_tick_decay_skips_the_dead() {
        let mut dead = person("Cole");
        dead.vitals.kill();
        let mut colony = colony_with(vec![person("Thompson"), dead]);

        vitals_tick_system(colony.colonists.world_mut());

        let records = colony.colonists.records();
        let cole = &records[0];
        let thompson = &records[1];
        assert_eq!(cole.vitals.hunger, 0.0);
        assert_eq!(thompson.vitals.hunger, 0.5);
        assert!((thompson.vitals.thirst - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_day_exposure_only_while_scavenging() {
        let mut scout = person("Elenor");
        scout.expedition = Some(Expedition::new(0, ExpeditionLength::Indefinite));
        let mut colony = colony_with(vec![scout, person("Thompson")]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        vitals_day_system(colony.colonists.world_mut(), &mut rng);

        let records = colony.colonists.records();
        let elenor = &records[0];
        let thompson = &records[1];
        assert!(elenor.vitals.health <= 95.0 && elenor.vitals.health >= 85.0);
        assert_eq!(elenor.expedition.as_ref().map(|e| e.days_out), Some(1));
        assert_eq!(thompson.vitals.health, 100.0);
        assert_eq!(thompson.vitals.hunger, DAY_HUNGER);
        assert_eq!(thompson.vitals.thirst, DAY_THIRST);
    }

    #[test]
    fn test_exposure_uses_stimpak_when_low() {
        let mut scout = person("Elenor");
        scout.vitals.health = 50.0;
        scout.satchel.stimpaks = 1;
        scout.expedition = Some(Expedition::new(0, ExpeditionLength::Indefinite));
        let mut colony = colony_with(vec![scout]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        vitals_day_system(colony.colonists.world_mut(), &mut rng);

        let elenor = &colony.colonists.records()[0];
        assert_eq!(elenor.satchel.stimpaks, 0);
        assert!(elenor.vitals.health >= 65.0);
    }

    #[test]
    fn test_starvation_kills_and_unassigns() {
        let mut starving = person("Cole");
        starving.vitals.hunger = 100.0;
        starving.assigned_to = Some(RoomKind::Living);
        let mut colony = colony_with(vec![starving, person("Thompson")]);

        let dead = resolve_deaths(&mut colony, 42).expect("deaths resolve");

        assert_eq!(dead, vec!["Cole".to_string()]);
        assert!(!colony.room_assigned(RoomKind::Living));
        assert_eq!(colony.colonists.alive_count(), 1);
        assert_eq!(colony.journal.back().map(|e| e.kind), Some(LogKind::Danger));
    }
}
