//! Consumption system - feeding and watering colonists from colony stores

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{Inventory, Resource, Vitals};
use crate::error::ValidationError;

/// Hunger removed by one ration
pub const FOOD_RELIEF: f32 = 20.0;
/// Thirst removed by one ration when drinking automatically
pub const AUTO_WATER_RELIEF: f32 = 15.0;
/// Thirst removed by a hand-served drink
pub const WATER_RELIEF: f32 = 20.0;

const HUNGER_THRESHOLD: f32 = 60.0;
const THIRST_THRESHOLD: f32 = 40.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedReport {
    pub food_eaten: u32,
    pub water_drunk: u32,
}

/// Rations needed to bring `level` down to a random 5-10 target
fn rations(level: f32, relief: f32, rng: &mut impl Rng) -> u32 {
    let target = rng.gen_range(5.0..10.0);
    ((level - target) / relief).ceil().max(1.0) as u32
}

/// Feed everyone past the hunger or thirst threshold, provided the stores
/// can cover the whole serving.
pub fn auto_feed_system(world: &mut World, stores: &mut Inventory, rng: &mut impl Rng) -> FeedReport {
    let mut report = FeedReport::default();

    for (_, vitals) in world.query_mut::<&mut Vitals>() {
        if !vitals.alive {
            continue;
        }

        if vitals.hunger > HUNGER_THRESHOLD && stores.has(Resource::Food, 1) {
            let needed = rations(vitals.hunger, FOOD_RELIEF, rng);
            if stores.debit(Resource::Food, needed).is_ok() {
                vitals.adjust_hunger(-(needed as f32 * FOOD_RELIEF));
                report.food_eaten += needed;
            }
        }

        if vitals.thirst > THIRST_THRESHOLD && stores.has(Resource::Water, 1) {
            let needed = rations(vitals.thirst, AUTO_WATER_RELIEF, rng);
            if stores.debit(Resource::Water, needed).is_ok() {
                vitals.adjust_thirst(-(needed as f32 * AUTO_WATER_RELIEF));
                report.water_drunk += needed;
            }
        }
    }

    if report != FeedReport::default() {
        log::debug!(
            "auto-feed served {} food, {} water",
            report.food_eaten,
            report.water_drunk
        );
    }
    report
}

/// Hand one ration of food to a colonist
pub fn feed(world: &mut World, stores: &mut Inventory, entity: Entity) -> Result<(), ValidationError> {
    serve(world, stores, entity, Resource::Food)
}

/// Hand one ration of water to a colonist
pub fn give_water(
    world: &mut World,
    stores: &mut Inventory,
    entity: Entity,
) -> Result<(), ValidationError> {
    serve(world, stores, entity, Resource::Water)
}

fn serve(
    world: &mut World,
    stores: &mut Inventory,
    entity: Entity,
    resource: Resource,
) -> Result<(), ValidationError> {
    let mut vitals = world
        .get::<&mut Vitals>(entity)
        .map_err(crate::error::SimulationError::from)?;
    stores.debit(resource, 1)?;
    match resource {
        Resource::Water => vitals.adjust_thirst(-WATER_RELIEF),
        _ => vitals.adjust_hunger(-FOOD_RELIEF),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn hungry(world: &mut World, hunger: f32, thirst: f32) -> Entity {
        world.spawn((Vitals {
            hunger,
            thirst,
            ..Vitals::default()
        },))
    }

    #[test]
    fn test_auto_feed_brings_needs_down() {
        let mut world = World::new();
        let entity = hungry(&mut world, 80.0, 50.0);
        let mut stores: Inventory = [(Resource::Food, 10), (Resource::Water, 10)]
            .into_iter()
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let report = auto_feed_system(&mut world, &mut stores, &mut rng);

        // 80 down to 5-10 takes four rations; 50 down to 5-10 takes three
        assert_eq!(report.food_eaten, 4);
        assert_eq!(report.water_drunk, 3);
        let vitals = world.get::<&Vitals>(entity).expect("vitals");
        assert_eq!(vitals.hunger, 0.0);
        assert!(vitals.thirst <= 5.0);
        assert_eq!(stores.quantity(Resource::Food), 6);
    }

    #[test]
    fn test_auto_feed_skips_partial_serving() {
        let mut world = World::new();
        let entity = hungry(&mut world, 90.0, 0.0);
        let mut stores: Inventory = [(Resource::Food, 2)].into_iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let report = auto_feed_system(&mut world, &mut stores, &mut rng);

        assert_eq!(report, FeedReport::default());
        assert_eq!(stores.quantity(Resource::Food), 2);
        assert_eq!(world.get::<&Vitals>(entity).expect("vitals").hunger, 90.0);
    }

    #[test]
    fn test_feed_without_food_fails() {
        let mut world = World::new();
        let entity = hungry(&mut world, 50.0, 50.0);
        let mut stores = Inventory::new();

        let result = feed(&mut world, &mut stores, entity);
        assert!(matches!(
            result,
            Err(ValidationError::Ledger(LedgerError::Insufficient { .. }))
        ));

        stores.credit(Resource::Water, 1);
        give_water(&mut world, &mut stores, entity).expect("water served");
        assert_eq!(world.get::<&Vitals>(entity).expect("vitals").thirst, 30.0);
    }
}
