//! Property tests for the colony invariants

use proptest::prelude::*;

use shelter_core::colony::ColonyResources;
use shelter_core::prelude::*;
use shelter_core::systems::{begin_expedition, request_return, return_duration_ms};

fn resource() -> impl Strategy<Value = Resource> {
    prop::sample::select(Resource::ALL.to_vec())
}

fn room() -> impl Strategy<Value = RoomKind> {
    prop::sample::select(RoomKind::ALL.to_vec())
}

fn person() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["Thompson", "Elenor", "Cole", "Nobody"])
}

/// A random player action against the founding colonists
fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Skip),
        Just(Command::AutoAssignAll),
        Just(Command::ToggleAutoFeed),
        Just(Command::Trade),
        Just(Command::AcceptWanderer),
        person().prop_map(|p| Command::Feed(p.into())),
        person().prop_map(|p| Command::Drink(p.into())),
        (person(), 0u32..3).prop_map(|(p, days)| Command::Scavenge {
            person: p.into(),
            days
        }),
        person().prop_map(|p| Command::Return(p.into())),
        person().prop_map(|p| Command::Unassign(p.into())),
        person().prop_map(|p| Command::Heal(p.into())),
        person().prop_map(|p| Command::Transfer(p.into())),
        person().prop_map(|p| Command::RemoveDead(p.into())),
        (person(), room()).prop_map(|(p, room)| Command::Assign {
            person: p.into(),
            room
        }),
        room().prop_map(Command::Build),
        room().prop_map(Command::Extend),
        room().prop_map(Command::Rush),
    ]
}

fn assignment_matches_rooms(colony: &Colony) -> bool {
    let records = colony.colonists.records();
    RoomKind::ALL.iter().all(|kind| {
        let staffed = records
            .iter()
            .any(|r| r.vitals.alive && r.assigned_to == Some(*kind));
        colony.room_assigned(*kind) == staffed
            && (!colony.room_assigned(*kind) || colony.rooms.is_built(*kind))
    })
}

proptest! {
    #[test]
    fn failed_debit_leaves_ledger_unchanged(
        stock in prop::collection::vec((resource(), 0u32..20), 0..8),
        costs in prop::collection::vec((resource(), 1u32..30), 1..5),
    ) {
        let mut inventory: Inventory = stock.into_iter().collect();
        let before = inventory.clone();
        match inventory.debit_all(&costs) {
            Ok(()) => {
                let spent: u32 = costs.iter().map(|(_, qty)| qty).sum();
                prop_assert_eq!(inventory.total() + spent, before.total());
            }
            Err(_) => prop_assert_eq!(inventory, before),
        }
    }

    #[test]
    fn return_leg_matches_elapsed_time(elapsed in 0u64..50_000_000) {
        let mut colony = Colony::new(
            RoomRegistry::new(&[RoomKind::Living]),
            Inventory::new(),
            ColonyResources::default(),
        );
        colony.colonists.spawn(ColonistRecord::new(
            Identity::new("Scout", Gender::M),
            Attributes::default(),
        ));
        begin_expedition(&mut colony, "Scout", ExpeditionLength::Indefinite, 1_000)
            .expect("idle scout");
        let duration = request_return(&mut colony, "Scout", 1_000 + elapsed).expect("scavenging");

        let expected = ((elapsed as f64 / 60_000.0) * 0.25).round() as u64 * 60_000;
        prop_assert_eq!(duration, expected);
        prop_assert_eq!(return_duration_ms(elapsed), expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn vitals_stay_in_range(seed in any::<u64>(), step in 1_000u64..40_000, wakes in 50usize..300) {
        let config = EngineConfig {
            day_duration_ms: 30_000,
            expedition_day_ms: 120_000,
            event_chance: 0.5,
            ..EngineConfig::default()
        }
        .with_seed(seed);
        let mut engine = ColonyEngine::new(config, &ColonyConfig::default(), 0).expect("valid config");
        engine.perform_named("scavenge", &["Thompson", "0"], 0);
        engine.perform_named("scavenge", &["Cole", "1"], 0);

        let mut now = 0;
        for _ in 0..wakes {
            now += step;
            engine.advance(now);
            for person in engine.game_state().people {
                let v = person.vitals;
                for value in [v.health, v.hunger, v.thirst, v.radiation] {
                    prop_assert!((0.0..=100.0).contains(&value), "{} out of range: {:?}", person.name, v);
                }
                if !v.alive {
                    prop_assert_eq!(person.scavenge_state, ScavengeState::Idle);
                    prop_assert_eq!(person.assigned_room, None);
                }
            }
        }
    }

    #[test]
    fn room_assignment_tracks_living_workers(
        seed in any::<u64>(),
        commands in prop::collection::vec(command(), 1..40),
    ) {
        let config = EngineConfig::default().with_seed(seed);
        let mut engine = ColonyEngine::new(config, &ColonyConfig::default(), 0).expect("valid config");
        let mut now = 0;
        for command in commands {
            now += 20_000;
            engine.perform(command, now);
            engine.advance(now);
            prop_assert!(assignment_matches_rooms(engine.colony()));
        }
    }
}
