//! End-to-end scenarios driven through the engine's public surface

use shelter_core::prelude::*;
use shelter_core::persistence::{ColonySnapshot, ClockState};
use shelter_core::systems::return_duration_ms;

fn quiet_config(seed: u64) -> EngineConfig {
    EngineConfig {
        wanderer_chance: 0.0,
        event_chance: 0.0,
        ..EngineConfig::default()
    }
    .with_seed(seed)
}

fn fresh(config: EngineConfig) -> ColonyEngine {
    ColonyEngine::new(config, &ColonyConfig::default(), 0).expect("valid config")
}

fn person<'a>(state: &'a GameState, name: &str) -> &'a shelter_core::state::PersonView {
    state.person(name).expect("person exists")
}

/// Advance in tick-sized steps from `from` to `to`
fn run(engine: &mut ColonyEngine, from: u64, to: u64, step: u64) {
    let mut now = from;
    while now <= to {
        engine.advance(now);
        now += step;
    }
}

#[test]
fn build_generator_depends_on_steel() {
    let mut engine = fresh(quiet_config(1));
    engine
        .colony_mut()
        .inventory
        .debit(Resource::Steel, 2)
        .expect("debit");
    let before = engine.game_state().inventory;

    let outcome = engine.perform_named("build", &["generator"], 0);
    assert!(!outcome.success);
    assert_eq!(engine.game_state().inventory, before);
    assert!(!engine.colony().rooms.is_built(RoomKind::Generator));

    let mut engine = fresh(quiet_config(1));
    let outcome = engine.perform_named("build", &["generator"], 0);
    assert!(outcome.success, "{}", outcome.message);
    assert!(engine.colony().rooms.is_built(RoomKind::Generator));
    assert_eq!(engine.colony().inventory.quantity(Resource::Steel), 1);
}

#[test]
fn one_day_expedition_comes_home_with_loot() {
    let mut hauls = 0;
    for seed in 0..6 {
        let config = EngineConfig {
            expedition_day_ms: 60_000,
            ..quiet_config(seed)
        };
        let mut engine = fresh(config);
        let start = person(&engine.game_state(), "Thompson").clone();

        let outcome = engine.perform_named("scavenge", &["Thompson", "1"], 0);
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(
            person(&engine.game_state(), "Thompson").scavenge_state,
            ScavengeState::Scavenging
        );

        run(&mut engine, 0, 65_000, 5_000);

        let state = engine.game_state();
        let back = person(&state, "Thompson");
        assert!(back.vitals.alive);
        assert_eq!(back.scavenge_state, ScavengeState::Idle);
        assert!(state.missions.is_empty());
        assert!(state
            .journal
            .iter()
            .any(|entry| entry.message.starts_with("Thompson returned from scavenging")));

        let carried = |p: &shelter_core::state::PersonView| {
            p.pack_used + p.caps + p.stimpaks + p.radaways
        };
        if carried(back) > carried(&start) {
            hauls += 1;
        }
    }
    assert!(hauls > 0, "no expedition brought anything home");
}

#[test]
fn return_leg_is_a_quarter_of_the_trip() {
    let mut engine = fresh(quiet_config(3));
    engine.perform_named("scavenge", &["Elenor"], 0);
    run(&mut engine, 0, 250_000, 5_000);

    let outcome = engine.perform_named("return", &["Elenor"], 250_000);
    assert!(outcome.success, "{}", outcome.message);

    let elenor = engine.colony().colonists.find("Elenor").expect("founder");
    let record = engine.colony().colonists.record(elenor).expect("record");
    let expedition = record.expedition.expect("still away");
    assert_eq!(expedition.elapsed_ms, 250_000);
    assert_eq!(expedition.return_duration_ms, Some(60_000));
    assert_eq!(return_duration_ms(250_000), 60_000);
    assert_eq!(return_duration_ms(420_000), 120_000);

    // the walk home finishes the mission
    run(&mut engine, 250_000, 315_000, 5_000);
    let state = engine.game_state();
    assert_eq!(person(&state, "Elenor").scavenge_state, ScavengeState::Idle);
}

#[test]
fn continue_journey_resumes_scavenging() {
    let mut engine = fresh(quiet_config(4));
    engine.perform_named("scavenge", &["Cole", "0"], 0);
    engine.perform_named("return", &["Cole"], 120_000);

    let outcome = engine.perform_named("continue-journey", &["Cole"], 130_000);
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(
        person(&engine.game_state(), "Cole").scavenge_state,
        ScavengeState::Scavenging
    );

    let outcome = engine.perform_named("continue journey", &["Cole"], 140_000);
    assert!(!outcome.success);
}

#[test]
fn second_expedition_is_rejected() {
    let mut engine = fresh(quiet_config(5));
    assert!(engine.perform_named("scavenge", &["Cole", "2"], 0).success);
    let before = engine.colony().colonists.records();

    let outcome = engine.perform_named("scavenge", &["Cole", "1"], 1_000);
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Cole is scavenging");
    assert_eq!(engine.colony().colonists.records(), before);

    engine.perform_named("return", &["Cole"], 61_000);
    let outcome = engine.perform_named("scavenge", &["Cole", "1"], 62_000);
    assert_eq!(outcome.message, "Cole is returning");
}

#[test]
fn scavenger_health_stays_bounded_until_death() {
    let config = EngineConfig {
        event_chance: 1.0,
        narrative_cooldown_ms: 0,
        day_duration_ms: 20_000,
        ..quiet_config(11)
    };
    let mut engine = fresh(config);
    engine.perform_named("toggle-auto-feed", &[] as &[&str], 0);
    engine.perform_named("scavenge", &["Thompson"], 0);

    let thompson = engine.colony().colonists.find("Thompson").expect("founder");
    let mut now = 0;
    while engine.colony().colonists.is_alive(thompson) && now < 10_000_000 {
        now += 5_000;
        engine.advance(now);
        let record = engine.colony().colonists.record(thompson).expect("record");
        assert!((0.0..=100.0).contains(&record.vitals.health));
        assert!((0.0..=100.0).contains(&record.vitals.radiation));
    }

    let record = engine.colony().colonists.record(thompson).expect("record");
    assert!(!record.vitals.alive, "Thompson outlived the wasteland");
    assert_eq!(record.scavenge_state(), ScavengeState::Idle);
    assert_eq!(record.assigned_to, None);
    assert!(engine.game_state().missions.is_empty());
}

#[test]
fn full_quarters_never_attract_wanderers() {
    let config = EngineConfig {
        wanderer_chance: 1.0,
        day_duration_ms: u64::MAX / 2,
        ..EngineConfig::default()
    }
    .with_seed(8);
    let mut engine = fresh(config);
    for i in 0..7 {
        engine.colony_mut().colonists.spawn(ColonistRecord::new(
            Identity::new(format!("Settler {i}"), Gender::F),
            Attributes::default(),
        ));
    }
    assert!(!engine.colony().has_living_space());

    run(&mut engine, 0, 900_000, 1_000);
    assert!(engine.game_state().pending_wanderer.is_none());
}

#[test]
fn wanderer_arrives_and_is_accepted() {
    let config = EngineConfig {
        wanderer_chance: 1.0,
        ..EngineConfig::default()
    }
    .with_seed(8);
    let mut engine = fresh(config);

    run(&mut engine, 0, 125_000, 5_000);
    let stranger = engine
        .game_state()
        .pending_wanderer
        .map(|w| w.identity.name)
        .expect("someone at the door");

    let outcome = engine.perform_named("accept-wanderer", &[] as &[&str], 126_000);
    assert!(outcome.success, "{}", outcome.message);
    assert!(engine.game_state().person(&stranger).is_some());
    assert!(engine.game_state().pending_wanderer.is_none());

    let outcome = engine.perform_named("reject-wanderer", &[] as &[&str], 127_000);
    assert!(!outcome.success);
}

#[test]
fn save_and_load_round_trip() {
    let path = std::env::temp_dir().join(format!("shelter-scenario-{}.bin", std::process::id()));
    let store = FileStore::new(&path, SnapshotCodec::Bincode);
    let mut engine = fresh(quiet_config(13)).with_store(Box::new(store.clone()));

    engine.perform_named("assign", &["Cole", "water"], 0);
    engine.perform_named("scavenge", &["Thompson", "3"], 0);
    engine.perform_named("extend", &["kitchen"], 0);
    run(&mut engine, 0, 40_000, 5_000);
    engine.save(40_000).expect("save");

    let snapshot = store.load().expect("saved game");
    let expected = ColonySnapshot::capture(
        engine.colony(),
        ClockState {
            saved_at: 40_000,
            ..snapshot.clocks
        },
    );
    assert_eq!(snapshot, expected);

    let resumed = ColonyEngine::resume(quiet_config(13), &ColonyConfig::default(), Box::new(store), 41_000)
        .expect("valid config");
    let (a, b) = (engine.game_state(), resumed.game_state());
    assert_eq!(a.people, b.people);
    assert_eq!(a.rooms, b.rooms);
    assert_eq!(a.inventory, b.inventory);
    assert_eq!(a.missions, b.missions);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn dead_colonists_can_be_removed() {
    let mut engine = fresh(quiet_config(2));
    engine.perform_named("assign", &["Cole", "kitchen"], 0);
    let cole = engine.colony().colonists.find("Cole").expect("founder");
    engine
        .colony_mut()
        .colonists
        .world_mut()
        .get::<&mut Vitals>(cole)
        .expect("vitals")
        .hunger = 99.9;
    engine.perform_named("toggle-auto-feed", &[] as &[&str], 0);

    engine.perform_named("skip", &[] as &[&str], 1_000);
    let state = engine.game_state();
    assert!(!person(&state, "Cole").vitals.alive);
    assert!(!state.room(RoomKind::Kitchen).expect("kitchen").assigned);
    assert!(state.journal.iter().any(|e| e.message == "Cole has died."));

    assert!(!engine.perform_named("feed", &["Cole"], 2_000).success);
    assert!(engine.perform_named("remove-dead", &["Cole"], 2_000).success);
    assert!(engine.game_state().person("Cole").is_none());
}
