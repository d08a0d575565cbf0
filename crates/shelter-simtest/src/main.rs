//! Shelter Headless Simulation Harness
//!
//! Drives the engine through scripted colony scenarios on a manual clock.
//! Runs entirely in-process: no terminal UI, no save files.
//!
//! Usage:
//!   cargo run -p shelter-simtest
//!   cargo run -p shelter-simtest -- --verbose
//!   RUST_LOG=debug cargo run -p shelter-simtest

use shelter_core::catalog::{blueprints, recipe};
use shelter_core::prelude::*;
use shelter_core::systems::return_duration_ms;

const SEED: u64 = 1_977;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Shelter Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Static catalog
    results.extend(validate_catalog(verbose));

    // 2. Configuration loading
    results.extend(validate_config(verbose));

    // 3. Day cycle and production
    results.extend(validate_day_cycle(verbose));

    // 4. Expedition lifecycle
    results.extend(validate_expeditions(verbose));

    // 5. Wanderers and births
    results.extend(validate_arrivals(verbose));

    // 6. Snapshot round trips
    results.extend(validate_persistence(verbose));

    // 7. Long unattended run
    results.extend(validate_long_run(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    log::info!("harness finished with seed {}", SEED);
    if failed > 0 {
        std::process::exit(1);
    }
}

fn engine_with(config: EngineConfig, clock: &ManualClock) -> ColonyEngine {
    ColonyEngine::new(config.with_seed(SEED), &ColonyConfig::default(), clock.now_ms())
        .expect("harness configs are valid")
}

/// Step the clock forward `total` ms in `step` increments, waking the engine
/// each time
fn run_for(engine: &mut ColonyEngine, clock: &ManualClock, total: u64, step: u64) {
    let end = clock.now_ms() + total;
    while clock.now_ms() < end {
        clock.advance(step);
        engine.poll(clock);
    }
}

// ── 1. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog(verbose: bool) -> Vec<TestResult> {
    println!("--- Catalog ---");
    let mut results = Vec::new();

    results.push(check(
        "catalog_covers_rooms",
        blueprints().len() == RoomKind::ALL.len(),
        format!("{} blueprints", blueprints().len()),
    ));

    let orphans: Vec<_> = RoomKind::ALL
        .iter()
        .filter(|kind| kind.blueprint().kind != **kind)
        .collect();
    results.push(check(
        "catalog_kinds_match",
        orphans.is_empty(),
        format!("{} mismatched entries", orphans.len()),
    ));

    let converters_ok = blueprints()
        .iter()
        .filter(|bp| !bp.inputs.is_empty())
        .all(|bp| bp.produces.is_some());
    results.push(check(
        "catalog_converters_produce",
        converters_ok,
        "every room with inputs has an output",
    ));

    results.push(check(
        "catalog_turret_recipe",
        recipe("Turret").is_some(),
        "turret is craftable",
    ));

    if verbose {
        println!("  Room catalog:");
        for bp in blueprints() {
            println!(
                "    {:16} limit={} prod={} power={} build={:?}",
                bp.kind.as_str(),
                bp.assigned_limit,
                bp.base_production,
                bp.base_power_usage,
                bp.components
            );
        }
    }

    results
}

// ── 2. Configuration ────────────────────────────────────────────────────

fn validate_config(_verbose: bool) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    match EngineConfig::from_json_str(r#"{ "day_duration_ms": 60000, "seed": 5 }"#) {
        Ok(config) => results.push(check(
            "config_partial_json",
            config.day_duration_ms == 60_000
                && config.seed == Some(5)
                && config.tick_interval_ms == 5_000,
            "unnamed fields keep their defaults",
        )),
        Err(e) => results.push(check("config_partial_json", false, e.to_string())),
    }

    let rejected = EngineConfig::from_json_str(
        r#"{ "wanderer_min_delay_ms": 500000, "wanderer_max_delay_ms": 1 }"#,
    )
    .is_err();
    results.push(check(
        "config_rejects_inverted_window",
        rejected,
        "max delay below min delay is refused",
    ));

    let engine = ColonyEngine::new(
        EngineConfig {
            event_chance: 2.0,
            ..EngineConfig::default()
        },
        &ColonyConfig::default(),
        0,
    );
    results.push(check(
        "config_engine_refuses_bad_chance",
        engine.is_err(),
        "event chance above 1 never reaches the scheduler",
    ));

    let colony = serde_json::to_string(&ColonyConfig::default())
        .map_err(|e| e.to_string())
        .and_then(|json| ColonyConfig::from_json_str(&json).map_err(|e| e.to_string()));
    results.push(check(
        "config_colony_round_trip",
        colony.as_ref().map_or(false, |c| *c == ColonyConfig::default()),
        match &colony {
            Ok(c) => format!("{} founders", c.founders.len()),
            Err(e) => e.clone(),
        },
    ));

    results
}

// ── 3. Day cycle ────────────────────────────────────────────────────────

fn validate_day_cycle(verbose: bool) -> Vec<TestResult> {
    println!("--- Day Cycle ---");
    let mut results = Vec::new();
    let clock = ManualClock::new(0);
    let mut engine = engine_with(
        EngineConfig {
            wanderer_chance: 0.0,
            ..EngineConfig::default()
        },
        &clock,
    );

    let build = engine.perform_named("build", &["generator"], clock.now_ms());
    results.push(check("day_build_generator", build.success, build.message));

    let assign = engine.perform_named("auto-assign-all", &[] as &[&str], clock.now_ms());
    results.push(check("day_auto_assign", assign.success, assign.message));

    let generator_staffed = engine
        .game_state()
        .room(RoomKind::Generator)
        .map_or(false, |r| r.assigned);
    results.push(check(
        "day_generator_staffed_first",
        generator_staffed,
        "generator gets workers before other rooms",
    ));

    let watt_before = engine.colony().inventory.quantity(Resource::Watt);
    let day = engine.config().day_duration_ms;
    run_for(&mut engine, &clock, day, 5_000);
    let state = engine.game_state();
    results.push(check(
        "day_rollover",
        state.resources.day == 2,
        format!("day {}", state.resources.day),
    ));
    results.push(check(
        "day_generator_output",
        state.quantity(Resource::Watt) > watt_before,
        format!(
            "watt {} -> {}",
            watt_before,
            state.quantity(Resource::Watt)
        ),
    ));

    let skip = engine.perform(Command::Skip, clock.now_ms());
    results.push(check(
        "day_skip",
        skip.success && engine.day() == 3,
        skip.message,
    ));

    if verbose {
        for (resource, qty) in &engine.game_state().inventory {
            println!("    {:14} {}", resource.as_str(), qty);
        }
    }

    results
}

// ── 4. Expeditions ──────────────────────────────────────────────────────

fn validate_expeditions(verbose: bool) -> Vec<TestResult> {
    println!("--- Expeditions ---");
    let mut results = Vec::new();
    let clock = ManualClock::new(0);
    let mut engine = engine_with(
        EngineConfig {
            wanderer_chance: 0.0,
            expedition_day_ms: 120_000,
            ..EngineConfig::default()
        },
        &clock,
    );

    let start = engine.perform_named("scavenge", &["Thompson", "1"], clock.now_ms());
    results.push(check("expedition_start", start.success, start.message));

    let again = engine.perform_named("scavenge", &["Thompson", "1"], clock.now_ms());
    results.push(check(
        "expedition_no_double_start",
        !again.success,
        again.message,
    ));

    run_for(&mut engine, &clock, 125_000, 5_000);
    let state = engine.game_state();
    let thompson = state.person("Thompson");
    results.push(check(
        "expedition_completes",
        thompson.map_or(false, |p| p.scavenge_state == ScavengeState::Idle),
        format!("{} missions active", state.missions.len()),
    ));

    let transfer = engine.perform_named("transfer", &["Thompson"], clock.now_ms());
    results.push(check("expedition_transfer", transfer.success, transfer.message));

    engine.perform_named("scavenge", &["Elenor"], clock.now_ms());
    run_for(&mut engine, &clock, 240_000, 5_000);
    let recall = engine.perform_named("return", &["Elenor"], clock.now_ms());
    let expected = return_duration_ms(240_000);
    results.push(check(
        "expedition_return_leg",
        recall.success && expected == 60_000,
        format!("{} ({} ms home)", recall.message, expected),
    ));

    if verbose {
        if let Some(mission) = engine.game_state().missions.first() {
            for entry in &mission.log {
                println!("    [{:?}] {}", entry.kind, entry.message);
            }
        }
    }

    results
}

// ── 5. Arrivals ─────────────────────────────────────────────────────────

fn validate_arrivals(_verbose: bool) -> Vec<TestResult> {
    println!("--- Arrivals ---");
    let mut results = Vec::new();
    let clock = ManualClock::new(0);
    let mut engine = engine_with(
        EngineConfig {
            wanderer_chance: 1.0,
            ..EngineConfig::default()
        },
        &clock,
    );

    run_for(&mut engine, &clock, 110_000, 5_000);
    results.push(check(
        "arrival_cooldown",
        engine.game_state().pending_wanderer.is_none(),
        "nobody knocks during the first cooldown",
    ));

    run_for(&mut engine, &clock, 20_000, 5_000);
    let waiting = engine.game_state().pending_wanderer;
    results.push(check(
        "arrival_window",
        waiting.is_some(),
        waiting
            .as_ref()
            .map_or("nobody".to_string(), |w| w.identity.name.clone()),
    ));

    let accept = engine.perform(Command::AcceptWanderer, clock.now_ms());
    results.push(check(
        "arrival_accept",
        accept.success && engine.colony().colonists.len() == 4,
        accept.message,
    ));

    for name in ["Thompson", "Elenor"] {
        engine.perform(
            Command::Assign {
                person: name.into(),
                room: RoomKind::Living,
            },
            clock.now_ms(),
        );
    }
    let before = engine.colony().colonists.len();
    run_for(&mut engine, &clock, 65_000, 5_000);
    results.push(check(
        "arrival_birth",
        engine.colony().colonists.len() > before,
        format!("{} -> {} colonists", before, engine.colony().colonists.len()),
    ));

    results
}

// ── 6. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    for codec in [SnapshotCodec::Json, SnapshotCodec::Bincode] {
        let clock = ManualClock::new(0);
        let store = std::rc::Rc::new(MemoryStore::new(codec));
        let mut engine = engine_with(EngineConfig::default(), &clock)
            .with_store(Box::new(store.clone()));
        engine.perform_named("scavenge", &["Cole", "2"], clock.now_ms());
        engine.perform_named("extend", &["water"], clock.now_ms());
        run_for(&mut engine, &clock, 35_000, 5_000);
        if let Err(e) = engine.save(clock.now_ms()) {
            results.push(check("persist_save", false, e.to_string()));
            continue;
        }

        let resumed = ColonyEngine::resume(
            EngineConfig::default(),
            &ColonyConfig::default(),
            Box::new(store.clone()),
            clock.now_ms(),
        );
        let resumed = match resumed {
            Ok(engine) => engine,
            Err(e) => {
                results.push(check("persist_resume", false, e.to_string()));
                continue;
            }
        };
        let (a, b) = (engine.game_state(), resumed.game_state());
        results.push(check(
            &format!("persist_{codec:?}").to_lowercase(),
            a.people == b.people && a.rooms == b.rooms && a.missions == b.missions,
            format!("{} people, {} missions", b.people.len(), b.missions.len()),
        ));
    }

    let garbage = MemoryStore::new(SnapshotCodec::Json);
    garbage.put_raw(b"{ not a save".to_vec());
    results.push(check(
        "persist_malformed_is_empty",
        garbage.load().is_none(),
        "malformed save reads as no save",
    ));

    results
}

// ── 7. Long run ─────────────────────────────────────────────────────────

fn validate_long_run(verbose: bool) -> Vec<TestResult> {
    println!("--- Long Run ---");
    let mut results = Vec::new();
    let clock = ManualClock::new(0);
    let mut engine = engine_with(EngineConfig::default(), &clock);
    engine.perform_named("auto-assign-all", &[] as &[&str], clock.now_ms());
    engine.perform_named("scavenge", &["Cole"], clock.now_ms());

    let mut out_of_range = 0;
    for _ in 0..2_000 {
        clock.advance(1_000);
        engine.poll(&clock);
        out_of_range += engine
            .game_state()
            .people
            .iter()
            .filter(|p| {
                let v = p.vitals;
                [v.health, v.hunger, v.thirst, v.radiation]
                    .iter()
                    .any(|x| !(0.0..=100.0).contains(x))
            })
            .count();
    }
    results.push(check(
        "long_run_vitals_bounded",
        out_of_range == 0,
        format!("{} out-of-range readings", out_of_range),
    ));

    let state = engine.game_state();
    let consistent = state.rooms.iter().all(|room| {
        let staffed = state
            .people
            .iter()
            .any(|p| p.vitals.alive && p.assigned_room == Some(room.kind));
        room.assigned == staffed && (!room.assigned || room.built)
    });
    results.push(check(
        "long_run_assignment_consistent",
        consistent,
        format!("day {}", state.resources.day),
    ));

    if verbose {
        for entry in &state.journal {
            println!("    {}", entry.message);
        }
    }

    results
}
