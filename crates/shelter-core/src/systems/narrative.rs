//! Narrative system - the running story of a colonist out in the wasteland.
//!
//! Each successful roll produces at most one beat: an intro, a quiet moment,
//! a refrain on the road, arrival at a site, or an event inside a site.
//! Events carry effects on the scavenger's vitals and pack.

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::components::{Expedition, LogKind, Resource, Satchel, Site, Vitals};
use crate::error::SimulationError;

/// Longest run of quiet lines in a row
const MAX_QUIET_RUN: u32 = 2;

const INTROS: [&str; 4] = [
    "{name} walks out into the great unknown…",
    "{name} leaves the safety of the shelter and steps into the irradiated dusk.",
    "{name} disappears beyond the broken fence, gear in hand.",
    "{name} ventures into the wasteland, searching for supplies.",
];

const QUIET_MOMENTS: [&str; 3] = [
    "{name} listens… but hears only wind.",
    "{name} pauses to check their bearings.",
    "{name} scans the horizon for threats.",
];

const REFRAINS: [&str; 4] = [
    "{name} wanders the empty streets…",
    "{name} takes a cautious step off the main road…",
    "{name} moves quietly, searching for signs of life or salvage…",
    "{name} picks their way through the rubble…",
];

const EXITS: [&str; 3] = [
    "{name} slips out of the building and back onto the road…",
    "{name} exits the structure and continues their journey…",
    "{name} leaves the area and moves on…",
];

/// Buildings worth a look, with how many events each holds
const SITES: [(&str, u32); 8] = [
    ("Apartment Building", 3),
    ("School", 4),
    ("Police Station", 3),
    ("Ruined House", 2),
    ("Parking Garage", 3),
    ("Abandoned Store", 2),
    ("Medical Clinic", 3),
    ("Warehouse", 4),
];

/// One entry of the event table
#[derive(Debug, Clone, Copy)]
pub struct EventTemplate {
    pub kind: LogKind,
    pub text: &'static str,
    pub weight: u32,
    pub health: i32,
    pub radiation: i32,
    pub caps: u32,
    pub steel: u32,
    pub stimpaks: u32,
    pub radaways: u32,
}

const NONE: EventTemplate = EventTemplate {
    kind: LogKind::Search,
    text: "",
    weight: 1,
    health: 0,
    radiation: 0,
    caps: 0,
    steel: 0,
    stimpaks: 0,
    radaways: 0,
};

pub static EVENTS: [EventTemplate; 12] = [
    EventTemplate {
        text: "{name} checks behind a loose wall panel…",
        weight: 3,
        caps: 5,
        steel: 1,
        ..NONE
    },
    EventTemplate {
        text: "{name} searches through a filing cabinet…",
        weight: 3,
        caps: 3,
        stimpaks: 1,
        ..NONE
    },
    EventTemplate {
        text: "{name} investigates a storage room…",
        weight: 3,
        steel: 2,
        radaways: 1,
        ..NONE
    },
    EventTemplate {
        text: "{name} examines a broken vending machine…",
        weight: 3,
        caps: 8,
        ..NONE
    },
    EventTemplate {
        kind: LogKind::Combat,
        text: "{name} is startled by a feral ghoul!",
        weight: 2,
        health: -8,
        ..NONE
    },
    EventTemplate {
        kind: LogKind::Combat,
        text: "{name} fights off some raiders!",
        weight: 2,
        health: -5,
        ..NONE
    },
    EventTemplate {
        kind: LogKind::Combat,
        text: "{name} encounters a hostile scavenger!",
        weight: 2,
        health: -3,
        caps: 10,
        ..NONE
    },
    EventTemplate {
        kind: LogKind::Radiation,
        text: "{name} stumbles into a glowing puddle…",
        weight: 2,
        radiation: 8,
        ..NONE
    },
    EventTemplate {
        kind: LogKind::Radiation,
        text: "{name} passes through a radioactive area…",
        weight: 2,
        radiation: 5,
        ..NONE
    },
    EventTemplate {
        kind: LogKind::Loot,
        text: "{name} finds some scrap metal!",
        weight: 2,
        steel: 3,
        caps: 5,
        ..NONE
    },
    EventTemplate {
        kind: LogKind::Loot,
        text: "{name} discovers a medical cache!",
        weight: 1,
        stimpaks: 1,
        radaways: 1,
        ..NONE
    },
    EventTemplate {
        kind: LogKind::Loot,
        text: "{name} uncovers some pre-war supplies!",
        weight: 1,
        caps: 15,
        steel: 2,
        ..NONE
    },
];

/// What one roll produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Beat {
    Silent,
    Logged(LogKind),
    /// The scavenger did not survive the event
    Died,
}

/// The colonist a story is about, borrowed for one roll
pub struct Scavenger<'a> {
    pub name: &'a str,
    pub vitals: &'a mut Vitals,
    pub satchel: &'a mut Satchel,
}

impl Scavenger<'_> {
    fn line(&self, template: &str) -> String {
        template.replace("{name}", self.name)
    }
}

fn pick<'t>(lines: &[&'t str], rng: &mut impl Rng) -> &'t str {
    lines.choose(rng).copied().unwrap_or("{name} presses on.")
}

/// Reach for the medkit before each roll: a stimpak below 70 health, a
/// radaway above 50 radiation.
pub fn self_medicate(scavenger: &mut Scavenger, expedition: &mut Expedition, now: u64) {
    if scavenger.vitals.health < 70.0 && scavenger.satchel.stimpaks > 0 {
        scavenger.satchel.stimpaks -= 1;
        scavenger.vitals.adjust_health(25.0);
        let line = scavenger.line("{name} used a Stimpak to stabilize their wounds.");
        expedition.push_log(now, line, LogKind::Medical);
    }
    if scavenger.vitals.radiation > 50.0 && scavenger.satchel.radaways > 0 {
        scavenger.satchel.radaways -= 1;
        scavenger.vitals.adjust_radiation(-20.0);
        let line = scavenger.line("{name} injects a RadAway to flush out the toxins.");
        expedition.push_log(now, line, LogKind::Medical);
    }
}

/// Produce the next beat of the story
pub fn narrate(
    scavenger: &mut Scavenger,
    expedition: &mut Expedition,
    now: u64,
    cooldown_ms: u64,
    rng: &mut impl Rng,
) -> Result<Beat, SimulationError> {
    if !expedition.narrative.has_intro {
        let line = scavenger.line(pick(&INTROS, rng));
        expedition.push_log(now, line, LogKind::Narrative);
        expedition.narrative.has_intro = true;
        expedition.narrative.inside = false;
        return Ok(Beat::Logged(LogKind::Narrative));
    }

    let state = &expedition.narrative;
    if state.last_kind.is_some() && now.saturating_sub(state.last_entry_at) < cooldown_ms {
        return Ok(Beat::Silent);
    }

    // Most rolls are uneventful
    if rng.gen_bool(0.6) {
        let state = &mut expedition.narrative;
        let quiet_allowed = state.last_kind != Some(LogKind::Quiet)
            || state.consecutive_quiet < MAX_QUIET_RUN;
        if rng.gen_bool(0.3) && !state.inside && quiet_allowed {
            state.consecutive_quiet = if state.last_kind == Some(LogKind::Quiet) {
                state.consecutive_quiet + 1
            } else {
                1
            };
            state.last_kind = Some(LogKind::Quiet);
            state.last_entry_at = now;
            let line = scavenger.line(pick(&QUIET_MOMENTS, rng));
            expedition.push_log(now, line, LogKind::Quiet);
            return Ok(Beat::Logged(LogKind::Quiet));
        }
        return Ok(Beat::Silent);
    }

    if !expedition.narrative.inside && rng.gen_bool(0.15) {
        let line = scavenger.line(pick(&REFRAINS, rng));
        expedition.push_log(now, line, LogKind::Narrative);
        mark(expedition, LogKind::Narrative, now);
        return Ok(Beat::Logged(LogKind::Narrative));
    }

    let exhausted = match &expedition.narrative.location {
        Some(site) => expedition.narrative.location_ticks >= site.duration,
        None => true,
    };
    if exhausted {
        let (name, duration) = SITES.choose(rng).copied().unwrap_or(SITES[0]);
        let line = format!("{} approaches a {}…", scavenger.name, name.to_lowercase());
        let state = &mut expedition.narrative;
        state.location = Some(Site {
            name: name.to_string(),
            duration,
        });
        state.location_ticks = 0;
        state.inside = true;
        expedition.push_log(now, line, LogKind::Location);
        mark(expedition, LogKind::Location, now);
        return Ok(Beat::Logged(LogKind::Location));
    }

    expedition.narrative.location_ticks += 1;
    let table: WeightedIndex<u32> = WeightedIndex::new(EVENTS.iter().map(|event| event.weight))?;
    let event = EVENTS[table.sample(rng)];

    scavenger.vitals.adjust_health(event.health as f32);
    scavenger.vitals.adjust_radiation(event.radiation as f32);
    if scavenger.vitals.health <= 0.0 {
        scavenger.vitals.kill();
        expedition.push_log(now, scavenger.line(event.text), event.kind);
        let line = scavenger.line("{name} has died in the wasteland.");
        expedition.push_log(now, line, LogKind::Danger);
        return Ok(Beat::Died);
    }

    let satchel = &mut *scavenger.satchel;
    satchel.caps += event.caps;
    satchel.stimpaks += event.stimpaks;
    satchel.radaways += event.radaways;
    let steel = event.steel.min(satchel.free_slots());
    satchel.items.credit(Resource::Steel, steel);

    expedition.push_log(now, scavenger.line(event.text), event.kind);

    if event.kind == LogKind::Combat && event.health < 0 {
        let wound = match event.health.unsigned_abs() {
            8..=u32::MAX => "{name} is seriously wounded from the encounter.",
            5..=7 => "{name} is moderately wounded from the fight.",
            _ => "{name} is lightly wounded from the skirmish.",
        };
        expedition.push_log(now, scavenger.line(wound), LogKind::Wound);
    }

    let finished = expedition
        .narrative
        .location
        .as_ref()
        .map(|site| expedition.narrative.location_ticks >= site.duration)
        .unwrap_or(false);
    if finished {
        let line = scavenger.line(pick(&EXITS, rng));
        expedition.push_log(now, line, LogKind::Transition);
        expedition.narrative.inside = false;
    }

    mark(expedition, event.kind, now);
    Ok(Beat::Logged(event.kind))
}

fn mark(expedition: &mut Expedition, kind: LogKind, now: u64) {
    let state = &mut expedition.narrative;
    state.last_kind = Some(kind);
    state.last_entry_at = now;
    state.consecutive_quiet = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ExpeditionLength;
    use rand_chacha::ChaCha8Rng;

    fn run(
        vitals: &mut Vitals,
        satchel: &mut Satchel,
        expedition: &mut Expedition,
        now: u64,
        rng: &mut ChaCha8Rng,
    ) -> Beat {
        let mut scavenger = Scavenger {
            name: "Thompson",
            vitals,
            satchel,
        };
        narrate(&mut scavenger, expedition, now, 10_000, rng).expect("narration")
    }

    #[test]
    fn test_first_beat_is_the_intro() {
        let mut vitals = Vitals::default();
        let mut satchel = Satchel::default();
        let mut expedition = Expedition::new(0, ExpeditionLength::Indefinite);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let beat = run(&mut vitals, &mut satchel, &mut expedition, 5_000, &mut rng);

        assert_eq!(beat, Beat::Logged(LogKind::Narrative));
        assert!(expedition.narrative.has_intro);
        assert_eq!(expedition.log.len(), 1);
        assert!(expedition.log[0].message.contains("Thompson"));
    }

    #[test]
    fn test_cooldown_blocks_back_to_back_entries() {
        let mut vitals = Vitals::default();
        let mut satchel = Satchel::default();
        let mut expedition = Expedition::new(0, ExpeditionLength::Indefinite);
        expedition.narrative.has_intro = true;
        expedition.narrative.last_kind = Some(LogKind::Search);
        expedition.narrative.last_entry_at = 100_000;
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let beat = run(&mut vitals, &mut satchel, &mut expedition, 105_000, &mut rng);

        assert_eq!(beat, Beat::Silent);
        assert!(expedition.log.is_empty());
    }

    #[test]
    fn test_long_story_keeps_invariants() {
        let mut vitals = Vitals::default();
        let mut satchel = Satchel {
            stimpaks: 50,
            ..Satchel::default()
        };
        let mut expedition = Expedition::new(0, ExpeditionLength::Indefinite);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let mut quiet_run = 0;
        for step in 1..=2_000u64 {
            let mut scavenger = Scavenger {
                name: "Thompson",
                vitals: &mut vitals,
                satchel: &mut satchel,
            };
            self_medicate(&mut scavenger, &mut expedition, step * 15_000);
            let before = expedition.log.len();
            let beat = narrate(&mut scavenger, &mut expedition, step * 15_000, 10_000, &mut rng)
                .expect("narration");
            assert!(vitals.health <= 100.0 && vitals.health >= 0.0);
            assert!(vitals.radiation <= 100.0);
            if beat == Beat::Died {
                assert!(!vitals.alive);
                break;
            }
            for entry in &expedition.log[before..] {
                if entry.kind == LogKind::Quiet {
                    quiet_run += 1;
                    assert!(quiet_run <= MAX_QUIET_RUN);
                    assert!(!expedition.narrative.inside);
                } else {
                    quiet_run = 0;
                }
            }
        }
        assert!(expedition.log.len() > 10);
    }

    #[test]
    fn test_self_medicate_thresholds() {
        let mut vitals = Vitals {
            health: 60.0,
            radiation: 55.0,
            ..Vitals::default()
        };
        let mut satchel = Satchel {
            stimpaks: 1,
            radaways: 1,
            ..Satchel::default()
        };
        let mut expedition = Expedition::new(0, ExpeditionLength::Indefinite);
        let mut scavenger = Scavenger {
            name: "Elenor",
            vitals: &mut vitals,
            satchel: &mut satchel,
        };

        self_medicate(&mut scavenger, &mut expedition, 0);

        assert_eq!(vitals.health, 85.0);
        assert_eq!(vitals.radiation, 35.0);
        assert_eq!(satchel.stimpaks, 0);
        assert_eq!(expedition.log.len(), 2);
        assert!(expedition.log.iter().all(|e| e.kind == LogKind::Medical));
    }
}
