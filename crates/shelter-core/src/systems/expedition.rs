//! Expedition system - the scavenging lifecycle.
//!
//! `Idle -> Scavenging -> Returning -> Idle`, or straight from `Scavenging`
//! back to `Idle` when a fixed-length trip runs its course. The state is
//! carried by the [`Expedition`] component: present means away, the
//! `returning` flag splits the two away states.

use hecs::Entity;
use rand::Rng;

use super::loot::{roll_loot, stow, LootItem};
use super::narrative::{narrate, self_medicate, Beat, Scavenger};
use crate::colony::Colony;
use crate::components::*;
use crate::config::EngineConfig;
use crate::error::{SimulationError, ValidationError};

const MINUTE_MS: u64 = 60_000;

/// Share of the time spent out that the walk home takes
const RETURN_FACTOR: f64 = 0.25;

/// A finished expedition
#[derive(Debug, Clone)]
pub struct Completion {
    pub name: String,
    /// Expedition days spent out, fractional
    pub days: f64,
    pub stowed: Vec<LootItem>,
    pub discarded: Vec<LootItem>,
    pub log: Vec<LogEntry>,
}

/// Walk home time for an expedition that has been out `elapsed_ms`,
/// rounded to whole minutes
pub fn return_duration_ms(elapsed_ms: u64) -> u64 {
    let minutes = (elapsed_ms as f64 / MINUTE_MS as f64 * RETURN_FACTOR).round() as u64;
    minutes * MINUTE_MS
}

/// Send an idle, living colonist out
pub fn begin_expedition(
    colony: &mut Colony,
    name: &str,
    length: ExpeditionLength,
    now: u64,
) -> Result<(), ValidationError> {
    let entity = colony.colonist(name)?;
    if !colony.colonists.is_alive(entity) {
        return Err(ValidationError::PersonDead(name.to_string()));
    }
    let state = colony.colonists.scavenge_state(entity);
    if state != ScavengeState::Idle {
        return Err(ValidationError::WrongMissionState {
            name: name.to_string(),
            state: state.as_str(),
        });
    }

    colony
        .colonists
        .world_mut()
        .insert_one(entity, Expedition::new(now, length))
        .map_err(SimulationError::from)?;

    match length {
        ExpeditionLength::Indefinite => log::info!("{name} started scavenging indefinitely"),
        ExpeditionLength::Fixed(days) => log::info!("{name} started scavenging for {days} days"),
    }
    Ok(())
}

/// Turn a scavenger around. Returns the length of the walk home.
pub fn request_return(colony: &mut Colony, name: &str, now: u64) -> Result<u64, ValidationError> {
    let entity = colony.colonist(name)?;
    let world = colony.colonists.world_mut();
    let mut expedition = match world.get::<&mut Expedition>(entity) {
        Ok(expedition) if !expedition.returning => expedition,
        Ok(_) => {
            return Err(ValidationError::WrongMissionState {
                name: name.to_string(),
                state: ScavengeState::Returning.as_str(),
            })
        }
        Err(_) => {
            return Err(ValidationError::WrongMissionState {
                name: name.to_string(),
                state: ScavengeState::Idle.as_str(),
            })
        }
    };

    let elapsed = now.saturating_sub(expedition.started_at);
    let duration = return_duration_ms(elapsed);
    expedition.elapsed_ms = elapsed;
    expedition.returning = true;
    expedition.return_started_at = Some(now);
    expedition.return_duration_ms = Some(duration);
    expedition.return_progress = 0.0;
    expedition.push_log(
        now,
        format!(
            "{name} is returning to base. Journey back will take {} minutes.",
            duration / MINUTE_MS
        ),
        LogKind::Info,
    );

    log::info!("{name} heading home, {duration} ms out");
    Ok(duration)
}

/// Call off a return and keep scavenging
pub fn cancel_return(colony: &mut Colony, name: &str, now: u64) -> Result<(), ValidationError> {
    let entity = colony.colonist(name)?;
    let world = colony.colonists.world_mut();
    let state = match world.get::<&Expedition>(entity) {
        Ok(expedition) => expedition.state(),
        Err(_) => ScavengeState::Idle,
    };
    if state != ScavengeState::Returning {
        return Err(ValidationError::WrongMissionState {
            name: name.to_string(),
            state: state.as_str(),
        });
    }

    let mut expedition = world
        .get::<&mut Expedition>(entity)
        .map_err(SimulationError::from)?;
    expedition.returning = false;
    expedition.return_started_at = None;
    expedition.return_duration_ms = None;
    expedition.return_progress = 0.0;
    expedition.push_log(
        now,
        format!("{name} decides to continue their journey instead of returning."),
        LogKind::Info,
    );
    Ok(())
}

/// Advance every expedition. A failure on one colonist is logged and the
/// rest still advance.
pub fn expedition_system(
    colony: &mut Colony,
    config: &EngineConfig,
    now: u64,
    rng: &mut impl Rng,
) -> Vec<Completion> {
    let away: Vec<Entity> = colony
        .colonists
        .entities()
        .into_iter()
        .filter(|entity| colony.colonists.world().get::<&Expedition>(*entity).is_ok())
        .collect();

    let mut completions = Vec::new();
    for entity in away {
        match advance_one(colony, entity, config, now, rng) {
            Ok(Some(completion)) => completions.push(completion),
            Ok(None) => {}
            Err(err) => log::warn!("expedition step skipped: {err}"),
        }
    }
    completions
}

fn advance_one(
    colony: &mut Colony,
    entity: Entity,
    config: &EngineConfig,
    now: u64,
    rng: &mut impl Rng,
) -> Result<Option<Completion>, SimulationError> {
    if !colony.colonists.is_alive(entity) {
        colony.colonists.world_mut().remove_one::<Expedition>(entity)?;
        return Ok(None);
    }

    let day_ms = config.expedition_day_ms;
    let (finished, returning) = {
        let mut expedition = colony.colonists.world().get::<&mut Expedition>(entity)?;
        if expedition.returning {
            let since = now.saturating_sub(expedition.return_started_at.unwrap_or(now));
            let duration = expedition.return_duration_ms.unwrap_or(0);
            if since >= duration {
                (true, true)
            } else {
                expedition.return_progress = since as f32 / duration as f32;
                (false, true)
            }
        } else {
            let elapsed = now.saturating_sub(expedition.started_at);
            expedition.elapsed_ms = elapsed;
            match expedition.length.target_ms(day_ms) {
                Some(target) => {
                    expedition.progress = (elapsed as f64 / target as f64).min(1.0) as f32;
                    (elapsed >= target, false)
                }
                None => {
                    expedition.progress = (elapsed % day_ms) as f32 / day_ms as f32;
                    (false, false)
                }
            }
        }
    };

    if finished {
        return complete_expedition(colony, entity, config, now, rng).map(Some);
    }
    if !returning {
        roll_events(colony, entity, config, now, rng)?;
    }
    Ok(None)
}

/// At most one roll per tick interval. Medical supplies are used on every
/// roll; the story only moves on when the event chance hits.
fn roll_events(
    colony: &mut Colony,
    entity: Entity,
    config: &EngineConfig,
    now: u64,
    rng: &mut impl Rng,
) -> Result<(), SimulationError> {
    let (name, beat) = {
        let (identity, vitals, satchel, expedition) = colony
            .colonists
            .world_mut()
            .query_one_mut::<(&Identity, &mut Vitals, &mut Satchel, &mut Expedition)>(entity)?;

        if let Some(last) = expedition.last_roll_at {
            if now.saturating_sub(last) < config.tick_interval_ms {
                return Ok(());
            }
        }
        expedition.last_roll_at = Some(now);

        let mut scavenger = Scavenger {
            name: &identity.name,
            vitals,
            satchel,
        };
        self_medicate(&mut scavenger, expedition, now);
        if !rng.gen_bool(config.event_chance) {
            return Ok(());
        }

        match narrate(
            &mut scavenger,
            expedition,
            now,
            config.narrative_cooldown_ms,
            rng,
        ) {
            Ok(beat) => (identity.name.clone(), beat),
            Err(err) => {
                log::warn!("narrative for {} skipped: {err}", identity.name);
                return Ok(());
            }
        }
    };

    if beat == Beat::Died {
        colony.colonists.kill(entity)?;
        colony.note(
            now,
            format!("{name} has died in the wasteland."),
            LogKind::Danger,
        );
    }
    Ok(())
}

/// Bring a colonist home: roll the haul, pack it and drop the expedition
pub fn complete_expedition(
    colony: &mut Colony,
    entity: Entity,
    config: &EngineConfig,
    now: u64,
    rng: &mut impl Rng,
) -> Result<Completion, SimulationError> {
    let world = colony.colonists.world_mut();
    let expedition = world.remove_one::<Expedition>(entity)?;

    let mut total_ms = expedition.elapsed_ms;
    if expedition.returning {
        total_ms += expedition.return_duration_ms.unwrap_or(0);
    }
    let days = total_ms as f64 / config.expedition_day_ms as f64;

    let (identity, attributes, satchel) =
        world.query_one_mut::<(&Identity, &Attributes, &mut Satchel)>(entity)?;
    let name = identity.name.clone();
    let loot = roll_loot(attributes, days, rng);
    let report = stow(satchel, loot);

    colony.note(
        now,
        format!(
            "{name} returned from scavenging with {} items.",
            report.stowed.len()
        ),
        LogKind::Info,
    );
    if !report.discarded.is_empty() {
        log::warn!(
            "{name} dropped {} items: pack full",
            report.discarded.len()
        );
        colony.note(
            now,
            format!(
                "{name} had to leave {} items behind, their pack was full.",
                report.discarded.len()
            ),
            LogKind::Info,
        );
    }

    Ok(Completion {
        name,
        days,
        stowed: report.stowed,
        discarded: report.discarded,
        log: expedition.log,
    })
}
