//! Arrivals system - wanderers at the door and births in the living quarters

use rand::Rng;

use crate::colony::{ColonistRecord, Colony};
use crate::components::{LogKind, RoomKind};
use crate::config::EngineConfig;
use crate::error::ValidationError;
use crate::generation::{generate_newborn, generate_wanderer};

/// Run the wanderer window. Returns the name of a stranger who just showed
/// up, if any.
///
/// Sampling is suspended while a candidate waits and while the living
/// quarters are unbuilt or full.
pub fn wanderer_system(
    colony: &mut Colony,
    config: &EngineConfig,
    now: u64,
    rng: &mut impl Rng,
) -> Option<String> {
    if colony.pending_wanderer.is_some()
        || !colony.rooms.is_built(RoomKind::Living)
        || !colony.has_living_space()
    {
        return None;
    }

    let window = &mut colony.arrivals;
    if !window.window_open {
        if now < window.cooldown_until {
            return None;
        }
        window.open(
            now,
            config
                .wanderer_max_delay_ms
                .saturating_sub(config.wanderer_min_delay_ms),
        );
        log::debug!("wanderer window open until {:?}", window.window_end);
    }

    if let Some(last) = window.last_check {
        if now.saturating_sub(last) < config.wanderer_check_interval_ms {
            return None;
        }
    }
    window.last_check = Some(now);

    if window.window_end.map_or(true, |end| now >= end) {
        window.reset(now, config.wanderer_min_delay_ms);
        log::debug!("wanderer window closed without a visitor");
        return None;
    }

    if !rng.gen_bool(config.wanderer_chance) {
        return None;
    }

    window.reset(now, config.wanderer_min_delay_ms);
    let candidate = generate_wanderer(colony.colonists.alive_count(), now, rng);
    let name = candidate.identity.name.clone();
    colony.pending_wanderer = Some(candidate);
    colony.note(
        now,
        format!("{name} is waiting at the door."),
        LogKind::Info,
    );
    Some(name)
}

/// Let the waiting stranger in. Returns their registered name.
pub fn accept_wanderer(
    colony: &mut Colony,
    config: &EngineConfig,
    now: u64,
) -> Result<String, ValidationError> {
    let candidate = colony
        .pending_wanderer
        .take()
        .ok_or(ValidationError::NoWanderer)?;
    colony.arrivals.reset(now, config.wanderer_min_delay_ms);

    let entity = colony
        .colonists
        .spawn(ColonistRecord::new(candidate.identity, candidate.attributes));
    let name = colony
        .colonists
        .name_of(entity)
        .unwrap_or_default();
    colony.note(now, format!("{name} joined the shelter."), LogKind::Info);
    Ok(name)
}

/// Turn the waiting stranger away. Returns their name.
pub fn reject_wanderer(
    colony: &mut Colony,
    config: &EngineConfig,
    now: u64,
) -> Result<String, ValidationError> {
    let candidate = colony
        .pending_wanderer
        .take()
        .ok_or(ValidationError::NoWanderer)?;
    colony.arrivals.reset(now, config.wanderer_min_delay_ms);
    log::info!("{} was turned away", candidate.identity.name);
    Ok(candidate.identity.name)
}

/// Two or more residents in the living quarters with room to spare produce
/// a child every birth interval, timed from when that first became true.
pub fn birth_system(
    colony: &mut Colony,
    config: &EngineConfig,
    now: u64,
    rng: &mut impl Rng,
) -> Option<String> {
    let eligible = colony.rooms.is_built(RoomKind::Living)
        && colony.colonists.assigned_count(RoomKind::Living) >= 2
        && colony.has_living_space();
    if !eligible {
        colony.arrivals.last_birth = None;
        return None;
    }

    let since = *colony.arrivals.last_birth.get_or_insert(now);
    if now.saturating_sub(since) < config.birth_interval_ms {
        return None;
    }

    let entity = colony
        .colonists
        .spawn(generate_newborn(colony.colonists.len(), rng));
    colony.arrivals.last_birth = Some(now);
    let name = colony.colonists.name_of(entity).unwrap_or_default();
    colony.note(
        now,
        format!("{name} was born in the living quarters."),
        LogKind::Info,
    );
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::ColonyResources;
    use crate::components::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config() -> EngineConfig {
        EngineConfig {
            wanderer_chance: 1.0,
            ..EngineConfig::default()
        }
    }

    fn colony(people: usize) -> Colony {
        let mut colony = Colony::new(
            RoomRegistry::new(&[RoomKind::Living]),
            Inventory::new(),
            ColonyResources::default(),
        );
        colony.arrivals = ArrivalWindow::new(0, config().wanderer_min_delay_ms);
        for i in 0..people {
            colony.colonists.spawn(ColonistRecord::new(
                Identity::new(format!("Settler {i}"), Gender::F),
                Attributes::default(),
            ));
        }
        colony
    }

    #[test]
    fn test_no_visitor_during_cooldown() {
        let mut colony = colony(3);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(wanderer_system(&mut colony, &config(), 60_000, &mut rng).is_none());
        assert!(!colony.arrivals.window_open);
    }

    #[test]
    fn test_visitor_once_window_opens() {
        let mut colony = colony(3);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let name = wanderer_system(&mut colony, &config(), 120_000, &mut rng).expect("visitor");

        assert!(name.ends_with(" #4"));
        assert!(colony.pending_wanderer.is_some());
        assert!(!colony.arrivals.window_open);
        assert_eq!(colony.arrivals.cooldown_until, 240_000);

        // no sampling while one waits
        assert!(wanderer_system(&mut colony, &config(), 400_000, &mut rng).is_none());
    }

    #[test]
    fn test_full_quarters_suspend_arrivals() {
        let mut colony = colony(10);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for step in 0..200u64 {
            assert!(wanderer_system(&mut colony, &config(), step * 5_000, &mut rng).is_none());
        }
        assert!(colony.pending_wanderer.is_none());
    }

    #[test]
    fn test_window_expires_into_cooldown() {
        let mut colony = colony(1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let never = EngineConfig {
            wanderer_chance: 0.0,
            ..EngineConfig::default()
        };

        wanderer_system(&mut colony, &never, 120_000, &mut rng);
        assert!(colony.arrivals.window_open);
        wanderer_system(&mut colony, &never, 300_000, &mut rng);
        assert!(!colony.arrivals.window_open);
        assert_eq!(colony.arrivals.cooldown_until, 420_000);
    }

    #[test]
    fn test_accept_and_reject() {
        let mut colony = colony(2);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(matches!(
            accept_wanderer(&mut colony, &config(), 0),
            Err(ValidationError::NoWanderer)
        ));

        wanderer_system(&mut colony, &config(), 120_000, &mut rng).expect("visitor");
        let name = accept_wanderer(&mut colony, &config(), 130_000).expect("accepted");
        assert!(colony.colonists.find(&name).is_some());
        assert_eq!(colony.colonists.len(), 3);
        assert_eq!(colony.arrivals.cooldown_until, 250_000);

        wanderer_system(&mut colony, &config(), 250_000, &mut rng).expect("visitor");
        reject_wanderer(&mut colony, &config(), 260_000).expect("rejected");
        assert!(colony.pending_wanderer.is_none());
        assert_eq!(colony.colonists.len(), 3);
    }

    #[test]
    fn test_birth_needs_two_residents() {
        let mut colony = colony(2);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let config = EngineConfig::default();

        assert!(birth_system(&mut colony, &config, 0, &mut rng).is_none());
        assert_eq!(colony.arrivals.last_birth, None);

        for entity in colony.colonists.entities() {
            colony
                .colonists
                .world_mut()
                .insert_one(entity, AssignedTo(RoomKind::Living))
                .expect("insert");
        }
        assert!(birth_system(&mut colony, &config, 10_000, &mut rng).is_none());
        assert!(birth_system(&mut colony, &config, 69_999, &mut rng).is_none());
        let child = birth_system(&mut colony, &config, 70_000, &mut rng).expect("birth");

        let entity = colony.colonists.find(&child).expect("registered");
        assert_eq!(colony.colonists.record(entity).map(|r| r.identity.age), Some(0));
        assert_eq!(colony.arrivals.last_birth, Some(70_000));
    }
}
