//! Simulation engine - main entry point for running the colony
//!
//! The engine is polled with the current time. Each call that lands after
//! the wake interval runs, in order: the tick, the day rollover, expeditions,
//! wanderers, births, the periodic save and the display refresh. Every
//! cadence is timed against its own last firing and fires at most once per
//! wake; missed intervals are not replayed.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::actions::{self, available_rooms, ActionOutcome, Command, RoomVacancy};
use crate::clock::Clock;
use crate::colony::Colony;
use crate::config::{ColonyConfig, EngineConfig};
use crate::error::{ConfigError, DisplayError, PersistenceError};
use crate::generation::generate_colony;
use crate::persistence::{ClockState, ColonySnapshot, SnapshotStore};
use crate::state::GameState;
use crate::systems::*;

/// Presentation layer callback, fired at the end of every wake
pub trait DisplayHook {
    fn refresh(&mut self, state: &GameState) -> Result<(), DisplayError>;
}

/// Main simulation engine
pub struct ColonyEngine {
    config: EngineConfig,
    colony: Colony,
    rng: ChaCha8Rng,
    store: Option<Box<dyn SnapshotStore>>,
    display: Option<Box<dyn DisplayHook>>,

    // Update timing
    last_wake: Option<u64>,
    last_tick: u64,
    day_start: u64,
    last_save: u64,

    quit: bool,
}

impl ColonyEngine {
    /// Start a fresh colony at `now`
    pub fn new(
        config: EngineConfig,
        colony_config: &ColonyConfig,
        now: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = seeded_rng(&config);
        let colony = generate_colony(colony_config, now, config.wanderer_min_delay_ms, &mut rng);
        log::info!("new colony with {} founders", colony.colonists.len());
        Ok(Self::assemble(config, colony, rng, ClockState::at(now)))
    }

    /// Drive an existing colony
    pub fn from_colony(
        config: EngineConfig,
        colony: Colony,
        now: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = seeded_rng(&config);
        Ok(Self::assemble(config, colony, rng, ClockState::at(now)))
    }

    /// Continue the game held by `store`, or start a fresh one when it has
    /// nothing usable. The store stays attached for periodic saves.
    pub fn resume(
        config: EngineConfig,
        colony_config: &ColonyConfig,
        store: Box<dyn SnapshotStore>,
        now: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = match store.load() {
            Some(snapshot) => {
                let clocks = snapshot.clocks;
                let colony = snapshot.restore();
                log::info!(
                    "resumed colony on day {} with {} colonists",
                    colony.resources.day,
                    colony.colonists.len()
                );
                let rng = seeded_rng(&config);
                Self::assemble(config, colony, rng, clocks)
            }
            None => {
                log::info!("no saved game, starting fresh");
                Self::new(config, colony_config, now)?
            }
        };
        Ok(engine.with_store(store))
    }

    fn assemble(config: EngineConfig, colony: Colony, rng: ChaCha8Rng, clocks: ClockState) -> Self {
        Self {
            config,
            colony,
            rng,
            store: None,
            display: None,
            last_wake: None,
            last_tick: clocks.last_tick,
            day_start: clocks.day_start,
            last_save: clocks.saved_at,
            quit: false,
        }
    }

    pub fn with_store(mut self, store: Box<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_display(mut self, display: Box<dyn DisplayHook>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn colony(&self) -> &Colony {
        &self.colony
    }

    pub fn colony_mut(&mut self) -> &mut Colony {
        &mut self.colony
    }

    pub fn day(&self) -> u32 {
        self.colony.resources.day
    }

    /// Set once the quit action has run
    pub fn is_quit(&self) -> bool {
        self.quit
    }

    /// Advance using a clock source
    pub fn poll(&mut self, clock: &dyn Clock) -> bool {
        self.advance(clock.now_ms())
    }

    /// Run one wake if one is due. Returns whether anything ran.
    ///
    /// Never fails: a broken sub-step is logged and the rest still run.
    pub fn advance(&mut self, now: u64) -> bool {
        if let Some(last) = self.last_wake {
            if now < last + self.config.wake_interval_ms {
                return false;
            }
        }
        self.last_wake = Some(now);

        // Tick: vitals, production, consumption
        if now.saturating_sub(self.last_tick) >= self.config.tick_interval_ms {
            self.tick();
            self.last_tick = now;
        }

        // Day settlement
        if now.saturating_sub(self.day_start) >= self.config.day_duration_ms {
            self.rollover_day(now);
            self.day_start = now;
        }

        for completion in expedition_system(&mut self.colony, &self.config, now, &mut self.rng) {
            log::debug!(
                "{} back after {:.2} days, {} finds kept",
                completion.name,
                completion.days,
                completion.stowed.len()
            );
        }

        wanderer_system(&mut self.colony, &self.config, now, &mut self.rng);
        birth_system(&mut self.colony, &self.config, now, &mut self.rng);

        if self.store.is_some() && now.saturating_sub(self.last_save) >= self.config.save_interval_ms
        {
            if let Err(err) = self.save(now) {
                log::warn!("periodic save failed: {err}");
            }
        }

        self.refresh_display();
        true
    }

    fn tick(&mut self) {
        vitals_tick_system(self.colony.colonists.world_mut());
        tick_production_system(&mut self.colony, self.config.tick_yield);
        if self.colony.resources.auto_feed {
            auto_feed_system(
                self.colony.colonists.world_mut(),
                &mut self.colony.inventory,
                &mut self.rng,
            );
        }
    }

    fn rollover_day(&mut self, now: u64) {
        self.colony.resources.reset_action_points();

        let settled = day_production_system(&mut self.colony);
        log::debug!("{} rooms produced at settlement", settled.len());

        vitals_day_system(self.colony.colonists.world_mut(), &mut self.rng);
        if let Err(err) = resolve_deaths(&mut self.colony, now) {
            log::warn!("death check failed: {err}");
        }

        if self.colony.resources.auto_feed {
            auto_feed_system(
                self.colony.colonists.world_mut(),
                &mut self.colony.inventory,
                &mut self.rng,
            );
        }

        self.colony.resources.day += 1;
        log::info!(
            "day {} begins: {} alive, {} action points",
            self.colony.resources.day,
            self.colony.colonists.alive_count(),
            self.colony.resources.action_points
        );
    }

    /// Settle the current day immediately and start the next one
    pub fn skip_day(&mut self, now: u64) -> u32 {
        self.rollover_day(now);
        self.day_start = now;
        self.colony.resources.day
    }

    /// Dispatch a player action. Rejections come back as a failed outcome
    /// and leave the colony untouched.
    pub fn perform(&mut self, command: Command, now: u64) -> ActionOutcome {
        let name = command.name();
        let result = match command {
            Command::Quit => {
                self.quit = true;
                if let Err(err) = self.save(now) {
                    log::warn!("save on quit failed: {err}");
                }
                return ActionOutcome::quit();
            }
            Command::Skip => {
                let day = self.skip_day(now);
                Ok(format!("Skipped to day {day}."))
            }
            other => actions::apply(&mut self.colony, &self.config, other, now, &mut self.rng),
        };

        match result {
            Ok(message) => {
                log::debug!("{name}: {message}");
                ActionOutcome::ok(message)
            }
            Err(err) => {
                log::debug!("{name} rejected: {err}");
                err.into()
            }
        }
    }

    /// Parse and dispatch an action by name
    pub fn perform_named<S: AsRef<str>>(&mut self, name: &str, args: &[S], now: u64) -> ActionOutcome {
        match Command::parse(name, args) {
            Ok(command) => self.perform(command, now),
            Err(err) => err.into(),
        }
    }

    pub fn game_state(&self) -> GameState {
        GameState::capture(&self.colony)
    }

    pub fn available_actions(&self) -> Vec<&'static str> {
        Command::NAMES.to_vec()
    }

    pub fn available_rooms(&self) -> Vec<RoomVacancy> {
        available_rooms(&self.colony)
    }

    pub fn snapshot(&self, now: u64) -> ColonySnapshot {
        ColonySnapshot::capture(
            &self.colony,
            ClockState {
                last_tick: self.last_tick,
                day_start: self.day_start,
                saved_at: now,
            },
        )
    }

    /// Write a snapshot to the attached store. Without a store this is a
    /// no-op.
    pub fn save(&mut self, now: u64) -> Result<(), PersistenceError> {
        self.last_save = now;
        let Some(store) = &self.store else {
            return Ok(());
        };
        store.save(&self.snapshot(now))
    }

    fn refresh_display(&mut self) {
        if self.display.is_none() {
            return;
        }
        let state = self.game_state();
        if let Some(display) = self.display.as_mut() {
            if let Err(err) = display.refresh(&state) {
                log::warn!("{err}");
            }
        }
    }
}

fn seeded_rng(config: &EngineConfig) -> ChaCha8Rng {
    match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
