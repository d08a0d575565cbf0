//! Engine and starting-world configuration.
//!
//! Both structs deserialize from JSON with every field optional, so a config
//! file only needs to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::components::{Gender, Resource, RoomKind};
use crate::error::ConfigError;

/// Cadences and odds driving the scheduler. All durations in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum gap between two scheduler wakes
    pub wake_interval_ms: u64,
    /// Vitals, production and auto-feed cadence
    pub tick_interval_ms: u64,
    /// Length of one colony day
    pub day_duration_ms: u64,
    /// Snapshot cadence
    pub save_interval_ms: u64,
    /// Length of one expedition day (mission targets are measured in these)
    pub expedition_day_ms: u64,
    /// Units credited per tick by each staffed food/water/watt room
    pub tick_yield: u32,
    /// Chance per tick that an expedition generates narrative
    pub event_chance: f64,
    /// Quiet period between two narrative log entries
    pub narrative_cooldown_ms: u64,
    pub wanderer_min_delay_ms: u64,
    pub wanderer_max_delay_ms: u64,
    pub wanderer_check_interval_ms: u64,
    pub wanderer_chance: f64,
    pub birth_interval_ms: u64,
    /// Fixed seed for reproducible runs; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wake_interval_ms: 100,
            tick_interval_ms: 5_000,
            day_duration_ms: 360_000,
            save_interval_ms: 30_000,
            expedition_day_ms: 86_400_000,
            tick_yield: 1,
            event_chance: 0.1,
            narrative_cooldown_ms: 10_000,
            wanderer_min_delay_ms: 120_000,
            wanderer_max_delay_ms: 300_000,
            wanderer_check_interval_ms: 5_000,
            wanderer_chance: 0.05,
            birth_interval_ms: 60_000,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 || self.day_duration_ms == 0 || self.expedition_day_ms == 0
        {
            return Err(ConfigError::Invalid(
                "tick, day and expedition day lengths must be non-zero".into(),
            ));
        }
        if self.wanderer_max_delay_ms < self.wanderer_min_delay_ms {
            return Err(ConfigError::Invalid(format!(
                "wanderer max delay {} is below min delay {}",
                self.wanderer_max_delay_ms, self.wanderer_min_delay_ms
            )));
        }
        for (name, p) in [
            ("event_chance", self.event_chance),
            ("wanderer_chance", self.wanderer_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!("{name} must be within 0..=1")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Founder {
    pub name: String,
    pub gender: Gender,
}

/// What a brand new colony starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    pub inventory: Vec<(Resource, u32)>,
    pub founders: Vec<Founder>,
    pub prebuilt_rooms: Vec<RoomKind>,
    pub caps: u32,
    pub trader_caps: u32,
    pub happiness: f32,
    pub action_points: i32,
    pub auto_feed: bool,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        let founder = |name: &str, gender| Founder {
            name: name.to_string(),
            gender,
        };
        Self {
            inventory: vec![
                (Resource::Scrap, 10),
                (Resource::Food, 10),
                (Resource::Water, 10),
                (Resource::Watt, 20),
                (Resource::Steel, 5),
                (Resource::Chip, 1),
                (Resource::Medkit, 2),
                (Resource::Stimpak, 2),
                (Resource::Radaway, 1),
            ],
            founders: vec![
                founder("Thompson", Gender::M),
                founder("Elenor", Gender::F),
                founder("Cole", Gender::M),
            ],
            prebuilt_rooms: vec![RoomKind::Living, RoomKind::Kitchen, RoomKind::Water],
            caps: 100,
            trader_caps: 500,
            happiness: 100.0,
            action_points: 50,
            auto_feed: true,
        }
    }
}

impl ColonyConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_engine_config() {
        let config = EngineConfig::from_json_str(r#"{ "tick_interval_ms": 1000, "seed": 9 }"#)
            .expect("valid config");
        assert_eq!(config.tick_interval_ms, 1_000);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.day_duration_ms, 360_000);
    }

    #[test]
    fn test_rejects_inverted_wanderer_window() {
        let result = EngineConfig::from_json_str(
            r#"{ "wanderer_min_delay_ms": 10, "wanderer_max_delay_ms": 5 }"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_colony_config_defaults() {
        let config = ColonyConfig::from_json_str(r#"{ "caps": 7 }"#).expect("valid config");
        assert_eq!(config.caps, 7);
        assert_eq!(config.founders.len(), 3);
        assert!(!config.prebuilt_rooms.contains(&RoomKind::Generator));
    }
}
