//! Shelter Core - Colony Shelter Simulation Engine
//!
//! A real-time simulation of an underground shelter: colonists get hungry
//! and thirsty, rooms turn labor and power into supplies, scavengers head
//! into the wasteland and come back (or don't) with loot, and strangers
//! knock on the door.
//!
//! # Architecture
//!
//! Colonists are `hecs` entities; the rest of the shelter is plain data in
//! [`colony::Colony`]:
//! - **Components**: Pure data (vitals, attributes, packs, expeditions, rooms)
//! - **Systems**: Free functions that advance one concern of the colony
//! - **Engine**: The dual-clock scheduler that sequences the systems and
//!   dispatches player actions between wakes
//!
//! # Example
//!
//! ```rust,no_run
//! use shelter_core::prelude::*;
//!
//! let clock = SystemClock;
//! let mut engine = ColonyEngine::new(
//!     EngineConfig::default(),
//!     &ColonyConfig::default(),
//!     clock.now_ms(),
//! )
//! .expect("default config is valid");
//!
//! let outcome = engine.perform_named("scavenge", &["Thompson", "1"], clock.now_ms());
//! assert!(outcome.success);
//!
//! loop {
//!     engine.poll(&clock);
//!     std::thread::sleep(std::time::Duration::from_millis(100));
//! }
//! ```

pub mod actions;
pub mod catalog;
pub mod clock;
pub mod colony;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod persistence;
pub mod state;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::actions::{ActionOutcome, Command};
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::colony::{Colony, ColonistRecord};
    pub use crate::components::*;
    pub use crate::config::{ColonyConfig, EngineConfig};
    pub use crate::engine::{ColonyEngine, DisplayHook};
    pub use crate::error::*;
    pub use crate::persistence::{FileStore, MemoryStore, SnapshotCodec, SnapshotStore};
    pub use crate::state::GameState;
}
