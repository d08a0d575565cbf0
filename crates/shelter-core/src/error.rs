//! Error taxonomy for the engine.
//!
//! - [`ValidationError`]: a player action was rejected; reported back to the
//!   caller as a failed [`ActionOutcome`](crate::actions::ActionOutcome).
//! - [`SimulationError`]: something went wrong inside a single scheduler
//!   sub-step; logged and skipped.
//! - [`PersistenceError`]: the snapshot store could not be read or written.
//! - [`DisplayError`]: a display hook failed; logged and ignored.

use thiserror::Error;

use crate::components::{Resource, RoomKind};

/// A withdrawal that would drive a ledger entry negative.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Not enough {resource}: need {needed}, have {available}")]
    Insufficient {
        resource: Resource,
        needed: u32,
        available: u32,
    },
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid action: {0}")]
    UnknownAction(String),

    #[error("Action '{action}' needs a {argument} argument")]
    MissingArgument {
        action: &'static str,
        argument: &'static str,
    },

    #[error("Invalid {argument}: '{value}'")]
    InvalidArgument {
        argument: &'static str,
        value: String,
    },

    #[error("Person {0} not found")]
    UnknownPerson(String),

    #[error("Unknown room '{0}'")]
    UnknownRoom(String),

    #[error("Unknown recipe '{0}'")]
    UnknownRecipe(String),

    #[error("{0} is dead")]
    PersonDead(String),

    #[error("{0} is not dead")]
    PersonAlive(String),

    #[error("{name} is {state}")]
    WrongMissionState { name: String, state: &'static str },

    #[error("{0} is not built")]
    RoomNotBuilt(RoomKind),

    #[error("{0} is already built")]
    RoomAlreadyBuilt(RoomKind),

    #[error("{0} has no free slots")]
    RoomFull(RoomKind),

    #[error("{0} is not assigned to a room")]
    NotAssigned(String),

    #[error("No wanderer is waiting at the door")]
    NoWanderer,

    #[error("Auto-feed is disabled. Enable it first.")]
    AutoFeedDisabled,

    #[error("Not enough caps: need {needed}, have {available}")]
    NotEnoughCaps { needed: u32, available: u32 },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Component error: {0}")]
    Component(#[from] hecs::ComponentError),

    #[error("Query error: {0}")]
    Query(#[from] hecs::QueryOneError),

    #[error("Entity no longer exists")]
    NoSuchEntity(#[from] hecs::NoSuchEntity),

    #[error("Event table error: {0}")]
    EventTable(#[from] rand::distributions::WeightedError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary encoding error: {0}")]
    Bincode(#[from] bincode::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// A display hook could not draw the current state
#[derive(Error, Debug)]
#[error("Display refresh failed: {0}")]
pub struct DisplayError(pub String);
