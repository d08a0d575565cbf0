//! Component definitions for the colony simulation.
//!
//! Components are pure data. Colonists are `hecs` entities built from the
//! people and expedition components; rooms and ledgers are plain structs.
//! Behavior lives in systems.

mod arrival;
mod expedition;
mod inventory;
mod people;
mod rooms;

pub use arrival::*;
pub use expedition::*;
pub use inventory::*;
pub use people::*;
pub use rooms::*;
