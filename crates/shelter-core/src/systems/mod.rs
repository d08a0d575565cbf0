//! Systems - logic that operates on the colony

mod arrivals;
mod consumption;
mod expedition;
mod loot;
mod narrative;
mod production;
mod vitals;

pub use arrivals::*;
pub use consumption::*;
pub use expedition::*;
pub use loot::*;
pub use narrative::*;
pub use production::*;
pub use vitals::*;
