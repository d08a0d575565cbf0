//! Generation - procedural creation of colonies, colonists and newcomers

mod colonists;
mod names;

pub use colonists::*;
pub use names::*;
