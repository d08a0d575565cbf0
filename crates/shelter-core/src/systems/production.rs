//! Production system - room output into the colony ledger

use crate::colony::Colony;
use crate::components::{Resource, RoomKind};

/// What a room put into the stores during one settlement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Yield {
    pub room: RoomKind,
    pub resource: Resource,
    pub amount: u32,
}

fn is_staple(resource: Resource) -> bool {
    matches!(resource, Resource::Food | Resource::Water | Resource::Watt)
}

/// Trickle output: every staffed food, water or power room credits
/// `tick_yield` units. No power is drawn.
pub fn tick_production_system(colony: &mut Colony, tick_yield: u32) -> Vec<Yield> {
    let yields: Vec<Yield> = colony
        .rooms
        .built()
        .filter(|room| colony.room_assigned(room.kind))
        .filter_map(|room| {
            room.produces()
                .filter(|resource| is_staple(*resource))
                .map(|resource| Yield {
                    room: room.kind,
                    resource,
                    amount: tick_yield,
                })
        })
        .collect();

    for y in &yields {
        colony.inventory.credit(y.resource, y.amount);
        log::debug!("{} produced {} {}", y.room, y.amount, y.resource);
    }
    yields
}

/// Daily settlement. A staffed room runs only if the stores hold its power
/// draw; rushed rooms double their output once, and conversion rooms are
/// limited by their scarcest input.
pub fn day_production_system(colony: &mut Colony) -> Vec<Yield> {
    let mut yields = Vec::new();

    for kind in RoomKind::ALL {
        let room = colony.rooms.get(kind);
        if !room.built || !colony.room_assigned(kind) {
            continue;
        }
        let Some(output) = room.produces() else {
            continue;
        };

        let power = room.power_usage();
        if !colony.inventory.has(Resource::Watt, power) {
            log::debug!("{kind} idle: needs {power} watt");
            continue;
        }

        let mut amount = room.production();
        if room.rushed {
            amount *= 2;
        }
        let inputs = room.blueprint().inputs;
        for input in inputs {
            amount = amount.min(colony.inventory.quantity(*input));
        }
        if amount == 0 {
            log::debug!("{kind} idle: out of inputs");
            continue;
        }

        let mut costs = vec![(Resource::Watt, power)];
        costs.extend(inputs.iter().map(|input| (*input, amount)));
        if let Err(err) = colony.inventory.debit_all(&costs) {
            log::warn!("{kind} settlement skipped: {err}");
            continue;
        }
        colony.inventory.credit(output, amount);
        colony.rooms.get_mut(kind).rushed = false;

        log::debug!("{kind} settled {amount} {output} for {power} watt");
        yields.push(Yield {
            room: kind,
            resource: output,
            amount,
        });
    }
    yields
}
