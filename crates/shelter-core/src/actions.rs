//! Player actions: the command surface and its handlers.
//!
//! Commands arrive as a name plus positional arguments, are parsed into a
//! [`Command`] and applied synchronously between scheduler wakes. Every
//! handler validates before it mutates, so a rejected command leaves the
//! colony untouched.

use std::fmt;

use hecs::Entity;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::recipe;
use crate::colony::{ColonistRecord, Colony};
use crate::components::*;
use crate::config::EngineConfig;
use crate::error::{SimulationError, ValidationError};
use crate::systems::{
    accept_wanderer, auto_feed_system, begin_expedition, cancel_return, feed, give_water,
    reject_wanderer, request_return,
};

pub const BUILD_COST_AP: i32 = 10;
pub const FIX_COST_AP: i32 = 5;
const TRADE_CAPS: u32 = 10;
const TRADE_STEEL: u32 = 5;
const HEAL_AMOUNT: f32 = 30.0;
const CONCEPTION_CHANCE: f64 = 0.1;

/// Rooms filled first by auto-assign
const PRIORITY_ROOMS: [RoomKind; 3] = [RoomKind::Generator, RoomKind::Water, RoomKind::Kitchen];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Skip,
    AutoAssignAll,
    AutoFeedAll,
    ToggleAutoFeed,
    Feed(String),
    Drink(String),
    /// Zero days means until recalled
    Scavenge { person: String, days: u32 },
    Return(String),
    ContinueJourney(String),
    Trade,
    Craft(String),
    Rush(RoomKind),
    Assign { person: String, room: RoomKind },
    Unassign(String),
    Coitus(String, String),
    Build(RoomKind),
    Fix(RoomKind),
    Heal(String),
    Extend(RoomKind),
    RemoveDead(String),
    AcceptWanderer,
    RejectWanderer,
    /// Move a colonist's pack contents, meds and caps into the colony stores
    Transfer(String),
}

impl Command {
    pub const NAMES: [&'static str; 24] = [
        "quit",
        "skip",
        "auto-assign-all",
        "auto-feed-all",
        "toggle-auto-feed",
        "feed",
        "drink",
        "scavenge",
        "return",
        "continue-journey",
        "trade",
        "craft",
        "rush",
        "assign",
        "unassign",
        "coitus",
        "build",
        "fix",
        "heal",
        "extend",
        "remove-dead",
        "accept-wanderer",
        "reject-wanderer",
        "transfer",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Quit => "quit",
            Command::Skip => "skip",
            Command::AutoAssignAll => "auto-assign-all",
            Command::AutoFeedAll => "auto-feed-all",
            Command::ToggleAutoFeed => "toggle-auto-feed",
            Command::Feed(_) => "feed",
            Command::Drink(_) => "drink",
            Command::Scavenge { .. } => "scavenge",
            Command::Return(_) => "return",
            Command::ContinueJourney(_) => "continue-journey",
            Command::Trade => "trade",
            Command::Craft(_) => "craft",
            Command::Rush(_) => "rush",
            Command::Assign { .. } => "assign",
            Command::Unassign(_) => "unassign",
            Command::Coitus(_, _) => "coitus",
            Command::Build(_) => "build",
            Command::Fix(_) => "fix",
            Command::Heal(_) => "heal",
            Command::Extend(_) => "extend",
            Command::RemoveDead(_) => "remove-dead",
            Command::AcceptWanderer => "accept-wanderer",
            Command::RejectWanderer => "reject-wanderer",
            Command::Transfer(_) => "transfer",
        }
    }

    /// Parse an action name and its positional arguments. Names are matched
    /// case-insensitively, with spaces or underscores standing in for dashes.
    pub fn parse<S: AsRef<str>>(name: &str, args: &[S]) -> Result<Self, ValidationError> {
        let normalized = name.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        let action = Self::NAMES
            .iter()
            .copied()
            .find(|known| *known == normalized)
            .ok_or_else(|| ValidationError::UnknownAction(name.to_string()))?;
        let arg = |i: usize| args.get(i).map(|a| a.as_ref().trim()).filter(|a| !a.is_empty());
        let required = |i: usize, argument: &'static str| {
            arg(i).ok_or(ValidationError::MissingArgument { action, argument })
        };
        let person = |i: usize| required(i, "person").map(str::to_string);
        let room = |i: usize| required(i, "room").and_then(parse_room);

        let command = match action {
            "quit" => Command::Quit,
            "skip" => Command::Skip,
            "auto-assign-all" => Command::AutoAssignAll,
            "auto-feed-all" => Command::AutoFeedAll,
            "toggle-auto-feed" => Command::ToggleAutoFeed,
            "feed" => Command::Feed(person(0)?),
            "drink" => Command::Drink(person(0)?),
            "scavenge" => {
                let days = match arg(1) {
                    Some(raw) => raw.parse().map_err(|_| ValidationError::InvalidArgument {
                        argument: "days",
                        value: raw.to_string(),
                    })?,
                    None => 0,
                };
                Command::Scavenge {
                    person: person(0)?,
                    days,
                }
            }
            "return" => Command::Return(person(0)?),
            "continue-journey" => Command::ContinueJourney(person(0)?),
            "trade" => Command::Trade,
            "craft" => Command::Craft(arg(0).unwrap_or("turret").to_string()),
            "rush" => Command::Rush(room(0)?),
            "assign" => Command::Assign {
                person: person(0)?,
                room: room(1)?,
            },
            "unassign" => Command::Unassign(person(0)?),
            "coitus" => Command::Coitus(person(0)?, person(1)?),
            "build" => Command::Build(room(0)?),
            "fix" => Command::Fix(match arg(0) {
                Some(raw) => parse_room(raw)?,
                None => RoomKind::Living,
            }),
            "heal" => Command::Heal(person(0)?),
            "extend" => Command::Extend(room(0)?),
            "remove-dead" => Command::RemoveDead(person(0)?),
            "accept-wanderer" => Command::AcceptWanderer,
            "reject-wanderer" => Command::RejectWanderer,
            "transfer" => Command::Transfer(person(0)?),
            _ => return Err(ValidationError::UnknownAction(name.to_string())),
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse_room(raw: &str) -> Result<RoomKind, ValidationError> {
    raw.parse()
        .map_err(|_| ValidationError::UnknownRoom(raw.to_string()))
}

/// Result of a dispatched action, as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
    pub quit: bool,
}

impl ActionOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            quit: false,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            quit: false,
        }
    }

    pub fn quit() -> Self {
        Self {
            success: true,
            message: "Game ended. Returning to main screen.".to_string(),
            quit: true,
        }
    }
}

impl From<ValidationError> for ActionOutcome {
    fn from(err: ValidationError) -> Self {
        ActionOutcome::failed(err.to_string())
    }
}

/// A built room that can still take workers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomVacancy {
    pub room: RoomKind,
    pub assigned: u32,
    pub capacity: u32,
    pub produces: Option<Resource>,
    pub production: u32,
}

pub fn available_rooms(colony: &Colony) -> Vec<RoomVacancy> {
    colony
        .rooms
        .built()
        .filter(|room| colony.room_has_space(room.kind))
        .map(|room| RoomVacancy {
            room: room.kind,
            assigned: colony.colonists.assigned_count(room.kind) as u32,
            capacity: room.capacity(),
            produces: room.produces(),
            production: room.production(),
        })
        .collect()
}

/// Apply a command that only touches the colony. `Quit` and `Skip` belong to
/// the scheduler and are rejected here.
pub fn apply(
    colony: &mut Colony,
    config: &EngineConfig,
    command: Command,
    now: u64,
    rng: &mut impl Rng,
) -> Result<String, ValidationError> {
    match command {
        Command::Quit | Command::Skip => Err(ValidationError::UnknownAction(command.to_string())),
        Command::AutoAssignAll => {
            let placed = auto_assign(colony)?;
            Ok(format!("Assigned {placed} colonists to rooms."))
        }
        Command::AutoFeedAll => {
            if !colony.resources.auto_feed {
                return Err(ValidationError::AutoFeedDisabled);
            }
            auto_feed_system(colony.colonists.world_mut(), &mut colony.inventory, rng);
            Ok("Auto-fed all inhabitants who needed food or water.".to_string())
        }
        Command::ToggleAutoFeed => {
            colony.resources.auto_feed = !colony.resources.auto_feed;
            let state = if colony.resources.auto_feed {
                "enabled"
            } else {
                "disabled"
            };
            Ok(format!("Auto-feed is now {state}"))
        }
        Command::Feed(name) => {
            let entity = living(colony, &name)?;
            feed(colony.colonists.world_mut(), &mut colony.inventory, entity)?;
            Ok(format!("Fed {name}."))
        }
        Command::Drink(name) => {
            let entity = living(colony, &name)?;
            give_water(colony.colonists.world_mut(), &mut colony.inventory, entity)?;
            Ok(format!("Gave water to {name}."))
        }
        Command::Scavenge { person, days } => {
            begin_expedition(colony, &person, ExpeditionLength::from_days(days), now)?;
            Ok(if days == 0 {
                format!("{person} started scavenging indefinitely.")
            } else {
                format!("{person} started scavenging for {days} days.")
            })
        }
        Command::Return(name) => {
            request_return(colony, &name, now)?;
            Ok(format!("{name} is returning to base."))
        }
        Command::ContinueJourney(name) => {
            cancel_return(colony, &name, now)?;
            Ok(format!("{name} continues their journey."))
        }
        Command::Trade => trade(colony),
        Command::Craft(item) => {
            let recipe = recipe(&item).ok_or(ValidationError::UnknownRecipe(item))?;
            colony.inventory.debit_all(recipe.cost)?;
            colony.inventory.credit(recipe.output, 1);
            Ok(format!("Crafted a {}.", recipe.name))
        }
        Command::Rush(kind) => {
            built(colony, kind)?;
            colony.rooms.get_mut(kind).rushed = true;
            Ok(format!("{kind} will produce double at the next settlement."))
        }
        Command::Assign { person, room } => assign(colony, &person, room),
        Command::Unassign(name) => {
            let entity = colony.colonist(&name)?;
            colony
                .colonists
                .world_mut()
                .remove_one::<AssignedTo>(entity)
                .map_err(|_| ValidationError::NotAssigned(name.clone()))?;
            Ok(format!("Unassigned {name}."))
        }
        Command::Coitus(first, second) => {
            living(colony, &first)?;
            living(colony, &second)?;
            if !rng.gen_bool(CONCEPTION_CHANCE) {
                return Ok(format!("{first} and {second} spent some time together."));
            }
            let name = format!("Child_{}", colony.colonists.len());
            let child = ColonistRecord::new(
                Identity::new(name, Gender::random(rng)).with_age(0),
                Attributes::random(rng),
            );
            let entity = colony.colonists.spawn(child);
            let name = colony.colonists.name_of(entity).unwrap_or_default();
            colony.note(now, format!("{name} was born."), LogKind::Info);
            Ok(format!("{first} and {second} had a child: {name}."))
        }
        Command::Build(kind) => {
            if colony.rooms.is_built(kind) {
                return Err(ValidationError::RoomAlreadyBuilt(kind));
            }
            colony.inventory.debit_all(kind.blueprint().components)?;
            colony.rooms.get_mut(kind).built = true;
            colony.resources.spend_action_points(BUILD_COST_AP);
            colony.note(now, format!("{kind} built."), LogKind::Info);
            Ok(format!("{kind} built successfully!"))
        }
        Command::Fix(kind) => {
            built(colony, kind)?;
            colony.resources.spend_action_points(FIX_COST_AP);
            Ok(format!("{kind} fixed."))
        }
        Command::Heal(name) => {
            let entity = living(colony, &name)?;
            colony.inventory.debit(Resource::Medkit, 1)?;
            colony
                .colonists
                .world_mut()
                .get::<&mut Vitals>(entity)
                .map_err(SimulationError::from)?
                .adjust_health(HEAL_AMOUNT);
            Ok(format!("Healed {name}."))
        }
        Command::Extend(kind) => {
            built(colony, kind)?;
            let cost = colony.rooms.get(kind).extension_cost();
            colony.inventory.debit_all(&cost)?;
            colony.rooms.get_mut(kind).extensions += 1;
            Ok(format!(
                "{kind} extended! Capacity, production, and power usage increased."
            ))
        }
        Command::RemoveDead(name) => {
            let entity = colony.colonist(&name)?;
            if colony.colonists.is_alive(entity) {
                return Err(ValidationError::PersonAlive(name));
            }
            colony.colonists.despawn(entity)?;
            Ok(format!("Removed {name} from the shelter."))
        }
        Command::AcceptWanderer => {
            let name = accept_wanderer(colony, config, now)?;
            Ok(format!("{name} accepted and joined the shelter!"))
        }
        Command::RejectWanderer => {
            let name = reject_wanderer(colony, config, now)?;
            Ok(format!("{name} rejected."))
        }
        Command::Transfer(name) => transfer(colony, &name),
    }
}

fn living(colony: &Colony, name: &str) -> Result<Entity, ValidationError> {
    let entity = colony.colonist(name)?;
    if !colony.colonists.is_alive(entity) {
        return Err(ValidationError::PersonDead(name.to_string()));
    }
    Ok(entity)
}

fn built(colony: &Colony, kind: RoomKind) -> Result<(), ValidationError> {
    if colony.rooms.is_built(kind) {
        Ok(())
    } else {
        Err(ValidationError::RoomNotBuilt(kind))
    }
}

fn trade(colony: &mut Colony) -> Result<String, ValidationError> {
    let resources = &mut colony.resources;
    if resources.caps < TRADE_CAPS {
        return Err(ValidationError::NotEnoughCaps {
            needed: TRADE_CAPS,
            available: resources.caps,
        });
    }
    resources.caps -= TRADE_CAPS;
    resources.trader_caps += TRADE_CAPS;
    colony.inventory.credit(Resource::Steel, TRADE_STEEL);
    Ok(format!("Traded {TRADE_CAPS} caps for {TRADE_STEEL} steel."))
}

fn assign(colony: &mut Colony, name: &str, room: RoomKind) -> Result<String, ValidationError> {
    let entity = living(colony, name)?;
    built(colony, room)?;
    let current = colony
        .colonists
        .world()
        .get::<&AssignedTo>(entity)
        .map(|a| a.0)
        .ok();
    if current == Some(room) {
        return Ok(format!("{name} already works in {room}."));
    }
    if !colony.room_has_space(room) {
        return Err(ValidationError::RoomFull(room));
    }
    colony
        .colonists
        .world_mut()
        .insert_one(entity, AssignedTo(room))
        .map_err(SimulationError::from)?;
    Ok(format!("Assigned {name} to {room}."))
}

/// Fill the survival rooms first, then everything else that takes workers,
/// then the living quarters. Within a room the best-suited colonists go
/// first. Returns how many were placed.
pub fn auto_assign(colony: &mut Colony) -> Result<usize, ValidationError> {
    let mut order: Vec<RoomKind> = PRIORITY_ROOMS.to_vec();
    order.extend(
        RoomKind::ALL
            .iter()
            .copied()
            .filter(|kind| !PRIORITY_ROOMS.contains(kind) && *kind != RoomKind::Living),
    );
    order.push(RoomKind::Living);

    let mut idle: Vec<(Entity, Attributes)> = colony
        .colonists
        .entities()
        .into_iter()
        .filter(|entity| colony.colonists.is_alive(*entity))
        .filter(|entity| colony.colonists.world().get::<&AssignedTo>(*entity).is_err())
        .filter_map(|entity| {
            let attributes = *colony.colonists.world().get::<&Attributes>(entity).ok()?;
            Some((entity, attributes))
        })
        .collect();

    let mut placed = 0;
    for kind in order {
        if idle.is_empty() {
            break;
        }
        let room = colony.rooms.get(kind);
        if !room.built {
            continue;
        }
        let free = (room.capacity() as usize).saturating_sub(colony.colonists.assigned_count(kind));
        if let Some(attribute) = room.blueprint().attribute {
            idle.sort_by_key(|(_, attributes)| std::cmp::Reverse(attributes.get(attribute)));
        }
        let take = free.min(idle.len());
        for (entity, _) in idle.drain(..take) {
            colony
                .colonists
                .world_mut()
                .insert_one(entity, AssignedTo(kind))
                .map_err(SimulationError::from)?;
            placed += 1;
        }
    }
    log::info!("auto-assign placed {placed} colonists");
    Ok(placed)
}

/// Empty a colonist's pack, medical supplies and purse into the colony
/// stores. Gear stays with the colonist. Only possible while they are home.
pub fn transfer(colony: &mut Colony, name: &str) -> Result<String, ValidationError> {
    let entity = colony.colonist(name)?;
    let state = colony.colonists.scavenge_state(entity);
    if state != ScavengeState::Idle {
        return Err(ValidationError::WrongMissionState {
            name: name.to_string(),
            state: state.as_str(),
        });
    }

    let (items, caps, gear) = {
        let mut satchel = colony
            .colonists
            .world()
            .get::<&mut Satchel>(entity)
            .map_err(SimulationError::from)?;
        let mut items = satchel.items.drain();
        let meds = [
            (Resource::Stimpak, std::mem::take(&mut satchel.stimpaks)),
            (Resource::Radaway, std::mem::take(&mut satchel.radaways)),
        ];
        items.extend(meds.into_iter().filter(|(_, qty)| *qty > 0));
        (items, std::mem::take(&mut satchel.caps), satchel.gear.len())
    };

    let count: u32 = items.iter().map(|(_, qty)| qty).sum();
    for (resource, qty) in items {
        colony.inventory.credit(resource, qty);
    }
    colony.resources.caps += caps;

    let mut message =
        format!("Transferred {count} items and {caps} caps from {name} to the colony.");
    if gear > 0 {
        message.push_str(&format!(" {name} keeps {gear} pieces of gear."));
    }
    Ok(message)
}
