//! The colony: one mutable state shared by every system.
//!
//! Colonists live in an ECS world wrapped by [`ColonistRegistry`]; rooms, the
//! shared ledger and the arrival process are plain fields. The scheduler owns
//! the only `Colony` and lends it out by `&mut`, so systems never race.

use std::collections::VecDeque;

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use crate::components::*;
use crate::error::SimulationError;

/// Number of colony journal entries kept
const JOURNAL_LIMIT: usize = 50;

/// Full daily action point budget
pub const ACTION_POINTS_PER_DAY: i32 = 50;

/// Every component of one colonist, flattened for spawning and saving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonistRecord {
    pub identity: Identity,
    pub vitals: Vitals,
    pub attributes: Attributes,
    pub loadout: Loadout,
    pub satchel: Satchel,
    pub assigned_to: Option<RoomKind>,
    pub expedition: Option<Expedition>,
}

impl ColonistRecord {
    pub fn new(identity: Identity, attributes: Attributes) -> Self {
        Self {
            identity,
            vitals: Vitals::default(),
            attributes,
            loadout: Loadout::default(),
            satchel: Satchel::default(),
            assigned_to: None,
            expedition: None,
        }
    }

    pub fn scavenge_state(&self) -> ScavengeState {
        scavenge_state(self.expedition.as_ref())
    }
}

/// Owns the colonist entities
#[derive(Default)]
pub struct ColonistRegistry {
    world: World,
}

impl ColonistRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Add a colonist. A clashing name gets a numeric suffix.
    pub fn spawn(&mut self, mut record: ColonistRecord) -> Entity {
        record.identity.name = self.unique_name(&record.identity.name);
        let entity = self.world.spawn((
            record.identity,
            record.vitals,
            record.attributes,
            record.loadout,
            record.satchel,
        ));
        if let Some(room) = record.assigned_to {
            let _ = self.world.insert_one(entity, AssignedTo(room));
        }
        if let Some(expedition) = record.expedition {
            let _ = self.world.insert_one(entity, expedition);
        }
        entity
    }

    pub fn unique_name(&self, base: &str) -> String {
        if self.find(base).is_none() {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base} {n}"))
            .find(|candidate| self.find(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    pub fn find(&self, name: &str) -> Option<Entity> {
        self.world
            .query::<&Identity>()
            .iter()
            .find(|(_, identity)| identity.name == name)
            .map(|(entity, _)| entity)
    }

    pub fn name_of(&self, entity: Entity) -> Option<String> {
        self.world
            .get::<&Identity>(entity)
            .ok()
            .map(|identity| identity.name.clone())
    }

    pub fn len(&self) -> usize {
        self.world.query::<&Identity>().iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn alive_count(&self) -> usize {
        self.world
            .query::<&Vitals>()
            .iter()
            .filter(|(_, vitals)| vitals.alive)
            .count()
    }

    /// Living colonists working in `room`
    pub fn assigned_count(&self, room: RoomKind) -> usize {
        self.world
            .query::<(&Vitals, &AssignedTo)>()
            .iter()
            .filter(|(_, (vitals, assigned))| vitals.alive && assigned.0 == room)
            .count()
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.world
            .get::<&Vitals>(entity)
            .map(|vitals| vitals.alive)
            .unwrap_or(false)
    }

    pub fn scavenge_state(&self, entity: Entity) -> ScavengeState {
        match self.world.get::<&Expedition>(entity) {
            Ok(expedition) => expedition.state(),
            Err(_) => ScavengeState::Idle,
        }
    }

    /// Mark a colonist dead and strip their assignment and expedition
    pub fn kill(&mut self, entity: Entity) -> Result<(), SimulationError> {
        self.world.get::<&mut Vitals>(entity)?.kill();
        let _ = self.world.remove_one::<AssignedTo>(entity);
        let _ = self.world.remove_one::<Expedition>(entity);
        Ok(())
    }

    pub fn despawn(&mut self, entity: Entity) -> Result<(), SimulationError> {
        self.world.despawn(entity)?;
        Ok(())
    }

    /// Snapshot of one colonist
    pub fn record(&self, entity: Entity) -> Option<ColonistRecord> {
        let entity_ref = self.world.entity(entity).ok()?;
        let identity = entity_ref.get::<&Identity>()?;
        let vitals = entity_ref.get::<&Vitals>()?;
        let attributes = entity_ref.get::<&Attributes>()?;
        let loadout = entity_ref.get::<&Loadout>()?;
        let satchel = entity_ref.get::<&Satchel>()?;
        let assigned_to = entity_ref.get::<&AssignedTo>().map(|a| a.0);
        let expedition = entity_ref.get::<&Expedition>().map(|e| (*e).clone());

        Some(ColonistRecord {
            identity: (*identity).clone(),
            vitals: *vitals,
            attributes: *attributes,
            loadout: (*loadout).clone(),
            satchel: (*satchel).clone(),
            assigned_to,
            expedition,
        })
    }

    /// Every colonist, sorted by name
    pub fn records(&self) -> Vec<ColonistRecord> {
        let mut records: Vec<ColonistRecord> = self
            .entities()
            .into_iter()
            .filter_map(|entity| self.record(entity))
            .collect();
        records.sort_by(|a, b| a.identity.name.cmp(&b.identity.name));
        records
    }

    /// Colonist entities sorted by name, for stable iteration
    pub fn entities(&self) -> Vec<Entity> {
        let mut named: Vec<(String, Entity)> = self
            .world
            .query::<&Identity>()
            .iter()
            .map(|(entity, identity)| (identity.name.clone(), entity))
            .collect();
        named.sort();
        named.into_iter().map(|(_, entity)| entity).collect()
    }
}

/// Colony-level counters outside the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonyResources {
    pub caps: u32,
    pub trader_caps: u32,
    pub happiness: f32,
    pub action_points: i32,
    pub overuse: bool,
    pub overuse_amount: u32,
    pub day: u32,
    pub auto_feed: bool,
}

impl Default for ColonyResources {
    fn default() -> Self {
        Self {
            caps: 100,
            trader_caps: 500,
            happiness: 100.0,
            action_points: ACTION_POINTS_PER_DAY,
            overuse: false,
            overuse_amount: 0,
            day: 1,
            auto_feed: true,
        }
    }
}

impl ColonyResources {
    /// Spend action points. Dipping below zero carries a penalty into the
    /// next day's budget.
    pub fn spend_action_points(&mut self, amount: i32) {
        self.action_points -= amount;
        if self.action_points < 0 {
            self.overuse = true;
            self.overuse_amount = self.action_points.unsigned_abs();
        }
    }

    pub fn reset_action_points(&mut self) {
        self.action_points = ACTION_POINTS_PER_DAY;
        if self.overuse {
            self.action_points -= self.overuse_amount as i32;
        }
        self.overuse = false;
        self.overuse_amount = 0;
    }
}

/// The complete simulated shelter
pub struct Colony {
    pub colonists: ColonistRegistry,
    pub rooms: RoomRegistry,
    pub inventory: Inventory,
    pub resources: ColonyResources,
    pub arrivals: ArrivalWindow,
    pub pending_wanderer: Option<WandererCandidate>,
    pub journal: VecDeque<LogEntry>,
}

impl Colony {
    pub fn new(rooms: RoomRegistry, inventory: Inventory, resources: ColonyResources) -> Self {
        Self {
            colonists: ColonistRegistry::new(),
            rooms,
            inventory,
            resources,
            arrivals: ArrivalWindow::default(),
            pending_wanderer: None,
            journal: VecDeque::new(),
        }
    }

    /// True iff at least one living colonist works in the room
    pub fn room_assigned(&self, kind: RoomKind) -> bool {
        self.colonists.assigned_count(kind) > 0
    }

    /// Built and below capacity
    pub fn room_has_space(&self, kind: RoomKind) -> bool {
        let room = self.rooms.get(kind);
        room.built && (self.colonists.assigned_count(kind) as u32) < room.capacity()
    }

    /// Living quarters can take another resident
    pub fn has_living_space(&self) -> bool {
        self.rooms.living_capacity() as usize > self.colonists.alive_count()
    }

    /// Append to the colony journal, dropping the oldest entry when full
    pub fn note(&mut self, now: u64, message: impl Into<String>, kind: LogKind) {
        let message = message.into();
        log::info!("{}", message);
        self.journal.push_back(LogEntry {
            timestamp: now,
            message,
            kind,
        });
        while self.journal.len() > JOURNAL_LIMIT {
            self.journal.pop_front();
        }
    }

    /// Resolve a colonist name or report it as unknown
    pub fn colonist(&self, name: &str) -> Result<Entity, crate::error::ValidationError> {
        self.colonists
            .find(name)
            .ok_or_else(|| crate::error::ValidationError::UnknownPerson(name.to_string()))
    }
}
