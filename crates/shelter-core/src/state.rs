//! Read-only views of the colony handed to the presentation layer

use serde::{Deserialize, Serialize};

use crate::colony::{ColonistRecord, Colony, ColonyResources};
use crate::components::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonView {
    pub name: String,
    pub gender: Gender,
    pub age: u32,
    pub vitals: Vitals,
    pub attributes: Attributes,
    pub assigned_room: Option<RoomKind>,
    pub scavenge_state: ScavengeState,
    pub stimpaks: u32,
    pub radaways: u32,
    pub caps: u32,
    pub pack_used: u32,
    pub pack_capacity: u32,
    pub loadout: Loadout,
}

impl From<&ColonistRecord> for PersonView {
    fn from(record: &ColonistRecord) -> Self {
        Self {
            name: record.identity.name.clone(),
            gender: record.identity.gender,
            age: record.identity.age,
            vitals: record.vitals,
            attributes: record.attributes,
            assigned_room: record.assigned_to,
            scavenge_state: record.scavenge_state(),
            stimpaks: record.satchel.stimpaks,
            radaways: record.satchel.radaways,
            caps: record.satchel.caps,
            pack_used: record.satchel.used(),
            pack_capacity: record.satchel.capacity,
            loadout: record.loadout.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomView {
    pub kind: RoomKind,
    pub built: bool,
    pub assigned: bool,
    pub workers: u32,
    pub capacity: u32,
    pub production: u32,
    pub power_usage: u32,
    pub extensions: u32,
    pub rushed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionView {
    pub person: String,
    pub state: ScavengeState,
    pub length: ExpeditionLength,
    pub elapsed_ms: u64,
    pub progress: f32,
    pub return_progress: f32,
    pub days_out: u32,
    pub log: Vec<LogEntry>,
}

/// Everything a display needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub people: Vec<PersonView>,
    pub rooms: Vec<RoomView>,
    pub resources: ColonyResources,
    pub inventory: Vec<(Resource, u32)>,
    pub missions: Vec<MissionView>,
    pub pending_wanderer: Option<WandererCandidate>,
    pub journal: Vec<LogEntry>,
}

impl GameState {
    pub fn capture(colony: &Colony) -> Self {
        let records = colony.colonists.records();
        let people = records.iter().map(PersonView::from).collect();
        let missions = records
            .iter()
            .filter_map(|record| {
                let expedition = record.expedition.as_ref()?;
                Some(MissionView {
                    person: record.identity.name.clone(),
                    state: expedition.state(),
                    length: expedition.length,
                    elapsed_ms: expedition.elapsed_ms,
                    progress: expedition.progress,
                    return_progress: expedition.return_progress,
                    days_out: expedition.days_out,
                    log: expedition.log.clone(),
                })
            })
            .collect();
        let rooms = colony
            .rooms
            .iter()
            .map(|room| RoomView {
                kind: room.kind,
                built: room.built,
                assigned: colony.room_assigned(room.kind),
                workers: colony.colonists.assigned_count(room.kind) as u32,
                capacity: room.capacity(),
                production: room.production(),
                power_usage: room.power_usage(),
                extensions: room.extensions,
                rushed: room.rushed,
            })
            .collect();

        Self {
            people,
            rooms,
            resources: colony.resources.clone(),
            inventory: colony.inventory.iter().collect(),
            missions,
            pending_wanderer: colony.pending_wanderer.clone(),
            journal: colony.journal.iter().cloned().collect(),
        }
    }

    pub fn person(&self, name: &str) -> Option<&PersonView> {
        self.people.iter().find(|p| p.name == name)
    }

    pub fn room(&self, kind: RoomKind) -> Option<&RoomView> {
        self.rooms.iter().find(|r| r.kind == kind)
    }

    pub fn quantity(&self, resource: Resource) -> u32 {
        self.inventory
            .iter()
            .find(|(r, _)| *r == resource)
            .map_or(0, |(_, qty)| *qty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColonyConfig;
    use crate::generation::generate_colony;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_capture_fresh_colony() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut colony = generate_colony(&ColonyConfig::default(), 0, 120_000, &mut rng);
        let cole = colony.colonists.find("Cole").expect("founder");
        colony
            .colonists
            .world_mut()
            .insert_one(cole, AssignedTo(RoomKind::Kitchen))
            .expect("assign");

        let state = GameState::capture(&colony);

        assert_eq!(state.people.len(), 3);
        assert_eq!(state.rooms.len(), RoomKind::ALL.len());
        assert!(state.missions.is_empty());
        assert_eq!(state.quantity(Resource::Steel), 5);

        let kitchen = state.room(RoomKind::Kitchen).expect("kitchen");
        assert!(kitchen.assigned);
        assert_eq!(kitchen.workers, 1);
        assert!(!state.room(RoomKind::Water).expect("water").assigned);
        assert_eq!(
            state.person("Cole").and_then(|p| p.assigned_room),
            Some(RoomKind::Kitchen)
        );
    }

    #[test]
    fn test_state_serializes() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let colony = generate_colony(&ColonyConfig::default(), 0, 120_000, &mut rng);
        let json = serde_json::to_string(&GameState::capture(&colony)).expect("json");
        assert!(json.contains("Thompson"));
    }
}
