//! Save/Load functionality for persisting colony state
//!
//! Colonists are flattened into [`ColonistRecord`]s and respawned on load.
//! The document carries no version number; anything that fails to decode is
//! treated as "no saved game".

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::colony::{ColonistRecord, Colony, ColonyResources};
use crate::components::*;
use crate::error::PersistenceError;

/// Scheduler timestamps, saved so a resumed game keeps its rhythm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockState {
    pub last_tick: u64,
    pub day_start: u64,
    pub saved_at: u64,
}

impl ClockState {
    /// Every cadence starting at `now`
    pub fn at(now: u64) -> Self {
        Self {
            last_tick: now,
            day_start: now,
            saved_at: now,
        }
    }
}

/// Serializable snapshot of the whole colony
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonySnapshot {
    pub colonists: Vec<ColonistRecord>,
    pub rooms: Vec<Room>,
    pub inventory: Vec<(Resource, u32)>,
    pub resources: ColonyResources,
    pub arrivals: ArrivalWindow,
    pub pending_wanderer: Option<WandererCandidate>,
    pub journal: Vec<LogEntry>,
    pub clocks: ClockState,
}

impl ColonySnapshot {
    pub fn capture(colony: &Colony, clocks: ClockState) -> Self {
        Self {
            colonists: colony.colonists.records(),
            rooms: colony.rooms.iter().cloned().collect(),
            inventory: colony.inventory.iter().collect(),
            resources: colony.resources.clone(),
            arrivals: colony.arrivals.clone(),
            pending_wanderer: colony.pending_wanderer.clone(),
            journal: colony.journal.iter().cloned().collect(),
            clocks,
        }
    }

    /// Rebuild a live colony from the snapshot
    pub fn restore(self) -> Colony {
        let mut colony = Colony::new(
            RoomRegistry::from_rooms(self.rooms),
            self.inventory.into_iter().collect(),
            self.resources,
        );
        for record in self.colonists {
            colony.colonists.spawn(record);
        }
        colony.arrivals = self.arrivals;
        colony.pending_wanderer = self.pending_wanderer;
        colony.journal = VecDeque::from(self.journal);
        colony
    }
}

/// Wire format of a stored snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotCodec {
    #[default]
    Json,
    Bincode,
}

impl SnapshotCodec {
    pub fn encode(&self, snapshot: &ColonySnapshot) -> Result<Vec<u8>, PersistenceError> {
        Ok(match self {
            SnapshotCodec::Json => serde_json::to_vec(snapshot)?,
            SnapshotCodec::Bincode => bincode::serialize(snapshot)?,
        })
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<ColonySnapshot, PersistenceError> {
        Ok(match self {
            SnapshotCodec::Json => serde_json::from_slice(bytes)?,
            SnapshotCodec::Bincode => bincode::deserialize(bytes)?,
        })
    }
}

/// Where snapshots are kept between runs
pub trait SnapshotStore {
    /// The saved game, or `None` when there is none or it cannot be read
    fn load(&self) -> Option<ColonySnapshot>;

    fn save(&self, snapshot: &ColonySnapshot) -> Result<(), PersistenceError>;
}

/// One snapshot per file, overwritten on every save
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    codec: SnapshotCodec,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, codec: SnapshotCodec) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read(&self) -> Result<ColonySnapshot, PersistenceError> {
        let bytes = fs::read(&self.path)?;
        self.codec.decode(&bytes)
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Option<ColonySnapshot> {
        if !self.path.exists() {
            return None;
        }
        match self.read() {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                log::warn!("ignoring unreadable save {}: {}", self.path.display(), err);
                None
            }
        }
    }

    fn save(&self, snapshot: &ColonySnapshot) -> Result<(), PersistenceError> {
        let bytes = self.codec.encode(snapshot)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("saved colony to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the encoded snapshot in memory. Used by tests and the harness.
#[derive(Debug, Default)]
pub struct MemoryStore {
    codec: SnapshotCodec,
    bytes: RefCell<Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new(codec: SnapshotCodec) -> Self {
        Self {
            codec,
            bytes: RefCell::new(None),
        }
    }

    /// Replace the stored document with raw bytes
    pub fn put_raw(&self, bytes: Vec<u8>) {
        *self.bytes.borrow_mut() = Some(bytes);
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.borrow().is_none()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Option<ColonySnapshot> {
        let bytes = self.bytes.borrow();
        let decoded = self.codec.decode(bytes.as_deref()?);
        match decoded {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                log::warn!("ignoring malformed in-memory save: {}", err);
                None
            }
        }
    }

    fn save(&self, snapshot: &ColonySnapshot) -> Result<(), PersistenceError> {
        let bytes = self.codec.encode(snapshot)?;
        self.put_raw(bytes);
        Ok(())
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for std::rc::Rc<S> {
    fn load(&self) -> Option<ColonySnapshot> {
        (**self).load()
    }

    fn save(&self, snapshot: &ColonySnapshot) -> Result<(), PersistenceError> {
        (**self).save(snapshot)
    }
}
