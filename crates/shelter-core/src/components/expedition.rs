//! Expedition components: the per-colonist mission and its narrative log

use serde::{Deserialize, Serialize};

/// How long a colonist intends to stay out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpeditionLength {
    /// Stays out until called back
    Indefinite,
    /// Comes home on their own after this many expedition days
    Fixed(u32),
}

impl ExpeditionLength {
    /// `0` days means "until recalled"
    pub fn from_days(days: u32) -> Self {
        if days == 0 {
            ExpeditionLength::Indefinite
        } else {
            ExpeditionLength::Fixed(days)
        }
    }

    pub fn target_ms(&self, day_ms: u64) -> Option<u64> {
        match self {
            ExpeditionLength::Indefinite => None,
            ExpeditionLength::Fixed(days) => Some(*days as u64 * day_ms),
        }
    }
}

/// Where a colonist is in the expedition lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScavengeState {
    Idle,
    Scavenging,
    Returning,
}

impl ScavengeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScavengeState::Idle => "idle",
            ScavengeState::Scavenging => "scavenging",
            ScavengeState::Returning => "returning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogKind {
    Narrative,
    Quiet,
    Location,
    Transition,
    Search,
    Combat,
    Radiation,
    Loot,
    Wound,
    Medical,
    Danger,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: u64,
    pub message: String,
    pub kind: LogKind,
}

/// A building being explored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    /// Events to play out before leaving
    pub duration: u32,
}

/// Repetition guards and location bookkeeping for the narrative generator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeState {
    pub has_intro: bool,
    pub location: Option<Site>,
    pub location_ticks: u32,
    pub inside: bool,
    pub last_kind: Option<LogKind>,
    pub last_entry_at: u64,
    pub consecutive_quiet: u32,
}

/// Component present on a colonist for as long as they are away.
///
/// Created by the begin-expedition action and removed on completion or death,
/// so a colonist without one is idle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expedition {
    pub started_at: u64,
    pub length: ExpeditionLength,
    /// Time out so far; frozen once the return leg starts
    pub elapsed_ms: u64,
    pub progress: f32,
    pub returning: bool,
    pub return_started_at: Option<u64>,
    pub return_duration_ms: Option<u64>,
    pub return_progress: f32,
    pub last_roll_at: Option<u64>,
    /// Day rollovers survived while out
    pub days_out: u32,
    pub log: Vec<LogEntry>,
    pub narrative: NarrativeState,
}

impl Expedition {
    pub fn new(started_at: u64, length: ExpeditionLength) -> Self {
        Self {
            started_at,
            length,
            elapsed_ms: 0,
            progress: 0.0,
            returning: false,
            return_started_at: None,
            return_duration_ms: None,
            return_progress: 0.0,
            last_roll_at: None,
            days_out: 0,
            log: Vec::new(),
            narrative: NarrativeState::default(),
        }
    }

    pub fn state(&self) -> ScavengeState {
        if self.returning {
            ScavengeState::Returning
        } else {
            ScavengeState::Scavenging
        }
    }

    pub fn push_log(&mut self, timestamp: u64, message: impl Into<String>, kind: LogKind) {
        self.log.push(LogEntry {
            timestamp,
            message: message.into(),
            kind,
        });
    }
}

/// Idle when there is no expedition component
pub fn scavenge_state(expedition: Option<&Expedition>) -> ScavengeState {
    expedition
        .map(Expedition::state)
        .unwrap_or(ScavengeState::Idle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_days_is_indefinite() {
        assert_eq!(ExpeditionLength::from_days(0), ExpeditionLength::Indefinite);
        assert_eq!(ExpeditionLength::from_days(3), ExpeditionLength::Fixed(3));
        assert_eq!(ExpeditionLength::Fixed(2).target_ms(1_000), Some(2_000));
        assert_eq!(ExpeditionLength::Indefinite.target_ms(1_000), None);
    }

    #[test]
    fn test_state_follows_return_flag() {
        let mut expedition = Expedition::new(0, ExpeditionLength::Indefinite);
        assert_eq!(scavenge_state(Some(&expedition)), ScavengeState::Scavenging);
        expedition.returning = true;
        assert_eq!(scavenge_state(Some(&expedition)), ScavengeState::Returning);
        assert_eq!(scavenge_state(None), ScavengeState::Idle);
    }
}
