//! Arrival process state: the wanderer window and the pending candidate

use serde::{Deserialize, Serialize};

use super::people::{Attributes, Identity};

/// Colony-wide wanderer timing.
///
/// Cooldown until `cooldown_until`, then a window of trials that closes at
/// `window_end`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalWindow {
    pub cooldown_until: u64,
    pub window_open: bool,
    pub window_start: Option<u64>,
    pub window_end: Option<u64>,
    pub last_check: Option<u64>,
    /// First moment births became possible, or the last birth
    pub last_birth: Option<u64>,
}

impl ArrivalWindow {
    pub fn new(now: u64, min_delay_ms: u64) -> Self {
        Self {
            cooldown_until: now + min_delay_ms,
            ..Self::default()
        }
    }

    /// Close the window and start a fresh cooldown
    pub fn reset(&mut self, now: u64, min_delay_ms: u64) {
        self.cooldown_until = now + min_delay_ms;
        self.window_open = false;
        self.window_start = None;
        self.window_end = None;
    }

    pub fn open(&mut self, now: u64, span_ms: u64) {
        self.window_open = true;
        self.window_start = Some(now);
        self.window_end = Some(now + span_ms);
    }
}

/// A stranger at the door, waiting to be let in or turned away
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WandererCandidate {
    pub identity: Identity,
    pub attributes: Attributes,
    pub appeared_at: u64,
}
