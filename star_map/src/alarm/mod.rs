//! Alarm state machine for a single location.
//!
//! A location moves between four persisted states:
//! 1. **Unknown**: Nothing has been reported (initial state)
//! 2. **Alarm**: Hostiles were reported, the alarm clock starts
//! 3. **Clear**: The location was reported clear, the clock restarts
//! 4. **WasAlarmed**: An aged alarm, the clock keeps running
//!
//! `Request` and `NoChange` updates are accepted but leave the state alone.
//! Presentation (tiers, clear intensity) is derived on demand in [`decay`].

mod decay;

pub use decay::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted alarm state of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AlarmState {
    #[default]
    Unknown,
    Alarm,
    Clear,
    WasAlarmed,
}

/// An update requested for a location's alarm state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusUpdate {
    Alarm,
    Clear,
    WasAlarmed,
    Unknown,
    /// Someone asked for the status; nothing is persisted.
    Request,
    NoChange,
}

/// Alarm state plus the time the alarm clock was last started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AlarmStatus {
    state: AlarmState,
    last_alarm: Option<DateTime<Utc>>,
}

impl AlarmStatus {
    /// Create a fresh status in the `Unknown` state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    /// When the alarm (or clear) clock was last started.
    pub fn last_alarm(&self) -> Option<DateTime<Utc>> {
        self.last_alarm
    }

    /// Apply an update. Every input maps to a defined transition.
    ///
    /// Returns `true` if the persisted state or timestamp changed.
    pub fn apply(&mut self, update: StatusUpdate, now: DateTime<Utc>) -> bool {
        let before = *self;
        match update {
            StatusUpdate::Alarm => {
                self.state = AlarmState::Alarm;
                self.last_alarm = Some(now);
            }
            StatusUpdate::Clear => {
                self.state = AlarmState::Clear;
                self.last_alarm = Some(now);
            }
            StatusUpdate::WasAlarmed => self.state = AlarmState::WasAlarmed,
            StatusUpdate::Unknown => self.state = AlarmState::Unknown,
            StatusUpdate::Request | StatusUpdate::NoChange => {}
        }
        *self != before
    }

    /// Seconds since the clock was last started, clamped at zero.
    ///
    /// Only meaningful while the state is not `Unknown`.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> Option<i64> {
        if self.state == AlarmState::Unknown {
            return None;
        }
        self.last_alarm
            .map(|started| (now - started).num_seconds().max(0))
    }

    /// Derive the presentation view for `now`. Pure; safe at any tick cadence.
    pub fn view(&self, now: DateTime<Utc>) -> AlarmView {
        let elapsed_secs = self.elapsed_secs(now);
        AlarmView {
            state: self.state,
            elapsed_secs,
            tier: match (self.state, elapsed_secs) {
                (AlarmState::Alarm, Some(secs)) => Some(AlarmTier::for_elapsed(secs)),
                _ => None,
            },
            clear_intensity: match (self.state, elapsed_secs) {
                (AlarmState::Clear, Some(secs)) => Some(clear_intensity(secs)),
                _ => None,
            },
        }
    }
}

/// Snapshot of a location's alarm presentation at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlarmView {
    pub state: AlarmState,
    pub elapsed_secs: Option<i64>,
    /// Only set while the state is `Alarm`.
    pub tier: Option<AlarmTier>,
    /// Only set while the state is `Clear`. 1.0 is freshly cleared, 0.0 is neutral.
    pub clear_intensity: Option<f32>,
}
