//! Time-based decay of alarms and clears.

use serde::{Deserialize, Serialize};

/// Window over which a clear report fades back to neutral.
pub const CLEAR_FADE_SECS: i64 = 10 * 60;

/// Upper bounds (exclusive, in seconds) of the alarm tiers, most urgent first.
pub const ALARM_TIER_THRESHOLDS: [(i64, AlarmTier); 5] = [
    (4 * 60, AlarmTier::Critical),
    (10 * 60, AlarmTier::High),
    (15 * 60, AlarmTier::Elevated),
    (25 * 60, AlarmTier::Low),
    (24 * 60 * 60, AlarmTier::Residual),
];

/// Presentation urgency of an active alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlarmTier {
    /// Under 4 minutes old.
    Critical,
    /// Under 10 minutes.
    High,
    /// Under 15 minutes.
    Elevated,
    /// Under 25 minutes.
    Low,
    /// Under a day.
    Residual,
    /// A day or older.
    Expired,
}

impl AlarmTier {
    /// Tier for an alarm that is `elapsed_secs` old.
    pub fn for_elapsed(elapsed_secs: i64) -> Self {
        ALARM_TIER_THRESHOLDS
            .iter()
            .find(|(max, _)| elapsed_secs < *max)
            .map(|(_, tier)| *tier)
            .unwrap_or(AlarmTier::Expired)
    }
}

/// Intensity of a clear report that is `elapsed_secs` old, in `[0, 1]`.
pub fn clear_intensity(elapsed_secs: i64) -> f32 {
    let remaining = 1.0 - elapsed_secs as f32 / CLEAR_FADE_SECS as f32;
    remaining.clamp(0.0, 1.0)
}
