//! Engine configuration.

use crate::items::EquipmentItem;
use serde::{Deserialize, Serialize};

/// Tuning knobs for the compliance engine.
///
/// All durations are monotonic seconds, matching the timestamps passed into
/// the per-frame calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum overlap for a detection to join an existing track
    pub association_overlap: f64,
    /// Tracks unseen for longer than this are evicted
    pub track_timeout_secs: f64,
    /// Age bound of the per-track vote history
    pub vote_window_secs: f64,
    /// Windowed miss ratio at which a track enters Violating
    pub enter_ratio: f64,
    /// Windowed miss ratio at or below which a track leaves Violating
    pub exit_ratio: f64,
    /// Per-track re-arm interval between emitted events
    pub event_cooldown_secs: f64,
    /// System-wide silence after any violation
    pub global_silence_secs: f64,
    /// Items a person must carry to be compliant
    pub required_items: Vec<EquipmentItem>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            association_overlap: 0.3,
            track_timeout_secs: 2.0,
            vote_window_secs: 1.5,
            enter_ratio: 0.70,
            exit_ratio: 0.40,
            event_cooldown_secs: 3.0,
            global_silence_secs: 10.0,
            required_items: EquipmentItem::ALL.to_vec(),
        }
    }
}
