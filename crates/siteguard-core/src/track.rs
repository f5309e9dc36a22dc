//! Tracked persons, their windowed vote history and hysteresis transitions.

use crate::config::EngineConfig;
use crate::events::ViolationEvent;
use crate::geometry::BoundingBox;
use crate::items::EquipmentItem;
use serde::Serialize;
use std::collections::VecDeque;

/// Per-track compliance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceState {
    Compliant,
    Violating,
}

/// Time-bounded history of binary missing-equipment observations.
///
/// Entries are appended at the back and trimmed from the front, so a record
/// runs in amortized O(1). Entries aged `window_secs` or more relative to
/// the newest sample are evicted.
#[derive(Debug, Clone, Default)]
pub struct VoteWindow {
    entries: VecDeque<(f64, bool)>,
}

impl VoteWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one observation and trim everything that fell out of the window
    pub fn record(&mut self, now: f64, missing: bool, window_secs: f64) {
        self.entries.push_back((now, missing));
        while let Some(&(t, _)) = self.entries.front() {
            if now - t >= window_secs {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    /// Fraction of flagged entries in the window.
    ///
    /// An empty window reads as 0 (fully compliant), so a track never fires
    /// before its first sample and the division is always defined.
    pub fn ratio(&self) -> f64 {
        let flagged = self.entries.iter().filter(|&&(_, missing)| missing).count();
        flagged as f64 / self.entries.len().max(1) as f64
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One persistently observed person.
#[derive(Debug, Clone)]
pub struct Track {
    /// Unique id, monotonically assigned, never reused within a process
    pub id: u64,
    /// Last-matched bounding box
    pub bbox: BoundingBox,
    /// Timestamp of the last successful match
    pub last_seen: f64,
    /// Windowed missing-equipment votes
    pub votes: VoteWindow,
    pub state: ComplianceState,
    /// Set at each transition into Violating; unset until the first one
    pub last_event_time: Option<f64>,
}

impl Track {
    pub(crate) fn new(id: u64, bbox: BoundingBox, now: f64) -> Self {
        Self {
            id,
            bbox,
            last_seen: now,
            votes: VoteWindow::new(),
            state: ComplianceState::Compliant,
            last_event_time: None,
        }
    }

    /// Whether the per-track re-arm interval has elapsed since the last event
    pub fn rearmed(&self, now: f64, cooldown_secs: f64) -> bool {
        self.last_event_time
            .map_or(true, |t| now - t >= cooldown_secs)
    }

    /// Run one hysteresis step against the current window ratio.
    ///
    /// Returns the event for a Compliant -> Violating transition; the
    /// reverse transition is silent. Ratios inside the dead zone between
    /// `exit_ratio` and `enter_ratio` leave the state unchanged.
    pub fn evaluate(
        &mut self,
        now: f64,
        missing: Vec<EquipmentItem>,
        config: &EngineConfig,
    ) -> Option<ViolationEvent> {
        let ratio = self.votes.ratio();
        match self.state {
            ComplianceState::Compliant
                if ratio >= config.enter_ratio
                    && self.rearmed(now, config.event_cooldown_secs) =>
            {
                self.state = ComplianceState::Violating;
                self.last_event_time = Some(now);
                Some(ViolationEvent {
                    track_id: self.id,
                    missing,
                    bbox: self.bbox,
                    timestamp: now,
                })
            }
            ComplianceState::Violating if ratio <= config.exit_ratio => {
                self.state = ComplianceState::Compliant;
                None
            }
            _ => None,
        }
    }
}
