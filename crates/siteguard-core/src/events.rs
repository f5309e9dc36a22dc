//! Violation event records and sink helpers.

use crate::geometry::BoundingBox;
use crate::items::EquipmentItem;
use crate::traits::EventSink;
use serde::Serialize;

/// Immutable record of one Compliant -> Violating transition.
#[derive(Debug, Clone, Serialize)]
pub struct ViolationEvent {
    pub track_id: u64,
    /// Items absent in the triggering observation, in required-list order
    pub missing: Vec<EquipmentItem>,
    /// The track's box at emission time
    pub bbox: BoundingBox,
    /// Monotonic engine time of the transition
    pub timestamp: f64,
}

impl ViolationEvent {
    /// Dash-joined missing-item names, "ok" when nothing was missing
    pub fn missing_tag(&self) -> String {
        if self.missing.is_empty() {
            "ok".to_string()
        } else {
            self.missing
                .iter()
                .map(|item| item.as_str())
                .collect::<Vec<_>>()
                .join("-")
        }
    }

    /// Backend wire codes for the missing items
    pub fn violation_codes(&self) -> Vec<&'static str> {
        self.missing.iter().map(|item| item.violation_code()).collect()
    }
}

/// Sink that keeps every event in memory, for tests and dry runs.
#[derive(Debug, Default)]
pub struct CollectSink {
    pub events: Vec<ViolationEvent>,
}

impl EventSink for CollectSink {
    fn emit(&mut self, event: &ViolationEvent) -> crate::Result<()> {
        self.events.push(event.clone());
        Ok(())
    }
}
