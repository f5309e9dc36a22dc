//! Siteguard Detector Adapters
//!
//! Boundary layer between the detection models and the decision engine:
//! detector-output sanitation, canonical label mapping, person crops and
//! evidence-frame rendering. The engine itself never touches pixels or
//! model-native class ids; everything here exists to hand it clean boxes
//! and canonical equipment items.

pub mod evidence;
pub mod labels;
pub mod sanitize;

// Re-export commonly used types
pub use evidence::EvidenceWriter;
pub use labels::LabelMap;

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Capability traits for the model collaborators
pub mod traits {
    use image::RgbImage;
    use siteguard_core::{BoundingBox, EquipmentItem};
    use std::collections::HashSet;

    /// Stage-A collaborator: person boxes out of a full frame.
    pub trait PersonDetector {
        fn detect_persons(&mut self, frame: &RgbImage) -> crate::Result<Vec<BoundingBox>>;
    }

    /// Stage-B collaborator: present equipment out of a person crop.
    pub trait EquipmentScanner {
        fn present_items(&mut self, crop: &RgbImage) -> crate::Result<HashSet<EquipmentItem>>;
    }
}
