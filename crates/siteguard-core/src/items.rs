//! The protective-equipment vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One item of required protective equipment.
///
/// The variants are ordered canonically; `missing` lists in emitted events
/// follow this order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentItem {
    Boots,
    Gloves,
    Goggles,
    Helmet,
    Mask,
    Vest,
}

impl EquipmentItem {
    /// Every known item, in canonical order
    pub const ALL: [EquipmentItem; 6] = [
        EquipmentItem::Boots,
        EquipmentItem::Gloves,
        EquipmentItem::Goggles,
        EquipmentItem::Helmet,
        EquipmentItem::Mask,
        EquipmentItem::Vest,
    ];

    /// Canonical lowercase name, matching detector class labels
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentItem::Boots => "boots",
            EquipmentItem::Gloves => "gloves",
            EquipmentItem::Goggles => "goggles",
            EquipmentItem::Helmet => "helmet",
            EquipmentItem::Mask => "mask",
            EquipmentItem::Vest => "vest",
        }
    }

    /// Wire code reported to the violations backend
    pub fn violation_code(&self) -> &'static str {
        match self {
            EquipmentItem::Boots => "no_boots",
            EquipmentItem::Gloves => "no_gloves",
            EquipmentItem::Goggles => "no_goggles",
            EquipmentItem::Helmet => "no_helmet",
            EquipmentItem::Mask => "no_mask",
            EquipmentItem::Vest => "no_vest",
        }
    }
}

impl fmt::Display for EquipmentItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentItem {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boots" => Ok(EquipmentItem::Boots),
            "gloves" => Ok(EquipmentItem::Gloves),
            "goggles" => Ok(EquipmentItem::Goggles),
            "helmet" => Ok(EquipmentItem::Helmet),
            "mask" => Ok(EquipmentItem::Mask),
            "vest" => Ok(EquipmentItem::Vest),
            other => Err(anyhow::anyhow!("unknown equipment item: '{}'", other)),
        }
    }
}
