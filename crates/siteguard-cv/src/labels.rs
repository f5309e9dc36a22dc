//! Canonical equipment items vs. the equipment model's class table.
//!
//! The engine only ever sees canonical `EquipmentItem`s, but a deployed
//! model engine file carries its own class-name table and numeric ids.
//! `LabelMap` resolves between the two, with a positional fallback when
//! the exported names don't line up with the canonical vocabulary.

use siteguard_core::EquipmentItem;
use std::collections::HashMap;

/// Lookup between canonical items and model-native class ids.
#[derive(Debug, Clone)]
pub struct LabelMap {
    ids: HashMap<EquipmentItem, usize>,
    /// True when the model's names resolved; false after positional fallback
    resolved_by_name: bool,
}

impl LabelMap {
    /// Build from the model's class-name table.
    ///
    /// Names that parse as canonical items are mapped to their index. If
    /// that doesn't cover the whole vocabulary, the map falls back to
    /// index order 0..5 over the canonical items, matching how the
    /// original engines were exported.
    pub fn from_class_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut ids = HashMap::new();
        for (idx, name) in names.iter().enumerate() {
            if let Ok(item) = name.as_ref().parse::<EquipmentItem>() {
                ids.entry(item).or_insert(idx);
            }
        }

        let resolved_by_name = ids.len() == EquipmentItem::ALL.len();
        if !resolved_by_name {
            log::warn!(
                "could not map all equipment class names ({} of {}); falling back to index order 0..{}",
                ids.len(),
                EquipmentItem::ALL.len(),
                EquipmentItem::ALL.len() - 1
            );
            ids = EquipmentItem::ALL
                .into_iter()
                .enumerate()
                .map(|(idx, item)| (item, idx))
                .collect();
        }

        Self {
            ids,
            resolved_by_name,
        }
    }

    /// Model class id for a canonical item
    pub fn class_id(&self, item: EquipmentItem) -> Option<usize> {
        self.ids.get(&item).copied()
    }

    /// Canonical item for a model class id; None for classes outside the
    /// equipment vocabulary
    pub fn item_for_id(&self, class_id: usize) -> Option<EquipmentItem> {
        self.ids
            .iter()
            .find(|&(_, &idx)| idx == class_id)
            .map(|(&item, _)| item)
    }

    /// Whether the model's exported names covered the vocabulary
    pub fn resolved_by_name(&self) -> bool {
        self.resolved_by_name
    }
}
