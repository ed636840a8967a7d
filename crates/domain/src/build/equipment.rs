//! Equipment resolver: wildcard tags, bundles and drilldown state.

use serde::{Deserialize, Serialize};

use crate::catalog::TagRegistry;
use crate::value_objects::{ChoiceCategory, EquipmentOption};

/// The tag of a TAG option, or of the first TAG part of a BUNDLE.
pub fn extract_tag(option: &EquipmentOption) -> Option<&str> {
    match option {
        EquipmentOption::Item { .. } => None,
        EquipmentOption::Tag { tag } => Some(tag.as_str()),
        EquipmentOption::Bundle { parts } => parts.iter().find_map(|part| match part {
            EquipmentOption::Tag { tag } => Some(tag.as_str()),
            _ => None,
        }),
    }
}

/// Concrete items for `tag`. An unregistered tag yields an empty list.
pub fn resolve_tag(registry: &dyn TagRegistry, tag: &str) -> Vec<String> {
    match registry.items_for(tag) {
        Some(items) => items,
        None => {
            tracing::warn!(tag = %tag, "Equipment tag is not registered, nothing to choose from");
            Vec::new()
        }
    }
}

/// Replace the first wildcard in `option` with a single `item_id`.
///
/// A bare TAG becomes the item; in a BUNDLE only the first TAG part is
/// replaced. Options without a wildcard come back unchanged.
pub fn replace_first_tag(option: &EquipmentOption, item_id: &str) -> EquipmentOption {
    match option {
        EquipmentOption::Tag { .. } => EquipmentOption::item(item_id),
        EquipmentOption::Item { .. } => option.clone(),
        EquipmentOption::Bundle { parts } => {
            let mut replaced = false;
            let parts = parts
                .iter()
                .map(|part| match part {
                    EquipmentOption::Tag { .. } if !replaced => {
                        replaced = true;
                        EquipmentOption::item(item_id)
                    }
                    other => other.clone(),
                })
                .collect::<Vec<_>>();
            EquipmentOption::Bundle { parts }
        }
    }
}

/// An open item pick for a wildcard equipment option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drilldown {
    pub choice_id: String,
    pub option_index: usize,
    /// The option being resolved; bundles keep their already-resolved parts
    pub option: EquipmentOption,
    pub tag: String,
    pub items: Vec<String>,
    /// View to restore once the drilldown closes
    pub return_category: Option<ChoiceCategory>,
}

impl Drilldown {
    pub fn offers(&self, item_id: &str) -> bool {
        self.items.iter().any(|item| item == item_id)
    }
}
