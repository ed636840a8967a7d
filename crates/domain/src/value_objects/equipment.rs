//! Equipment options offered by class and background starting gear.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One alternative in an equipment choice.
///
/// A `Tag` is a wildcard ("any martial weapon") resolved against the tag
/// registry when the player picks it. A `Bundle` containing a `Tag` part is
/// incomplete until that part is replaced by a concrete `Item`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EquipmentOption {
    Item { id: String, quantity: u32 },
    Tag { tag: String },
    Bundle { parts: Vec<EquipmentOption> },
}

impl EquipmentOption {
    /// A single copy of an item.
    pub fn item(id: impl Into<String>) -> Self {
        Self::Item {
            id: id.into(),
            quantity: 1,
        }
    }

    pub fn items(id: impl Into<String>, quantity: u32) -> Self {
        Self::Item {
            id: id.into(),
            quantity,
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag { tag: tag.into() }
    }

    pub fn bundle(parts: impl IntoIterator<Item = EquipmentOption>) -> Self {
        Self::Bundle {
            parts: parts.into_iter().collect(),
        }
    }

    /// Stable key used for selection bookkeeping.
    ///
    /// `item:dagger`, `item:javelinx4`, `tag:martial_weapons`,
    /// `bundle[item:shield+tag:martial_weapons]`.
    pub fn key(&self) -> String {
        match self {
            Self::Item { id, quantity } if *quantity == 1 => format!("item:{}", id),
            Self::Item { id, quantity } => format!("item:{}x{}", id, quantity),
            Self::Tag { tag } => format!("tag:{}", tag),
            Self::Bundle { parts } => {
                let inner: Vec<String> = parts.iter().map(EquipmentOption::key).collect();
                format!("bundle[{}]", inner.join("+"))
            }
        }
    }

    /// True when no wildcard remains anywhere in the option.
    pub fn is_concrete(&self) -> bool {
        match self {
            Self::Item { .. } => true,
            Self::Tag { .. } => false,
            Self::Bundle { parts } => parts.iter().all(EquipmentOption::is_concrete),
        }
    }

    /// Concrete `(item id, quantity)` pairs granted by this option, in order.
    pub fn granted_items(&self) -> Vec<(&str, u32)> {
        match self {
            Self::Item { id, quantity } => vec![(id.as_str(), *quantity)],
            Self::Tag { .. } => Vec::new(),
            Self::Bundle { parts } => parts.iter().flat_map(|p| p.granted_items()).collect(),
        }
    }
}

impl fmt::Display for EquipmentOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item { id, quantity } if *quantity == 1 => write!(f, "{}", id),
            Self::Item { id, quantity } => write!(f, "{} x{}", id, quantity),
            Self::Tag { tag } => write!(f, "any {}", tag),
            Self::Bundle { parts } => {
                let inner: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
                write!(f, "{}", inner.join(", "))
            }
        }
    }
}
