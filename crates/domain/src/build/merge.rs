//! Choice merger: combines same-category pending choices into the
//! player-facing decision groups.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::build::{KnownGrants, PendingChoice};
use crate::value_objects::{ChoiceCategory, ChoiceOption};

/// One option of a merged choice and which constituent holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSelection {
    pub key: String,
    pub label: String,
    pub option: ChoiceOption,
    /// Id of the constituent pending choice holding this option, if any
    pub held_by: Option<String>,
}

impl OptionSelection {
    pub fn is_selected(&self) -> bool {
        self.held_by.is_some()
    }
}

/// Player-facing combination of pending choices. Built fresh on every render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedChoice {
    pub category: ChoiceCategory,
    pub constituent_ids: Vec<String>,
    /// Sum of the constituents' caps
    pub choose: u8,
    /// Ordered union of offered options minus the already-known ones
    pub options: Vec<OptionSelection>,
    /// Everything currently picked across constituents, in constituent order
    pub chosen: Vec<ChoiceOption>,
    /// Per constituent, keys held by a different constituent (skills only)
    pub selected_elsewhere: BTreeMap<String, Vec<String>>,
}

impl MergedChoice {
    pub fn chosen_count(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_satisfied(&self) -> bool {
        self.chosen.len() == usize::from(self.choose)
    }

    pub fn option(&self, key: &str) -> Option<&OptionSelection> {
        self.options.iter().find(|o| o.option.matches_key(key))
    }

    pub fn selected_elsewhere_for(&self, choice_id: &str) -> &[String] {
        self.selected_elsewhere
            .get(choice_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Merge `pending` into groups ordered by category.
///
/// Equipment choices stay one group per pending choice with their options
/// untouched; every other category collapses into a single group.
pub fn merge_choices(pending: &[PendingChoice], known: &KnownGrants) -> Vec<MergedChoice> {
    let mut merged = Vec::new();

    for category in ChoiceCategory::ALL {
        let group: Vec<&PendingChoice> =
            pending.iter().filter(|p| p.category() == category).collect();
        if group.is_empty() {
            continue;
        }

        if category == ChoiceCategory::Equipment {
            merged.extend(group.into_iter().map(|p| merge_group(category, &[p], known)));
        } else {
            merged.push(merge_group(category, &group, known));
        }
    }

    merged
}

fn merge_group(
    category: ChoiceCategory,
    group: &[&PendingChoice],
    known: &KnownGrants,
) -> MergedChoice {
    let mut seen = HashSet::new();
    let mut options = Vec::new();

    for pending in group {
        for option in pending.players_choice().options() {
            let key = option.key();
            if known.is_known(category, &key) || !seen.insert(key.clone()) {
                continue;
            }
            let held_by = group
                .iter()
                .find(|p| p.holds_offered(&key))
                .map(|p| p.id().to_string());
            options.push(OptionSelection {
                label: option.label(),
                key,
                option: option.clone(),
                held_by,
            });
        }
    }

    let selected_elsewhere = if category == ChoiceCategory::Skill {
        group
            .iter()
            .map(|pending| {
                let elsewhere = group
                    .iter()
                    .filter(|other| other.id() != pending.id())
                    .flat_map(|other| other.chosen().iter().map(ChoiceOption::key))
                    .collect();
                (pending.id().to_string(), elsewhere)
            })
            .collect()
    } else {
        BTreeMap::new()
    };

    MergedChoice {
        category,
        constituent_ids: group.iter().map(|p| p.id().to_string()).collect(),
        choose: group
            .iter()
            .fold(0u8, |total, p| total.saturating_add(p.max_selectable())),
        options,
        chosen: group.iter().flat_map(|p| p.chosen().iter().cloned()).collect(),
        selected_elsewhere,
    }
}
