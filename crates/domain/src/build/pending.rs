//! Pending choices derived from the selected content definitions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::common::normalize_key;
use crate::entities::ContentGrants;
use crate::value_objects::{ChoiceCategory, ChoiceOption, ContentKey, PlayersChoice};

/// Which selection contributed a pending choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChoiceSource {
    Race,
    Subrace,
    Class,
    Subclass,
    Background,
}

impl ChoiceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Race => "race",
            Self::Subrace => "subrace",
            Self::Class => "class",
            Self::Subclass => "subclass",
            Self::Background => "background",
        }
    }
}

impl fmt::Display for ChoiceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grants of one resolved selection, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContribution {
    pub source: ChoiceSource,
    pub key: ContentKey,
    pub grants: ContentGrants,
}

impl SourceContribution {
    pub fn new(source: ChoiceSource, key: ContentKey, grants: ContentGrants) -> Self {
        Self {
            source,
            key,
            grants,
        }
    }
}

/// One unresolved "choose N of M" decision and what the player picked so far.
///
/// # Invariants
///
/// - `chosen.len() <= max_selectable`; attempts past the cap are refused
/// - option keys in `chosen` are unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingChoice {
    id: String,
    source: ChoiceSource,
    players_choice: PlayersChoice,
    chosen: Vec<ChoiceOption>,
    max_selectable: u8,
    /// Key of a drilled-down pick -> key of the offered option it resolved
    #[serde(default)]
    origins: BTreeMap<String, String>,
}

impl PendingChoice {
    pub fn new(
        source: ChoiceSource,
        content_key: &ContentKey,
        index: usize,
        players_choice: PlayersChoice,
    ) -> Self {
        let max_selectable = players_choice.choose();
        Self {
            id: Self::choice_id(source, content_key, index),
            source,
            players_choice,
            chosen: Vec::new(),
            max_selectable,
            origins: BTreeMap::new(),
        }
    }

    /// `"{source}:{content_key}:{index}"`, stable across rebuilds.
    pub fn choice_id(source: ChoiceSource, content_key: &ContentKey, index: usize) -> String {
        format!("{}:{}:{}", source, content_key, index)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> ChoiceSource {
        self.source
    }

    pub fn players_choice(&self) -> &PlayersChoice {
        &self.players_choice
    }

    pub fn category(&self) -> ChoiceCategory {
        self.players_choice.category()
    }

    pub fn chosen(&self) -> &[ChoiceOption] {
        &self.chosen
    }

    pub fn max_selectable(&self) -> u8 {
        self.max_selectable
    }

    pub fn holds(&self, key: &str) -> bool {
        self.chosen.iter().any(|o| o.matches_key(key))
    }

    /// Whether the offered option `key` is picked, directly or through a
    /// drilldown that resolved it.
    pub fn holds_offered(&self, key: &str) -> bool {
        self.holds(key) || self.origins.values().any(|origin| origin == key)
    }

    /// Offered option a drilled-down pick was resolved from.
    pub fn origin_of(&self, chosen_key: &str) -> Option<&str> {
        self.origins.get(chosen_key).map(String::as_str)
    }

    pub fn is_full(&self) -> bool {
        self.chosen.len() >= usize::from(self.max_selectable)
    }

    pub fn is_satisfied(&self) -> bool {
        self.chosen.len() == usize::from(self.players_choice.choose())
    }

    /// Add `option` unless the choice is full or already holds it.
    pub(crate) fn try_add(&mut self, option: ChoiceOption) -> bool {
        if self.is_full() || self.holds(&option.key()) {
            return false;
        }
        self.chosen.push(option);
        true
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<ChoiceOption> {
        let position = self.chosen.iter().position(|o| o.matches_key(key))?;
        let removed = self.chosen.remove(position);
        self.origins.remove(&removed.key());
        Some(removed)
    }

    /// Make `option` the only selection, returning what it displaced.
    pub(crate) fn replace_with(&mut self, option: ChoiceOption) -> Vec<ChoiceOption> {
        self.origins.clear();
        std::mem::replace(&mut self.chosen, vec![option])
    }

    /// Remember that the held pick `chosen_key` resolved the offered `origin_key`.
    pub(crate) fn record_origin(&mut self, chosen_key: String, origin_key: String) {
        if chosen_key != origin_key && self.holds(&chosen_key) {
            self.origins.insert(chosen_key, origin_key);
        }
    }

    /// Whether `option` (or what it was resolved from) is still on offer.
    fn still_offered(&self, option: &ChoiceOption, choice: &PlayersChoice) -> bool {
        let key = option.key();
        choice.option(&key).is_some()
            || self
                .origin_of(&key)
                .is_some_and(|origin| choice.option(origin).is_some())
    }
}

/// Derive pending choices from `contributions`, carrying over picks for ids
/// present in `previous` that the choice still offers, up to its cap.
pub fn derive_pending_choices(
    contributions: &[SourceContribution],
    previous: &[PendingChoice],
) -> Vec<PendingChoice> {
    contributions
        .iter()
        .flat_map(|contribution| {
            contribution
                .grants
                .player_choices
                .iter()
                .enumerate()
                .map(move |(index, choice)| {
                    let mut pending = PendingChoice::new(
                        contribution.source,
                        &contribution.key,
                        index,
                        choice.clone(),
                    );
                    if let Some(prior) = previous.iter().find(|p| p.id == pending.id) {
                        pending.chosen = prior
                            .chosen
                            .iter()
                            .filter(|option| prior.still_offered(option, choice))
                            .take(usize::from(choice.choose()))
                            .cloned()
                            .collect();
                        pending.origins = prior
                            .origins
                            .iter()
                            .filter(|(chosen_key, _)| pending.holds(chosen_key))
                            .map(|(chosen_key, origin)| (chosen_key.clone(), origin.clone()))
                            .collect();
                    }
                    pending
                })
        })
        .collect()
}

/// Skills, tools and languages granted outright by the selected definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownGrants {
    languages: BTreeSet<String>,
    skills: BTreeSet<String>,
    tools: BTreeSet<String>,
}

impl KnownGrants {
    pub fn collect(contributions: &[SourceContribution]) -> Self {
        let mut known = Self::default();
        for contribution in contributions {
            let grants = &contribution.grants;
            known
                .languages
                .extend(grants.languages.iter().map(|l| normalize_key(l)));
            known.skills.extend(grants.skills.iter().map(|s| normalize_key(s)));
            known.tools.extend(grants.tools.iter().map(|t| normalize_key(t)));
        }
        known
    }

    /// Known set filtering `category`, if that category filters at all.
    pub fn for_category(&self, category: ChoiceCategory) -> Option<&BTreeSet<String>> {
        match category {
            ChoiceCategory::Language => Some(&self.languages),
            ChoiceCategory::Skill => Some(&self.skills),
            ChoiceCategory::Tool => Some(&self.tools),
            ChoiceCategory::Equipment | ChoiceCategory::Spell | ChoiceCategory::Extra => None,
        }
    }

    pub fn is_known(&self, category: ChoiceCategory, key: &str) -> bool {
        self.for_category(category)
            .is_some_and(|known| known.contains(&normalize_key(key)))
    }
}
