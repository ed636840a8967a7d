//! Build events and mutation outcomes
//!
//! `BuildEvent` is what the presentation layer sends for each player
//! interaction. The outcome enums communicate what happened when the build was
//! modified - including rejected attempts, which leave the build untouched.

use serde::{Deserialize, Serialize};

use crate::build::{DependentState, SelectionField};
use crate::value_objects::{
    Ability, ChoiceCategory, ContentKey, EquipmentOption, RacialBonusDistribution,
};

/// A single player interaction with an in-progress build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BuildEvent {
    SelectRace { key: Option<ContentKey> },
    SelectSubrace { key: Option<ContentKey> },
    SelectClass { key: Option<ContentKey> },
    SelectSubclass { key: Option<ContentKey> },
    SelectBackground { key: Option<ContentKey> },
    IncreaseAbility { ability: Ability },
    DecreaseAbility { ability: Ability },
    SetRacialBonusDistribution { distribution: Option<RacialBonusDistribution> },
    ToggleRacialBonus { ability: Ability, magnitude: Option<u8> },
    ToggleChoiceOption { choice_id: String, option: String },
    ToggleMergedOption { category: ChoiceCategory, option: String },
    SelectEquipmentOption { choice_id: String, option_index: usize },
    ResolveDrilldown { item_id: String },
    CancelDrilldown,
    ToggleCantrip { spell: String },
    ToggleSpell { spell: String },
    SetCharacterName { name: Option<String> },
    SetActiveCategory { category: Option<ChoiceCategory> },
}

/// Outcome of setting one of the upstream selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SelectionChange {
    /// New value equals the current one; nothing was cleared
    Unchanged { field: SelectionField },
    /// Value replaced and the listed dependent state cleared
    Changed {
        field: SelectionField,
        value: Option<ContentKey>,
        cleared: Vec<DependentState>,
    },
}

impl SelectionChange {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Outcome of toggling a racial bonus on an ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum RacialBonusOutcome {
    /// A magnitude from the pool was assigned
    Applied { ability: Ability, magnitude: u8 },
    /// The ability's bonus went back to the pool
    Cleared { ability: Ability, magnitude: u8 },
    /// No suitable magnitude is left in the pool
    Exhausted { ability: Ability },
    /// No distribution is active
    NoDistribution,
}

/// Why a choice toggle was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum ChoiceRejection {
    /// No pending choice with that id
    UnknownChoice,
    /// The choice does not offer that option
    NotOffered,
    /// Already granted outright by a selected definition
    AlreadyKnown,
    /// The choice already holds `choose` options
    AtCapacity,
    /// Held by a sibling choice in a category that does not move selections
    SelectedElsewhere { holder: String },
    /// A wildcard option must go through drilldown first
    NeedsDrilldown,
    /// An equipment operation was aimed at a non-equipment choice
    NotEquipment,
    /// No drilldown is open
    NoDrilldown,
}

/// Outcome of toggling an option on a pending choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ChoiceToggle {
    Added { choice_id: String, option: String },
    Removed { choice_id: String, option: String },
    /// A skill moved from a sibling choice into this one
    Moved {
        from: String,
        to: String,
        option: String,
    },
    Rejected { reason: ChoiceRejection },
}

impl ChoiceToggle {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Outcome of picking an equipment option or resolving a drilldown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EquipmentSelection {
    Chosen {
        choice_id: String,
        option: EquipmentOption,
    },
    Deselected {
        choice_id: String,
        option: EquipmentOption,
    },
    /// A wildcard needs a concrete item; `items` may be empty for an unknown tag
    Drilldown {
        choice_id: String,
        tag: String,
        items: Vec<String>,
    },
    Rejected { reason: ChoiceRejection },
}

/// Why a cantrip or spell toggle was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum SpellRejection {
    /// The spell key was blank
    Blank,
    /// No class selected, or the class key is not in the catalog
    NoClass,
    /// The class does not cast spells
    NoSpellcasting,
    /// Level-1 limit reached
    AtCapacity { limit: u8 },
}

/// Outcome of toggling a cantrip or spell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum SpellToggle {
    Added { spell: String },
    Removed { spell: String },
    Rejected { reason: SpellRejection },
}

/// Result of applying a [`BuildEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "camelCase")]
pub enum BuildEventOutcome {
    Selection(SelectionChange),
    Ability { ability: Ability, changed: bool },
    Distribution { changed: bool },
    RacialBonus(RacialBonusOutcome),
    Choice(ChoiceToggle),
    Equipment(EquipmentSelection),
    DrilldownCancelled { cancelled: bool },
    Spell(SpellToggle),
    Name { changed: bool },
    View { category: Option<ChoiceCategory> },
}

impl BuildEventOutcome {
    /// Whether the event modified the build (view-only changes count as modifications).
    pub fn changed(&self) -> bool {
        match self {
            Self::Selection(change) => change.is_changed(),
            Self::Ability { changed, .. }
            | Self::Distribution { changed }
            | Self::Name { changed } => *changed,
            Self::RacialBonus(outcome) => matches!(
                outcome,
                RacialBonusOutcome::Applied { .. } | RacialBonusOutcome::Cleared { .. }
            ),
            Self::Choice(toggle) => !toggle.is_rejected(),
            Self::Equipment(selection) => !matches!(selection, EquipmentSelection::Rejected { .. }),
            Self::DrilldownCancelled { cancelled } => *cancelled,
            Self::Spell(toggle) => !matches!(toggle, SpellToggle::Rejected { .. }),
            Self::View { .. } => true,
        }
    }
}
