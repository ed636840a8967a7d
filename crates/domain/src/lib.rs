extern crate self as charbldr_domain;

pub mod aggregates;
pub mod build;
pub mod catalog;
pub mod common;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregates::BuildSession;

pub use build::{
    cleared_by, extract_tag, is_build_complete, merge_choices, replace_first_tag, resolve_tag,
    AbilitySummary, BuildSummary, ChoiceSource, CompletionIssue, DependentState, Drilldown,
    KnownGrants, MergedChoice, OptionSelection, PendingChoice, SelectionField,
    INVALIDATION_TABLE,
};

pub use catalog::{ContentCatalog, TagRegistry};

// Re-export content definitions (explicit list in entities/mod.rs)
pub use entities::{
    BackgroundDefinition, ClassDefinition, ContentGrants, RaceDefinition, SpellPreparation,
    SpellcastingInfo, SubclassDefinition, SubraceDefinition,
};

pub use error::DomainError;

pub use events::{
    BuildEvent, BuildEventOutcome, ChoiceRejection, ChoiceToggle, EquipmentSelection,
    RacialBonusOutcome, SelectionChange, SpellRejection, SpellToggle,
};

// Re-export ID types
pub use ids::{BuildSessionId, CharacterSheetId};

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{
    Ability, AbilityAllocator, AbilityScores, ChoiceCategory, ChoiceKind, ChoiceOption,
    ContentKey, EquipmentOption, PlayersChoice, RacialBonusDistribution, DEFAULT_ABILITY_SCORE,
    MAX_ABILITY_SCORE, MIN_ABILITY_SCORE,
};
