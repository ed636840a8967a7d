//! Value objects - Immutable objects defined by their attributes

mod ability;
mod ability_scores;
mod content_key;
mod equipment;
mod players_choice;

pub use ability::Ability;
pub use ability_scores::{
    AbilityAllocator, AbilityScores, RacialBonusDistribution, DEFAULT_ABILITY_SCORE,
    MAX_ABILITY_SCORE, MIN_ABILITY_SCORE,
};
pub use content_key::ContentKey;
pub use equipment::EquipmentOption;
pub use players_choice::{ChoiceCategory, ChoiceKind, ChoiceOption, PlayersChoice};
