//! "Choose N of these" requirements declared by content definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::normalize_key;
use crate::error::DomainError;
use crate::value_objects::EquipmentOption;

/// What a content definition asks the player to choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChoiceKind {
    Language,
    Skill,
    Tool,
    Instrument,
    Equipment,
    Spell,
    Cantrip,
    Feat,
    Other,
}

impl ChoiceKind {
    /// The merge partition this kind of choice belongs to.
    pub fn category(&self) -> ChoiceCategory {
        match self {
            Self::Language => ChoiceCategory::Language,
            Self::Skill => ChoiceCategory::Skill,
            Self::Tool | Self::Instrument => ChoiceCategory::Tool,
            Self::Equipment => ChoiceCategory::Equipment,
            Self::Spell | Self::Cantrip => ChoiceCategory::Spell,
            Self::Feat | Self::Other => ChoiceCategory::Extra,
        }
    }
}

/// Partition key used when merging pending choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChoiceCategory {
    Language,
    Skill,
    Tool,
    Equipment,
    Spell,
    Extra,
}

impl ChoiceCategory {
    /// All categories in menu order.
    pub const ALL: [ChoiceCategory; 6] = [
        Self::Language,
        Self::Skill,
        Self::Tool,
        Self::Equipment,
        Self::Spell,
        Self::Extra,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Language => "LANGUAGE",
            Self::Skill => "SKILL",
            Self::Tool => "TOOL",
            Self::Equipment => "EQUIPMENT",
            Self::Spell => "SPELL",
            Self::Extra => "EXTRA",
        }
    }
}

impl fmt::Display for ChoiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChoiceCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LANGUAGE" | "LANGUAGES" => Ok(Self::Language),
            "SKILL" | "SKILLS" => Ok(Self::Skill),
            "TOOL" | "TOOLS" => Ok(Self::Tool),
            "EQUIPMENT" => Ok(Self::Equipment),
            "SPELL" | "SPELLS" => Ok(Self::Spell),
            "EXTRA" => Ok(Self::Extra),
            _ => Err(DomainError::parse(format!("Unknown choice category: {}", s))),
        }
    }
}

/// A single option in a [`PlayersChoice`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChoiceOption {
    /// A named grant such as a skill, language or tool
    Named(String),
    /// A starting-equipment alternative
    Equipment(EquipmentOption),
}

impl ChoiceOption {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Stable selection key. Named options use the normalized name.
    pub fn key(&self) -> String {
        match self {
            Self::Named(name) => normalize_key(name),
            Self::Equipment(option) => option.key(),
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Equipment(option) => option.to_string(),
        }
    }

    pub fn as_equipment(&self) -> Option<&EquipmentOption> {
        match self {
            Self::Equipment(option) => Some(option),
            Self::Named(_) => None,
        }
    }

    /// Named options are always concrete; equipment may still hold a wildcard.
    pub fn is_concrete(&self) -> bool {
        match self {
            Self::Named(_) => true,
            Self::Equipment(option) => option.is_concrete(),
        }
    }

    /// Whether `key` refers to this option, either exactly or after normalizing.
    pub fn matches_key(&self, key: &str) -> bool {
        let own = self.key();
        own == key || (matches!(self, Self::Named(_)) && own == normalize_key(key))
    }
}

/// An immutable "choose N of these options" requirement.
///
/// Deserialization goes through [`PlayersChoice::new`], so loaded content
/// obeys the same `choose > 0` rule as content built in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPlayersChoice")]
pub struct PlayersChoice {
    kind: ChoiceKind,
    choose: u8,
    options: Vec<ChoiceOption>,
}

/// Unchecked wire shape of a [`PlayersChoice`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlayersChoice {
    kind: ChoiceKind,
    choose: u8,
    #[serde(default)]
    options: Vec<ChoiceOption>,
}

impl TryFrom<RawPlayersChoice> for PlayersChoice {
    type Error = DomainError;

    fn try_from(raw: RawPlayersChoice) -> Result<Self, Self::Error> {
        Self::new(raw.kind, raw.choose, raw.options)
    }
}

impl PlayersChoice {
    /// Create a choice. `choose` must be positive.
    pub fn new(
        kind: ChoiceKind,
        choose: u8,
        options: impl IntoIterator<Item = ChoiceOption>,
    ) -> Result<Self, DomainError> {
        if choose == 0 {
            return Err(DomainError::validation(
                "a players choice must allow at least one selection",
            ));
        }
        Ok(Self {
            kind,
            choose,
            options: options.into_iter().collect(),
        })
    }

    /// Convenience constructor for choices over plain names.
    pub fn named<S: Into<String>>(
        kind: ChoiceKind,
        choose: u8,
        names: impl IntoIterator<Item = S>,
    ) -> Result<Self, DomainError> {
        Self::new(kind, choose, names.into_iter().map(ChoiceOption::named))
    }

    /// Convenience constructor for starting-equipment alternatives.
    pub fn equipment(
        choose: u8,
        options: impl IntoIterator<Item = EquipmentOption>,
    ) -> Result<Self, DomainError> {
        Self::new(
            ChoiceKind::Equipment,
            choose,
            options.into_iter().map(ChoiceOption::Equipment),
        )
    }

    pub fn kind(&self) -> ChoiceKind {
        self.kind
    }

    pub fn category(&self) -> ChoiceCategory {
        self.kind.category()
    }

    pub fn choose(&self) -> u8 {
        self.choose
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    /// Look an option up by its key.
    pub fn option(&self, key: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.matches_key(key))
    }
}
