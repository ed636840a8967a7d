//! Content definitions consumed by the build engine.
//!
//! Races, subraces, classes, subclasses and backgrounds are read-only catalog
//! data. Each one grants some proficiencies outright and may ask the player to
//! choose more (see [`PlayersChoice`]).

use serde::{Deserialize, Serialize};

use crate::value_objects::{Ability, ContentKey, PlayersChoice};

/// What a single definition grants outright, plus what it asks the player to choose.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentGrants {
    /// Skills granted without a choice
    #[serde(default)]
    pub skills: Vec<String>,
    /// Tools granted without a choice
    #[serde(default)]
    pub tools: Vec<String>,
    /// Languages granted without a choice
    #[serde(default)]
    pub languages: Vec<String>,
    /// "Choose N of M" requirements, in declaration order
    #[serde(default)]
    pub player_choices: Vec<PlayersChoice>,
}

impl ContentGrants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.push(skill.into());
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tools.push(tool.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.languages.push(language.into());
        self
    }

    pub fn with_choice(mut self, choice: PlayersChoice) -> Self {
        self.player_choices.push(choice);
        self
    }
}

/// A playable race.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RaceDefinition {
    pub key: ContentKey,
    pub name: String,
    /// Keys of the subraces this race offers (empty when it has none)
    #[serde(default)]
    pub subraces: Vec<ContentKey>,
    #[serde(default)]
    pub grants: ContentGrants,
}

impl RaceDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: ContentKey::new(&name),
            name,
            subraces: Vec::new(),
            grants: ContentGrants::default(),
        }
    }

    pub fn with_subrace(mut self, key: impl Into<ContentKey>) -> Self {
        self.subraces.push(key.into());
        self
    }

    pub fn with_grants(mut self, grants: ContentGrants) -> Self {
        self.grants = grants;
        self
    }

    pub fn has_subraces(&self) -> bool {
        !self.subraces.is_empty()
    }
}

/// A subrace of a specific parent race.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubraceDefinition {
    pub key: ContentKey,
    pub name: String,
    pub parent_race: ContentKey,
    #[serde(default)]
    pub grants: ContentGrants,
}

impl SubraceDefinition {
    pub fn new(name: impl Into<String>, parent_race: impl Into<ContentKey>) -> Self {
        let name = name.into();
        Self {
            key: ContentKey::new(&name),
            name,
            parent_race: parent_race.into(),
            grants: ContentGrants::default(),
        }
    }

    pub fn with_grants(mut self, grants: ContentGrants) -> Self {
        self.grants = grants;
        self
    }
}

/// How a class readies its leveled spells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpellPreparation {
    /// A fixed list of known spells (bard, sorcerer, warlock, ranger)
    Known,
    /// Prepared daily from the full class list (cleric, druid, wizard, paladin)
    Prepared,
}

/// Spellcasting details a class declares.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpellcastingInfo {
    /// Ability used for spell attacks and save DCs
    pub ability: Ability,
    /// Cantrips known, indexed by class level - 1
    #[serde(default)]
    pub cantrips_known_by_level: Vec<u8>,
    /// Spells known, indexed by class level - 1 (known casters only)
    #[serde(default)]
    pub spells_known_by_level: Vec<u8>,
    pub preparation: SpellPreparation,
    /// Class level divisor of the prepared-count formula (1 for full casters, 2 for half)
    #[serde(default = "default_prepared_level_divisor")]
    pub prepared_level_divisor: u8,
}

fn default_prepared_level_divisor() -> u8 {
    1
}

impl SpellcastingInfo {
    pub fn known(ability: Ability, cantrips: Vec<u8>, spells: Vec<u8>) -> Self {
        Self {
            ability,
            cantrips_known_by_level: cantrips,
            spells_known_by_level: spells,
            preparation: SpellPreparation::Known,
            prepared_level_divisor: 1,
        }
    }

    pub fn prepared(ability: Ability, cantrips: Vec<u8>, level_divisor: u8) -> Self {
        Self {
            ability,
            cantrips_known_by_level: cantrips,
            spells_known_by_level: Vec::new(),
            preparation: SpellPreparation::Prepared,
            prepared_level_divisor: level_divisor.max(1),
        }
    }

    /// Cantrips known at `level` (0 when the table stops short).
    pub fn cantrips_known_at(&self, level: u8) -> u8 {
        Self::lookup(&self.cantrips_known_by_level, level)
    }

    /// Spells known at `level` (0 when the table stops short).
    pub fn spells_known_at(&self, level: u8) -> u8 {
        Self::lookup(&self.spells_known_by_level, level)
    }

    /// Prepared spells at `level` given the casting ability modifier, at least 1.
    ///
    /// Always 0 for known casters.
    pub fn max_prepared_at(&self, level: u8, ability_modifier: i8) -> u8 {
        match self.preparation {
            SpellPreparation::Known => 0,
            SpellPreparation::Prepared => {
                let divisor = i16::from(self.prepared_level_divisor.max(1));
                let count = i16::from(level) / divisor + i16::from(ability_modifier);
                count.max(1) as u8
            }
        }
    }

    fn lookup(table: &[u8], level: u8) -> u8 {
        usize::from(level)
            .checked_sub(1)
            .and_then(|index| table.get(index))
            .copied()
            .unwrap_or(0)
    }
}

/// A character class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassDefinition {
    pub key: ContentKey,
    pub name: String,
    /// Hit die size (d6 = 6, d8 = 8, ...)
    pub hit_die: u8,
    pub spellcasting: Option<SpellcastingInfo>,
    #[serde(default)]
    pub subclasses: Vec<ContentKey>,
    #[serde(default)]
    pub grants: ContentGrants,
}

impl ClassDefinition {
    pub fn new(name: impl Into<String>, hit_die: u8) -> Self {
        let name = name.into();
        Self {
            key: ContentKey::new(&name),
            name,
            hit_die,
            spellcasting: None,
            subclasses: Vec::new(),
            grants: ContentGrants::default(),
        }
    }

    pub fn with_spellcasting(mut self, spellcasting: SpellcastingInfo) -> Self {
        self.spellcasting = Some(spellcasting);
        self
    }

    pub fn with_subclass(mut self, key: impl Into<ContentKey>) -> Self {
        self.subclasses.push(key.into());
        self
    }

    pub fn with_grants(mut self, grants: ContentGrants) -> Self {
        self.grants = grants;
        self
    }
}

/// A subclass (archetype, domain, tradition ...) of a specific class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubclassDefinition {
    pub key: ContentKey,
    pub name: String,
    pub parent_class: ContentKey,
    #[serde(default)]
    pub grants: ContentGrants,
}

impl SubclassDefinition {
    pub fn new(name: impl Into<String>, parent_class: impl Into<ContentKey>) -> Self {
        let name = name.into();
        Self {
            key: ContentKey::new(&name),
            name,
            parent_class: parent_class.into(),
            grants: ContentGrants::default(),
        }
    }

    pub fn with_grants(mut self, grants: ContentGrants) -> Self {
        self.grants = grants;
        self
    }
}

/// A character background.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundDefinition {
    pub key: ContentKey,
    pub name: String,
    #[serde(default)]
    pub grants: ContentGrants,
}

impl BackgroundDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: ContentKey::new(&name),
            name,
            grants: ContentGrants::default(),
        }
    }

    pub fn with_grants(mut self, grants: ContentGrants) -> Self {
        self.grants = grants;
        self
    }
}
