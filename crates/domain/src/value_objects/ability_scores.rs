//! Ability scores and racial bonus allocation.
//!
//! # Invariants
//!
//! - Every ability always has a base score (fixed-size table, no sparse map).
//! - Base scores stay within [`MIN_ABILITY_SCORE`, `MAX_ABILITY_SCORE`].
//! - Racial bonus allocations never use a magnitude more often than the active
//!   distribution contains it, and an ability holds at most one bonus.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::events::RacialBonusOutcome;
use crate::value_objects::Ability;

/// Lowest base score an ability may hold.
pub const MIN_ABILITY_SCORE: u8 = 1;
/// Highest base score an ability may hold.
pub const MAX_ABILITY_SCORE: u8 = 20;
/// Base score every ability starts with.
pub const DEFAULT_ABILITY_SCORE: u8 = 10;

/// Base scores for all six abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    scores: [u8; 6],
}

impl AbilityScores {
    /// All abilities at [`DEFAULT_ABILITY_SCORE`].
    pub fn new() -> Self {
        Self::uniform(DEFAULT_ABILITY_SCORE)
    }

    /// All abilities at `score`, clamped into the legal range.
    pub fn uniform(score: u8) -> Self {
        Self {
            scores: [score.clamp(MIN_ABILITY_SCORE, MAX_ABILITY_SCORE); 6],
        }
    }

    pub fn get(&self, ability: Ability) -> u8 {
        self.scores[ability.index()]
    }

    /// Raises a score by one. Returns `false` at the upper bound.
    pub fn increase(&mut self, ability: Ability) -> bool {
        let score = &mut self.scores[ability.index()];
        if *score >= MAX_ABILITY_SCORE {
            return false;
        }
        *score += 1;
        true
    }

    /// Lowers a score by one. Returns `false` at the lower bound.
    pub fn decrease(&mut self, ability: Ability) -> bool {
        let score = &mut self.scores[ability.index()];
        if *score <= MIN_ABILITY_SCORE {
            return false;
        }
        *score -= 1;
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, u8)> + '_ {
        Ability::ALL.iter().map(move |a| (*a, self.get(*a)))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new()
    }
}

/// A fixed multiset of racial bonus magnitudes the player spreads across abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RacialBonusDistribution {
    /// +2 to one ability, +1 to another
    PlusTwoPlusOne,
    /// +1 to three different abilities
    ThreePlusOnes,
}

impl RacialBonusDistribution {
    pub const ALL: [RacialBonusDistribution; 2] = [Self::PlusTwoPlusOne, Self::ThreePlusOnes];

    /// The magnitudes in this distribution, largest first.
    pub fn magnitudes(&self) -> &'static [u8] {
        match self {
            Self::PlusTwoPlusOne => &[2, 1],
            Self::ThreePlusOnes => &[1, 1, 1],
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::PlusTwoPlusOne => "2-1",
            Self::ThreePlusOnes => "1-1-1",
        }
    }
}

impl fmt::Display for RacialBonusDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for RacialBonusDistribution {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        match compact.as_str() {
            "21" => Ok(Self::PlusTwoPlusOne),
            "111" => Ok(Self::ThreePlusOnes),
            _ => Err(DomainError::parse(format!(
                "Unknown racial bonus distribution: {}",
                s
            ))),
        }
    }
}

/// Mutable ability table plus the racial bonus sub-system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityAllocator {
    scores: AbilityScores,
    distribution: Option<RacialBonusDistribution>,
    allocations: BTreeMap<Ability, u8>,
}

impl AbilityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from explicit base scores instead of the defaults.
    pub fn with_scores(scores: AbilityScores) -> Self {
        Self {
            scores,
            ..Self::default()
        }
    }

    // =========================================================================
    // Base scores
    // =========================================================================

    pub fn scores(&self) -> &AbilityScores {
        &self.scores
    }

    pub fn base_score(&self, ability: Ability) -> u8 {
        self.scores.get(ability)
    }

    pub fn increase(&mut self, ability: Ability) -> bool {
        self.scores.increase(ability)
    }

    pub fn decrease(&mut self, ability: Ability) -> bool {
        self.scores.decrease(ability)
    }

    // =========================================================================
    // Racial bonuses
    // =========================================================================

    pub fn distribution(&self) -> Option<RacialBonusDistribution> {
        self.distribution
    }

    pub fn allocations(&self) -> &BTreeMap<Ability, u8> {
        &self.allocations
    }

    pub fn allocation(&self, ability: Ability) -> u8 {
        self.allocations.get(&ability).copied().unwrap_or(0)
    }

    /// Replace the active distribution.
    ///
    /// Switching to a different distribution drops every allocation; nothing is
    /// reapplied afterwards. Returns `false` when the value is unchanged.
    pub fn set_racial_bonus_distribution(
        &mut self,
        distribution: Option<RacialBonusDistribution>,
    ) -> bool {
        if self.distribution == distribution {
            return false;
        }
        self.distribution = distribution;
        self.allocations.clear();
        true
    }

    pub fn clear_racial_bonus_distribution(&mut self) {
        self.distribution = None;
    }

    pub fn clear_racial_bonus_allocations(&mut self) {
        self.allocations.clear();
    }

    /// Magnitudes of the active distribution not yet assigned to an ability.
    pub fn remaining_bonus_magnitudes(&self) -> Vec<u8> {
        let Some(distribution) = self.distribution else {
            return Vec::new();
        };
        let mut remaining = distribution.magnitudes().to_vec();
        for magnitude in self.allocations.values() {
            if let Some(pos) = remaining.iter().position(|m| m == magnitude) {
                remaining.remove(pos);
            }
        }
        remaining
    }

    /// Toggle a racial bonus on `ability`.
    ///
    /// An ability that already holds a bonus gives it back to the pool.
    /// Otherwise `preferred` is assigned if the pool still contains it, or the
    /// largest remaining magnitude when no preference is given.
    pub fn apply_or_clear_racial_bonus(
        &mut self,
        ability: Ability,
        preferred: Option<u8>,
    ) -> RacialBonusOutcome {
        if let Some(magnitude) = self.allocations.remove(&ability) {
            return RacialBonusOutcome::Cleared { ability, magnitude };
        }
        if self.distribution.is_none() {
            return RacialBonusOutcome::NoDistribution;
        }

        let remaining = self.remaining_bonus_magnitudes();
        let pick = match preferred {
            Some(magnitude) => remaining.contains(&magnitude).then_some(magnitude),
            None => remaining.iter().copied().max(),
        };

        match pick {
            Some(magnitude) => {
                self.allocations.insert(ability, magnitude);
                RacialBonusOutcome::Applied { ability, magnitude }
            }
            None => RacialBonusOutcome::Exhausted { ability },
        }
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    /// Base score plus any racial bonus.
    pub fn effective_score(&self, ability: Ability) -> u8 {
        self.base_score(ability) + self.allocation(ability)
    }

    /// Standard modifier: floor((effective - 10) / 2).
    pub fn modifier(&self, ability: Ability) -> i8 {
        let effective = i16::from(self.effective_score(ability));
        (effective - 10).div_euclid(2) as i8
    }

    /// First-level hit points: the class hit die plus the CON modifier, at least 1.
    pub fn starting_hit_points(&self, hit_die: u8) -> u8 {
        let hp = i16::from(hit_die) + i16::from(self.modifier(Ability::Con));
        hp.max(1) as u8
    }

    /// Armor class without armor: 10 plus the DEX modifier.
    pub fn unarmored_armor_class(&self) -> i8 {
        10 + self.modifier(Ability::Dex)
    }
}
