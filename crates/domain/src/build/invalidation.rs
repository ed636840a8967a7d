//! Cascading invalidation table.
//!
//! Changing an upstream selection clears the state that depended on it. The
//! table is data so that every (field, dependents) pair can be enumerated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An upstream selection on a build session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionField {
    Race,
    Subrace,
    Class,
    Subclass,
    Background,
}

impl SelectionField {
    pub const ALL: [SelectionField; 5] = [
        Self::Race,
        Self::Subrace,
        Self::Class,
        Self::Subclass,
        Self::Background,
    ];

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

impl fmt::Display for SelectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State that is cleared when an upstream selection changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependentState {
    Subrace,
    Subclass,
    RacialBonusDistribution,
    RacialBonusAllocations,
    PendingChoices,
    Spells,
    Cantrips,
}

pub const INVALIDATION_TABLE: [(SelectionField, &[DependentState]); 5] = [
    (
        SelectionField::Race,
        &[
            DependentState::Subrace,
            DependentState::RacialBonusDistribution,
            DependentState::RacialBonusAllocations,
            DependentState::PendingChoices,
        ],
    ),
    (SelectionField::Subrace, &[DependentState::PendingChoices]),
    (
        SelectionField::Class,
        &[
            DependentState::Spells,
            DependentState::Cantrips,
            DependentState::PendingChoices,
            DependentState::Subclass,
        ],
    ),
    (SelectionField::Subclass, &[DependentState::PendingChoices]),
    (SelectionField::Background, &[DependentState::PendingChoices]),
];

/// Dependent state cleared when `field` changes.
pub fn cleared_by(field: SelectionField) -> &'static [DependentState] {
    INVALIDATION_TABLE
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, cleared)| *cleared)
        .unwrap_or(&[])
}
