//! Render snapshot of a build session.

use serde::Serialize;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::aggregates::BuildSession;
use crate::build::{completion_issues, CompletionIssue, Drilldown, MergedChoice};
use crate::ids::BuildSessionId;
use crate::value_objects::{Ability, ChoiceCategory, ContentKey, RacialBonusDistribution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilitySummary {
    pub ability: Ability,
    pub base: u8,
    pub bonus: u8,
    pub effective: u8,
    pub modifier: i8,
}

/// Everything the presentation needs to draw the build menus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    pub session_id: BuildSessionId,
    pub player_id: String,
    pub created_at: DateTime<Utc>,
    pub character_name: Option<String>,
    pub race: Option<ContentKey>,
    pub subrace: Option<ContentKey>,
    pub class: Option<ContentKey>,
    pub subclass: Option<ContentKey>,
    pub background: Option<ContentKey>,
    pub abilities: Vec<AbilitySummary>,
    pub racial_bonus_distribution: Option<RacialBonusDistribution>,
    pub racial_bonus_allocations: BTreeMap<Ability, u8>,
    pub remaining_bonus_magnitudes: Vec<u8>,
    pub merged_choices: Vec<MergedChoice>,
    pub cantrips: Vec<String>,
    pub spells: Vec<String>,
    pub cantrip_limit: Option<u8>,
    pub spell_limit: Option<u8>,
    pub prepared_spell_limit: Option<u8>,
    pub starting_hit_points: Option<u8>,
    pub unarmored_armor_class: i8,
    pub active_category: Option<ChoiceCategory>,
    pub drilldown: Option<Drilldown>,
    pub complete: bool,
    pub issues: Vec<CompletionIssue>,
}

impl BuildSummary {
    pub fn from_session(session: &BuildSession) -> Self {
        let abilities = session.abilities();
        let issues = completion_issues(session);

        Self {
            session_id: session.id(),
            player_id: session.player_id().to_string(),
            created_at: session.created_at(),
            character_name: session.character_name().map(str::to_string),
            race: session.selected_race().cloned(),
            subrace: session.selected_subrace().cloned(),
            class: session.selected_class().cloned(),
            subclass: session.selected_subclass().cloned(),
            background: session.selected_background().cloned(),
            abilities: Ability::ALL
                .iter()
                .map(|&ability| AbilitySummary {
                    ability,
                    base: abilities.base_score(ability),
                    bonus: abilities.allocation(ability),
                    effective: abilities.effective_score(ability),
                    modifier: abilities.modifier(ability),
                })
                .collect(),
            racial_bonus_distribution: abilities.distribution(),
            racial_bonus_allocations: abilities.allocations().clone(),
            remaining_bonus_magnitudes: abilities.remaining_bonus_magnitudes(),
            merged_choices: session.merged_choices(),
            cantrips: session.selected_cantrips().to_vec(),
            spells: session.selected_spells().to_vec(),
            cantrip_limit: session.cantrip_limit(),
            spell_limit: session.spell_limit(),
            prepared_spell_limit: session.prepared_spell_limit(),
            starting_hit_points: session.starting_hit_points(),
            unarmored_armor_class: abilities.unarmored_armor_class(),
            active_category: session.active_category(),
            drilldown: session.drilldown().cloned(),
            complete: issues.is_empty(),
            issues,
        }
    }
}
