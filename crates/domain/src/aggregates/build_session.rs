//! BuildSession aggregate - one player's in-progress character build
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: selections change only through the setters, which
//!   apply the cascading invalidation table
//! - **Outcome enums**: every mutation reports what happened, rejected
//!   attempts included; nothing here returns an error
//! - **Injected lookups**: the catalog and tag registry are shared read-only
//!   `Arc<dyn ...>` handles
//!
//! Pending choices are derived from the selected definitions. Setters clear
//! them; they come back on the next [`BuildSession::rebuild_pending_choices`]
//! (which every toggle performs first).

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::build::{
    cleared_by, completion_issues, derive_pending_choices, extract_tag, merge_choices,
    replace_first_tag, resolve_tag, BuildSummary, ChoiceSource, CompletionIssue, DependentState,
    Drilldown, KnownGrants, MergedChoice, PendingChoice, SelectionField, SourceContribution,
};
use crate::catalog::{ContentCatalog, TagRegistry};
use crate::common::{normalize_key, trimmed_or_none};
use crate::entities::{ClassDefinition, SpellPreparation, SpellcastingInfo};
use crate::events::{
    BuildEvent, BuildEventOutcome, ChoiceRejection, ChoiceToggle, EquipmentSelection,
    RacialBonusOutcome, SelectionChange, SpellRejection, SpellToggle,
};
use crate::ids::BuildSessionId;
use crate::value_objects::{
    Ability, AbilityAllocator, AbilityScores, ChoiceCategory, ChoiceOption, ContentKey,
    EquipmentOption, RacialBonusDistribution,
};

/// Builds are created at first level.
const STARTING_LEVEL: u8 = 1;

/// A single player's in-progress build.
///
/// # Invariants
///
/// - every ability always has a base score in `[1, 20]`
/// - each pending choice holds at most `choose` options
/// - a drilldown only exists while its pending choice does
#[derive(Clone)]
pub struct BuildSession {
    // Identity
    id: BuildSessionId,
    player_id: String,
    created_at: DateTime<Utc>,

    // Read-only lookups
    catalog: Arc<dyn ContentCatalog>,
    tags: Arc<dyn TagRegistry>,

    // Upstream selections
    selected_race: Option<ContentKey>,
    selected_subrace: Option<ContentKey>,
    selected_class: Option<ContentKey>,
    selected_subclass: Option<ContentKey>,
    selected_background: Option<ContentKey>,

    // Downstream state
    abilities: AbilityAllocator,
    pending_choices: Vec<PendingChoice>,
    selected_cantrips: Vec<String>,
    selected_spells: Vec<String>,
    character_name: Option<String>,

    // View state
    active_category: Option<ChoiceCategory>,
    drilldown: Option<Drilldown>,
}

impl BuildSession {
    // =========================================================================
    // Constructor
    // =========================================================================

    pub fn new(
        player_id: impl Into<String>,
        catalog: Arc<dyn ContentCatalog>,
        tags: Arc<dyn TagRegistry>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BuildSessionId::new(),
            player_id: player_id.into(),
            created_at: now,
            catalog,
            tags,
            selected_race: None,
            selected_subrace: None,
            selected_class: None,
            selected_subclass: None,
            selected_background: None,
            abilities: AbilityAllocator::new(),
            pending_choices: Vec::new(),
            selected_cantrips: Vec::new(),
            selected_spells: Vec::new(),
            character_name: None,
            active_category: None,
            drilldown: None,
        }
    }

    pub fn with_id(mut self, id: BuildSessionId) -> Self {
        self.id = id;
        self
    }

    /// Start every ability at `score` (clamped) instead of 10.
    pub fn with_default_ability_score(mut self, score: u8) -> Self {
        self.abilities = AbilityAllocator::with_scores(AbilityScores::uniform(score));
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> BuildSessionId {
        self.id
    }

    #[inline]
    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn catalog(&self) -> &dyn ContentCatalog {
        self.catalog.as_ref()
    }

    pub fn selected_race(&self) -> Option<&ContentKey> {
        self.selected_race.as_ref()
    }

    pub fn selected_subrace(&self) -> Option<&ContentKey> {
        self.selected_subrace.as_ref()
    }

    pub fn selected_class(&self) -> Option<&ContentKey> {
        self.selected_class.as_ref()
    }

    pub fn selected_subclass(&self) -> Option<&ContentKey> {
        self.selected_subclass.as_ref()
    }

    pub fn selected_background(&self) -> Option<&ContentKey> {
        self.selected_background.as_ref()
    }

    pub fn selection(&self, field: SelectionField) -> Option<&ContentKey> {
        match field {
            SelectionField::Race => self.selected_race.as_ref(),
            SelectionField::Subrace => self.selected_subrace.as_ref(),
            SelectionField::Class => self.selected_class.as_ref(),
            SelectionField::Subclass => self.selected_subclass.as_ref(),
            SelectionField::Background => self.selected_background.as_ref(),
        }
    }

    pub fn abilities(&self) -> &AbilityAllocator {
        &self.abilities
    }

    /// Pending choices as of the last rebuild. Empty right after a selection change.
    pub fn pending_choices(&self) -> &[PendingChoice] {
        &self.pending_choices
    }

    pub fn selected_cantrips(&self) -> &[String] {
        &self.selected_cantrips
    }

    pub fn selected_spells(&self) -> &[String] {
        &self.selected_spells
    }

    pub fn character_name(&self) -> Option<&str> {
        self.character_name.as_deref()
    }

    pub fn active_category(&self) -> Option<ChoiceCategory> {
        self.active_category
    }

    pub fn drilldown(&self) -> Option<&Drilldown> {
        self.drilldown.as_ref()
    }

    pub fn class_definition(&self) -> Option<Arc<ClassDefinition>> {
        self.selected_class
            .as_ref()
            .and_then(|key| self.catalog.class(key))
    }

    // =========================================================================
    // Selections and cascading invalidation
    // =========================================================================

    pub fn set_selected_race(&mut self, key: Option<ContentKey>) -> SelectionChange {
        self.set_selection(SelectionField::Race, key)
    }

    pub fn set_selected_subrace(&mut self, key: Option<ContentKey>) -> SelectionChange {
        self.set_selection(SelectionField::Subrace, key)
    }

    pub fn set_selected_class(&mut self, key: Option<ContentKey>) -> SelectionChange {
        self.set_selection(SelectionField::Class, key)
    }

    pub fn set_selected_subclass(&mut self, key: Option<ContentKey>) -> SelectionChange {
        self.set_selection(SelectionField::Subclass, key)
    }

    pub fn set_selected_background(&mut self, key: Option<ContentKey>) -> SelectionChange {
        self.set_selection(SelectionField::Background, key)
    }

    fn set_selection(&mut self, field: SelectionField, key: Option<ContentKey>) -> SelectionChange {
        let key = key.filter(|k| !k.is_empty());
        let slot = match field {
            SelectionField::Race => &mut self.selected_race,
            SelectionField::Subrace => &mut self.selected_subrace,
            SelectionField::Class => &mut self.selected_class,
            SelectionField::Subclass => &mut self.selected_subclass,
            SelectionField::Background => &mut self.selected_background,
        };
        if *slot == key {
            return SelectionChange::Unchanged { field };
        }
        *slot = key.clone();

        let cleared = cleared_by(field);
        for dependent in cleared {
            self.clear_dependent(*dependent);
        }

        tracing::debug!(
            player_id = %self.player_id,
            field = %field,
            value = ?key.as_ref().map(ContentKey::as_str),
            cleared = ?cleared,
            "Build selection changed"
        );

        SelectionChange::Changed {
            field,
            value: key,
            cleared: cleared.to_vec(),
        }
    }

    fn clear_dependent(&mut self, dependent: DependentState) {
        match dependent {
            DependentState::Subrace => self.selected_subrace = None,
            DependentState::Subclass => self.selected_subclass = None,
            DependentState::RacialBonusDistribution => {
                self.abilities.clear_racial_bonus_distribution()
            }
            DependentState::RacialBonusAllocations => {
                self.abilities.clear_racial_bonus_allocations()
            }
            DependentState::PendingChoices => {
                self.pending_choices.clear();
                self.close_drilldown();
            }
            DependentState::Spells => self.selected_spells.clear(),
            DependentState::Cantrips => self.selected_cantrips.clear(),
        }
    }

    // =========================================================================
    // Pending choices
    // =========================================================================

    /// Grants of the selected definitions that resolve, in source order.
    ///
    /// Unknown keys and subraces/subclasses whose parent is not the current
    /// selection contribute nothing.
    pub fn contributions(&self) -> Vec<SourceContribution> {
        let mut contributions = Vec::new();

        if let Some(key) = &self.selected_race {
            match self.catalog.race(key) {
                Some(race) => contributions.push(SourceContribution::new(
                    ChoiceSource::Race,
                    key.clone(),
                    race.grants.clone(),
                )),
                None => self.log_unknown(SelectionField::Race, key),
            }
        }

        if let Some(key) = &self.selected_subrace {
            match self.catalog.subrace(key) {
                Some(subrace) if Some(&subrace.parent_race) == self.selected_race.as_ref() => {
                    contributions.push(SourceContribution::new(
                        ChoiceSource::Subrace,
                        key.clone(),
                        subrace.grants.clone(),
                    ))
                }
                Some(subrace) => tracing::warn!(
                    player_id = %self.player_id,
                    subrace = %key,
                    parent_race = %subrace.parent_race,
                    "Subrace does not belong to the selected race, ignoring it"
                ),
                None => self.log_unknown(SelectionField::Subrace, key),
            }
        }

        if let Some(key) = &self.selected_class {
            match self.catalog.class(key) {
                Some(class) => contributions.push(SourceContribution::new(
                    ChoiceSource::Class,
                    key.clone(),
                    class.grants.clone(),
                )),
                None => self.log_unknown(SelectionField::Class, key),
            }
        }

        if let Some(key) = &self.selected_subclass {
            match self.catalog.subclass(key) {
                Some(subclass) if Some(&subclass.parent_class) == self.selected_class.as_ref() => {
                    contributions.push(SourceContribution::new(
                        ChoiceSource::Subclass,
                        key.clone(),
                        subclass.grants.clone(),
                    ))
                }
                Some(subclass) => tracing::warn!(
                    player_id = %self.player_id,
                    subclass = %key,
                    parent_class = %subclass.parent_class,
                    "Subclass does not belong to the selected class, ignoring it"
                ),
                None => self.log_unknown(SelectionField::Subclass, key),
            }
        }

        if let Some(key) = &self.selected_background {
            match self.catalog.background(key) {
                Some(background) => contributions.push(SourceContribution::new(
                    ChoiceSource::Background,
                    key.clone(),
                    background.grants.clone(),
                )),
                None => self.log_unknown(SelectionField::Background, key),
            }
        }

        contributions
    }

    fn log_unknown(&self, field: SelectionField, key: &ContentKey) {
        tracing::debug!(
            player_id = %self.player_id,
            field = %field,
            key = %key,
            "Selected content is not in the catalog"
        );
    }

    /// The pending set the current selections produce, keeping picks of
    /// surviving choice ids. Does not modify the session.
    pub fn derive_pending_choices(&self) -> Vec<PendingChoice> {
        derive_pending_choices(&self.contributions(), &self.pending_choices)
    }

    /// Replace the stored pending set with a freshly derived one.
    pub fn rebuild_pending_choices(&mut self) -> &[PendingChoice] {
        self.pending_choices = self.derive_pending_choices();

        let orphaned = self
            .drilldown
            .as_ref()
            .is_some_and(|d| self.pending_index(&d.choice_id).is_none());
        if orphaned {
            self.close_drilldown();
        }

        &self.pending_choices
    }

    pub fn known_grants(&self) -> KnownGrants {
        KnownGrants::collect(&self.contributions())
    }

    pub fn merged_choices(&self) -> Vec<MergedChoice> {
        let contributions = self.contributions();
        merge_choices(
            &derive_pending_choices(&contributions, &self.pending_choices),
            &KnownGrants::collect(&contributions),
        )
    }

    pub fn all_choices_satisfied(&self) -> bool {
        self.derive_pending_choices()
            .iter()
            .all(PendingChoice::is_satisfied)
    }

    fn pending_index(&self, choice_id: &str) -> Option<usize> {
        self.pending_choices.iter().position(|p| p.id() == choice_id)
    }

    /// Toggle `option_key` on the pending choice `choice_id`.
    ///
    /// A skill held by a sibling skill choice moves here when this choice has
    /// room. Other categories refuse options a sibling already holds.
    pub fn toggle_choice_option(&mut self, choice_id: &str, option_key: &str) -> ChoiceToggle {
        self.rebuild_pending_choices();
        let known = self.known_grants();

        let Some(index) = self.pending_index(choice_id) else {
            return self.reject_choice(choice_id, ChoiceRejection::UnknownChoice);
        };

        let target = &self.pending_choices[index];
        if target.holds(option_key) {
            let removed = self.pending_choices[index]
                .remove(option_key)
                .map(|o| o.key())
                .unwrap_or_else(|| normalize_key(option_key));
            tracing::debug!(player_id = %self.player_id, choice_id = %choice_id, option = %removed, "Choice option removed");
            return ChoiceToggle::Removed {
                choice_id: choice_id.to_string(),
                option: removed,
            };
        }

        let category = target.category();
        let Some(option) = target.players_choice().option(option_key).cloned() else {
            return self.reject_choice(choice_id, ChoiceRejection::NotOffered);
        };
        if !option.is_concrete() {
            return self.reject_choice(choice_id, ChoiceRejection::NeedsDrilldown);
        }
        let key = option.key();
        if known.is_known(category, &key) {
            return self.reject_choice(choice_id, ChoiceRejection::AlreadyKnown);
        }

        let is_full = target.is_full();
        let radio = category == ChoiceCategory::Equipment && target.max_selectable() == 1;

        if category != ChoiceCategory::Equipment {
            let holder = self
                .pending_choices
                .iter()
                .enumerate()
                .find(|(i, p)| *i != index && p.category() == category && p.holds(&key))
                .map(|(i, p)| (i, p.id().to_string()));

            if let Some((holder_index, holder_id)) = holder {
                if category != ChoiceCategory::Skill {
                    return self.reject_choice(
                        choice_id,
                        ChoiceRejection::SelectedElsewhere { holder: holder_id },
                    );
                }
                if is_full {
                    return self.reject_choice(choice_id, ChoiceRejection::AtCapacity);
                }
                self.pending_choices[holder_index].remove(&key);
                self.pending_choices[index].try_add(option);
                tracing::debug!(
                    player_id = %self.player_id,
                    from = %holder_id,
                    to = %choice_id,
                    option = %key,
                    "Skill moved between choices"
                );
                return ChoiceToggle::Moved {
                    from: holder_id,
                    to: choice_id.to_string(),
                    option: key,
                };
            }
        }

        if is_full {
            if !radio {
                return self.reject_choice(choice_id, ChoiceRejection::AtCapacity);
            }
            self.pending_choices[index].replace_with(option);
        } else {
            self.pending_choices[index].try_add(option);
        }

        tracing::debug!(player_id = %self.player_id, choice_id = %choice_id, option = %key, "Choice option added");
        ChoiceToggle::Added {
            choice_id: choice_id.to_string(),
            option: key,
        }
    }

    /// Toggle an option of a merged choice.
    ///
    /// Deselects it from whichever constituent holds it, otherwise adds it to
    /// the first constituent that offers it and still has room.
    pub fn toggle_merged_option(
        &mut self,
        category: ChoiceCategory,
        option_key: &str,
    ) -> ChoiceToggle {
        self.rebuild_pending_choices();

        let constituents: Vec<&PendingChoice> = self
            .pending_choices
            .iter()
            .filter(|p| p.category() == category)
            .collect();
        if constituents.is_empty() {
            return self.reject_choice(category.as_str(), ChoiceRejection::UnknownChoice);
        }

        if let Some(holder) = constituents.iter().find(|p| p.holds(option_key)) {
            let holder_id = holder.id().to_string();
            return self.toggle_choice_option(&holder_id, option_key);
        }

        let offering: Vec<&&PendingChoice> = constituents
            .iter()
            .filter(|p| p.players_choice().option(option_key).is_some())
            .collect();
        match offering.iter().find(|p| !p.is_full()) {
            Some(target) => {
                let target_id = target.id().to_string();
                self.toggle_choice_option(&target_id, option_key)
            }
            None if offering.is_empty() => {
                self.reject_choice(category.as_str(), ChoiceRejection::NotOffered)
            }
            None => self.reject_choice(category.as_str(), ChoiceRejection::AtCapacity),
        }
    }

    fn reject_choice(&self, choice_id: &str, reason: ChoiceRejection) -> ChoiceToggle {
        tracing::debug!(player_id = %self.player_id, choice_id = %choice_id, reason = ?reason, "Choice toggle rejected");
        ChoiceToggle::Rejected { reason }
    }

    // =========================================================================
    // Equipment
    // =========================================================================

    /// Pick the equipment option at `option_index`.
    ///
    /// Concrete options toggle like any other option. An option carrying a
    /// wildcard opens a drilldown over the tag's items instead.
    pub fn select_equipment_option(
        &mut self,
        choice_id: &str,
        option_index: usize,
    ) -> EquipmentSelection {
        self.rebuild_pending_choices();
        self.close_drilldown();

        let Some(index) = self.pending_index(choice_id) else {
            return EquipmentSelection::Rejected {
                reason: ChoiceRejection::UnknownChoice,
            };
        };
        let pending = &self.pending_choices[index];
        if pending.category() != ChoiceCategory::Equipment {
            return EquipmentSelection::Rejected {
                reason: ChoiceRejection::NotEquipment,
            };
        }
        let Some(option) = pending.players_choice().options().get(option_index) else {
            return EquipmentSelection::Rejected {
                reason: ChoiceRejection::NotOffered,
            };
        };
        let Some(equipment) = option.as_equipment().cloned() else {
            return EquipmentSelection::Rejected {
                reason: ChoiceRejection::NotEquipment,
            };
        };

        if let Some(tag) = extract_tag(&equipment).map(str::to_string) {
            let items = resolve_tag(self.tags.as_ref(), &tag);
            tracing::debug!(
                player_id = %self.player_id,
                choice_id = %choice_id,
                tag = %tag,
                items = items.len(),
                "Equipment drilldown opened"
            );
            self.drilldown = Some(Drilldown {
                choice_id: choice_id.to_string(),
                option_index,
                option: equipment,
                tag: tag.clone(),
                items: items.clone(),
                return_category: self.active_category.take(),
            });
            return EquipmentSelection::Drilldown {
                choice_id: choice_id.to_string(),
                tag,
                items,
            };
        }

        let key = equipment.key();
        if pending.holds(&key) {
            self.pending_choices[index].remove(&key);
            return EquipmentSelection::Deselected {
                choice_id: choice_id.to_string(),
                option: equipment,
            };
        }

        match self.place_equipment(index, equipment.clone()) {
            Ok(()) => EquipmentSelection::Chosen {
                choice_id: choice_id.to_string(),
                option: equipment,
            },
            Err(reason) => EquipmentSelection::Rejected { reason },
        }
    }

    /// Pick `item_id` for the open drilldown.
    ///
    /// A bundle with another wildcard left chains into a new drilldown.
    pub fn resolve_drilldown(&mut self, item_id: &str) -> EquipmentSelection {
        self.rebuild_pending_choices();

        let Some(drilldown) = self.drilldown.clone() else {
            return EquipmentSelection::Rejected {
                reason: ChoiceRejection::NoDrilldown,
            };
        };
        if !drilldown.offers(item_id) {
            return EquipmentSelection::Rejected {
                reason: ChoiceRejection::NotOffered,
            };
        }

        let resolved = replace_first_tag(&drilldown.option, item_id);
        if let Some(tag) = extract_tag(&resolved).map(str::to_string) {
            let items = resolve_tag(self.tags.as_ref(), &tag);
            let choice_id = drilldown.choice_id.clone();
            self.drilldown = Some(Drilldown {
                option: resolved,
                tag: tag.clone(),
                items: items.clone(),
                ..drilldown
            });
            return EquipmentSelection::Drilldown {
                choice_id,
                tag,
                items,
            };
        }

        self.close_drilldown();
        let Some(index) = self.pending_index(&drilldown.choice_id) else {
            return EquipmentSelection::Rejected {
                reason: ChoiceRejection::UnknownChoice,
            };
        };
        let origin = self.pending_choices[index]
            .players_choice()
            .options()
            .get(drilldown.option_index)
            .map(ChoiceOption::key);
        if self.pending_choices[index].holds(&resolved.key()) {
            if let Some(origin) = origin {
                self.pending_choices[index].record_origin(resolved.key(), origin);
            }
            return EquipmentSelection::Chosen {
                choice_id: drilldown.choice_id,
                option: resolved,
            };
        }

        match self.place_equipment(index, resolved.clone()) {
            Ok(()) => {
                if let Some(origin) = origin {
                    self.pending_choices[index].record_origin(resolved.key(), origin);
                }
                tracing::debug!(
                    player_id = %self.player_id,
                    choice_id = %drilldown.choice_id,
                    option = %resolved,
                    "Equipment drilldown resolved"
                );
                EquipmentSelection::Chosen {
                    choice_id: drilldown.choice_id,
                    option: resolved,
                }
            }
            Err(reason) => EquipmentSelection::Rejected { reason },
        }
    }

    /// Single-pick choices swap their selection, others add while under cap.
    fn place_equipment(
        &mut self,
        index: usize,
        equipment: EquipmentOption,
    ) -> Result<(), ChoiceRejection> {
        let pending = &mut self.pending_choices[index];
        let option = ChoiceOption::Equipment(equipment);
        if pending.max_selectable() == 1 {
            pending.replace_with(option);
            Ok(())
        } else if pending.try_add(option) {
            Ok(())
        } else {
            Err(ChoiceRejection::AtCapacity)
        }
    }

    /// Close the open drilldown without picking anything.
    pub fn cancel_drilldown(&mut self) -> bool {
        self.close_drilldown()
    }

    fn close_drilldown(&mut self) -> bool {
        match self.drilldown.take() {
            Some(drilldown) => {
                self.active_category = drilldown.return_category;
                true
            }
            None => false,
        }
    }

    pub fn set_active_category(&mut self, category: Option<ChoiceCategory>) {
        self.close_drilldown();
        self.active_category = category;
    }

    // =========================================================================
    // Abilities
    // =========================================================================

    pub fn increase_ability(&mut self, ability: Ability) -> bool {
        self.abilities.increase(ability)
    }

    pub fn decrease_ability(&mut self, ability: Ability) -> bool {
        self.abilities.decrease(ability)
    }

    pub fn set_racial_bonus_distribution(
        &mut self,
        distribution: Option<RacialBonusDistribution>,
    ) -> bool {
        self.abilities.set_racial_bonus_distribution(distribution)
    }

    pub fn toggle_racial_bonus(
        &mut self,
        ability: Ability,
        preferred: Option<u8>,
    ) -> RacialBonusOutcome {
        self.abilities.apply_or_clear_racial_bonus(ability, preferred)
    }

    /// First-level hit points, once a known class is selected.
    pub fn starting_hit_points(&self) -> Option<u8> {
        self.class_definition()
            .map(|class| self.abilities.starting_hit_points(class.hit_die))
    }

    // =========================================================================
    // Spells
    // =========================================================================

    fn spellcasting(&self) -> Result<SpellcastingInfo, SpellRejection> {
        let class = self.class_definition().ok_or(SpellRejection::NoClass)?;
        class
            .spellcasting
            .clone()
            .ok_or(SpellRejection::NoSpellcasting)
    }

    pub fn cantrip_limit(&self) -> Option<u8> {
        self.spellcasting()
            .ok()
            .map(|info| info.cantrips_known_at(STARTING_LEVEL))
    }

    /// Cap on leveled spells. `None` for prepared casters and non-casters.
    pub fn spell_limit(&self) -> Option<u8> {
        self.spellcasting()
            .ok()
            .filter(|info| info.preparation == SpellPreparation::Known)
            .map(|info| info.spells_known_at(STARTING_LEVEL))
    }

    /// How many spells a prepared caster could ready. Informational only.
    pub fn prepared_spell_limit(&self) -> Option<u8> {
        let info = self
            .spellcasting()
            .ok()
            .filter(|info| info.preparation == SpellPreparation::Prepared)?;
        Some(info.max_prepared_at(STARTING_LEVEL, self.abilities.modifier(info.ability)))
    }

    pub fn toggle_cantrip(&mut self, spell: &str) -> SpellToggle {
        let limit = match self.spellcasting() {
            Ok(info) => Some(info.cantrips_known_at(STARTING_LEVEL)),
            Err(reason) => return SpellToggle::Rejected { reason },
        };
        toggle_spell_key(&mut self.selected_cantrips, spell, limit)
    }

    pub fn toggle_spell(&mut self, spell: &str) -> SpellToggle {
        let limit = match self.spellcasting() {
            Ok(info) if info.preparation == SpellPreparation::Known => {
                Some(info.spells_known_at(STARTING_LEVEL))
            }
            Ok(_) => None,
            Err(reason) => return SpellToggle::Rejected { reason },
        };
        toggle_spell_key(&mut self.selected_spells, spell, limit)
    }

    // =========================================================================
    // Name, completion, events
    // =========================================================================

    /// Returns whether the name changed. Blank names clear it.
    pub fn set_character_name(&mut self, name: Option<&str>) -> bool {
        let name = name.and_then(trimmed_or_none);
        if self.character_name == name {
            return false;
        }
        self.character_name = name;
        true
    }

    pub fn completion_issues(&self) -> Vec<CompletionIssue> {
        completion_issues(self)
    }

    pub fn is_build_complete(&self) -> bool {
        self.completion_issues().is_empty()
    }

    pub fn summary(&self) -> BuildSummary {
        BuildSummary::from_session(self)
    }

    /// Dispatch a presentation event to the matching operation.
    pub fn apply(&mut self, event: BuildEvent) -> BuildEventOutcome {
        match event {
            BuildEvent::SelectRace { key } => {
                BuildEventOutcome::Selection(self.set_selected_race(key))
            }
            BuildEvent::SelectSubrace { key } => {
                BuildEventOutcome::Selection(self.set_selected_subrace(key))
            }
            BuildEvent::SelectClass { key } => {
                BuildEventOutcome::Selection(self.set_selected_class(key))
            }
            BuildEvent::SelectSubclass { key } => {
                BuildEventOutcome::Selection(self.set_selected_subclass(key))
            }
            BuildEvent::SelectBackground { key } => {
                BuildEventOutcome::Selection(self.set_selected_background(key))
            }
            BuildEvent::IncreaseAbility { ability } => BuildEventOutcome::Ability {
                ability,
                changed: self.increase_ability(ability),
            },
            BuildEvent::DecreaseAbility { ability } => BuildEventOutcome::Ability {
                ability,
                changed: self.decrease_ability(ability),
            },
            BuildEvent::SetRacialBonusDistribution { distribution } => {
                BuildEventOutcome::Distribution {
                    changed: self.set_racial_bonus_distribution(distribution),
                }
            }
            BuildEvent::ToggleRacialBonus { ability, magnitude } => {
                BuildEventOutcome::RacialBonus(self.toggle_racial_bonus(ability, magnitude))
            }
            BuildEvent::ToggleChoiceOption { choice_id, option } => {
                BuildEventOutcome::Choice(self.toggle_choice_option(&choice_id, &option))
            }
            BuildEvent::ToggleMergedOption { category, option } => {
                BuildEventOutcome::Choice(self.toggle_merged_option(category, &option))
            }
            BuildEvent::SelectEquipmentOption {
                choice_id,
                option_index,
            } => BuildEventOutcome::Equipment(
                self.select_equipment_option(&choice_id, option_index),
            ),
            BuildEvent::ResolveDrilldown { item_id } => {
                BuildEventOutcome::Equipment(self.resolve_drilldown(&item_id))
            }
            BuildEvent::CancelDrilldown => BuildEventOutcome::DrilldownCancelled {
                cancelled: self.cancel_drilldown(),
            },
            BuildEvent::ToggleCantrip { spell } => {
                BuildEventOutcome::Spell(self.toggle_cantrip(&spell))
            }
            BuildEvent::ToggleSpell { spell } => BuildEventOutcome::Spell(self.toggle_spell(&spell)),
            BuildEvent::SetCharacterName { name } => BuildEventOutcome::Name {
                changed: self.set_character_name(name.as_deref()),
            },
            BuildEvent::SetActiveCategory { category } => {
                self.set_active_category(category);
                BuildEventOutcome::View { category }
            }
        }
    }
}

fn toggle_spell_key(selected: &mut Vec<String>, spell: &str, limit: Option<u8>) -> SpellToggle {
    let key = normalize_key(spell);
    if key.is_empty() {
        return SpellToggle::Rejected {
            reason: SpellRejection::Blank,
        };
    }
    if let Some(position) = selected.iter().position(|s| *s == key) {
        selected.remove(position);
        return SpellToggle::Removed { spell: key };
    }
    if let Some(limit) = limit {
        if selected.len() >= usize::from(limit) {
            return SpellToggle::Rejected {
                reason: SpellRejection::AtCapacity { limit },
            };
        }
    }
    selected.push(key.clone());
    SpellToggle::Added { spell: key }
}

impl fmt::Debug for BuildSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildSession")
            .field("id", &self.id)
            .field("player_id", &self.player_id)
            .field("selected_race", &self.selected_race)
            .field("selected_subrace", &self.selected_subrace)
            .field("selected_class", &self.selected_class)
            .field("selected_subclass", &self.selected_subclass)
            .field("selected_background", &self.selected_background)
            .field("abilities", &self.abilities)
            .field("pending_choices", &self.pending_choices.len())
            .field("selected_cantrips", &self.selected_cantrips)
            .field("selected_spells", &self.selected_spells)
            .field("character_name", &self.character_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::INVALIDATION_TABLE;
    use crate::testing::new_session;
    use proptest::prelude::*;

    fn key(raw: &str) -> Option<ContentKey> {
        Some(ContentKey::new(raw))
    }

    fn choose_all(session: &mut BuildSession, picks: &[(&str, &str)]) {
        for (choice_id, option) in picks {
            let toggle = session.toggle_choice_option(choice_id, option);
            assert!(!toggle.is_rejected(), "{choice_id}/{option}: {toggle:?}");
        }
    }

    /// Elf fighter acolyte with every choice made
    fn complete_fighter() -> BuildSession {
        let mut session = new_session();
        session.set_selected_race(key("elf"));
        session.set_selected_subrace(key("high_elf"));
        session.set_selected_class(key("fighter"));
        session.set_selected_background(key("acolyte"));
        choose_all(
            &mut session,
            &[
                ("subrace:high_elf:0", "Giant"),
                ("class:fighter:0", "Athletics"),
                ("class:fighter:0", "Survival"),
                ("background:acolyte:0", "Dwarvish"),
                ("background:acolyte:0", "Orc"),
            ],
        );
        session.select_equipment_option("class:fighter:1", 0);
        session.select_equipment_option("class:fighter:2", 0);
        session.resolve_drilldown("longsword");
        session
    }

    mod selections {
        use super::*;

        #[test]
        fn new_session_starts_empty() {
            let session = new_session();
            for ability in Ability::ALL {
                assert_eq!(session.abilities().base_score(ability), 10);
            }
            assert!(session.selected_race().is_none());
            assert!(session.pending_choices().is_empty());
            assert!(session.all_choices_satisfied());
            assert!(!session.is_build_complete());
        }

        #[test]
        fn changing_race_clears_subrace_bonuses_and_choices() {
            let mut session = new_session();
            session.set_selected_race(key("elf"));
            session.set_selected_subrace(key("high_elf"));
            session.rebuild_pending_choices();
            session.set_racial_bonus_distribution(Some(RacialBonusDistribution::PlusTwoPlusOne));
            session.toggle_racial_bonus(Ability::Dex, None);
            assert!(!session.pending_choices().is_empty());

            let change = session.set_selected_race(key("dwarf"));

            assert!(matches!(
                change,
                SelectionChange::Changed {
                    field: SelectionField::Race,
                    ..
                }
            ));
            assert!(session.selected_subrace().is_none());
            assert!(session.pending_choices().is_empty());
            assert!(session.abilities().allocations().is_empty());
            assert!(session.abilities().distribution().is_none());
        }

        #[test]
        fn same_value_is_a_no_op() {
            let mut session = new_session();
            session.set_selected_race(key("elf"));
            session.set_selected_subrace(key("high_elf"));

            let change = session.set_selected_race(Some(ContentKey::new(" ELF ")));

            assert_eq!(
                change,
                SelectionChange::Unchanged {
                    field: SelectionField::Race
                }
            );
            assert_eq!(session.selected_subrace(), key("high_elf").as_ref());
        }

        #[test]
        fn setters_do_not_rebuild_pending_choices() {
            let mut session = new_session();
            session.set_selected_race(key("dwarf"));
            assert!(session.pending_choices().is_empty());

            let rebuilt = session.rebuild_pending_choices();
            assert_eq!(rebuilt.len(), 1);
            assert_eq!(rebuilt[0].id(), "race:dwarf:0");
        }

        #[test]
        fn every_invalidation_pair_is_honored() {
            for (field, dependents) in INVALIDATION_TABLE {
                let mut session = new_session();
                session.set_selected_race(key("elf"));
                session.set_selected_subrace(key("high_elf"));
                session.set_selected_class(key("bard"));
                session.set_selected_subclass(key("lore"));
                session.set_selected_background(key("acolyte"));
                session.set_racial_bonus_distribution(Some(RacialBonusDistribution::ThreePlusOnes));
                session.toggle_racial_bonus(Ability::Cha, None);
                session.toggle_cantrip("Vicious Mockery");
                session.toggle_spell("Healing Word");
                session.rebuild_pending_choices();

                let change = session.apply(match field {
                    SelectionField::Race => BuildEvent::SelectRace { key: None },
                    SelectionField::Subrace => BuildEvent::SelectSubrace { key: None },
                    SelectionField::Class => BuildEvent::SelectClass { key: None },
                    SelectionField::Subclass => BuildEvent::SelectSubclass { key: None },
                    SelectionField::Background => BuildEvent::SelectBackground { key: None },
                });
                assert!(change.changed(), "{field} change should register");

                let observed = [
                    (DependentState::Subrace, session.selected_subrace().is_none()),
                    (DependentState::Subclass, session.selected_subclass().is_none()),
                    (
                        DependentState::RacialBonusDistribution,
                        session.abilities().distribution().is_none(),
                    ),
                    (
                        DependentState::RacialBonusAllocations,
                        session.abilities().allocations().is_empty(),
                    ),
                    (DependentState::PendingChoices, session.pending_choices().is_empty()),
                    (DependentState::Spells, session.selected_spells().is_empty()),
                    (DependentState::Cantrips, session.selected_cantrips().is_empty()),
                ];
                for (dependent, cleared) in observed {
                    let is_the_field_itself = matches!(
                        (field, dependent),
                        (SelectionField::Subrace, DependentState::Subrace)
                            | (SelectionField::Subclass, DependentState::Subclass)
                    );
                    if is_the_field_itself {
                        continue;
                    }
                    assert_eq!(
                        cleared,
                        dependents.contains(&dependent),
                        "{field} -> {dependent:?}"
                    );
                }
            }
        }

        #[test]
        fn class_change_clears_spells_and_subclass() {
            let mut session = new_session();
            session.set_selected_class(key("bard"));
            session.set_selected_subclass(key("lore"));
            session.toggle_cantrip("Minor Illusion");

            session.set_selected_class(key("wizard"));

            assert!(session.selected_subclass().is_none());
            assert!(session.selected_cantrips().is_empty());
        }

        #[test]
        fn subrace_of_another_race_contributes_nothing() {
            let mut session = new_session();
            session.set_selected_race(key("dwarf"));
            session.set_selected_subrace(key("high_elf"));

            let ids: Vec<String> = session
                .rebuild_pending_choices()
                .iter()
                .map(|p| p.id().to_string())
                .collect();

            assert_eq!(ids, vec!["race:dwarf:0"]);
        }

        #[test]
        fn unknown_keys_contribute_nothing_and_block_completion() {
            let mut session = complete_fighter();
            session.set_selected_background(key("pirate"));

            assert!(session.derive_pending_choices().iter().all(|p| !p.id().starts_with("background")));
            assert!(session.completion_issues().contains(&CompletionIssue::UnknownContent {
                field: SelectionField::Background,
                key: ContentKey::new("pirate"),
            }));
        }
    }

    mod choices {
        use super::*;

        #[test]
        fn rebuild_keeps_picks_of_surviving_choices() {
            let mut session = new_session();
            session.set_selected_class(key("fighter"));
            session.toggle_choice_option("class:fighter:0", "History");

            session.rebuild_pending_choices();

            assert_eq!(
                session.pending_choices()[0].chosen(),
                &[ChoiceOption::named("History")]
            );
        }

        #[test]
        fn toggling_a_held_option_removes_it() {
            let mut session = new_session();
            session.set_selected_class(key("fighter"));
            session.toggle_choice_option("class:fighter:0", "History");

            let toggle = session.toggle_choice_option("class:fighter:0", "history");

            assert_eq!(
                toggle,
                ChoiceToggle::Removed {
                    choice_id: "class:fighter:0".to_string(),
                    option: "history".to_string()
                }
            );
            assert!(session.pending_choices()[0].chosen().is_empty());
        }

        #[test]
        fn over_cap_and_unknown_toggles_are_rejected() {
            let mut session = new_session();
            session.set_selected_class(key("fighter"));
            choose_all(
                &mut session,
                &[("class:fighter:0", "History"), ("class:fighter:0", "Survival")],
            );

            assert_eq!(
                session.toggle_choice_option("class:fighter:0", "Athletics"),
                ChoiceToggle::Rejected {
                    reason: ChoiceRejection::AtCapacity
                }
            );
            assert_eq!(
                session.toggle_choice_option("class:fighter:0", "Arcana"),
                ChoiceToggle::Rejected {
                    reason: ChoiceRejection::NotOffered
                }
            );
            assert_eq!(
                session.toggle_choice_option("class:wizard:0", "Arcana"),
                ChoiceToggle::Rejected {
                    reason: ChoiceRejection::UnknownChoice
                }
            );
            assert_eq!(session.pending_choices()[0].chosen().len(), 2);
        }

        #[test]
        fn already_known_skills_are_filtered_and_rejected() {
            let mut session = new_session();
            session.set_selected_class(key("fighter"));
            session.set_selected_background(key("acolyte"));

            let toggle = session.toggle_choice_option("class:fighter:0", "Insight");
            assert_eq!(
                toggle,
                ChoiceToggle::Rejected {
                    reason: ChoiceRejection::AlreadyKnown
                }
            );

            let merged = session.merged_choices();
            let skills = merged
                .iter()
                .find(|m| m.category == ChoiceCategory::Skill)
                .unwrap();
            assert!(skills.option("insight").is_none());
        }

        #[test]
        fn skills_move_between_choices_without_changing_the_total() {
            let mut session = new_session();
            session.set_selected_race(key("half_elf"));
            session.set_selected_class(key("fighter"));
            session.toggle_choice_option("race:half_elf:0", "Athletics");

            let toggle = session.toggle_choice_option("class:fighter:0", "Athletics");

            assert_eq!(
                toggle,
                ChoiceToggle::Moved {
                    from: "race:half_elf:0".to_string(),
                    to: "class:fighter:0".to_string(),
                    option: "athletics".to_string(),
                }
            );
            let total: usize = session
                .pending_choices()
                .iter()
                .map(|p| p.chosen().len())
                .sum();
            assert_eq!(total, 1);
            assert!(session.pending_choices()[0].chosen().is_empty());
        }

        #[test]
        fn skill_move_into_a_full_choice_is_rejected() {
            let mut session = new_session();
            session.set_selected_race(key("half_elf"));
            session.set_selected_class(key("fighter"));
            choose_all(
                &mut session,
                &[
                    ("race:half_elf:0", "Athletics"),
                    ("class:fighter:0", "History"),
                    ("class:fighter:0", "Survival"),
                ],
            );

            let toggle = session.toggle_choice_option("class:fighter:0", "Athletics");

            assert_eq!(
                toggle,
                ChoiceToggle::Rejected {
                    reason: ChoiceRejection::AtCapacity
                }
            );
            assert!(session.pending_choices()[0].holds("athletics"));
        }

        #[test]
        fn languages_held_elsewhere_are_not_moved() {
            let mut session = new_session();
            session.set_selected_race(key("elf"));
            session.set_selected_subrace(key("high_elf"));
            session.set_selected_background(key("acolyte"));
            session.toggle_choice_option("subrace:high_elf:0", "Dwarvish");

            let toggle = session.toggle_choice_option("background:acolyte:0", "Dwarvish");

            assert_eq!(
                toggle,
                ChoiceToggle::Rejected {
                    reason: ChoiceRejection::SelectedElsewhere {
                        holder: "subrace:high_elf:0".to_string()
                    }
                }
            );
        }

        #[test]
        fn merged_toggle_fills_constituents_in_order() {
            let mut session = new_session();
            session.set_selected_race(key("half_elf"));
            session.set_selected_class(key("fighter"));

            for skill in ["History", "Insight", "Athletics"] {
                let toggle = session.toggle_merged_option(ChoiceCategory::Skill, skill);
                assert!(!toggle.is_rejected(), "{skill}");
            }

            let pending = session.pending_choices();
            assert_eq!(pending[0].chosen().len(), 2);
            assert!(pending[1].holds("athletics"));

            let toggle = session.toggle_merged_option(ChoiceCategory::Skill, "insight");
            assert!(matches!(toggle, ChoiceToggle::Removed { .. }));
            assert!(!session.pending_choices()[0].holds("insight"));

            let toggle = session.toggle_merged_option(ChoiceCategory::Language, "Orc");
            assert_eq!(
                toggle,
                ChoiceToggle::Rejected {
                    reason: ChoiceRejection::UnknownChoice
                }
            );
        }

        proptest! {
            #[test]
            fn merged_choices_never_exceed_their_cap(
                toggles in prop::collection::vec((0usize..8, 0usize..6), 0..40)
            ) {
                let mut session = new_session();
                session.set_selected_race(key("half_elf"));
                session.set_selected_class(key("bard"));
                session.set_selected_subclass(key("lore"));
                session.set_selected_background(key("acolyte"));
                session.rebuild_pending_choices();

                for (choice, option) in toggles {
                    let pending = session.pending_choices();
                    let choice = &pending[choice % pending.len()];
                    let options = choice.players_choice().options();
                    let option_key = options[option % options.len()].key();
                    let choice_id = choice.id().to_string();
                    session.toggle_choice_option(&choice_id, &option_key);

                    for pending in session.pending_choices() {
                        prop_assert!(pending.chosen().len() <= usize::from(pending.max_selectable()));
                    }
                    for merged in session.merged_choices() {
                        if merged.category != ChoiceCategory::Equipment {
                            prop_assert!(merged.chosen_count() <= usize::from(merged.choose));
                        }
                    }
                }
            }
        }
    }

    mod equipment {
        use super::*;

        #[test]
        fn concrete_options_toggle_and_single_picks_swap() {
            let mut session = new_session();
            session.set_selected_class(key("fighter"));

            let first = session.select_equipment_option("class:fighter:1", 0);
            assert!(matches!(first, EquipmentSelection::Chosen { .. }));

            let swapped = session.select_equipment_option("class:fighter:1", 1);
            assert!(matches!(swapped, EquipmentSelection::Chosen { .. }));
            assert_eq!(session.pending_choices()[1].chosen().len(), 1);

            let deselected = session.select_equipment_option("class:fighter:1", 1);
            assert!(matches!(deselected, EquipmentSelection::Deselected { .. }));
            assert!(session.pending_choices()[1].chosen().is_empty());
        }

        #[test]
        fn bundle_drilldown_resolves_into_concrete_bundle() {
            let mut session = new_session();
            session.set_selected_class(key("fighter"));
            session.set_active_category(Some(ChoiceCategory::Equipment));

            let opened = session.select_equipment_option("class:fighter:2", 0);
            match opened {
                EquipmentSelection::Drilldown { tag, items, .. } => {
                    assert_eq!(tag, "martial_weapons");
                    assert_eq!(items, vec!["longsword", "battleaxe", "warhammer"]);
                }
                other => panic!("expected drilldown, got {other:?}"),
            }
            assert!(session.drilldown().is_some());

            let resolved = session.resolve_drilldown("longsword");

            let expected = EquipmentOption::bundle([
                EquipmentOption::item("longsword"),
                EquipmentOption::item("shield"),
            ]);
            assert_eq!(
                resolved,
                EquipmentSelection::Chosen {
                    choice_id: "class:fighter:2".to_string(),
                    option: expected.clone(),
                }
            );
            assert_eq!(
                session.pending_choices()[2].chosen(),
                &[ChoiceOption::Equipment(expected)]
            );
            assert!(session.drilldown().is_none());
            assert_eq!(session.active_category(), Some(ChoiceCategory::Equipment));
        }

        #[test]
        fn resolved_drilldown_marks_its_offered_option_selected() {
            let mut session = new_session();
            session.set_selected_class(key("fighter"));

            session.select_equipment_option("class:fighter:2", 0);
            session.resolve_drilldown("longsword");

            let offered: Vec<String> = session.pending_choices()[2]
                .players_choice()
                .options()
                .iter()
                .map(ChoiceOption::key)
                .collect();
            let merged = session
                .merged_choices()
                .into_iter()
                .find(|m| m.constituent_ids == ["class:fighter:2"])
                .expect("fighter weapon choice");
            let origin = merged.option(&offered[0]).expect("bundle option");
            assert!(origin.is_selected());
            assert_eq!(origin.held_by.as_deref(), Some("class:fighter:2"));
            assert!(!merged.option(&offered[1]).expect("second option").is_selected());

            // Still selected after the pending choices are rebuilt
            session.rebuild_pending_choices();
            let merged = session
                .merged_choices()
                .into_iter()
                .find(|m| m.constituent_ids == ["class:fighter:2"])
                .expect("fighter weapon choice");
            assert!(merged.option(&offered[0]).expect("bundle option").is_selected());
        }

        #[test]
        fn bundle_with_two_wildcards_chains_drilldowns() {
            let mut session = new_session();
            session.set_selected_class(key("fighter"));
            session.select_equipment_option("class:fighter:2", 1);

            let chained = session.resolve_drilldown("longsword");
            assert!(matches!(chained, EquipmentSelection::Drilldown { .. }));

            let resolved = session.resolve_drilldown("battleaxe");
            assert_eq!(
                resolved,
                EquipmentSelection::Chosen {
                    choice_id: "class:fighter:2".to_string(),
                    option: EquipmentOption::bundle([
                        EquipmentOption::item("longsword"),
                        EquipmentOption::item("battleaxe"),
                    ]),
                }
            );
        }

        #[test]
        fn item_outside_the_drilldown_is_rejected() {
            let mut session = new_session();
            session.set_selected_class(key("fighter"));
            session.select_equipment_option("class:fighter:2", 0);

            let rejected = session.resolve_drilldown("club");

            assert_eq!(
                rejected,
                EquipmentSelection::Rejected {
                    reason: ChoiceRejection::NotOffered
                }
            );
            assert!(session.drilldown().is_some());
        }

        #[test]
        fn unknown_tag_opens_an_empty_drilldown() {
            let mut session = new_session();
            session.set_selected_class(key("wizard"));

            let opened = session.select_equipment_option("class:wizard:1", 1);

            assert_eq!(
                opened,
                EquipmentSelection::Drilldown {
                    choice_id: "class:wizard:1".to_string(),
                    tag: "arcane_focus".to_string(),
                    items: Vec::new(),
                }
            );
        }

        #[test]
        fn cancel_restores_the_originating_category() {
            let mut session = new_session();
            session.set_selected_class(key("fighter"));
            session.set_active_category(Some(ChoiceCategory::Equipment));
            session.select_equipment_option("class:fighter:2", 0);
            assert_eq!(session.active_category(), None);

            assert!(session.cancel_drilldown());

            assert_eq!(session.active_category(), Some(ChoiceCategory::Equipment));
            assert!(!session.cancel_drilldown());
            assert!(session.pending_choices()[2].chosen().is_empty());
        }

        #[test]
        fn wildcard_options_cannot_be_toggled_directly() {
            let mut session = new_session();
            session.set_selected_class(key("wizard"));

            let toggle = session.toggle_choice_option("class:wizard:1", "tag:arcane_focus");

            assert_eq!(
                toggle,
                ChoiceToggle::Rejected {
                    reason: ChoiceRejection::NeedsDrilldown
                }
            );
        }

        #[test]
        fn selection_change_closes_open_drilldown() {
            let mut session = new_session();
            session.set_selected_class(key("fighter"));
            session.select_equipment_option("class:fighter:2", 0);

            session.set_selected_background(key("soldier"));

            assert!(session.drilldown().is_none());
            assert_eq!(
                session.resolve_drilldown("longsword"),
                EquipmentSelection::Rejected {
                    reason: ChoiceRejection::NoDrilldown
                }
            );
        }
    }

    mod spells {
        use super::*;

        #[test]
        fn cantrip_count_gates_completion() {
            let mut session = new_session();
            session.set_selected_class(key("bard"));

            session.toggle_cantrip("Vicious Mockery");
            assert!(session.completion_issues().contains(&CompletionIssue::CantripCount {
                selected: 1,
                required: 2
            }));

            session.toggle_cantrip("Minor Illusion");
            assert!(!session
                .completion_issues()
                .iter()
                .any(|i| matches!(i, CompletionIssue::CantripCount { .. })));

            assert_eq!(
                session.toggle_cantrip("Light"),
                SpellToggle::Rejected {
                    reason: SpellRejection::AtCapacity { limit: 2 }
                }
            );
        }

        #[test]
        fn known_casters_are_capped_and_gated_on_spells() {
            let mut session = new_session();
            session.set_selected_class(key("bard"));
            assert_eq!(session.spell_limit(), Some(4));

            for spell in ["Charm Person", "Healing Word", "Sleep", "Thunderwave"] {
                assert!(matches!(session.toggle_spell(spell), SpellToggle::Added { .. }));
            }
            assert!(matches!(
                session.toggle_spell("Bane"),
                SpellToggle::Rejected { .. }
            ));
            assert_eq!(
                session.toggle_spell("sleep"),
                SpellToggle::Removed {
                    spell: "sleep".to_string()
                }
            );
            assert!(session.completion_issues().contains(&CompletionIssue::SpellCount {
                selected: 3,
                required: 4
            }));
        }

        #[test]
        fn prepared_casters_are_not_capped_or_gated() {
            let mut session = new_session();
            session.set_selected_class(key("wizard"));
            session.increase_ability(Ability::Int);
            session.increase_ability(Ability::Int);
            session.increase_ability(Ability::Int);
            session.increase_ability(Ability::Int);

            for spell in ["Magic Missile", "Shield", "Sleep", "Mage Armor", "Detect Magic"] {
                assert!(matches!(session.toggle_spell(spell), SpellToggle::Added { .. }));
            }
            assert_eq!(session.spell_limit(), None);
            assert_eq!(session.prepared_spell_limit(), Some(3));
            assert!(!session
                .completion_issues()
                .iter()
                .any(|i| matches!(i, CompletionIssue::SpellCount { .. })));
        }

        #[test]
        fn non_casters_reject_spells() {
            let mut session = new_session();
            assert_eq!(
                session.toggle_cantrip("Light"),
                SpellToggle::Rejected {
                    reason: SpellRejection::NoClass
                }
            );

            session.set_selected_class(key("fighter"));
            assert_eq!(
                session.toggle_spell("Shield"),
                SpellToggle::Rejected {
                    reason: SpellRejection::NoSpellcasting
                }
            );
            assert_eq!(session.cantrip_limit(), None);
        }
    }

    mod completion {
        use super::*;

        #[test]
        fn fully_chosen_build_is_complete() {
            let session = complete_fighter();
            assert_eq!(session.completion_issues(), Vec::new());
            assert!(session.is_build_complete());
            assert_eq!(session.starting_hit_points(), Some(10));
        }

        #[test]
        fn missing_selections_are_reported_in_order() {
            let session = new_session();
            let issues = session.completion_issues();
            assert_eq!(
                issues,
                vec![
                    CompletionIssue::MissingSelection {
                        field: SelectionField::Race
                    },
                    CompletionIssue::MissingSelection {
                        field: SelectionField::Class
                    },
                    CompletionIssue::MissingSelection {
                        field: SelectionField::Background
                    },
                ]
            );
        }

        #[test]
        fn unsatisfied_choice_blocks_completion() {
            let mut session = complete_fighter();
            session.toggle_choice_option("class:fighter:0", "Survival");

            assert!(!session.is_build_complete());
            assert!(!session.all_choices_satisfied());
        }
    }

    mod events {
        use super::*;

        #[test]
        fn apply_dispatches_to_operations() {
            let mut session = new_session();

            let outcome = session.apply(BuildEvent::SelectClass { key: key("Fighter") });
            assert!(outcome.changed());
            assert_eq!(session.selected_class(), key("fighter").as_ref());

            let outcome = session.apply(BuildEvent::IncreaseAbility {
                ability: Ability::Str,
            });
            assert_eq!(
                outcome,
                BuildEventOutcome::Ability {
                    ability: Ability::Str,
                    changed: true
                }
            );

            let outcome = session.apply(BuildEvent::ToggleRacialBonus {
                ability: Ability::Str,
                magnitude: None,
            });
            assert_eq!(
                outcome,
                BuildEventOutcome::RacialBonus(RacialBonusOutcome::NoDistribution)
            );

            let outcome = session.apply(BuildEvent::SetCharacterName {
                name: Some("  Tordek ".to_string()),
            });
            assert!(outcome.changed());
            assert_eq!(session.character_name(), Some("Tordek"));

            let outcome = session.apply(BuildEvent::SelectEquipmentOption {
                choice_id: "class:fighter:2".to_string(),
                option_index: 0,
            });
            assert!(matches!(
                outcome,
                BuildEventOutcome::Equipment(EquipmentSelection::Drilldown { .. })
            ));
            let outcome = session.apply(BuildEvent::CancelDrilldown);
            assert_eq!(outcome, BuildEventOutcome::DrilldownCancelled { cancelled: true });
        }

        #[test]
        fn summary_reflects_the_build() {
            let mut session = complete_fighter();
            session.set_racial_bonus_distribution(Some(RacialBonusDistribution::PlusTwoPlusOne));
            session.toggle_racial_bonus(Ability::Dex, Some(2));

            let summary = session.summary();

            assert!(summary.complete);
            assert_eq!(summary.race, key("elf"));
            assert_eq!(summary.remaining_bonus_magnitudes, vec![1]);
            let dex = summary
                .abilities
                .iter()
                .find(|a| a.ability == Ability::Dex)
                .unwrap();
            assert_eq!((dex.base, dex.bonus, dex.effective, dex.modifier), (10, 2, 12, 1));
            assert_eq!(summary.unarmored_armor_class, 11);

            let json = serde_json::to_value(&summary).unwrap();
            assert_eq!(json["playerId"], "player-1");
            assert_eq!(json["mergedChoices"][0]["category"], "LANGUAGE");
        }
    }
}
