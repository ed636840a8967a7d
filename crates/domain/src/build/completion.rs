//! Completion validator.

use serde::Serialize;
use std::fmt;

use crate::aggregates::BuildSession;
use crate::build::SelectionField;
use crate::entities::SpellPreparation;
use crate::value_objects::ContentKey;

/// An unmet requirement blocking finalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CompletionIssue {
    MissingSelection {
        field: SelectionField,
    },
    /// Selected key not found in the catalog
    UnknownContent {
        field: SelectionField,
        key: ContentKey,
    },
    UnsatisfiedChoice {
        choice_id: String,
        chosen: usize,
        choose: u8,
    },
    CantripCount {
        selected: usize,
        required: u8,
    },
    SpellCount {
        selected: usize,
        required: u8,
    },
}

impl fmt::Display for CompletionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSelection { field } => write!(f, "no {} selected", field),
            Self::UnknownContent { field, key } => write!(f, "unknown {} '{}'", field, key),
            Self::UnsatisfiedChoice {
                choice_id,
                chosen,
                choose,
            } => write!(f, "choice {} has {} of {} picks", choice_id, chosen, choose),
            Self::CantripCount { selected, required } => {
                write!(f, "{} of {} cantrips selected", selected, required)
            }
            Self::SpellCount { selected, required } => {
                write!(f, "{} of {} spells selected", selected, required)
            }
        }
    }
}

/// Every unmet requirement of `session`, in a stable order.
pub fn completion_issues(session: &BuildSession) -> Vec<CompletionIssue> {
    let mut issues = Vec::new();
    let catalog = session.catalog();

    let required = [
        (
            SelectionField::Race,
            session.selected_race(),
            session
                .selected_race()
                .is_some_and(|key| catalog.race(key).is_some()),
        ),
        (
            SelectionField::Class,
            session.selected_class(),
            session
                .selected_class()
                .is_some_and(|key| catalog.class(key).is_some()),
        ),
        (
            SelectionField::Background,
            session.selected_background(),
            session
                .selected_background()
                .is_some_and(|key| catalog.background(key).is_some()),
        ),
    ];
    for (field, key, resolved) in required {
        match key {
            None => issues.push(CompletionIssue::MissingSelection { field }),
            Some(key) if !resolved => issues.push(CompletionIssue::UnknownContent {
                field,
                key: key.clone(),
            }),
            Some(_) => {}
        }
    }

    issues.extend(
        session
            .derive_pending_choices()
            .iter()
            .filter(|pending| !pending.is_satisfied())
            .map(|pending| CompletionIssue::UnsatisfiedChoice {
                choice_id: pending.id().to_string(),
                chosen: pending.chosen().len(),
                choose: pending.players_choice().choose(),
            }),
    );

    if let Some(spellcasting) = session
        .class_definition()
        .and_then(|class| class.spellcasting.clone())
    {
        let required = spellcasting.cantrips_known_at(1);
        let selected = session.selected_cantrips().len();
        if selected != usize::from(required) {
            issues.push(CompletionIssue::CantripCount { selected, required });
        }

        if spellcasting.preparation == SpellPreparation::Known {
            let required = spellcasting.spells_known_at(1);
            let selected = session.selected_spells().len();
            if selected != usize::from(required) {
                issues.push(CompletionIssue::SpellCount { selected, required });
            }
        }
    }

    issues
}

/// Whether `session` may be finalized.
pub fn is_build_complete(session: &BuildSession) -> bool {
    completion_issues(session).is_empty()
}
