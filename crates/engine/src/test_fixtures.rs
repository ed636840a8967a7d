//! Shared helpers for engine unit tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use charbldr_domain::{BuildEvent, BuildSession, ContentCatalog, ContentKey, TagRegistry};

use crate::infrastructure::srd::{srd_catalog, srd_tags};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn srd_content() -> (Arc<dyn ContentCatalog>, Arc<dyn TagRegistry>) {
    (Arc::new(srd_catalog().unwrap()), Arc::new(srd_tags()))
}

pub fn srd_session(player_id: &str) -> BuildSession {
    let (catalog, tags) = srd_content();
    BuildSession::new(player_id, catalog, tags, fixed_now())
}

fn key(raw: &str) -> Option<ContentKey> {
    Some(ContentKey::new(raw))
}

/// Events that take a fresh session to a complete hill dwarf fighter acolyte.
pub fn dwarf_fighter_events() -> Vec<BuildEvent> {
    vec![
        BuildEvent::SelectRace { key: key("dwarf") },
        BuildEvent::SelectSubrace { key: key("hill_dwarf") },
        BuildEvent::SelectClass { key: key("fighter") },
        BuildEvent::SelectBackground { key: key("acolyte") },
        BuildEvent::ToggleChoiceOption {
            choice_id: "race:dwarf:0".into(),
            option: "Smith's Tools".into(),
        },
        BuildEvent::ToggleChoiceOption {
            choice_id: "class:fighter:0".into(),
            option: "Athletics".into(),
        },
        BuildEvent::ToggleChoiceOption {
            choice_id: "class:fighter:0".into(),
            option: "Survival".into(),
        },
        BuildEvent::SelectEquipmentOption {
            choice_id: "class:fighter:1".into(),
            option_index: 0,
        },
        BuildEvent::SelectEquipmentOption {
            choice_id: "class:fighter:2".into(),
            option_index: 0,
        },
        BuildEvent::ResolveDrilldown {
            item_id: "longsword".into(),
        },
        BuildEvent::SelectEquipmentOption {
            choice_id: "class:fighter:3".into(),
            option_index: 1,
        },
        BuildEvent::ToggleChoiceOption {
            choice_id: "background:acolyte:0".into(),
            option: "Giant".into(),
        },
        BuildEvent::ToggleChoiceOption {
            choice_id: "background:acolyte:0".into(),
            option: "Orc".into(),
        },
    ]
}

#[test]
fn dwarf_fighter_events_complete_the_build() {
    let mut session = srd_session("player-1");
    for event in dwarf_fighter_events() {
        let outcome = session.apply(event.clone());
        assert!(outcome.changed(), "{event:?} had no effect: {outcome:?}");
    }
    assert!(session.is_build_complete(), "{:?}", session.completion_issues());
}
