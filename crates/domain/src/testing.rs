//! Fixture catalog and tag registry shared by the domain unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::aggregates::BuildSession;
use crate::catalog::{ContentCatalog, TagRegistry};
use crate::entities::{
    BackgroundDefinition, ClassDefinition, ContentGrants, RaceDefinition, SpellcastingInfo,
    SubclassDefinition, SubraceDefinition,
};
use crate::value_objects::{Ability, ChoiceKind, ContentKey, EquipmentOption, PlayersChoice};

#[derive(Default)]
pub(crate) struct FixtureCatalog {
    races: HashMap<ContentKey, Arc<RaceDefinition>>,
    subraces: HashMap<ContentKey, Arc<SubraceDefinition>>,
    classes: HashMap<ContentKey, Arc<ClassDefinition>>,
    subclasses: HashMap<ContentKey, Arc<SubclassDefinition>>,
    backgrounds: HashMap<ContentKey, Arc<BackgroundDefinition>>,
}

impl ContentCatalog for FixtureCatalog {
    fn race(&self, key: &ContentKey) -> Option<Arc<RaceDefinition>> {
        self.races.get(key).cloned()
    }

    fn subrace(&self, key: &ContentKey) -> Option<Arc<SubraceDefinition>> {
        self.subraces.get(key).cloned()
    }

    fn class(&self, key: &ContentKey) -> Option<Arc<ClassDefinition>> {
        self.classes.get(key).cloned()
    }

    fn subclass(&self, key: &ContentKey) -> Option<Arc<SubclassDefinition>> {
        self.subclasses.get(key).cloned()
    }

    fn background(&self, key: &ContentKey) -> Option<Arc<BackgroundDefinition>> {
        self.backgrounds.get(key).cloned()
    }
}

pub(crate) struct FixtureTags(HashMap<String, Vec<String>>);

impl TagRegistry for FixtureTags {
    fn items_for(&self, tag: &str) -> Option<Vec<String>> {
        self.0.get(tag).cloned()
    }
}

fn named(kind: ChoiceKind, choose: u8, names: &[&str]) -> PlayersChoice {
    PlayersChoice::named(kind, choose, names.iter().copied()).unwrap()
}

pub(crate) fn fixture_catalog() -> Arc<FixtureCatalog> {
    let mut catalog = FixtureCatalog::default();

    let races = [
        RaceDefinition::new("Elf")
            .with_subrace("high_elf")
            .with_grants(
                ContentGrants::new()
                    .with_skill("Perception")
                    .with_language("Common")
                    .with_language("Elvish"),
            ),
        RaceDefinition::new("Dwarf")
            .with_subrace("hill_dwarf")
            .with_grants(
                ContentGrants::new()
                    .with_language("Common")
                    .with_language("Dwarvish")
                    .with_choice(named(
                        ChoiceKind::Tool,
                        1,
                        &["Smith's Tools", "Brewer's Supplies", "Mason's Tools"],
                    )),
            ),
        RaceDefinition::new("Half Elf").with_grants(
            ContentGrants::new()
                .with_language("Common")
                .with_language("Elvish")
                .with_choice(named(
                    ChoiceKind::Skill,
                    2,
                    &["Athletics", "History", "Insight", "Perception", "Stealth"],
                )),
        ),
    ];
    for race in races {
        catalog.races.insert(race.key.clone(), Arc::new(race));
    }

    let subraces = [
        SubraceDefinition::new("High Elf", "elf").with_grants(ContentGrants::new().with_choice(
            named(ChoiceKind::Language, 1, &["Dwarvish", "Giant", "Gnomish", "Orc"]),
        )),
        SubraceDefinition::new("Hill Dwarf", "dwarf"),
    ];
    for subrace in subraces {
        catalog.subraces.insert(subrace.key.clone(), Arc::new(subrace));
    }

    let classes = [
        ClassDefinition::new("Fighter", 10)
            .with_subclass("champion")
            .with_grants(
                ContentGrants::new()
                    .with_choice(named(
                        ChoiceKind::Skill,
                        2,
                        &["Acrobatics", "Athletics", "History", "Insight", "Survival"],
                    ))
                    .with_choice(
                        PlayersChoice::equipment(
                            1,
                            [
                                EquipmentOption::item("chain_mail"),
                                EquipmentOption::bundle([
                                    EquipmentOption::item("leather_armor"),
                                    EquipmentOption::item("longbow"),
                                    EquipmentOption::items("arrow", 20),
                                ]),
                            ],
                        )
                        .unwrap(),
                    )
                    .with_choice(
                        PlayersChoice::equipment(
                            1,
                            [
                                EquipmentOption::bundle([
                                    EquipmentOption::tag("martial_weapons"),
                                    EquipmentOption::item("shield"),
                                ]),
                                EquipmentOption::bundle([
                                    EquipmentOption::tag("martial_weapons"),
                                    EquipmentOption::tag("martial_weapons"),
                                ]),
                            ],
                        )
                        .unwrap(),
                    ),
            ),
        ClassDefinition::new("Bard", 8)
            .with_spellcasting(SpellcastingInfo::known(
                Ability::Cha,
                vec![2, 2, 2],
                vec![4, 5, 6],
            ))
            .with_subclass("lore")
            .with_grants(
                ContentGrants::new()
                    .with_choice(named(
                        ChoiceKind::Skill,
                        3,
                        &["Acrobatics", "Deception", "History", "Performance", "Persuasion"],
                    ))
                    .with_choice(named(
                        ChoiceKind::Instrument,
                        1,
                        &["Lute", "Flute", "Drum"],
                    )),
            ),
        ClassDefinition::new("Wizard", 6)
            .with_spellcasting(SpellcastingInfo::prepared(Ability::Int, vec![3, 3], 1))
            .with_grants(
                ContentGrants::new()
                    .with_choice(named(
                        ChoiceKind::Skill,
                        2,
                        &["Arcana", "History", "Insight", "Investigation"],
                    ))
                    .with_choice(
                        PlayersChoice::equipment(
                            1,
                            [
                                EquipmentOption::item("quarterstaff"),
                                EquipmentOption::tag("arcane_focus"),
                            ],
                        )
                        .unwrap(),
                    ),
            ),
    ];
    for class in classes {
        catalog.classes.insert(class.key.clone(), Arc::new(class));
    }

    let subclasses = [
        SubclassDefinition::new("Champion", "fighter"),
        SubclassDefinition::new("Lore", "bard").with_grants(ContentGrants::new().with_choice(
            named(ChoiceKind::Skill, 1, &["Arcana", "Nature", "Religion"]),
        )),
    ];
    for subclass in subclasses {
        catalog.subclasses.insert(subclass.key.clone(), Arc::new(subclass));
    }

    let backgrounds = [
        BackgroundDefinition::new("Acolyte").with_grants(
            ContentGrants::new()
                .with_skill("Insight")
                .with_skill("Religion")
                .with_choice(named(
                    ChoiceKind::Language,
                    2,
                    &["Dwarvish", "Elvish", "Giant", "Orc"],
                )),
        ),
        BackgroundDefinition::new("Soldier").with_grants(
            ContentGrants::new()
                .with_skill("Athletics")
                .with_skill("Intimidation"),
        ),
    ];
    for background in backgrounds {
        catalog
            .backgrounds
            .insert(background.key.clone(), Arc::new(background));
    }

    Arc::new(catalog)
}

pub(crate) fn fixture_tags() -> Arc<FixtureTags> {
    Arc::new(FixtureTags(HashMap::from([
        (
            "martial_weapons".to_string(),
            vec![
                "longsword".to_string(),
                "battleaxe".to_string(),
                "warhammer".to_string(),
            ],
        ),
        (
            "simple_weapons".to_string(),
            vec!["club".to_string(), "dagger".to_string()],
        ),
    ])))
}

pub(crate) fn new_session() -> BuildSession {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    BuildSession::new("player-1", fixture_catalog(), fixture_tags(), now)
}
