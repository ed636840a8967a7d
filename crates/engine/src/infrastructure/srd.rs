//! Built-in starter content: a slice of the 5e System Reference Document.
//!
//! Enough races, classes and backgrounds to exercise every build path
//! (subraces, skill overlaps, wildcard equipment, known and prepared casters).

use charbldr_domain::{
    Ability, BackgroundDefinition, ChoiceKind, ClassDefinition, ContentGrants, DomainError,
    EquipmentOption, PlayersChoice, RaceDefinition, SpellcastingInfo, SubclassDefinition,
    SubraceDefinition,
};

use super::catalog::{InMemoryContentCatalog, InMemoryTagRegistry};

const LANGUAGES: [&str; 8] = [
    "Dwarvish",
    "Elvish",
    "Giant",
    "Gnomish",
    "Goblin",
    "Halfling",
    "Orc",
    "Draconic",
];

const ARTISAN_TOOLS: [&str; 3] = ["Smith's Tools", "Brewer's Supplies", "Mason's Tools"];

pub fn srd_catalog() -> Result<InMemoryContentCatalog, DomainError> {
    let catalog = InMemoryContentCatalog::new();

    // Races
    catalog.insert_race(RaceDefinition::new("Human").with_grants(
        ContentGrants::new()
            .with_language("Common")
            .with_choice(PlayersChoice::named(ChoiceKind::Language, 1, LANGUAGES)?),
    ));
    catalog.insert_race(
        RaceDefinition::new("Elf")
            .with_subrace("high_elf")
            .with_subrace("wood_elf")
            .with_grants(
                ContentGrants::new()
                    .with_skill("Perception")
                    .with_language("Common")
                    .with_language("Elvish"),
            ),
    );
    catalog.insert_race(
        RaceDefinition::new("Dwarf")
            .with_subrace("hill_dwarf")
            .with_subrace("mountain_dwarf")
            .with_grants(
                ContentGrants::new()
                    .with_language("Common")
                    .with_language("Dwarvish")
                    .with_choice(PlayersChoice::named(ChoiceKind::Tool, 1, ARTISAN_TOOLS)?),
            ),
    );

    // Subraces
    catalog.insert_subrace(
        SubraceDefinition::new("High Elf", "elf").with_grants(
            ContentGrants::new()
                .with_choice(PlayersChoice::named(ChoiceKind::Language, 1, LANGUAGES)?),
        ),
    );
    catalog.insert_subrace(SubraceDefinition::new("Wood Elf", "elf"));
    catalog.insert_subrace(SubraceDefinition::new("Hill Dwarf", "dwarf"));
    catalog.insert_subrace(SubraceDefinition::new("Mountain Dwarf", "dwarf"));

    // Classes
    catalog.insert_class(
        ClassDefinition::new("Fighter", 10)
            .with_subclass("champion")
            .with_grants(
                ContentGrants::new()
                    .with_choice(PlayersChoice::named(
                        ChoiceKind::Skill,
                        2,
                        [
                            "Acrobatics",
                            "Animal Handling",
                            "Athletics",
                            "History",
                            "Insight",
                            "Intimidation",
                            "Perception",
                            "Survival",
                        ],
                    )?)
                    .with_choice(PlayersChoice::equipment(
                        1,
                        [
                            EquipmentOption::item("chain_mail"),
                            EquipmentOption::bundle([
                                EquipmentOption::item("leather_armor"),
                                EquipmentOption::item("longbow"),
                                EquipmentOption::items("arrow", 20),
                            ]),
                        ],
                    )?)
                    .with_choice(PlayersChoice::equipment(
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
                    )?)
                    .with_choice(PlayersChoice::equipment(
                        1,
                        [
                            EquipmentOption::bundle([
                                EquipmentOption::item("light_crossbow"),
                                EquipmentOption::items("crossbow_bolt", 20),
                            ]),
                            EquipmentOption::items("handaxe", 2),
                        ],
                    )?),
            ),
    );
    catalog.insert_class(
        ClassDefinition::new("Wizard", 6)
            .with_spellcasting(SpellcastingInfo::prepared(Ability::Int, vec![3, 3, 3, 4], 1))
            .with_subclass("evocation")
            .with_grants(
                ContentGrants::new()
                    .with_choice(PlayersChoice::named(
                        ChoiceKind::Skill,
                        2,
                        ["Arcana", "History", "Insight", "Investigation", "Medicine", "Religion"],
                    )?)
                    .with_choice(PlayersChoice::equipment(
                        1,
                        [
                            EquipmentOption::item("quarterstaff"),
                            EquipmentOption::item("dagger"),
                        ],
                    )?)
                    .with_choice(PlayersChoice::equipment(
                        1,
                        [
                            EquipmentOption::item("component_pouch"),
                            EquipmentOption::tag("arcane_focus"),
                        ],
                    )?),
            ),
    );
    catalog.insert_class(
        ClassDefinition::new("Bard", 8)
            .with_spellcasting(SpellcastingInfo::known(
                Ability::Cha,
                vec![2, 2, 2, 3],
                vec![4, 5, 6, 7],
            ))
            .with_subclass("lore")
            .with_grants(
                ContentGrants::new()
                    .with_choice(PlayersChoice::named(
                        ChoiceKind::Skill,
                        3,
                        [
                            "Acrobatics",
                            "Athletics",
                            "Deception",
                            "History",
                            "Insight",
                            "Performance",
                            "Persuasion",
                            "Stealth",
                        ],
                    )?)
                    .with_choice(PlayersChoice::named(
                        ChoiceKind::Instrument,
                        3,
                        ["Lute", "Flute", "Drum", "Lyre", "Horn", "Viol"],
                    )?)
                    .with_choice(PlayersChoice::equipment(
                        1,
                        [
                            EquipmentOption::item("rapier"),
                            EquipmentOption::item("longsword"),
                            EquipmentOption::tag("simple_weapons"),
                        ],
                    )?)
                    .with_choice(PlayersChoice::equipment(
                        1,
                        [
                            EquipmentOption::item("lute"),
                            EquipmentOption::tag("musical_instruments"),
                        ],
                    )?),
            ),
    );

    // Subclasses
    catalog.insert_subclass(SubclassDefinition::new("Champion", "fighter"));
    catalog.insert_subclass(SubclassDefinition::new("Evocation", "wizard"));
    catalog.insert_subclass(
        SubclassDefinition::new("Lore", "bard").with_grants(ContentGrants::new().with_choice(
            PlayersChoice::named(ChoiceKind::Skill, 3, ["Arcana", "Medicine", "Nature", "Religion"])?,
        )),
    );

    // Backgrounds
    catalog.insert_background(
        BackgroundDefinition::new("Acolyte").with_grants(
            ContentGrants::new()
                .with_skill("Insight")
                .with_skill("Religion")
                .with_choice(PlayersChoice::named(ChoiceKind::Language, 2, LANGUAGES)?),
        ),
    );
    catalog.insert_background(
        BackgroundDefinition::new("Sage").with_grants(
            ContentGrants::new()
                .with_skill("Arcana")
                .with_skill("History")
                .with_choice(PlayersChoice::named(ChoiceKind::Language, 2, LANGUAGES)?),
        ),
    );

    Ok(catalog)
}

pub fn srd_tags() -> InMemoryTagRegistry {
    let tags = InMemoryTagRegistry::new();
    tags.register(
        "martial_weapons",
        [
            "battleaxe",
            "longsword",
            "rapier",
            "shortsword",
            "warhammer",
            "longbow",
        ],
    );
    tags.register(
        "simple_weapons",
        ["club", "dagger", "handaxe", "javelin", "mace", "quarterstaff"],
    );
    tags.register("arcane_focus", ["crystal", "orb", "rod", "staff", "wand"]);
    tags.register(
        "musical_instruments",
        ["bagpipes", "drum", "flute", "horn", "lute", "lyre", "viol"],
    );
    tags
}
