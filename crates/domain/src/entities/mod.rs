//! Domain entities - catalog content the build engine reads

mod content;

pub use content::{
    BackgroundDefinition, ClassDefinition, ContentGrants, RaceDefinition, SpellPreparation,
    SpellcastingInfo, SubclassDefinition, SubraceDefinition,
};
