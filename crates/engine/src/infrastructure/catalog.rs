//! In-memory content catalog and tag registry.
//!
//! Definitions are loaded once at startup and shared read-only between every
//! build session through `Arc<dyn ContentCatalog>` / `Arc<dyn TagRegistry>`.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Deserialize;

use charbldr_domain::{
    BackgroundDefinition, ClassDefinition, ContentCatalog, ContentKey, RaceDefinition,
    SubclassDefinition, SubraceDefinition, TagRegistry,
};

/// Serialized shape of a content pack.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentPack {
    pub races: Vec<RaceDefinition>,
    pub subraces: Vec<SubraceDefinition>,
    pub classes: Vec<ClassDefinition>,
    pub subclasses: Vec<SubclassDefinition>,
    pub backgrounds: Vec<BackgroundDefinition>,
    /// Equipment tag -> concrete item ids
    pub tags: BTreeMap<String, Vec<String>>,
}

/// Content catalog backed by concurrent maps keyed by normalized [`ContentKey`].
#[derive(Default)]
pub struct InMemoryContentCatalog {
    races: DashMap<ContentKey, Arc<RaceDefinition>>,
    subraces: DashMap<ContentKey, Arc<SubraceDefinition>>,
    classes: DashMap<ContentKey, Arc<ClassDefinition>>,
    subclasses: DashMap<ContentKey, Arc<SubclassDefinition>>,
    backgrounds: DashMap<ContentKey, Arc<BackgroundDefinition>>,
}

impl InMemoryContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog and tag registry from a JSON content pack.
    pub fn from_json(json: &str) -> Result<(Self, InMemoryTagRegistry), serde_json::Error> {
        let pack: ContentPack = serde_json::from_str(json)?;
        Ok(Self::from_pack(pack))
    }

    pub fn from_pack(pack: ContentPack) -> (Self, InMemoryTagRegistry) {
        let catalog = Self::new();
        pack.races.into_iter().for_each(|race| catalog.insert_race(race));
        pack.subraces
            .into_iter()
            .for_each(|subrace| catalog.insert_subrace(subrace));
        pack.classes
            .into_iter()
            .for_each(|class| catalog.insert_class(class));
        pack.subclasses
            .into_iter()
            .for_each(|subclass| catalog.insert_subclass(subclass));
        pack.backgrounds
            .into_iter()
            .for_each(|background| catalog.insert_background(background));

        let tags = InMemoryTagRegistry::new();
        for (tag, items) in pack.tags {
            tags.register(tag, items);
        }

        tracing::debug!(
            races = catalog.races.len(),
            classes = catalog.classes.len(),
            backgrounds = catalog.backgrounds.len(),
            tags = tags.len(),
            "Loaded content pack"
        );
        (catalog, tags)
    }

    pub fn insert_race(&self, race: RaceDefinition) {
        self.races.insert(race.key.clone(), Arc::new(race));
    }

    pub fn insert_subrace(&self, subrace: SubraceDefinition) {
        self.subraces.insert(subrace.key.clone(), Arc::new(subrace));
    }

    pub fn insert_class(&self, class: ClassDefinition) {
        self.classes.insert(class.key.clone(), Arc::new(class));
    }

    pub fn insert_subclass(&self, subclass: SubclassDefinition) {
        self.subclasses
            .insert(subclass.key.clone(), Arc::new(subclass));
    }

    pub fn insert_background(&self, background: BackgroundDefinition) {
        self.backgrounds
            .insert(background.key.clone(), Arc::new(background));
    }
}

impl ContentCatalog for InMemoryContentCatalog {
    fn race(&self, key: &ContentKey) -> Option<Arc<RaceDefinition>> {
        self.races.get(key).map(|entry| Arc::clone(entry.value()))
    }

    fn subrace(&self, key: &ContentKey) -> Option<Arc<SubraceDefinition>> {
        self.subraces.get(key).map(|entry| Arc::clone(entry.value()))
    }

    fn class(&self, key: &ContentKey) -> Option<Arc<ClassDefinition>> {
        self.classes.get(key).map(|entry| Arc::clone(entry.value()))
    }

    fn subclass(&self, key: &ContentKey) -> Option<Arc<SubclassDefinition>> {
        self.subclasses.get(key).map(|entry| Arc::clone(entry.value()))
    }

    fn background(&self, key: &ContentKey) -> Option<Arc<BackgroundDefinition>> {
        self.backgrounds
            .get(key)
            .map(|entry| Arc::clone(entry.value()))
    }
}

/// Tag registry backed by a concurrent map.
#[derive(Default)]
pub struct InMemoryTagRegistry {
    tags: DashMap<String, Vec<String>>,
}

impl InMemoryTagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the items a tag stands for.
    pub fn register<I, S>(&self, tag: impl Into<String>, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags
            .insert(tag.into(), items.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl TagRegistry for InMemoryTagRegistry {
    fn items_for(&self, tag: &str) -> Option<Vec<String>> {
        self.tags.get(tag).map(|entry| entry.value().clone())
    }
}
