//! Read-only lookups the build engine consumes.
//!
//! Content loading (YAML files, importers) lives outside the domain. Sessions
//! receive these lookups as injected `Arc<dyn ...>` dependencies so they can be
//! exercised against fixture catalogs.

use std::sync::Arc;

use crate::entities::{
    BackgroundDefinition, ClassDefinition, RaceDefinition, SubclassDefinition, SubraceDefinition,
};
use crate::value_objects::ContentKey;

/// Lookup of content definitions by normalized key.
///
/// An unknown key yields `None`; callers treat that as "nothing contributed"
/// rather than as an error.
pub trait ContentCatalog: Send + Sync {
    fn race(&self, key: &ContentKey) -> Option<Arc<RaceDefinition>>;

    fn subrace(&self, key: &ContentKey) -> Option<Arc<SubraceDefinition>>;

    fn class(&self, key: &ContentKey) -> Option<Arc<ClassDefinition>>;

    fn subclass(&self, key: &ContentKey) -> Option<Arc<SubclassDefinition>>;

    fn background(&self, key: &ContentKey) -> Option<Arc<BackgroundDefinition>>;
}

/// Mapping from an equipment tag to the concrete item ids it stands for.
pub trait TagRegistry: Send + Sync {
    /// Items for `tag`, or `None` when the tag is not registered.
    fn items_for(&self, tag: &str) -> Option<Vec<String>>;
}
