//! Normalized key for catalog content (races, classes, backgrounds, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::normalize_key;

/// A content key in normalized form ("High Elf" -> `high_elf`).
///
/// Two keys that differ only in case or separators compare equal once wrapped,
/// so selection no-op checks and catalog lookups agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ContentKey(String);

impl ContentKey {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(normalize_key(raw.as_ref()))
    }

    /// Like [`ContentKey::new`], but `None` when nothing is left after normalizing.
    pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
        let key = Self::new(raw);
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContentKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<ContentKey> for String {
    fn from(value: ContentKey) -> Self {
        value.0
    }
}
