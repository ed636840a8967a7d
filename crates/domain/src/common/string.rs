//! String conversion utilities.

/// Normalizes a content key for catalog lookups.
///
/// Keys are trimmed and lowercased; runs of whitespace, hyphens and
/// underscores collapse into a single `_`.
///
/// # Examples
///
/// ```
/// use charbldr_domain::common::normalize_key;
///
/// assert_eq!(normalize_key("High Elf"), "high_elf");
/// assert_eq!(normalize_key("  Sleight-of-Hand "), "sleight_of_hand");
/// assert_eq!(normalize_key("thieves'  tools"), "thieves'_tools");
/// assert_eq!(normalize_key("   "), "");
/// ```
pub fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_separator = false;

    for c in raw.trim().chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
            continue;
        }
        if pending_separator && !out.is_empty() {
            out.push('_');
        }
        pending_separator = false;
        out.extend(c.to_lowercase());
    }

    out
}

/// Trims a string and converts the result to `None` when nothing is left.
///
/// # Examples
///
/// ```
/// use charbldr_domain::common::trimmed_or_none;
///
/// assert_eq!(trimmed_or_none("  Tordek "), Some("Tordek".to_string()));
/// assert_eq!(trimmed_or_none("   "), None);
/// ```
pub fn trimmed_or_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
