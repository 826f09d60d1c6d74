//! Strings carrying `*` wildcards and their comparison rules

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cache;

const WILDCARD: char = '*';

/// A string in which `*` stands for any run of characters, `/` included
///
/// Consecutive wildcards are equivalent to a single one, so comparisons
/// always work on the compacted form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WildcardString(String);

impl WildcardString {
    /// Wrap a raw string
    pub fn new(value: impl Into<String>) -> Self {
        WildcardString(value.into())
    }

    /// The raw string, wildcards untouched
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Equality on the compacted forms
    pub fn wildcard_equal(&self, value: &str) -> bool {
        compact_wildcards(&self.0) == compact_wildcards(value)
    }

    /// Check whether `value` fits this pattern
    ///
    /// When `sanitized` is set every `*` is removed from `value` first, which
    /// asks whether the literal part of `value` has the pattern's shape.
    pub fn wildcard_match(&self, value: &str, sanitized: bool) -> bool {
        let pattern = to_anchored_regex(&compact_wildcards(&self.0));
        let value = compact_wildcards(value);
        let value = if sanitized {
            strip_wildcards(&value)
        } else {
            value
        };
        cache::compiled(&pattern)
            .map(|regex| regex.is_match(&value))
            .unwrap_or(false)
    }

    /// Check whether this pattern is strictly more general than `value`
    ///
    /// This is a partial order: a pattern never includes itself and two
    /// unrelated patterns do not include each other.
    pub fn wildcard_include(&self, value: &str) -> bool {
        if self.wildcard_equal(value) {
            return false;
        }
        let pattern = compact_wildcards(&self.0);
        let value = compact_wildcards(value);
        let pattern_matches = self.wildcard_match(&value, false);
        let value_matches = WildcardString::new(value.as_str()).wildcard_match(&pattern, false);
        if strip_wildcards(&pattern) == strip_wildcards(&value) {
            let denser = count_wildcards(&pattern) > count_wildcards(&value);
            return denser && pattern_matches && value_matches;
        }
        pattern_matches && !value_matches
    }
}

impl fmt::Display for WildcardString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WildcardString {
    fn from(value: &str) -> Self {
        WildcardString::new(value)
    }
}

impl From<String> for WildcardString {
    fn from(value: String) -> Self {
        WildcardString(value)
    }
}

impl AsRef<str> for WildcardString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Collapse every run of `*` into a single `*`
pub fn compact_wildcards(value: &str) -> String {
    let mut compacted = String::with_capacity(value.len());
    let mut previous_was_wildcard = false;
    for ch in value.chars() {
        let is_wildcard = ch == WILDCARD;
        if !(is_wildcard && previous_was_wildcard) {
            compacted.push(ch);
        }
        previous_was_wildcard = is_wildcard;
    }
    compacted
}

fn strip_wildcards(value: &str) -> String {
    value.chars().filter(|ch| *ch != WILDCARD).collect()
}

fn count_wildcards(value: &str) -> usize {
    value.chars().filter(|ch| *ch == WILDCARD).count()
}

fn to_anchored_regex(pattern: &str) -> String {
    let body = pattern
        .split(WILDCARD)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    format!("^{}$", body)
}
