//! Prefix tables and the dependent choice filter
//!
//! A [`PrefixTable`] maps a parent key (for example a component identifier
//! such as `zrc`) to the value prefixes relevant under that parent. A choice
//! value `zaken.lezen` is available under `zrc` when `zaken` is one of its
//! prefixes: the prefix must be followed by [`SEPARATOR`].

use crate::choice::Choice;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Separator between a prefix and the rest of a choice value
pub const SEPARATOR: char = '.';

/// Parent key to ordered prefix set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixTable {
    entries: IndexMap<String, Vec<String>>,
}

impl PrefixTable {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prefixes for a parent key
    ///
    /// Repeated prefixes are kept once, in first-seen order.
    pub fn insert<P: Into<String>>(
        &mut self,
        key: impl Into<String>,
        prefixes: impl IntoIterator<Item = P>,
    ) {
        let mut unique: Vec<String> = Vec::new();
        for prefix in prefixes {
            let prefix = prefix.into();
            if !unique.contains(&prefix) {
                unique.push(prefix);
            }
        }
        self.entries.insert(key.into(), unique);
    }

    /// Prefixes for a parent key; empty when the key is unknown
    #[must_use]
    pub fn prefixes(&self, key: &str) -> &[String] {
        self.entries.get(key).map_or(&[], Vec::as_slice)
    }

    /// Check if the table has an entry for a key
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Parent keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of parent keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if table is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, I, P> FromIterator<(K, I)> for PrefixTable
where
    K: Into<String>,
    I: IntoIterator<Item = P>,
    P: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (key, prefixes) in iter {
            table.insert(key, prefixes);
        }
        table
    }
}

/// Check if a value starts with any prefix followed by the separator
#[must_use]
pub fn matches_prefix(value: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| {
        value
            .strip_prefix(prefix.as_str())
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
    })
}

/// Choices available under a parent key
///
/// An empty `parent_key` means nothing has been picked yet and yields no
/// choices. A key without a table entry has no prefixes and also yields no
/// choices. Display order follows `all_choices`; a value matching several
/// prefixes appears once.
#[must_use]
pub fn filter_choices(parent_key: &str, table: &PrefixTable, all_choices: &[Choice]) -> Vec<Choice> {
    if parent_key.is_empty() {
        return Vec::new();
    }

    let prefixes = table.prefixes(parent_key);
    if prefixes.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    all_choices
        .iter()
        .filter(|choice| matches_prefix(&choice.value, prefixes))
        .filter(|choice| seen.insert(choice.value.as_str()))
        .cloned()
        .collect()
}
