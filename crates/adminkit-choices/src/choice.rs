//! Choice pairs and validated choice lists
//!
//! On the wire a choice is a two-element array `[value, label]`, which is
//! how the host page and the option endpoints both encode them.

use crate::error::ChoiceError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A selectable `(value, label)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Choice {
    /// Submitted value
    pub value: String,
    /// Human-readable label
    pub label: String,
}

impl Choice {
    /// Create new choice
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Choice whose label equals its value
    #[inline]
    #[must_use]
    pub fn same(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

impl From<(String, String)> for Choice {
    fn from((value, label): (String, String)) -> Self {
        Self { value, label }
    }
}

impl From<Choice> for (String, String) {
    fn from(choice: Choice) -> Self {
        (choice.value, choice.label)
    }
}

/// Ordered choice list with unique values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Choice>", into = "Vec<Choice>")]
pub struct ChoiceList {
    choices: Vec<Choice>,
}

impl ChoiceList {
    /// Create list, rejecting duplicate values
    ///
    /// # Errors
    /// - `ChoiceError::DuplicateValue` if two choices share a value
    pub fn new(choices: Vec<Choice>) -> Result<Self, ChoiceError> {
        let mut seen = HashSet::with_capacity(choices.len());
        for choice in &choices {
            if !seen.insert(choice.value.as_str()) {
                return Err(ChoiceError::DuplicateValue(choice.value.clone()));
            }
        }
        Ok(Self { choices })
    }

    /// Create list from `(value, label)` pairs
    ///
    /// # Errors
    /// - `ChoiceError::DuplicateValue` if two pairs share a value
    pub fn from_pairs<V, L>(pairs: impl IntoIterator<Item = (V, L)>) -> Result<Self, ChoiceError>
    where
        V: Into<String>,
        L: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(value, label)| Choice::new(value, label))
                .collect(),
        )
    }

    /// Create empty list
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Choices in display order
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Choice] {
        &self.choices
    }

    /// Iterate in display order
    pub fn iter(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter()
    }

    /// Look up a choice by value
    #[must_use]
    pub fn get(&self, value: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.value == value)
    }

    /// Check if a value is present
    #[inline]
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.get(value).is_some()
    }

    /// Label for a value
    #[must_use]
    pub fn label(&self, value: &str) -> Option<&str> {
        self.get(value).map(|c| c.label.as_str())
    }

    /// Number of choices
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Check if list is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// First choice, the default pick of a single select
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&Choice> {
        self.choices.first()
    }
}

impl TryFrom<Vec<Choice>> for ChoiceList {
    type Error = ChoiceError;

    fn try_from(choices: Vec<Choice>) -> Result<Self, Self::Error> {
        Self::new(choices)
    }
}

impl From<ChoiceList> for Vec<Choice> {
    fn from(list: ChoiceList) -> Self {
        list.choices
    }
}

impl<'a> IntoIterator for &'a ChoiceList {
    type Item = &'a Choice;
    type IntoIter = std::slice::Iter<'a, Choice>;

    fn into_iter(self) -> Self::IntoIter {
        self.choices.iter()
    }
}
