//! Selections that depend on a parent value
//!
//! [`DependentChoices`] keeps a multi-selection consistent with the choices
//! available under the current parent: whenever the parent changes the
//! available list is recomputed and selected values that fell out of it are
//! dropped.

use crate::choice::{Choice, ChoiceList};
use crate::error::ChoiceError;
use crate::prefix::{filter_choices, PrefixTable};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Read-only choice configuration shared by every widget on a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceCatalog {
    /// Every choice, in display order
    pub choices: ChoiceList,
    /// Parent key to prefixes
    pub prefixes: PrefixTable,
}

impl ChoiceCatalog {
    /// Create new catalog
    #[inline]
    #[must_use]
    pub fn new(choices: ChoiceList, prefixes: PrefixTable) -> Self {
        Self { choices, prefixes }
    }

    /// Choices available under a parent key
    #[inline]
    #[must_use]
    pub fn available_for(&self, parent_key: &str) -> Vec<Choice> {
        filter_choices(parent_key, &self.prefixes, self.choices.as_slice())
    }
}

/// Multi-selection narrowed by a parent value
#[derive(Debug, Clone)]
pub struct DependentChoices {
    catalog: Arc<ChoiceCatalog>,
    parent: Option<String>,
    available: Vec<Choice>,
    selected: IndexSet<String>,
}

impl DependentChoices {
    /// Create with no parent picked
    #[must_use]
    pub fn new(catalog: Arc<ChoiceCatalog>) -> Self {
        Self {
            catalog,
            parent: None,
            available: Vec::new(),
            selected: IndexSet::new(),
        }
    }

    /// Create from server-supplied initial state
    ///
    /// Initial values that are not available under `parent` are dropped,
    /// the same as after a parent change.
    #[must_use]
    pub fn with_initial<S: Into<String>>(
        catalog: Arc<ChoiceCatalog>,
        parent: Option<&str>,
        selected: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut this = Self::new(catalog);
        this.selected = selected.into_iter().map(Into::into).collect();
        this.set_parent(parent);
        this
    }

    /// Change the parent value
    ///
    /// Recomputes the available choices and returns the selected values
    /// that were dropped because they are no longer available.
    pub fn set_parent(&mut self, parent: Option<&str>) -> Vec<String> {
        let parent = parent.filter(|p| !p.is_empty());
        self.parent = parent.map(str::to_string);
        self.available = self.catalog.available_for(parent.unwrap_or_default());

        let available = &self.available;
        let mut dropped = Vec::new();
        self.selected.retain(|value| {
            let keep = available.iter().any(|c| &c.value == value);
            if !keep {
                dropped.push(value.clone());
            }
            keep
        });

        tracing::debug!(
            parent = ?self.parent,
            available = self.available.len(),
            dropped = dropped.len(),
            "recomputed dependent choices"
        );
        dropped
    }

    /// Select a value
    ///
    /// # Errors
    /// - `ChoiceError::Unavailable` if the value is not available under the current parent
    pub fn select(&mut self, value: &str) -> Result<(), ChoiceError> {
        if !self.is_available(value) {
            return Err(ChoiceError::unavailable(value));
        }
        self.selected.insert(value.to_string());
        Ok(())
    }

    /// Deselect a value, returning whether it was selected
    pub fn deselect(&mut self, value: &str) -> bool {
        self.selected.shift_remove(value)
    }

    /// Flip a value's selection, returning the new state
    ///
    /// # Errors
    /// - `ChoiceError::Unavailable` if selecting a value that is not available
    pub fn toggle(&mut self, value: &str) -> Result<bool, ChoiceError> {
        if self.deselect(value) {
            Ok(false)
        } else {
            self.select(value).map(|()| true)
        }
    }

    /// Current parent value
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Choices available under the current parent
    #[inline]
    #[must_use]
    pub fn available(&self) -> &[Choice] {
        &self.available
    }

    /// Check if there is anything to pick from
    #[inline]
    #[must_use]
    pub fn has_choices(&self) -> bool {
        !self.available.is_empty()
    }

    /// Check if a value is available
    #[must_use]
    pub fn is_available(&self, value: &str) -> bool {
        self.available.iter().any(|c| c.value == value)
    }

    /// Check if a value is selected
    #[inline]
    #[must_use]
    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.contains(value)
    }

    /// Selected values in display order
    #[must_use]
    pub fn selected(&self) -> Vec<String> {
        self.available
            .iter()
            .filter(|c| self.selected.contains(&c.value))
            .map(|c| c.value.clone())
            .collect()
    }

    /// Shared catalog
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &Arc<ChoiceCatalog> {
        &self.catalog
    }
}
