//! Selection list dropdowns
//!
//! Two remote-backed pickers on the catalog admin pages:
//! - [`ProcestypeSelect`]: process types for the selection list year
//! - [`ResultaatSelect`]: result classes for the zaaktype
//!
//! Both wrap a [`DependentOptions`], so a late response for an earlier year
//! or zaaktype never replaces the options for the current one.

use crate::error::WidgetError;
use adminkit_choices::Choice;
use adminkit_formset::{FieldValue, Submission};
use adminkit_options::{
    DecodeChoices, DependencyKey, DependentOptions, FetchError, LoadState, OptionSource, Resolution,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Year field the procestype options depend on
pub const PROCESTYPE_YEAR: &str = "selectielijst_procestype_jaar";
/// Procestype select name
pub const PROCESTYPE: &str = "selectielijst_procestype";
/// Procestype select id
pub const PROCESTYPE_ID: &str = "id_selectielijst_procestype";
/// Query parameter of the procestypen endpoint
pub const YEAR_PARAM: &str = "year";

/// Result class radio name
pub const SELECTIELIJSTKLASSE: &str = "selectielijstklasse";
/// Query parameter of the resultaten endpoint
pub const ZAAKTYPE_PARAM: &str = "zaaktype";

/// Placeholder shown while procestypen load
pub const LOADING_LABEL: &str = "Loading...";

/// One process type as the procestypen endpoint returns it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Procestype {
    /// Resource URL, the submitted value
    pub url: String,
    /// Process type number
    pub nummer: u32,
    /// Process type name
    pub naam: String,
}

impl From<Procestype> for Choice {
    fn from(procestype: Procestype) -> Self {
        Choice::new(
            procestype.url,
            format!("{} - {}", procestype.nummer, procestype.naam),
        )
    }
}

/// Decodes `[{url, nummer, naam}, ...]` into `(url, "nummer - naam")`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcestypeDecoder;

impl DecodeChoices for ProcestypeDecoder {
    fn decode(&self, body: serde_json::Value) -> Result<Vec<Choice>, FetchError> {
        let procestypen: Vec<Procestype> =
            serde_json::from_value(body).map_err(|err| FetchError::Decode(err.to_string()))?;
        Ok(procestypen.into_iter().map(Choice::from).collect())
    }
}

/// Procestype dropdown driven by the selection list year
pub struct ProcestypeSelect<S: OptionSource + ?Sized> {
    options: DependentOptions<S>,
    initial: String,
    chosen: Option<(DependencyKey, String)>,
}

impl<S: OptionSource + ?Sized + 'static> ProcestypeSelect<S> {
    /// Create the select with the procestype the page rendered
    #[must_use]
    pub fn new(source: Arc<S>, initial: impl Into<String>) -> Self {
        Self {
            options: DependentOptions::new(source),
            initial: initial.into(),
            chosen: None,
        }
    }

    /// React to a change of the year field
    ///
    /// Must be called within a tokio runtime.
    ///
    /// A blank year clears the options without a request.
    ///
    /// # Errors
    /// - `WidgetError::InvalidChoice` if the value is neither blank nor a year
    pub fn set_year(&mut self, raw: &str) -> Result<Option<JoinHandle<Resolution>>, WidgetError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.chosen = None;
            return Ok(self.options.set_dependency(DependencyKey::empty()));
        }
        let year: i32 = trimmed
            .parse()
            .map_err(|_| WidgetError::invalid_choice(PROCESTYPE_YEAR, raw))?;
        tracing::debug!(year, "loading procestypen");
        self.chosen = None;
        Ok(self.options.set_dependency(year.to_string()))
    }

    /// Set the year and wait for its procestypen
    pub async fn load_year(&mut self, year: i32) -> LoadState {
        self.chosen = None;
        self.options.load(year.to_string()).await
    }

    /// Current load state
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.options.current()
    }

    /// Receive every published state
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.options.subscribe()
    }

    /// Options to render; a single placeholder while loading
    #[must_use]
    pub fn choices(&self) -> Vec<Choice> {
        let state = self.options.current();
        if state.status.is_loading() {
            vec![Choice::new("", LOADING_LABEL)]
        } else {
            state.options
        }
    }

    /// Pick a procestype among the loaded options
    ///
    /// # Errors
    /// - `WidgetError::InvalidChoice` if the value is not loaded for the
    ///   current year
    pub fn select(&mut self, value: &str) -> Result<(), WidgetError> {
        let state = self.options.current();
        if !state.is_ready() || !state.contains(value) {
            return Err(WidgetError::invalid_choice(PROCESTYPE, value));
        }
        self.chosen = Some((state.key, value.to_string()));
        Ok(())
    }

    /// Value the select posts
    ///
    /// The user's pick wins while its year is current. Otherwise the
    /// initial procestype stays selected if the year offers it, and the
    /// first option is selected if not. `None` while nothing is loaded.
    #[must_use]
    pub fn selected_value(&self) -> Option<String> {
        let state = self.options.current();
        if !state.is_ready() {
            return None;
        }
        if let Some((key, value)) = &self.chosen {
            if *key == state.key && state.contains(value) {
                return Some(value.clone());
            }
        }
        if state.contains(&self.initial) {
            return Some(self.initial.clone());
        }
        state.options.first().map(|choice| choice.value.clone())
    }

    /// Encode the select for posting
    #[must_use]
    pub fn submission(&self) -> Submission {
        let mut submission = Submission::new();
        submission.push_field(
            PROCESTYPE,
            &FieldValue::Text(self.selected_value().unwrap_or_default()),
        );
        submission
    }
}

impl<S: OptionSource + ?Sized> std::fmt::Debug for ProcestypeSelect<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcestypeSelect")
            .field("options", &self.options)
            .field("initial", &self.initial)
            .field("chosen", &self.chosen)
            .finish()
    }
}

/// One radio of the result class list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioOption {
    /// Element id, `selectielijst-scroll_<i>`
    pub id: String,
    /// Input name
    pub name: &'static str,
    /// Submitted value
    pub value: String,
    /// Label
    pub label: String,
    /// Whether the radio is checked
    pub checked: bool,
}

/// Result class radio list driven by the zaaktype
pub struct ResultaatSelect<S: OptionSource + ?Sized> {
    options: DependentOptions<S>,
    chosen: Option<(DependencyKey, String)>,
}

impl<S: OptionSource + ?Sized + 'static> ResultaatSelect<S> {
    /// Create an idle radio list
    #[must_use]
    pub fn new(source: Arc<S>) -> Self {
        Self {
            options: DependentOptions::new(source),
            chosen: None,
        }
    }

    /// React to a change of the zaaktype
    ///
    /// An empty id shows no options without a request. Must be called
    /// within a tokio runtime.
    pub fn set_zaaktype(&mut self, zaaktype_id: &str) -> Option<JoinHandle<Resolution>> {
        self.chosen = None;
        self.options.set_dependency(zaaktype_id.trim())
    }

    /// Set the zaaktype and wait for its result classes
    pub async fn load_zaaktype(&mut self, zaaktype_id: &str) -> LoadState {
        self.chosen = None;
        self.options.load(zaaktype_id.trim()).await
    }

    /// Current load state
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.options.current()
    }

    /// Receive every published state
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.options.subscribe()
    }

    /// Radios to render; empty unless loaded
    #[must_use]
    pub fn radios(&self) -> Vec<RadioOption> {
        let state = self.options.current();
        if !state.is_ready() {
            return Vec::new();
        }
        let checked = self.checked_value(&state);
        state
            .options
            .into_iter()
            .enumerate()
            .map(|(i, choice)| RadioOption {
                id: format!("selectielijst-scroll_{i}"),
                name: SELECTIELIJSTKLASSE,
                checked: checked.as_deref() == Some(choice.value.as_str()),
                value: choice.value,
                label: choice.label,
            })
            .collect()
    }

    /// Check a result class
    ///
    /// # Errors
    /// - `WidgetError::InvalidChoice` if the value is not loaded for the
    ///   current zaaktype
    pub fn select(&mut self, value: &str) -> Result<(), WidgetError> {
        let state = self.options.current();
        if !state.is_ready() || !state.contains(value) {
            return Err(WidgetError::invalid_choice(SELECTIELIJSTKLASSE, value));
        }
        self.chosen = Some((state.key, value.to_string()));
        Ok(())
    }

    fn checked_value(&self, state: &LoadState) -> Option<String> {
        self.chosen
            .as_ref()
            .filter(|(key, value)| *key == state.key && state.contains(value))
            .map(|(_, value)| value.clone())
    }

    /// Encode the radio list for posting; nothing when unchecked
    #[must_use]
    pub fn submission(&self) -> Submission {
        let mut submission = Submission::new();
        if let Some(value) = self.checked_value(&self.options.current()) {
            submission.push_field(SELECTIELIJSTKLASSE, &FieldValue::Text(value));
        }
        submission
    }
}

impl<S: OptionSource + ?Sized> std::fmt::Debug for ResultaatSelect<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultaatSelect")
            .field("options", &self.options)
            .field("chosen", &self.chosen)
            .finish()
    }
}
