//! Error types for admin widgets
//!
//! Wraps the lower layers and adds the failures specific to widget inputs:
//! - Unknown component or auth type values
//! - Fields that do not apply to the row's current selection
//! - Values outside a widget's choices
//! - Configuration loading

use adminkit_choices::ChoiceError;
use adminkit_formset::FormsetError;
use adminkit_options::FetchError;

/// Widget error type
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// Formset operation failed
    #[error("formset error: {0}")]
    Formset(#[from] FormsetError),

    /// Choice selection failed
    #[error("choice error: {0}")]
    Choice(#[from] ChoiceError),

    /// Option loading failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Not one of the known components
    #[error("unknown component: {0:?}")]
    UnknownComponent(String),

    /// Not one of the known auth types
    #[error("unknown auth type: {0:?}")]
    UnknownAuthType(String),

    /// The field is not shown for the row's current selection
    #[error("field {field} does not apply to {selection}")]
    FieldNotApplicable {
        /// Field name
        field: String,
        /// What the row currently has selected
        selection: String,
    },

    /// The value is not among the field's choices
    #[error("invalid choice for {field}: {value:?}")]
    InvalidChoice {
        /// Field name
        field: String,
        /// Offered value
        value: String,
    },

    /// NLX cannot be used without an outway
    #[error("nlx outway is not configured")]
    NlxUnavailable,

    /// No row with this index
    #[error("unknown row: {0}")]
    UnknownRow(usize),

    /// No input with this element id
    #[error("unknown input: {0}")]
    UnknownInput(String),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

impl WidgetError {
    /// Create field not applicable error
    #[inline]
    pub fn not_applicable(field: impl Into<String>, selection: impl Into<String>) -> Self {
        Self::FieldNotApplicable {
            field: field.into(),
            selection: selection.into(),
        }
    }

    /// Create invalid choice error
    #[inline]
    pub fn invalid_choice(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidChoice {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Check if the error rejects user input, as opposed to bad page data
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Choice(_)
                | Self::FieldNotApplicable { .. }
                | Self::InvalidChoice { .. }
                | Self::NlxUnavailable
        ) || matches!(self, Self::Formset(err) if err.is_limit())
    }
}
