//! Error types for choice handling

/// Choice list and selection errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChoiceError {
    /// Two choices in one list share a value
    #[error("duplicate choice value: {0}")]
    DuplicateValue(String),

    /// Value is not among the currently available choices
    #[error("choice not available: {value}")]
    Unavailable {
        /// The rejected value
        value: String,
    },
}

impl ChoiceError {
    /// Create unavailable error
    #[inline]
    pub fn unavailable(value: impl Into<String>) -> Self {
        Self::Unavailable {
            value: value.into(),
        }
    }
}
