//! Error types for formsets
//!
//! Covers:
//! - Row limit violations when adding rows
//! - Inconsistent management counters at mount or parse time
//! - Missing or malformed host page data blocks

/// Formset error type
#[derive(Debug, thiserror::Error)]
pub enum FormsetError {
    /// Adding a row would exceed `MAX_NUM_FORMS`
    #[error("row limit exceeded (max: {max})")]
    LimitExceeded {
        /// The configured maximum
        max: usize,
    },

    /// No row with this index
    #[error("unknown row: {0}")]
    UnknownRow(usize),

    /// Counters violate `INITIAL_FORMS <= TOTAL_FORMS <= MAX_NUM_FORMS`
    #[error("invalid management counters: {0}")]
    InvalidCounters(String),

    /// A submission declares more rows than will be decoded
    #[error("too many forms submitted: {total} (absolute max: {absolute_max})")]
    TooManyForms {
        /// Posted `TOTAL_FORMS`
        total: usize,
        /// Ceiling derived from `MAX_NUM_FORMS`
        absolute_max: usize,
    },

    /// A management field is absent from a submission
    #[error("missing management field: {0}")]
    MissingManagementField(String),

    /// A management field does not hold a non-negative integer
    #[error("invalid count for {field}: {value:?}")]
    InvalidCount {
        /// Field name
        field: String,
        /// Raw submitted value
        value: String,
    },

    /// A data block is absent from the host page
    #[error("missing data block: {0}")]
    MissingBlock(String),

    /// A data block could not be decoded
    #[error("invalid data block {id}: {source}")]
    InvalidBlock {
        /// Element id of the block
        id: String,
        /// Decode failure
        #[source]
        source: serde_json::Error,
    },

    /// The data block document itself is malformed
    #[error("malformed data blocks: {0}")]
    MalformedBlocks(#[from] serde_json::Error),
}

impl FormsetError {
    /// Check if this is a row limit violation
    ///
    /// Callers use this to disable the "add another" control.
    #[inline]
    #[must_use]
    pub fn is_limit(&self) -> bool {
        matches!(self, Self::LimitExceeded { .. })
    }

    /// Create invalid count error
    #[inline]
    pub fn invalid_count(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidCount {
            field: field.into(),
            value: value.into(),
        }
    }
}
