//! adminkit Formset - dynamic formsets and the management form protocol
//!
//! A formset is a group of repeated sub-forms submitted together. The
//! server-side processor learns how many sub-forms were rendered from four
//! management counters; this crate keeps those counters and the rendered rows
//! in lock step while rows are added client-side.
//!
//! - [`Formset`]: row registry + counters, mounted from host page data
//! - [`Row`]: one sub-form's values and errors
//! - [`ManagementCounters`]: `TOTAL`/`INITIAL`/`MIN_NUM`/`MAX_NUM` forms
//! - [`Submission`]: the `name=value` pairs posted to the server
//! - [`DataBlocks`]: JSON blocks embedded in the host page
//!
//! # Example
//!
//! ```rust
//! use adminkit_formset::{Formset, ManagementConfig, MaxForms};
//!
//! let config = ManagementConfig::new("form", 0, 0).with_max(MaxForms::Limited(2));
//! let mut formset = Formset::mount(&config, Vec::new()).unwrap();
//!
//! formset.add_row().unwrap();
//! formset.add_row().unwrap();
//! assert!(formset.add_row().is_err());
//! assert_eq!(formset.rows().len(), formset.counters().total_forms());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod blocks;
pub mod counters;
pub mod error;
pub mod formset;
pub mod row;
pub mod submission;
pub mod value;

pub use blocks::DataBlocks;
pub use counters::{ManagementConfig, ManagementCounters, MaxForms};
pub use error::FormsetError;
pub use formset::Formset;
pub use row::{field_id, field_name, row_prefix, Row, DELETION_FIELD};
pub use submission::{parse_submission, FieldKind, FieldSchema, ParsedFormset, Submission};
pub use value::{FieldError, FieldErrors, FieldValue, FieldValues, RowData};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with formsets
    pub use crate::{
        DataBlocks, FieldError, FieldKind, FieldSchema, FieldValue, FieldValues, Formset,
        FormsetError, ManagementConfig, ManagementCounters, MaxForms, Row, RowData, Submission,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
