//! adminkit Choices - choice lists and dependent filtering
//!
//! Provides the read-only choice data that admin widgets render from:
//! - [`Choice`] and [`ChoiceList`]: ordered `(value, label)` pairs
//! - [`PrefixTable`]: parent key to value prefixes
//! - [`filter_choices`]: narrow a choice list to one parent key
//! - [`DependentChoices`]: a selection that follows its parent
//!
//! # Example
//!
//! ```rust
//! use adminkit_choices::{filter_choices, Choice, PrefixTable};
//!
//! let table = PrefixTable::from_iter([("zrc", ["zaken"])]);
//! let choices = vec![
//!     Choice::new("zaken.lezen", "Read"),
//!     Choice::new("besluiten.lezen", "Read"),
//! ];
//!
//! let available = filter_choices("zrc", &table, &choices);
//! assert_eq!(available, vec![Choice::new("zaken.lezen", "Read")]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod choice;
pub mod dependent;
pub mod error;
pub mod prefix;

pub use choice::{Choice, ChoiceList};
pub use dependent::{ChoiceCatalog, DependentChoices};
pub use error::ChoiceError;
pub use prefix::{filter_choices, matches_prefix, PrefixTable, SEPARATOR};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with choices
    pub use crate::{
        filter_choices, Choice, ChoiceCatalog, ChoiceError, ChoiceList, DependentChoices,
        PrefixTable,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
