//! adminkit Options - async option lists for dependent dropdowns
//!
//! A dropdown whose options depend on another field reloads on every change
//! of that field. Responses can arrive out of order; only the response for
//! the current key is ever shown.
//!
//! - [`LoadStatus`]: `Idle -> Loading -> Ready | Failed` with a transition table
//! - [`LoaderState`]: pure state, decides which results are stale
//! - [`OptionSource`]: where options come from
//! - [`HttpOptionSource`]: remote endpoint via reqwest
//! - [`CachedOptionSource`]: moka-backed response cache
//! - [`DependentOptions`]: tokio driver publishing state on a watch channel
//!
//! # Example
//!
//! ```rust
//! use adminkit_options::{LoaderState, LoadStatus};
//! use adminkit_choices::Choice;
//!
//! let mut loader = LoaderState::new();
//! let stale = loader.begin("2019").unwrap();
//! let current = loader.begin("2020").unwrap();
//!
//! loader.complete(&current, Ok(vec![Choice::same("2020-a")]));
//! assert!(loader.complete(&stale, Ok(vec![Choice::same("2019-a")])).is_discarded());
//! assert_eq!(loader.state().status, LoadStatus::Ready);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod error;
pub mod http;
pub mod loader;
pub mod source;
pub mod state;
pub mod status;

pub use cache::CachedOptionSource;
pub use error::{FetchError, LoaderError};
pub use http::{DecodeChoices, HttpOptionSource, PairDecoder};
pub use loader::DependentOptions;
pub use source::OptionSource;
pub use state::{DependencyKey, FetchTicket, LoadState, LoaderState, Resolution};
pub use status::{allowed_transitions, validate_transition, LoadStatus};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for loading options
    pub use crate::{
        DependencyKey, DependentOptions, FetchError, LoadState, LoadStatus, OptionSource,
        Resolution,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
