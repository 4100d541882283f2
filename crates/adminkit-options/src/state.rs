//! Pure loader state
//!
//! [`LoaderState`] decides, without doing any I/O, whether a fetch result
//! still belongs to the current dependency key. Every [`begin`] bumps a
//! generation counter and hands out a [`FetchTicket`]; [`complete`] only
//! applies a result whose ticket carries the current key and generation.
//! Anything else is stale and is discarded without a transition.
//!
//! [`begin`]: LoaderState::begin
//! [`complete`]: LoaderState::complete

use crate::error::FetchError;
use crate::status::{validate_transition, LoadStatus};
use adminkit_choices::Choice;
use std::fmt;

/// Value of the field an option list depends on
///
/// An empty string is the same as no value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DependencyKey(Option<String>);

impl DependencyKey {
    /// Create key, treating `""` as empty
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self(None)
        } else {
            Self(Some(value))
        }
    }

    /// The empty key
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self(None)
    }

    /// Key value, if any
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Check if the key is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl From<&str> for DependencyKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DependencyKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Option<&str>> for DependencyKey {
    fn from(value: Option<&str>) -> Self {
        value.map_or_else(Self::empty, Self::new)
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or(""))
    }
}

/// Observable state of a dependent option list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadState {
    /// Load status
    pub status: LoadStatus,
    /// Key the options belong to
    pub key: DependencyKey,
    /// Options for `key`; empty unless `Ready`
    pub options: Vec<Choice>,
    /// Failure for `key`; set only when `Failed`
    pub error: Option<FetchError>,
}

impl LoadState {
    /// Check if options are available
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == LoadStatus::Ready
    }

    /// Check if an option value was loaded
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|choice| choice.value == value)
    }
}

/// Handle for one in-flight fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: String,
    generation: u64,
}

impl FetchTicket {
    /// Key to fetch options for
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Generation the fetch was started in
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a fetch result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The result was applied and the state moved to this status
    Applied(LoadStatus),
    /// The result was stale and dropped
    Discarded,
}

impl Resolution {
    /// Check if the result was dropped
    #[inline]
    #[must_use]
    pub fn is_discarded(self) -> bool {
        self == Self::Discarded
    }
}

/// Loader state plus the bookkeeping that detects stale results
#[derive(Debug, Clone, Default)]
pub struct LoaderState {
    state: LoadState,
    generation: u64,
    detached: bool,
}

impl LoaderState {
    /// Create idle state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading for a new key
    ///
    /// Any fetch still in flight becomes stale. An empty key settles to
    /// `Ready` with no options and returns `None`: no request is made.
    /// Once detached, nothing changes and `None` is returned.
    pub fn begin(&mut self, key: impl Into<DependencyKey>) -> Option<FetchTicket> {
        if self.detached {
            tracing::debug!("loader detached, ignoring key change");
            return None;
        }

        let key = key.into();
        self.generation += 1;
        self.state.options.clear();
        self.state.error = None;

        let Some(value) = key.as_str().map(str::to_owned) else {
            self.transition(LoadStatus::Ready);
            self.state.key = key;
            return None;
        };

        self.transition(LoadStatus::Loading);
        self.state.key = key;
        tracing::debug!(key = %value, generation = self.generation, "loading options");

        Some(FetchTicket {
            key: value,
            generation: self.generation,
        })
    }

    /// Apply a fetch result if it is still current
    ///
    /// A result is current when the loader is attached and the ticket
    /// matches the current key and generation. On failure the options stay
    /// empty and the error is kept; nothing is retried.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Choice>, FetchError>,
    ) -> Resolution {
        if self.detached {
            tracing::debug!(key = %ticket.key, "loader detached, discarding result");
            return Resolution::Discarded;
        }
        if ticket.generation != self.generation
            || self.state.key.as_str() != Some(ticket.key.as_str())
            || !self.state.status.is_loading()
        {
            tracing::debug!(
                key = %ticket.key,
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale options"
            );
            return Resolution::Discarded;
        }

        match result {
            Ok(options) => {
                tracing::debug!(key = %ticket.key, count = options.len(), "options loaded");
                self.transition(LoadStatus::Ready);
                self.state.options = options;
            }
            Err(err) => {
                tracing::warn!(key = %ticket.key, "failed to load options: {err}");
                self.transition(LoadStatus::Failed);
                self.state.error = Some(err);
            }
        }
        Resolution::Applied(self.state.status)
    }

    /// Stop applying results, as on unmount
    ///
    /// In-flight fetches may still finish; their results are discarded.
    pub fn detach(&mut self) {
        self.detached = true;
        self.generation += 1;
    }

    /// Check if the loader was detached
    #[inline]
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Current generation
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn transition(&mut self, to: LoadStatus) {
        debug_assert!(
            validate_transition(self.state.status, to).is_ok(),
            "illegal load transition {:?} -> {to:?}",
            self.state.status
        );
        self.state.status = to;
    }
}
