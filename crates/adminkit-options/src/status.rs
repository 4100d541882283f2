//! Load status and its transition table

use crate::error::LoaderError;
use serde::{Deserialize, Serialize};

/// Where a dependent option list is in its load cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch for the current key is in flight
    Loading,
    /// Options for the current key are available
    Ready,
    /// The fetch for the current key failed
    Failed,
}

impl LoadStatus {
    /// Check if a fetch is in flight
    #[inline]
    #[must_use]
    pub fn is_loading(self) -> bool {
        self == Self::Loading
    }

    /// Check if the status is final for the current key
    #[inline]
    #[must_use]
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

/// Validates a status transition
///
/// # Errors
/// - `LoaderError::IllegalTransition` if `to` is not reachable from `from`
pub fn validate_transition(from: LoadStatus, to: LoadStatus) -> Result<(), LoaderError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(LoaderError::IllegalTransition { from, to })
    }
}

/// Statuses reachable from `from` in one step
///
/// `Loading -> Loading` is a key change while a fetch is in flight. The
/// `-> Ready` edges out of `Idle`, `Ready` and `Failed` are the empty-key
/// short-circuit, which settles without a request.
#[must_use]
pub fn allowed_transitions(from: LoadStatus) -> Vec<LoadStatus> {
    use LoadStatus::*;
    match from {
        Idle => vec![Loading, Ready],
        Loading => vec![Loading, Ready, Failed],
        Ready => vec![Loading, Ready],
        Failed => vec![Loading, Ready],
    }
}

fn allowed(from: LoadStatus, to: LoadStatus) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use LoadStatus::*;

    #[test]
    fn every_status_can_start_loading() {
        for from in [Idle, Loading, Ready, Failed] {
            assert!(validate_transition(from, Loading).is_ok(), "{from:?}");
        }
    }

    #[test]
    fn only_loading_can_fail() {
        assert!(validate_transition(Loading, Failed).is_ok());
        for from in [Idle, Ready, Failed] {
            assert_eq!(
                validate_transition(from, Failed),
                Err(LoaderError::IllegalTransition { from, to: Failed })
            );
        }
    }

    #[test]
    fn nothing_returns_to_idle() {
        for from in [Idle, Loading, Ready, Failed] {
            assert!(validate_transition(from, Idle).is_err());
        }
    }

    #[test]
    fn settled_statuses() {
        assert!(Ready.is_settled());
        assert!(Failed.is_settled());
        assert!(!Loading.is_settled());
        assert!(Loading.is_loading());
    }
}
