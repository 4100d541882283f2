//! Async driver for dependent option lists
//!
//! [`DependentOptions`] owns a [`LoaderState`] behind a mutex and runs each
//! fetch as a tokio task. The task resolves its ticket under the lock, so a
//! result can only be applied while its key is still current. Every change
//! is published on a watch channel for renderers.

use crate::source::OptionSource;
use crate::state::{DependencyKey, LoadState, LoaderState, Resolution};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Options that reload whenever the field they depend on changes
pub struct DependentOptions<S: OptionSource + ?Sized> {
    source: Arc<S>,
    state: Arc<Mutex<LoaderState>>,
    tx: Arc<watch::Sender<LoadState>>,
}

impl<S: OptionSource + ?Sized + 'static> DependentOptions<S> {
    /// Create idle loader over a source
    #[must_use]
    pub fn new(source: Arc<S>) -> Self {
        let (tx, _rx) = watch::channel(LoadState::default());
        Self {
            source,
            state: Arc::new(Mutex::new(LoaderState::new())),
            tx: Arc::new(tx),
        }
    }

    /// Receive every published state
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.tx.subscribe()
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn current(&self) -> LoadState {
        self.state.lock().state().clone()
    }

    /// React to a new dependency value
    ///
    /// Moves to `Loading` and spawns the fetch, returning its handle. The
    /// handle yields whether the result was applied or discarded as stale.
    /// An empty key settles immediately and returns `None`.
    ///
    /// Must be called within a tokio runtime.
    pub fn set_dependency(&self, key: impl Into<DependencyKey>) -> Option<JoinHandle<Resolution>> {
        let ticket = {
            let mut state = self.state.lock();
            let ticket = state.begin(key);
            self.tx.send_replace(state.state().clone());
            ticket
        }?;

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let tx = Arc::clone(&self.tx);

        Some(tokio::spawn(async move {
            let result = source.fetch(ticket.key()).await;

            let mut state = state.lock();
            let resolution = state.complete(&ticket, result);
            if !resolution.is_discarded() {
                tx.send_replace(state.state().clone());
            }
            resolution
        }))
    }

    /// Set the dependency and wait for its fetch to resolve
    ///
    /// Returns the state after resolution, which reflects a newer key if
    /// another change arrived in the meantime.
    pub async fn load(&self, key: impl Into<DependencyKey>) -> LoadState {
        if let Some(handle) = self.set_dependency(key) {
            if let Err(err) = handle.await {
                tracing::warn!("option fetch task failed: {err}");
            }
        }
        self.current()
    }

    /// Stop applying results, as on unmount
    pub fn detach(&self) {
        self.state.lock().detach();
    }
}

impl<S: OptionSource + ?Sized> Drop for DependentOptions<S> {
    fn drop(&mut self) {
        self.state.lock().detach();
    }
}

impl<S: OptionSource + ?Sized> std::fmt::Debug for DependentOptions<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependentOptions")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}
