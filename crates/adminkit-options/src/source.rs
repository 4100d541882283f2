//! Option source abstraction

use crate::error::FetchError;
use adminkit_choices::Choice;
use async_trait::async_trait;
use std::sync::Arc;

/// Anything that can produce the options for a dependency key
///
/// Implement this trait to plug in a remote endpoint, a cache or a fixture.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OptionSource: Send + Sync {
    /// Fetch options for a non-empty key
    async fn fetch(&self, key: &str) -> Result<Vec<Choice>, FetchError>;
}

#[async_trait]
impl<S: OptionSource + ?Sized> OptionSource for Arc<S> {
    async fn fetch(&self, key: &str) -> Result<Vec<Choice>, FetchError> {
        (**self).fetch(key).await
    }
}
