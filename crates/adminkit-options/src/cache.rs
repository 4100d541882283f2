//! Response cache for option sources using moka
//!
//! Only successful fetches are cached; a failed key is fetched again on the
//! next request.

use crate::error::FetchError;
use crate::source::OptionSource;
use adminkit_choices::Choice;
use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

/// Option source that remembers answers per key
#[derive(Debug, Clone)]
pub struct CachedOptionSource<S> {
    inner: S,
    cache: Cache<String, Vec<Choice>>,
}

impl<S: OptionSource> CachedOptionSource<S> {
    /// Create cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(inner: S, max_capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(max_capacity),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(inner: S, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Wrapped source
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop the cached answer for a key
    #[inline]
    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    /// Drop every cached answer
    #[inline]
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Number of cached keys
    ///
    /// Runs pending maintenance first so the count is exact.
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

#[async_trait]
impl<S: OptionSource> OptionSource for CachedOptionSource<S> {
    async fn fetch(&self, key: &str) -> Result<Vec<Choice>, FetchError> {
        if let Some(cached) = self.cache.get(key).await {
            tracing::trace!(key, "options cache hit");
            return Ok(cached);
        }

        let options = self.inner.fetch(key).await?;
        self.cache.insert(key.to_string(), options.clone()).await;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockOptionSource;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let mut inner = MockOptionSource::new();
        inner
            .expect_fetch()
            .with(eq("2020"))
            .times(1)
            .returning(|_| Ok(vec![Choice::new("https://x/1", "1 - Inrichten")]));

        let source = CachedOptionSource::new(inner, 16);
        let first = source.fetch("2020").await.unwrap();
        let second = source.fetch("2020").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.entry_count().await, 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let mut inner = MockOptionSource::new();
        inner
            .expect_fetch()
            .times(2)
            .returning(|_| Err(FetchError::status(502, "http://x/")));

        let source = CachedOptionSource::new(inner, 16);
        assert!(source.fetch("2020").await.is_err());
        assert!(source.fetch("2020").await.is_err());
        assert_eq!(source.entry_count().await, 0);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let mut inner = MockOptionSource::new();
        inner.expect_fetch().times(2).returning(|_| Ok(Vec::new()));

        let source = CachedOptionSource::new(inner, 16);
        source.fetch("2021").await.unwrap();
        source.invalidate("2021").await;
        source.fetch("2021").await.unwrap();
    }
}
