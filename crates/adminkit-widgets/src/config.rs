//! Runtime configuration
//!
//! Where the selection list endpoints live and how their responses are
//! cached. Read from an optional TOML file; `ADMINKIT_BASE_URL` in the
//! environment overrides the base URL.

use crate::error::WidgetError;
use crate::selectielijst::{ProcestypeDecoder, YEAR_PARAM, ZAAKTYPE_PARAM};
use adminkit_options::{CachedOptionSource, DecodeChoices, HttpOptionSource, OptionSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Environment variable overriding [`AdminkitConfig::base_url`]
pub const BASE_URL_ENV: &str = "ADMINKIT_BASE_URL";

/// Default procestypen endpoint path
pub const PROCESTYPEN_ENDPOINT: &str = "/admin/api/v1/catalogi/selectielijst/procestypen";
/// Default resultaten endpoint path
pub const RESULTATEN_ENDPOINT: &str = "/admin/api/v1/catalogi/selectielijst/resultaten";

/// Shared option source handed to the dropdowns
pub type SharedSource = Arc<dyn OptionSource>;

/// Configuration for the remote-backed widgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminkitConfig {
    /// Admin origin the endpoint paths resolve against
    pub base_url: String,
    /// Procestypen endpoint path
    pub procestypen_endpoint: String,
    /// Resultaten endpoint path
    pub resultaten_endpoint: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Cached responses per endpoint
    pub cache_capacity: u64,
    /// Cache entry lifetime in seconds; 0 disables caching
    pub cache_ttl_secs: u64,
}

impl Default for AdminkitConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/".to_string(),
            procestypen_endpoint: PROCESTYPEN_ENDPOINT.to_string(),
            resultaten_endpoint: RESULTATEN_ENDPOINT.to_string(),
            request_timeout_secs: 30,
            cache_capacity: 256,
            cache_ttl_secs: 300,
        }
    }
}

impl AdminkitConfig {
    /// Create with defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// With cache capacity and lifetime
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, capacity: u64, ttl_secs: u64) -> Self {
        self.cache_capacity = capacity;
        self.cache_ttl_secs = ttl_secs;
        self
    }

    /// Parse from TOML; missing keys take their defaults
    ///
    /// # Errors
    /// - `WidgetError::Config` if the TOML is malformed
    pub fn from_toml_str(s: &str) -> Result<Self, WidgetError> {
        toml::from_str(s).map_err(|err| WidgetError::Config(err.to_string()))
    }

    /// Load from an optional file, then apply environment overrides
    ///
    /// # Errors
    /// - `WidgetError::Config` if the file cannot be read or parsed
    pub fn load<H: BuildHasher>(
        path: Option<&Path>,
        env: &HashMap<String, String, H>,
    ) -> Result<Self, WidgetError> {
        let config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|err| {
                    WidgetError::Config(format!("cannot read {}: {err}", path.display()))
                })?;
                Self::from_toml_str(&contents)?
            }
            None => Self::default(),
        };
        Ok(config.with_env_overrides(env))
    }

    /// Apply environment overrides
    #[must_use]
    pub fn with_env_overrides<H: BuildHasher>(mut self, env: &HashMap<String, String, H>) -> Self {
        if let Some(base_url) = env.get(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            tracing::debug!(base_url = %base_url, "base url from environment");
            self.base_url.clone_from(base_url);
        }
        self
    }

    /// Parsed base URL
    ///
    /// # Errors
    /// - `WidgetError::Config` if the base URL is not absolute
    pub fn base(&self) -> Result<Url, WidgetError> {
        Url::parse(&self.base_url)
            .map_err(|err| WidgetError::Config(format!("invalid base_url {:?}: {err}", self.base_url)))
    }

    /// Request timeout
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Source for the procestype select, keyed by year
    ///
    /// # Errors
    /// - `WidgetError::Config` if the base URL is invalid
    /// - `WidgetError::Fetch` if the endpoint or client cannot be built
    pub fn procestypen_source(&self) -> Result<SharedSource, WidgetError> {
        let source = HttpOptionSource::from_base(&self.base()?, &self.procestypen_endpoint, YEAR_PARAM)?
            .with_decoder(ProcestypeDecoder);
        self.finish(source)
    }

    /// Source for the result class radios, keyed by zaaktype id
    ///
    /// # Errors
    /// - `WidgetError::Config` if the base URL is invalid
    /// - `WidgetError::Fetch` if the endpoint or client cannot be built
    pub fn resultaten_source(&self) -> Result<SharedSource, WidgetError> {
        let source =
            HttpOptionSource::from_base(&self.base()?, &self.resultaten_endpoint, ZAAKTYPE_PARAM)?;
        self.finish(source)
    }

    fn finish<D>(&self, source: HttpOptionSource<D>) -> Result<SharedSource, WidgetError>
    where
        D: DecodeChoices + 'static,
    {
        let source = source.with_timeout(self.request_timeout())?;
        if self.cache_ttl_secs == 0 {
            return Ok(Arc::new(source));
        }
        Ok(Arc::new(CachedOptionSource::with_ttl(
            source,
            self.cache_capacity,
            Duration::from_secs(self.cache_ttl_secs),
        )))
    }
}
