//! Remote option endpoint
//!
//! The endpoint takes the dependency key as a single query parameter and
//! answers with JSON. Any non-2xx status is a failure. The body shape
//! differs per endpoint, so decoding is a separate [`DecodeChoices`] step.

use crate::error::FetchError;
use crate::source::OptionSource;
use adminkit_choices::Choice;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Turns an endpoint's JSON body into choices
pub trait DecodeChoices: Send + Sync {
    /// Decode a response body
    ///
    /// # Errors
    /// - `FetchError::Decode` if the body has the wrong shape
    fn decode(&self, body: serde_json::Value) -> Result<Vec<Choice>, FetchError>;
}

/// Decodes `[[value, label], ...]`
#[derive(Debug, Clone, Copy, Default)]
pub struct PairDecoder;

impl DecodeChoices for PairDecoder {
    fn decode(&self, body: serde_json::Value) -> Result<Vec<Choice>, FetchError> {
        serde_json::from_value(body).map_err(|err| FetchError::Decode(err.to_string()))
    }
}

/// Option source backed by an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpOptionSource<D = PairDecoder> {
    client: reqwest::Client,
    endpoint: Url,
    param: String,
    decoder: D,
}

impl HttpOptionSource<PairDecoder> {
    /// Create source for an endpoint returning `[value, label]` pairs
    #[must_use]
    pub fn new(endpoint: Url, param: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            param: param.into(),
            decoder: PairDecoder,
        }
    }

    /// Create source for `path` resolved against `base`
    ///
    /// # Errors
    /// - `FetchError::InvalidEndpoint` if the URL cannot be resolved
    pub fn from_base(base: &Url, path: &str, param: impl Into<String>) -> Result<Self, FetchError> {
        Ok(Self::new(base.join(path)?, param))
    }
}

impl<D> HttpOptionSource<D> {
    /// With a different body decoder
    #[must_use]
    pub fn with_decoder<E: DecodeChoices>(self, decoder: E) -> HttpOptionSource<E> {
        HttpOptionSource {
            client: self.client,
            endpoint: self.endpoint,
            param: self.param,
            decoder,
        }
    }

    /// With a preconfigured client
    #[inline]
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// With a per-request timeout
    ///
    /// # Errors
    /// - `FetchError::Transport` if the client cannot be built
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, FetchError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        Ok(self)
    }

    /// Endpoint URL without the query parameter
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Query parameter carrying the key
    #[inline]
    #[must_use]
    pub fn param(&self) -> &str {
        &self.param
    }

    /// URL requested for a key
    #[must_use]
    pub fn request_url(&self, key: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(&self.param, key);
        url
    }
}

#[async_trait]
impl<D: DecodeChoices> OptionSource for HttpOptionSource<D> {
    async fn fetch(&self, key: &str) -> Result<Vec<Choice>, FetchError> {
        let url = self.request_url(key);
        tracing::debug!(%url, "requesting options");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(status.as_u16(), url.as_str()));
        }

        let body: serde_json::Value = response.json().await?;
        self.decoder.decode(body)
    }
}
