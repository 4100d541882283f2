//! Structured data blocks embedded in the host page
//!
//! The server renders each input a widget needs as a JSON script element
//! with a well-known id. [`DataBlocks`] holds those blocks, keyed by element
//! id, and decodes them into typed values on demand.

use crate::error::FormsetError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// JSON blocks keyed by element id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataBlocks {
    blocks: Map<String, Value>,
}

impl DataBlocks {
    /// Create empty set of blocks
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `{element id: block}`
    ///
    /// # Errors
    /// - `FormsetError::MalformedBlocks` if the text is not a JSON object
    pub fn from_json_str(json: &str) -> Result<Self, FormsetError> {
        let blocks: Map<String, Value> = serde_json::from_str(json)?;
        Ok(Self { blocks })
    }

    /// Add or replace a block
    pub fn insert(&mut self, id: impl Into<String>, block: Value) {
        self.blocks.insert(id.into(), block);
    }

    /// With a block
    #[inline]
    #[must_use]
    pub fn with(mut self, id: impl Into<String>, block: Value) -> Self {
        self.insert(id, block);
        self
    }

    /// Check if a block is present
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.blocks.contains_key(id)
    }

    /// Element ids present
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    /// Decode a required block
    ///
    /// # Errors
    /// - `FormsetError::MissingBlock` if no block has this id
    /// - `FormsetError::InvalidBlock` if the block does not decode as `T`
    pub fn get<T: DeserializeOwned>(&self, id: &str) -> Result<T, FormsetError> {
        let block = self
            .blocks
            .get(id)
            .ok_or_else(|| FormsetError::MissingBlock(id.to_string()))?;
        decode(id, block)
    }

    /// Decode an optional block
    ///
    /// # Errors
    /// - `FormsetError::InvalidBlock` if the block is present but does not decode as `T`
    pub fn get_optional<T: DeserializeOwned>(&self, id: &str) -> Result<Option<T>, FormsetError> {
        match self.blocks.get(id) {
            Some(Value::Null) | None => Ok(None),
            Some(block) => decode(id, block).map(Some),
        }
    }
}

fn decode<T: DeserializeOwned>(id: &str, block: &Value) -> Result<T, FormsetError> {
    Deserialize::deserialize(block).map_err(|source| FormsetError::InvalidBlock {
        id: id.to_string(),
        source,
    })
}
