// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search reply decoding
//!
//! [`SearchResult`] mirrors the engine's search reply. Document sources and
//! aggregation results stay raw until the caller asks for a concrete type.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::error::QueryError;

/// Decoded search reply.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "_shards", default)]
    pub shards: ShardsInfo,
    #[serde(default)]
    pub hits: SearchHits,
    #[serde(default)]
    pub timed_out: bool,
    /// Elapsed time in milliseconds
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub aggregations: Option<Box<RawValue>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShardsInfo {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub successful: u64,
    #[serde(default)]
    pub failed: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub total: TotalHits,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// `hits.total`: a plain count, or `{"value": n, "relation": "eq"}` on newer engines.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Object {
        value: u64,
        #[serde(default)]
        relation: Option<String>,
    },
}

impl Default for TotalHits {
    fn default() -> Self {
        TotalHits::Count(0)
    }
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) => *n,
            TotalHits::Object { value, .. } => *value,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Option<Box<RawValue>>,
    #[serde(rename = "_type", default)]
    pub doc_type: Option<String>,
}

impl SearchHit {
    /// Deserialize the document source.
    pub fn source_as<T: DeserializeOwned>(&self) -> Result<Option<T>, QueryError> {
        match &self.source {
            Some(raw) => Ok(Some(serde_json::from_str(raw.get())?)),
            None => Ok(None),
        }
    }
}

impl SearchResult {
    /// Decode a raw reply body.
    pub fn from_slice(body: &[u8]) -> Result<Self, QueryError> {
        Ok(serde_json::from_slice(body)?)
    }

    pub fn total_hits(&self) -> u64 {
        self.hits.total.value()
    }

    /// Deserialize the aggregation results.
    pub fn aggregations_as<T: DeserializeOwned>(&self) -> Result<Option<T>, QueryError> {
        match &self.aggregations {
            Some(raw) => Ok(Some(serde_json::from_str(raw.get())?)),
            None => Ok(None),
        }
    }
}

/// Error reply from the engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineError {
    #[serde(default)]
    pub status: u16,
    #[serde(rename = "error", default)]
    pub details: Option<ErrorDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetails {
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub reason: String,
    #[serde(rename = "resource.type", default)]
    pub resource_type: Option<String>,
    #[serde(rename = "resource.id", default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub grouped: bool,
    #[serde(default)]
    pub caused_by: Option<Map<String, Value>>,
    #[serde(default)]
    pub root_cause: Vec<ErrorDetails>,
    #[serde(default)]
    pub failed_shards: Vec<Map<String, Value>>,
}

impl EngineError {
    /// Build from an HTTP status and error body.
    ///
    /// Falls back to the HTTP status alone when the body is empty or not an
    /// engine error document.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let fallback = EngineError { status, details: None };
        if body.is_empty() {
            return fallback;
        }
        match serde_json::from_slice::<EngineError>(body) {
            Ok(reply) if reply.status != 0 => reply,
            Ok(reply) => EngineError { status, ..reply },
            Err(_) => fallback,
        }
    }

    fn status_text(&self) -> &'static str {
        reqwest::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) if !details.reason.is_empty() => write!(
                f,
                "Search engine error {} ({}): {} [type={}]",
                self.status,
                self.status_text(),
                details.reason,
                details.error_type
            ),
            _ => write!(f, "Search engine error {} ({})", self.status, self.status_text()),
        }
    }
}

impl std::error::Error for EngineError {}
