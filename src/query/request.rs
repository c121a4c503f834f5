// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Request Assembler
//!
//! Turns index/type names, query-string options and a built query document
//! into a transport-ready [`SearchRequest`].
//!
//! # Path Syntax
//!
//! ```text
//! /{index,...}/{type,...}/_search   - indices and types
//! /{index,...}/_search              - indices only
//! /{type,...}/_search               - types only
//! /_search                          - neither
//! ```

use reqwest::Method;
use serde_json::Value;

use crate::error::QueryError;

const SEARCH_ENDPOINT: &str = "_search";

/// Characters that cannot appear in an index or type name.
const FORBIDDEN: &[char] = &['/', '\\', '?', '#', '"', '<', '>', '|', ','];

/// A search request ready for a [`crate::transport::Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub method: Method,
    /// Percent-encoded path, e.g. `/logs-2024,logs-2025/_search`
    pub path: String,
    /// Query-string parameters in insertion order
    pub params: Vec<(String, String)>,
    /// Query document
    pub body: Value,
}

impl SearchRequest {
    pub fn new(path: String, params: Vec<(String, String)>, body: Value) -> Self {
        Self { method: Method::GET, path, params, body }
    }

    /// Path with the encoded query string appended.
    pub fn path_and_query(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let query = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

/// Build the engine path for the given indices and types.
pub fn build_path(indices: &[String], types: &[String]) -> Result<String, QueryError> {
    let path = match (indices.is_empty(), types.is_empty()) {
        (false, false) => format!(
            "/{}/{}/{}",
            encode_segment(indices)?,
            encode_segment(types)?,
            SEARCH_ENDPOINT
        ),
        (false, true) => format!("/{}/{}", encode_segment(indices)?, SEARCH_ENDPOINT),
        (true, false) => format!("/{}/{}", encode_segment(types)?, SEARCH_ENDPOINT),
        (true, true) => format!("/{}", SEARCH_ENDPOINT),
    };
    Ok(path)
}

fn encode_segment(names: &[String]) -> Result<String, QueryError> {
    let encoded = names
        .iter()
        .map(|name| validate_name(name).map(|()| urlencoding::encode(name).into_owned()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(encoded.join(","))
}

fn validate_name(name: &str) -> Result<(), QueryError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.contains(FORBIDDEN) {
        Some("contains a reserved path character")
    } else if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        Some("contains whitespace or control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(QueryError::PathTemplate { segment: name.to_string(), reason }),
        None => Ok(()),
    }
}
