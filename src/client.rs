// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search client.
//!
//! Owns a [`Transport`] and hands out [`SearchQuery`] accumulators.
//!
//! ```rust,no_run
//! use esquery::{Client, ClientConfig};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), esquery::QueryError> {
//! let client = Client::new(&ClientConfig::default())?;
//! let result = client
//!     .search(["waybills"])
//!     .where_and(json!(["between", "order_time", "2020-03-07T00:00:00", "2020-03-07T23:59:59"]))
//!     .execute(&client)
//!     .await?;
//! println!("{} hits", result.total_hits());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::QueryError;
use crate::metrics;
use crate::query::{SearchQuery, SearchRequest};
use crate::response::SearchResult;
use crate::transport::{HttpTransport, Transport};

#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// HTTP client for the configured engine.
    pub fn new(config: &ClientConfig) -> Result<Self, QueryError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Start a search over the given indices.
    pub fn search<I, S>(&self, indices: I) -> SearchQuery
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchQuery::new().index(indices)
    }

    /// Send an assembled request and decode the reply.
    pub async fn perform(&self, request: &SearchRequest) -> Result<SearchResult, QueryError> {
        let _timer = metrics::LatencyTimer::new();
        let result = self.send(request).await;

        match &result {
            Ok(search) => {
                debug!(
                    path = %request.path,
                    hits = search.total_hits(),
                    took_ms = search.took,
                    "Search completed"
                );
                metrics::record_search("success");
                metrics::record_search_hits(search.hits.hits.len());
            }
            Err(e) => {
                debug!(path = %request.path, error = %e, "Search failed");
                metrics::record_search(e.kind());
            }
        }
        result
    }

    async fn send(&self, request: &SearchRequest) -> Result<SearchResult, QueryError> {
        let response = self.transport.perform(request).await?;
        SearchResult::from_slice(&response.body)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}
