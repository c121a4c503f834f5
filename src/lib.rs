//! # esquery
//!
//! Compiles a compact condition language into Elasticsearch bool queries and
//! runs the resulting searches.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Condition language                      │
//! │  • Nested arrays / objects: ["and", ["in", "f", [1]], ...] │
//! │  • Coerced into a typed Condition tree                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                    (ConditionTranslator)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SearchQuery                           │
//! │  • Accumulates indices, types, paging, sort, aggregations  │
//! │  • Builds the request path, params and body                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                    (Client → Transport)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Search engine                           │
//! │  • HttpTransport (reqwest) or MemoryTransport (tests)      │
//! │  • Replies decoded into SearchResult                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use esquery::{Client, ClientConfig, SortOrder};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ClientConfig {
//!         url: "http://localhost:9200".into(),
//!         ..Default::default()
//!     };
//!     let client = Client::new(&config).expect("Failed to build client");
//!
//!     let result = client
//!         .search(["waybills"])
//!         .where_and(json!(["between", "order_time", "2020-03-07T00:00:00", "2020-03-07T23:59:59"]))
//!         .where_and(json!(["status", "open"]))
//!         .order_by([("order_time", SortOrder::Desc)])
//!         .limit(20)
//!         .execute(&client)
//!         .await
//!         .expect("Search failed");
//!
//!     for hit in &result.hits.hits {
//!         println!("{}: {:?}", hit.id, hit.source);
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`condition`]: Condition model and its translation to query clauses
//! - [`query`]: The [`SearchQuery`] accumulator and request assembly
//! - [`transport`]: The [`Transport`] seam plus HTTP and in-memory implementations
//! - [`response`]: Search reply and engine error decoding
//! - [`client`]: The [`Client`] tying queries to a transport

pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod metrics;
pub mod query;
pub mod response;
pub mod transport;

pub use client::Client;
pub use condition::{Condition, ConditionTranslator, Operator, QueryClause};
pub use config::ClientConfig;
pub use error::QueryError;
pub use metrics::LatencyTimer;
pub use query::{SearchQuery, SearchRequest, SortOrder};
pub use response::{EngineError, SearchHit, SearchResult, TotalHits};
pub use transport::{HttpTransport, MemoryTransport, RawResponse, Transport, TransportError};
