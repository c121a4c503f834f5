// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search request building
//!
//! ```text
//! SearchQuery (chained configuration)
//!     ├─→ build()         → query document (size, from, explain, query, sort, aggregations)
//!     ├─→ build_path()    → /{indices}/{types}/_search
//!     └─→ build_request() → SearchRequest → Transport
//! ```

mod request;
mod search_query;

pub use request::{build_path, SearchRequest};
pub use search_query::{SearchQuery, SortOrder, DEFAULT_LIMIT};
