// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Condition language
//!
//! A compact, composable condition language compiled to the engine's bool query.
//!
//! # Architecture
//!
//! ```text
//! serde_json::Value (nested arrays / objects)
//!     ↓  coercion (Condition::from)
//! Condition (Empty | Hash | Operator)
//!     ↓  ConditionTranslator::translate
//! Option<QueryClause> → serialized query DSL
//! ```
//!
//! # Example
//!
//! ```rust
//! use esquery::condition::ConditionTranslator;
//! use serde_json::json;
//!
//! let clause = ConditionTranslator::translate_value(&json!([
//!     "and",
//!     ["between", "created", "2020-03-07T00:00:00", "2020-03-07T23:59:59"],
//!     [{"flag": ["1"]}]
//! ]))
//! .unwrap()
//! .unwrap();
//!
//! assert_eq!(
//!     clause.to_value(),
//!     json!({"bool": {"must": [
//!         {"range": {"created": {"gte": "2020-03-07T00:00:00", "lte": "2020-03-07T23:59:59"}}},
//!         {"bool": {"must": [{"terms": {"flag": ["1"]}}]}}
//!     ]}})
//! );
//! ```

mod clause;
mod translator;
mod value;

pub use clause::{BoolQuery, Clauses, QueryClause, RangeBound};
pub use translator::{ConditionTranslator, ID_FIELD, UID_FIELD};
pub use value::{is_null_marker, Condition, Operand, Operator, NULL_MARKER};
