// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query Accumulator
//!
//! Fluent builder that collects the where-expression, pagination, sort,
//! aggregations and options of one search request.
//!
//! # Example
//!
//! ```rust
//! use esquery::query::{SearchQuery, SortOrder};
//! use serde_json::json;
//!
//! let query = SearchQuery::new()
//!     .index(["waybills"])
//!     .where_and(json!(["between", "order_time", "2020-03-07T00:00:00", "2020-03-07T23:59:59"]))
//!     .where_and(json!(["status", "shipped"]))
//!     .order_by([("order_time", SortOrder::Desc)])
//!     .limit(20);
//!
//! let body = query.build().unwrap();
//! assert_eq!(body["size"], json!(20));
//! assert_eq!(query.build_path().unwrap(), "/waybills/_search");
//! ```

use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use super::request::{build_path, SearchRequest};
use crate::client::Client;
use crate::condition::{Condition, ConditionTranslator, Operand, Operator};
use crate::error::QueryError;
use crate::response::SearchResult;
use crate::transport::TransportError;

/// A tag that is not an operator, so `[tag, value]` reads as an equality pair.
fn is_field_name(tag: &str) -> bool {
    matches!(tag.parse::<Operator>(), Ok(Operator::Unrecognized(_)))
}

/// Default page size.
pub const DEFAULT_LIMIT: i64 = 10;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Accumulates one search request.
///
/// Created per request, configured through chained calls and consumed by
/// [`SearchQuery::execute`].
#[derive(Debug, Clone)]
pub struct SearchQuery {
    indices: Vec<String>,
    types: Vec<String>,
    limit: i64,
    offset: i64,
    source: Option<Value>,
    where_condition: Option<Condition>,
    query: Option<Value>,
    sort: Option<Vec<Map<String, Value>>>,
    aggregations: Map<String, Value>,
    timeout: Option<String>,
    explain: bool,
    options: IndexMap<String, String>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Self {
            indices: Vec::new(),
            types: Vec::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            source: None,
            where_condition: None,
            query: None,
            sort: None,
            aggregations: Map::new(),
            timeout: None,
            explain: false,
            options: IndexMap::new(),
        }
    }

    /// Append index names to search.
    pub fn index<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(names.into_iter().map(Into::into));
        self
    }

    /// Append document type names to search.
    pub fn doc_type<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(names.into_iter().map(Into::into));
        self
    }

    /// Page size; values <= 0 omit `size` from the document.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Page offset; values <= 0 omit `from` from the document.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Field selection, emitted as `_source`.
    pub fn select_fields(mut self, source: Value) -> Self {
        self.source = Some(source);
        self
    }

    /// Add a condition joined with AND.
    ///
    /// `condition` is a full condition (`["in", "status", ["a"]]`,
    /// `[{"status": "a"}]`). Once a where-expression exists, a two-element
    /// `[field, value]` array whose first element is not an operator tag is
    /// read as an equality pair.
    pub fn where_and(self, condition: Value) -> Self {
        self.add_where(Operator::And, condition)
    }

    /// Add a condition joined with OR.
    pub fn where_or(self, condition: Value) -> Self {
        self.add_where(Operator::Or, condition)
    }

    fn add_where(mut self, joiner: Operator, condition: Value) -> Self {
        let operands = match condition {
            Value::Array(items) => items,
            other => vec![other],
        };

        match self.where_condition.as_mut() {
            // The first clause becomes the root under "and" whichever joiner was used.
            None => {
                self.where_condition = Some(Condition::Operator {
                    operator: Operator::And,
                    operands: vec![Operand::Condition(Condition::from_sequence(operands))],
                });
            }
            Some(root) => {
                let nested = match operands.as_slice() {
                    [Value::String(field), value] if is_field_name(field) => {
                        Condition::field_eq(field.clone(), value.clone())
                    }
                    _ => Condition::from_sequence(operands),
                };
                let clause = Condition::Operator {
                    operator: joiner,
                    operands: vec![Operand::Condition(nested)],
                };
                let appended = root.push_operand(Operand::Condition(clause));
                debug_assert!(appended, "where root is always an operator condition");
            }
        }
        self
    }

    /// Raw query document, used only when no where-expression is set.
    pub fn query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    /// Append one sort directive map built from `(field, order)` pairs.
    pub fn order_by<I, K>(mut self, directives: I) -> Self
    where
        I: IntoIterator<Item = (K, SortOrder)>,
        K: Into<String>,
    {
        let directive: Map<String, Value> = directives
            .into_iter()
            .map(|(field, order)| (field.into(), Value::String(order.as_str().to_string())))
            .collect();
        self.sort.get_or_insert_with(Vec::new).push(directive);
        self
    }

    /// Add (or replace) a named aggregation.
    pub fn add_aggregation(mut self, name: impl Into<String>, spec: Value) -> Self {
        self.aggregations.insert(name.into(), spec);
        self
    }

    /// Add (or replace) a named aggregation of the given type, e.g. `terms`.
    pub fn add_agg(self, name: impl Into<String>, agg_type: impl Into<String>, options: Value) -> Self {
        let mut spec = Map::new();
        spec.insert(agg_type.into(), options);
        self.add_aggregation(name, Value::Object(spec))
    }

    /// Search timeout, e.g. `"5s"`.
    pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    pub fn explain_results(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    /// Query-string option, e.g. `search_type`.
    pub fn set_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// The accumulated where-expression.
    pub fn where_condition(&self) -> Option<&Condition> {
        self.where_condition.as_ref()
    }

    /// Engine path for the configured indices and types.
    pub fn build_path(&self) -> Result<String, QueryError> {
        build_path(&self.indices, &self.types)
    }

    /// Build the query document. Performs no I/O and leaves `self` untouched.
    pub fn build(&self) -> Result<Value, QueryError> {
        let mut parts = Map::new();

        if self.limit > 0 {
            parts.insert("size".into(), Value::from(self.limit));
        }
        if self.offset > 0 {
            parts.insert("from".into(), Value::from(self.offset));
        }
        if self.explain {
            parts.insert("explain".into(), Value::Bool(true));
        }

        let where_clause = match &self.where_condition {
            Some(condition) => ConditionTranslator::translate(condition)?,
            None => None,
        };
        if let Some(clause) = where_clause {
            parts.insert("query".into(), clause.to_value());
        } else if let Some(query) = &self.query {
            parts.insert("query".into(), query.clone());
        }

        if let Some(source) = &self.source {
            parts.insert("_source".into(), source.clone());
        }
        if let Some(timeout) = &self.timeout {
            parts.insert("timeout".into(), Value::String(timeout.clone()));
        }
        if let Some(sort) = &self.sort {
            let sort = sort.iter().cloned().map(Value::Object).collect();
            parts.insert("sort".into(), Value::Array(sort));
        }
        parts.insert("aggregations".into(), Value::Object(self.aggregations.clone()));

        Ok(Value::Object(parts))
    }

    /// Assemble path, options and document into a transport-ready request.
    pub fn build_request(&self) -> Result<SearchRequest, QueryError> {
        let path = self.build_path()?;
        let body = self.build()?;
        let params = self
            .options
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(SearchRequest::new(path, params, body))
    }

    /// Build and send the request, decoding the reply.
    pub async fn execute(self, client: &Client) -> Result<SearchResult, QueryError> {
        let request = self.build_request()?;
        client.perform(&request).await
    }

    /// Like [`SearchQuery::execute`], failing with a transport error once `deadline` elapses.
    pub async fn execute_with_deadline(
        self,
        client: &Client,
        deadline: Duration,
    ) -> Result<SearchResult, QueryError> {
        let request = self.build_request()?;
        match tokio::time::timeout(deadline, client.perform(&request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Deadline(deadline).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let body = SearchQuery::new().build().unwrap();
        assert_eq!(body, json!({"size": 10, "aggregations": {}}));
    }

    #[test]
    fn test_zero_limit_and_offset_are_omitted() {
        let body = SearchQuery::new().limit(0).offset(0).build().unwrap();
        assert!(body.get("size").is_none());
        assert!(body.get("from").is_none());
    }

    #[test]
    fn test_negative_limit_is_omitted() {
        let body = SearchQuery::new().limit(-5).offset(-1).build().unwrap();
        assert!(body.get("size").is_none());
        assert!(body.get("from").is_none());
    }

    #[test]
    fn test_pagination_and_explain() {
        let body = SearchQuery::new().limit(25).offset(50).explain_results(true).build().unwrap();
        assert_eq!(body["size"], json!(25));
        assert_eq!(body["from"], json!(50));
        assert_eq!(body["explain"], json!(true));
    }

    #[test]
    fn test_explain_false_is_omitted() {
        let body = SearchQuery::new().explain_results(false).build().unwrap();
        assert!(body.get("explain").is_none());
    }

    #[test]
    fn test_first_where_becomes_root_under_and() {
        let query = SearchQuery::new().where_or(json!(["in", "status", ["a"]]));
        assert_eq!(
            query.where_condition(),
            Some(&Condition::from(json!(["and", ["in", "status", ["a"]]])))
        );
        assert_eq!(
            query.build().unwrap()["query"],
            json!({"bool": {"must": [{"terms": {"status": ["a"]}}]}})
        );
    }

    #[test]
    fn test_where_pair_shorthand() {
        let query = SearchQuery::new()
            .where_and(json!(["between", "t", "a", "b"]))
            .where_or(json!(["status", "active"]));
        assert_eq!(
            query.build().unwrap()["query"],
            json!({"bool": {"must": [
                {"range": {"t": {"gte": "a", "lte": "b"}}},
                {"bool": {"should": [{"bool": {"must": [{"term": {"status": "active"}}]}}]}}
            ]}})
        );
    }

    #[test]
    fn test_two_element_operator_is_not_a_pair() {
        let query = SearchQuery::new()
            .where_and(json!(["gt", "age", 1]))
            .where_and(json!(["or", [{"flag": "1"}]]));
        assert_eq!(
            query.build().unwrap()["query"],
            json!({"bool": {"must": [
                {"range": {"age": {"gt": 1}}},
                {"bool": {"must": [{"bool": {"should": [{"bool": {"must": [{"term": {"flag": "1"}}]}}]}}]}}
            ]}})
        );
    }

    #[test]
    fn test_where_nested_condition() {
        let query = SearchQuery::new()
            .where_and(json!([{"flag": "1"}]))
            .where_and(json!(["lt", "age", 30]));
        assert_eq!(
            query.build().unwrap()["query"],
            json!({"bool": {"must": [
                {"bool": {"must": [{"term": {"flag": "1"}}]}},
                {"bool": {"must": [{"range": {"age": {"lt": 30}}}]}}
            ]}})
        );
    }

    #[test]
    fn test_where_error_propagates_from_build() {
        let query = SearchQuery::new().where_and(json!(["like", "name", "%x%"]));
        assert!(matches!(query.build(), Err(QueryError::UnsupportedOperation(_))));
    }

    #[test]
    fn test_raw_query_fallback() {
        let body = SearchQuery::new().query(json!({"match_all": {}})).build().unwrap();
        assert_eq!(body["query"], json!({"match_all": {}}));
    }

    #[test]
    fn test_where_wins_over_raw_query() {
        let body = SearchQuery::new()
            .query(json!({"match_all": {}}))
            .where_and(json!(["gt", "age", 1]))
            .build()
            .unwrap();
        assert_eq!(body["query"], json!({"bool": {"must": [{"range": {"age": {"gt": 1}}}]}}));
    }

    #[test]
    fn test_absent_where_falls_back_to_raw_query() {
        let body = SearchQuery::new()
            .query(json!({"match_all": {}}))
            .where_and(json!([]))
            .build()
            .unwrap();
        assert_eq!(body["query"], json!({"match_all": {}}));
    }

    #[test]
    fn test_order_by_appends() {
        let body = SearchQuery::new()
            .order_by([("created", SortOrder::Desc)])
            .order_by([("name", SortOrder::Asc), ("id", SortOrder::Asc)])
            .build()
            .unwrap();
        assert_eq!(
            body["sort"],
            json!([{"created": "desc"}, {"name": "asc", "id": "asc"}])
        );
    }

    #[test]
    fn test_aggregations_last_write_wins() {
        let body = SearchQuery::new()
            .add_aggregation("by_customer", json!({"terms": {"field": "customer"}}))
            .add_agg("by_customer", "terms", json!({"field": "customer.keyword", "size": 10}))
            .add_agg("total", "sum", json!({"field": "freight"}))
            .build()
            .unwrap();
        assert_eq!(
            body["aggregations"],
            json!({
                "by_customer": {"terms": {"field": "customer.keyword", "size": 10}},
                "total": {"sum": {"field": "freight"}}
            })
        );
    }

    #[test]
    fn test_source_and_timeout() {
        let body = SearchQuery::new()
            .select_fields(json!(["id", "name"]))
            .timeout("5s")
            .build()
            .unwrap();
        assert_eq!(body["_source"], json!(["id", "name"]));
        assert_eq!(body["timeout"], json!("5s"));
    }

    #[test]
    fn test_build_is_idempotent() {
        let query = SearchQuery::new()
            .where_and(json!(["in", "status", ["a", "null"]]))
            .order_by([("t", SortOrder::Asc)]);
        assert_eq!(query.build().unwrap(), query.build().unwrap());
    }

    #[test]
    fn test_build_request() {
        let request = SearchQuery::new()
            .index(["a", "b"])
            .doc_type(["t"])
            .set_option("search_type", "query_then_fetch")
            .set_option("search_type", "dfs_query_then_fetch")
            .set_option("routing", "1")
            .build_request()
            .unwrap();
        assert_eq!(request.path, "/a,b/t/_search");
        assert_eq!(
            request.params,
            vec![
                ("search_type".to_string(), "dfs_query_then_fetch".to_string()),
                ("routing".to_string(), "1".to_string()),
            ]
        );
        assert_eq!(request.body, json!({"size": 10, "aggregations": {}}));
    }

    #[test]
    fn test_duplicate_indices_are_kept() {
        let query = SearchQuery::new().index(["a"]).index(["a"]);
        assert_eq!(query.build_path().unwrap(), "/a,a/_search");
    }
}
