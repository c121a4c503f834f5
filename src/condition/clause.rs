// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query Clause - the output side of the translator
//!
//! Serializes to the engine's query DSL:
//!
//! ```text
//! {"term":   {"field": value}}
//! {"terms":  {"field": [values]}}
//! {"range":  {"field": {"gte": low, "lte": high}}}
//! {"exists": {"field": "name"}}
//! {"ids":    {"values": [ids]}}
//! {"bool":   {"must": ..., "should": ..., "must_not": ...}}
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Range bound keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl RangeBound {
    pub fn as_str(self) -> &'static str {
        match self {
            RangeBound::Gt => "gt",
            RangeBound::Gte => "gte",
            RangeBound::Lt => "lt",
            RangeBound::Lte => "lte",
        }
    }
}

/// One fragment of a boolean query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryClause {
    Term { field: String, value: Value },
    /// `values` is usually an array; `null` yields the always-empty `_uid` clause
    Terms { field: String, values: Value },
    Range { field: String, bounds: Vec<(RangeBound, Value)> },
    Exists { field: String },
    Ids { values: Vec<Value> },
    Bool(BoolQuery),
    /// Non-sequence operand of `and` / `or`, passed through unchanged
    Raw(Value),
}

/// `bool` query slots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoolQuery {
    pub must: Option<Clauses>,
    pub should: Option<Clauses>,
    pub must_not: Option<Clauses>,
}

/// A slot holds either a single clause object or a clause list.
#[derive(Debug, Clone, PartialEq)]
pub enum Clauses {
    One(Box<QueryClause>),
    Many(Vec<QueryClause>),
}

impl QueryClause {
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        QueryClause::Term { field: field.into(), value: value.into() }
    }

    pub fn terms(field: impl Into<String>, values: impl Into<Value>) -> Self {
        QueryClause::Terms { field: field.into(), values: values.into() }
    }

    pub fn range(field: impl Into<String>, bounds: Vec<(RangeBound, Value)>) -> Self {
        QueryClause::Range { field: field.into(), bounds }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        QueryClause::Exists { field: field.into() }
    }

    /// `{"bool": {"must": [clauses]}}`
    pub fn must(clauses: Vec<QueryClause>) -> Self {
        QueryClause::Bool(BoolQuery { must: Some(Clauses::Many(clauses)), ..Default::default() })
    }

    /// `{"bool": {"should": [clauses]}}`
    pub fn should(clauses: Vec<QueryClause>) -> Self {
        QueryClause::Bool(BoolQuery { should: Some(Clauses::Many(clauses)), ..Default::default() })
    }

    /// `{"bool": {"must_not": clause}}`
    pub fn must_not(clause: QueryClause) -> Self {
        QueryClause::Bool(BoolQuery {
            must_not: Some(Clauses::One(Box::new(clause))),
            ..Default::default()
        })
    }

    /// `{"bool": {"must_not": {"exists": {"field": field}}}}`
    pub fn missing(field: impl Into<String>) -> Self {
        QueryClause::must_not(QueryClause::exists(field))
    }

    /// Render to a JSON value.
    pub fn to_value(&self) -> Value {
        // Serializing a tree of maps, strings and JSON values cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// `{name: {key: value}}`
struct Single<'a, T: ?Sized>(&'a str, &'a T);

impl<T: Serialize + ?Sized> Serialize for Single<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, self.1)?;
        map.end()
    }
}

struct Bounds<'a>(&'a [(RangeBound, Value)]);

impl Serialize for Bounds<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (bound, value) in self.0 {
            map.serialize_entry(bound.as_str(), value)?;
        }
        map.end()
    }
}

impl Serialize for QueryClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            QueryClause::Term { field, value } => {
                Single("term", &Single(field, value)).serialize(serializer)
            }
            QueryClause::Terms { field, values } => {
                Single("terms", &Single(field, values)).serialize(serializer)
            }
            QueryClause::Range { field, bounds } => {
                Single("range", &Single(field, &Bounds(bounds))).serialize(serializer)
            }
            QueryClause::Exists { field } => {
                Single("exists", &Single("field", field)).serialize(serializer)
            }
            QueryClause::Ids { values } => {
                Single("ids", &Single("values", values)).serialize(serializer)
            }
            QueryClause::Bool(query) => Single("bool", query).serialize(serializer),
            QueryClause::Raw(value) => value.serialize(serializer),
        }
    }
}

impl Serialize for BoolQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(must) = &self.must {
            map.serialize_entry("must", must)?;
        }
        if let Some(should) = &self.should {
            map.serialize_entry("should", should)?;
        }
        if let Some(must_not) = &self.must_not {
            map.serialize_entry("must_not", must_not)?;
        }
        map.end()
    }
}

impl Serialize for Clauses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Clauses::One(clause) => clause.serialize(serializer),
            Clauses::Many(clauses) => clauses.serialize(serializer),
        }
    }
}
