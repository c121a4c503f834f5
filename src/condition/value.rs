// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Condition Value - the input side of the translator
//!
//! A condition is written as nested JSON arrays and objects:
//!
//! ```text
//! []                                        - no constraint
//! [{"status": "active", "tags": ["a"]}]    - hash condition (equality conjunction)
//! ["between", "age", 18, 65]               - operator condition
//! ["and", [...], [...]]                     - boolean operator over nested conditions
//! ```
//!
//! The loosely shaped JSON is coerced once, up front, into [`Condition`].
//! After that the translator only ever matches on closed enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Literal marker meaning "field is absent/unset".
pub const NULL_MARKER: &str = "null";

/// Returns true for the `"null"` marker (and for JSON `null`).
pub fn is_null_marker(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s == NULL_MARKER,
        _ => false,
    }
}

/// One boolean expression.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Condition {
    /// `[]` - translates to "no filter"
    #[default]
    Empty,
    /// Field -> value equality conjunction, in insertion order
    Hash(Vec<(String, Value)>),
    /// `[operator, operand, ...]`
    Operator {
        operator: Operator,
        operands: Vec<Operand>,
    },
}

/// Operand of an operator condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Nested sequence under `and` / `or` / `not`
    Condition(Condition),
    /// Anything else: columns, bounds, value lists, raw clauses
    Value(Value),
}

/// Operator tag, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Not,
    And,
    Or,
    Between,
    NotBetween,
    In,
    NotIn,
    Like,
    NotLike,
    OrLike,
    OrNotLike,
    Lt,
    Lte,
    Gt,
    Gte,
    /// Tag outside the operator set; translates to "no constraint"
    Unrecognized(String),
}

impl Operator {
    /// Boolean operators take nested conditions as operands.
    pub fn is_boolean(&self) -> bool {
        matches!(self, Operator::Not | Operator::And | Operator::Or)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Not => "not",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Between => "between",
            Operator::NotBetween => "not between",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::Like => "like",
            Operator::NotLike => "not like",
            Operator::OrLike => "or like",
            Operator::OrNotLike => "or not like",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Unrecognized(tag) => tag,
        }
    }
}

impl FromStr for Operator {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.to_lowercase();
        Ok(match tag.as_str() {
            "not" => Operator::Not,
            "and" => Operator::And,
            "or" => Operator::Or,
            "between" => Operator::Between,
            "not between" => Operator::NotBetween,
            "in" => Operator::In,
            "not in" => Operator::NotIn,
            "like" => Operator::Like,
            "not like" => Operator::NotLike,
            "or like" => Operator::OrLike,
            "or not like" => Operator::OrNotLike,
            "lt" | "<" => Operator::Lt,
            "lte" | "<=" => Operator::Lte,
            "gt" | ">" => Operator::Gt,
            "gte" | ">=" => Operator::Gte,
            _ => Operator::Unrecognized(tag),
        })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Condition {
    /// Build an operator condition from a tag and raw operands.
    ///
    /// Operands of boolean operators that are arrays become nested conditions;
    /// every other operand is kept as a raw value.
    pub fn operator(tag: &str, operands: Vec<Value>) -> Self {
        let operator = tag.parse::<Operator>().unwrap_or_else(|never| match never {});
        let nested = operator.is_boolean();
        let operands = operands
            .into_iter()
            .map(|operand| match operand {
                Value::Array(items) if nested => Operand::Condition(Condition::from_sequence(items)),
                other => Operand::Value(other),
            })
            .collect();
        Condition::Operator { operator, operands }
    }

    /// Single-entry hash condition `{field: value}`.
    pub fn field_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Hash(vec![(field.into(), value.into())])
    }

    /// Coerce a sequence.
    ///
    /// A string in tag position selects an operator. Anything else is read as a
    /// hash condition built from the object elements of the sequence.
    pub fn from_sequence(items: Vec<Value>) -> Self {
        let mut items = items.into_iter();
        match items.next() {
            None => Condition::Empty,
            Some(Value::String(tag)) => Condition::operator(&tag, items.collect()),
            Some(first) => {
                let entries = std::iter::once(first)
                    .chain(items)
                    .filter_map(|item| match item {
                        Value::Object(map) => Some(map),
                        _ => None,
                    })
                    .flat_map(|map| map.into_iter())
                    .collect();
                Condition::Hash(entries)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Condition::Empty)
    }

    /// Append an operand to an operator condition.
    ///
    /// Returns false (and leaves `self` untouched) for hash and empty conditions.
    pub(crate) fn push_operand(&mut self, operand: Operand) -> bool {
        match self {
            Condition::Operator { operands, .. } => {
                operands.push(operand);
                true
            }
            _ => false,
        }
    }
}

impl From<Value> for Condition {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Condition::from_sequence(items),
            Value::Object(map) => Condition::Hash(map.into_iter().collect()),
            _ => Condition::Empty,
        }
    }
}

impl From<Vec<Value>> for Condition {
    fn from(items: Vec<Value>) -> Self {
        Condition::from_sequence(items)
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Condition::from)
    }
}
