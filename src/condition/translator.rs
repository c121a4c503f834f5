// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Condition Translator
//!
//! Translates a [`Condition`] into a [`QueryClause`] for the engine's bool query.
//!
//! # Operators
//!
//! ```text
//! and / or                     - bool.must / bool.should over nested conditions
//! between / not between        - range {gte, lte} (negated via bool.must_not)
//! in / not in                  - terms / ids, with "null" meaning "field missing"
//! lt < lte <= gt > gte >=      - half-bounded range (_id is queried as _uid)
//! like / not like / or like... - rejected, the engine has no LIKE primitive
//! not                          - no constraint
//! anything else                - no constraint
//! ```
//!
//! `Ok(None)` means "no constraint". Unknown operators, `not` and empty
//! conditions all degrade to it; a wrong operand count never does.

use serde_json::Value;
use tracing::debug;

use super::clause::{BoolQuery, Clauses, QueryClause, RangeBound};
use super::value::{is_null_marker, Condition, Operand, Operator};
use crate::error::QueryError;
use crate::metrics;

/// Document identity field.
pub const ID_FIELD: &str = "_id";
/// Field the engine accepts for range/terms lookups on the identity.
pub const UID_FIELD: &str = "_uid";

/// Stateless condition translator
pub struct ConditionTranslator;

impl ConditionTranslator {
    /// Translate a condition to a query clause.
    pub fn translate(condition: &Condition) -> Result<Option<QueryClause>, QueryError> {
        let result = Self::translate_node(condition);
        match &result {
            Ok(Some(_)) => metrics::record_translation("clause"),
            Ok(None) => metrics::record_translation("absent"),
            Err(e) => {
                debug!(error = %e, "Condition translation failed");
                metrics::record_translation(e.kind());
            }
        }
        result
    }

    /// Coerce a JSON condition and translate it.
    ///
    /// Clones `value` to build the [`Condition`]; hold a parsed [`Condition`]
    /// and call [`ConditionTranslator::translate`] to translate repeatedly.
    pub fn translate_value(value: &Value) -> Result<Option<QueryClause>, QueryError> {
        Self::translate(&Condition::from(value.clone()))
    }

    fn translate_node(condition: &Condition) -> Result<Option<QueryClause>, QueryError> {
        match condition {
            Condition::Empty => Ok(None),
            Condition::Hash(entries) => Ok(Some(Self::hash_condition(entries))),
            Condition::Operator { operator, operands } => {
                Self::operator_condition(operator, operands)
            }
        }
    }

    fn operator_condition(
        operator: &Operator,
        operands: &[Operand],
    ) -> Result<Option<QueryClause>, QueryError> {
        match operator {
            Operator::Not => {
                debug!("'not' conditions translate to no constraint");
                Ok(None)
            }
            Operator::And | Operator::Or => Self::bool_condition(operator, operands),
            Operator::Between | Operator::NotBetween => {
                Self::between_condition(operator, operands).map(Some)
            }
            Operator::In | Operator::NotIn => Self::in_condition(operator, operands),
            Operator::Like | Operator::NotLike | Operator::OrLike | Operator::OrNotLike => {
                Err(QueryError::UnsupportedOperation(operator.to_string()))
            }
            Operator::Lt | Operator::Lte | Operator::Gt | Operator::Gte => {
                Self::half_bounded_range(operator, operands).map(Some)
            }
            Operator::Unrecognized(tag) => {
                debug!(operator = %tag, "Unrecognized operator, no constraint");
                Ok(None)
            }
        }
    }

    /// Equality conjunction over `field -> value` entries.
    fn hash_condition(entries: &[(String, Value)]) -> QueryClause {
        let mut must = Vec::new();
        let mut must_not = Vec::new();

        for (field, value) in entries {
            if field == ID_FIELD {
                if is_null_marker(value) {
                    // There is no null primary key: always-empty clause
                    must.push(QueryClause::terms(UID_FIELD, Value::Null));
                } else {
                    // TODO: emit an `ids` clause once id equality lookups are supported
                    debug!(value = %value, "Skipping _id equality in hash condition");
                }
                continue;
            }

            match value {
                Value::Array(values) => {
                    if !values.is_empty() {
                        must.push(QueryClause::terms(field.clone(), value.clone()));
                    }
                }
                v if is_null_marker(v) => must_not.push(QueryClause::exists(field.clone())),
                Value::Object(_) => {
                    debug!(field = %field, "Skipping object value in hash condition");
                }
                v => must.push(QueryClause::term(field.clone(), v.clone())),
            }
        }

        QueryClause::Bool(BoolQuery {
            must: Some(Clauses::Many(must)),
            must_not: (!must_not.is_empty()).then_some(Clauses::Many(must_not)),
            ..Default::default()
        })
    }

    fn bool_condition(
        operator: &Operator,
        operands: &[Operand],
    ) -> Result<Option<QueryClause>, QueryError> {
        let mut parts = Vec::with_capacity(operands.len());
        for operand in operands {
            match operand {
                Operand::Condition(nested) => {
                    if let Some(clause) = Self::translate_node(nested)? {
                        parts.push(clause);
                    }
                }
                Operand::Value(Value::Null) => {}
                Operand::Value(raw) => parts.push(QueryClause::Raw(raw.clone())),
            }
        }

        if parts.is_empty() {
            return Ok(None);
        }
        Ok(Some(match operator {
            Operator::Or => QueryClause::should(parts),
            _ => QueryClause::must(parts),
        }))
    }

    fn between_condition(
        operator: &Operator,
        operands: &[Operand],
    ) -> Result<QueryClause, QueryError> {
        let op = operator.as_str();
        if operands.len() != 3 {
            return Err(QueryError::operand_count(op, 3, operands.len()));
        }
        let column = Self::column(op, &operands[0])?;
        let low = Self::value(op, &operands[1])?;
        let high = Self::value(op, &operands[2])?;

        let filter = QueryClause::range(
            column,
            vec![(RangeBound::Gte, low.clone()), (RangeBound::Lte, high.clone())],
        );
        Ok(match operator {
            Operator::NotBetween => QueryClause::must_not(filter),
            _ => filter,
        })
    }

    fn in_condition(
        operator: &Operator,
        operands: &[Operand],
    ) -> Result<Option<QueryClause>, QueryError> {
        let op = operator.as_str();
        if operands.len() != 2 {
            return Err(QueryError::operand_count(op, 2, operands.len()));
        }
        let column = Self::column(op, &operands[0])?;
        let filter = match Self::value(op, &operands[1])? {
            Value::Array(values) => Self::in_list(column, values),
            scalar => Some(Self::in_scalar(column, scalar)),
        };

        Ok(match operator {
            Operator::NotIn => filter.map(QueryClause::must_not),
            _ => filter,
        })
    }

    fn in_list(column: &str, values: &[Value]) -> Option<QueryClause> {
        let remaining: Vec<Value> = values.iter().filter(|v| !is_null_marker(v)).cloned().collect();
        let can_be_null = remaining.len() < values.len();

        if remaining.is_empty() {
            if column == ID_FIELD {
                // There is no null primary key: WHERE false
                return can_be_null.then(|| QueryClause::terms(UID_FIELD, Value::Null));
            }
            return Some(QueryClause::missing(column));
        }

        let filter = if column == ID_FIELD {
            QueryClause::Ids { values: remaining }
        } else {
            QueryClause::terms(column, Value::Array(remaining))
        };
        Some(if can_be_null { Self::or_missing(filter, column) } else { filter })
    }

    fn in_scalar(column: &str, value: &Value) -> QueryClause {
        let is_null = is_null_marker(value) || value.as_str() == Some("");
        match (is_null, column == ID_FIELD) {
            (true, true) => QueryClause::terms(UID_FIELD, Value::Null),
            (true, false) => QueryClause::missing(column),
            (false, true) => QueryClause::Ids { values: vec![value.clone()] },
            (false, false) => QueryClause::term(column, value.clone()),
        }
    }

    /// `filter OR column is missing`
    fn or_missing(filter: QueryClause, column: &str) -> QueryClause {
        QueryClause::should(vec![filter, QueryClause::missing(column)])
    }

    /// Builds a half-bounded range condition (gt, >, gte, >=, lt, <, lte, <=)
    fn half_bounded_range(
        operator: &Operator,
        operands: &[Operand],
    ) -> Result<QueryClause, QueryError> {
        let op = operator.as_str();
        if operands.len() != 2 {
            return Err(QueryError::operand_count(op, 2, operands.len()));
        }
        let column = Self::column(op, &operands[0])?;
        let value = Self::value(op, &operands[1])?;
        let column = if column == ID_FIELD { UID_FIELD } else { column };

        let bound = match operator {
            Operator::Gt => RangeBound::Gt,
            Operator::Gte => RangeBound::Gte,
            Operator::Lt => RangeBound::Lt,
            _ => RangeBound::Lte,
        };
        Ok(QueryClause::range(column, vec![(bound, value.clone())]))
    }

    fn column<'a>(op: &str, operand: &'a Operand) -> Result<&'a str, QueryError> {
        match Self::value(op, operand)? {
            Value::String(column) => Ok(column),
            other => Err(QueryError::column(op, other)),
        }
    }

    fn value<'a>(op: &str, operand: &'a Operand) -> Result<&'a Value, QueryError> {
        match operand {
            Operand::Value(value) => Ok(value),
            Operand::Condition(_) => Err(QueryError::MalformedOperands {
                operator: op.to_string(),
                reason: "expects a value operand, got a nested condition".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn translate(value: Value) -> Option<Value> {
        ConditionTranslator::translate_value(&value)
            .expect("translation failed")
            .map(|clause| clause.to_value())
    }

    #[test]
    fn test_empty_condition() {
        assert_eq!(translate(json!([])), None);
    }

    #[test]
    fn test_between() {
        assert_eq!(
            translate(json!(["between", "date", "2020-01-01", "2020-01-02"])),
            Some(json!({"range": {"date": {"gte": "2020-01-01", "lte": "2020-01-02"}}}))
        );
    }

    #[test]
    fn test_between_numeric_bounds() {
        assert_eq!(
            translate(json!(["between", "age", 18, 65])),
            Some(json!({"range": {"age": {"gte": 18, "lte": 65}}}))
        );
    }

    #[test]
    fn test_not_between() {
        assert_eq!(
            translate(json!(["not between", "date", "a", "b"])),
            Some(json!({"bool": {"must_not": {"range": {"date": {"gte": "a", "lte": "b"}}}}}))
        );
    }

    #[test]
    fn test_between_wrong_operand_count() {
        let err = ConditionTranslator::translate_value(&json!(["between", "date", "a"]))
            .unwrap_err();
        assert!(matches!(err, QueryError::MalformedOperands { .. }));
    }

    #[test]
    fn test_half_bounded_ranges() {
        assert_eq!(translate(json!(["lt", "age", "5"])), Some(json!({"range": {"age": {"lt": "5"}}})));
        assert_eq!(translate(json!(["<=", "age", 5])), Some(json!({"range": {"age": {"lte": 5}}})));
        assert_eq!(translate(json!([">", "age", 5])), Some(json!({"range": {"age": {"gt": 5}}})));
        assert_eq!(translate(json!(["GTE", "age", 5])), Some(json!({"range": {"age": {"gte": 5}}})));
    }

    #[test]
    fn test_half_bounded_range_on_id() {
        assert_eq!(
            translate(json!(["lt", "_id", "5"])),
            Some(json!({"range": {"_uid": {"lt": "5"}}}))
        );
    }

    #[test]
    fn test_half_bounded_range_wrong_operand_count() {
        let err = ConditionTranslator::translate_value(&json!(["gt", "age"])).unwrap_err();
        assert_eq!(err.to_string(), "Operator 'gt' requires 2 operands, got 1");
    }

    #[test]
    fn test_column_must_be_string() {
        let err = ConditionTranslator::translate_value(&json!(["in", 5, ["a"]])).unwrap_err();
        assert!(matches!(err, QueryError::MalformedOperands { .. }));
    }

    #[test]
    fn test_like_family_unsupported() {
        for op in ["like", "not like", "or like", "or not like", "LIKE"] {
            let err = ConditionTranslator::translate_value(&json!([op, "x", "y"])).unwrap_err();
            assert!(matches!(err, QueryError::UnsupportedOperation(_)), "{}", op);
        }
    }

    #[test]
    fn test_not_is_absent() {
        assert_eq!(translate(json!(["not", [{"a": "1"}]])), None);
    }

    #[test]
    fn test_unrecognized_operator_is_absent() {
        assert_eq!(translate(json!(["near", "loc", "x"])), None);
    }

    #[test]
    fn test_hash_condition() {
        assert_eq!(
            translate(json!([{"status": "active", "tags": ["a", "b"], "deleted": "null", "empty": []}])),
            Some(json!({"bool": {
                "must": [
                    {"term": {"status": "active"}},
                    {"terms": {"tags": ["a", "b"]}}
                ],
                "must_not": [{"exists": {"field": "deleted"}}]
            }}))
        );
    }

    #[test]
    fn test_hash_condition_id_null() {
        assert_eq!(
            translate(json!([{"_id": "null"}])),
            Some(json!({"bool": {"must": [{"terms": {"_uid": null}}]}}))
        );
    }

    #[test]
    fn test_hash_condition_id_value_skipped() {
        assert_eq!(
            translate(json!([{"_id": "abc", "a": 1}])),
            Some(json!({"bool": {"must": [{"term": {"a": 1}}]}}))
        );
    }

    #[test]
    fn test_and_drops_absent_operands() {
        assert_eq!(
            translate(json!(["and", [], ["between", "t", "a", "b"], ["not", []]])),
            Some(json!({"bool": {"must": [{"range": {"t": {"gte": "a", "lte": "b"}}}]}}))
        );
    }

    #[test]
    fn test_and_of_nothing_is_absent() {
        assert_eq!(translate(json!(["and"])), None);
        assert_eq!(translate(json!(["or", [], []])), None);
    }

    #[test]
    fn test_or_emits_should() {
        assert_eq!(
            translate(json!(["or", [{"a": "1"}], ["in", "b", "2"]])),
            Some(json!({"bool": {"should": [
                {"bool": {"must": [{"term": {"a": "1"}}]}},
                {"term": {"b": "2"}}
            ]}}))
        );
    }

    #[test]
    fn test_and_passes_raw_operands_through() {
        assert_eq!(
            translate(json!(["and", {"match_all": {}}])),
            Some(json!({"bool": {"must": [{"match_all": {}}]}}))
        );
    }

    #[test]
    fn test_nested_errors_propagate() {
        let err = ConditionTranslator::translate_value(&json!(["and", ["or", ["like", "a", "b"]]]))
            .unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedOperation(_)));
    }

    #[test]
    fn test_in_list() {
        assert_eq!(
            translate(json!(["in", "status", ["a", "b"]])),
            Some(json!({"terms": {"status": ["a", "b"]}}))
        );
    }

    #[test]
    fn test_in_empty_list() {
        assert_eq!(
            translate(json!(["in", "status", []])),
            Some(json!({"bool": {"must_not": {"exists": {"field": "status"}}}}))
        );
    }

    #[test]
    fn test_in_list_with_null_marker() {
        assert_eq!(
            translate(json!(["in", "status", ["a", "null", "b", "null"]])),
            Some(json!({"bool": {"should": [
                {"terms": {"status": ["a", "b"]}},
                {"bool": {"must_not": {"exists": {"field": "status"}}}}
            ]}}))
        );
    }

    #[test]
    fn test_in_list_only_null() {
        assert_eq!(
            translate(json!(["in", "status", ["null"]])),
            Some(json!({"bool": {"must_not": {"exists": {"field": "status"}}}}))
        );
    }

    #[test]
    fn test_in_id_list() {
        assert_eq!(
            translate(json!(["in", "_id", ["1", "2"]])),
            Some(json!({"ids": {"values": ["1", "2"]}}))
        );
    }

    #[test]
    fn test_in_id_empty_list() {
        assert_eq!(translate(json!(["in", "_id", []])), None);
        assert_eq!(translate(json!(["not in", "_id", []])), None);
        assert_eq!(
            translate(json!(["in", "_id", ["null"]])),
            Some(json!({"terms": {"_uid": null}}))
        );
    }

    #[test]
    fn test_in_scalar() {
        assert_eq!(translate(json!(["in", "status", "a"])), Some(json!({"term": {"status": "a"}})));
        assert_eq!(translate(json!(["in", "_id", "7"])), Some(json!({"ids": {"values": ["7"]}})));
    }

    #[test]
    fn test_in_scalar_null() {
        let missing = json!({"bool": {"must_not": {"exists": {"field": "status"}}}});
        assert_eq!(translate(json!(["in", "status", "null"])), Some(missing.clone()));
        assert_eq!(translate(json!(["in", "status", ""])), Some(missing));
        assert_eq!(translate(json!(["in", "_id", "null"])), Some(json!({"terms": {"_uid": null}})));
    }

    #[test]
    fn test_not_in() {
        assert_eq!(
            translate(json!(["not in", "status", ["a"]])),
            Some(json!({"bool": {"must_not": {"terms": {"status": ["a"]}}}}))
        );
    }

    #[test]
    fn test_in_id_list_with_null_marker() {
        assert_eq!(
            translate(json!(["in", "_id", ["1", "null"]])),
            Some(json!({"bool": {"should": [
                {"ids": {"values": ["1"]}},
                {"bool": {"must_not": {"exists": {"field": "_id"}}}}
            ]}}))
        );
    }

    #[test]
    fn test_not_in_list_with_null_marker() {
        assert_eq!(
            translate(json!(["not in", "status", ["a", null]])),
            Some(json!({"bool": {"must_not": {"bool": {"should": [
                {"terms": {"status": ["a"]}},
                {"bool": {"must_not": {"exists": {"field": "status"}}}}
            ]}}}}))
        );
    }

    #[test]
    fn test_not_in_scalar_null() {
        assert_eq!(
            translate(json!(["not in", "status", "null"])),
            Some(json!({"bool": {"must_not": {"bool": {"must_not": {"exists": {"field": "status"}}}}}}))
        );
    }

    #[test]
    fn test_in_id_scalar_empty_string() {
        assert_eq!(translate(json!(["in", "_id", ""])), Some(json!({"terms": {"_uid": null}})));
    }

    #[test]
    fn test_not_in_id_list() {
        assert_eq!(
            translate(json!(["not in", "_id", ["1", "2"]])),
            Some(json!({"bool": {"must_not": {"ids": {"values": ["1", "2"]}}}}))
        );
    }

    #[test]
    fn test_in_wrong_operand_count() {
        let err = ConditionTranslator::translate_value(&json!(["in", "status"])).unwrap_err();
        assert_eq!(err.to_string(), "Operator 'in' requires 2 operands, got 1");
    }

    #[test]
    fn test_nested_condition_in_leaf_position() {
        let condition = Condition::Operator {
            operator: Operator::Lt,
            operands: vec![Operand::Value(json!("a")), Operand::Condition(Condition::Empty)],
        };
        let err = ConditionTranslator::translate(&condition).unwrap_err();
        assert!(matches!(err, QueryError::MalformedOperands { .. }));
    }
}
