// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Crate-wide error type.
//!
//! A search call surfaces exactly one of: a parsed result, a transport error,
//! a decode error, or a translation/path error.

use thiserror::Error;

use crate::transport::TransportError;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Operator '{operator}' {reason}")]
    MalformedOperands { operator: String, reason: String },
    #[error("'{0}' conditions are not supported by the search engine")]
    UnsupportedOperation(String),
    #[error("Invalid path segment '{segment}': {reason}")]
    PathTemplate { segment: String, reason: &'static str },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl QueryError {
    pub(crate) fn operand_count(operator: &str, expected: usize, actual: usize) -> Self {
        QueryError::MalformedOperands {
            operator: operator.to_string(),
            reason: format!("requires {} operands, got {}", expected, actual),
        }
    }

    pub(crate) fn column(operator: &str, found: &serde_json::Value) -> Self {
        QueryError::MalformedOperands {
            operator: operator.to_string(),
            reason: format!("expects a column name, got {}", found),
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::MalformedOperands { .. } => "malformed_operands",
            QueryError::UnsupportedOperation(_) => "unsupported_operation",
            QueryError::PathTemplate { .. } => "path_template",
            QueryError::Transport(_) => "transport",
            QueryError::Decode(_) => "decode",
        }
    }
}
