use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::query::SearchRequest;
use crate::response::EngineError;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Status(EngineError),
    #[error("Search did not complete within {0:?}")]
    Deadline(Duration),
    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Raw reply from the engine, before decoding
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status code, e.g. 200
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx reply into [`TransportError::Status`], decoding the
    /// engine's error body when there is one.
    pub fn error_for_status(self) -> Result<Self, TransportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::Status(EngineError::from_response(self.status, &self.body)))
        }
    }
}

/// Sends one search request and returns the raw reply.
///
/// Implementations perform the call at most once; no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(&self, request: &SearchRequest) -> Result<RawResponse, TransportError>;
}
