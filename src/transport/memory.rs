use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::traits::{RawResponse, Transport, TransportError};
use crate::query::SearchRequest;

/// Replays queued responses and records every request it sees.
pub struct MemoryTransport {
    responses: Mutex<VecDeque<RawResponse>>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl MemoryTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a reply for the next request.
    pub fn push_response(&self, response: RawResponse) {
        self.responses.lock().push_back(response);
    }

    /// Queue a 200 reply with the given JSON body.
    pub fn push_json(&self, body: &serde_json::Value) {
        self.push_response(RawResponse::new(200, body.to_string()));
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().clone()
    }

    /// Number of queued replies not yet consumed
    #[must_use]
    pub fn pending(&self) -> usize {
        self.responses.lock().len()
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn perform(&self, request: &SearchRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().push(request.clone());
        let response = self
            .responses
            .lock()
            .pop_front()
            .ok_or_else(|| TransportError::Unavailable("no response queued".into()))?;
        response.error_for_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> SearchRequest {
        SearchRequest::new("/_search".into(), vec![], json!({"size": 10}))
    }

    #[tokio::test]
    async fn test_new_transport_is_empty() {
        let transport = MemoryTransport::new();
        assert_eq!(transport.pending(), 0);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_replays_in_order() {
        let transport = MemoryTransport::new();
        transport.push_json(&json!({"took": 1}));
        transport.push_json(&json!({"took": 2}));

        let first = transport.perform(&request()).await.unwrap();
        let second = transport.perform(&request()).await.unwrap();
        assert_eq!(first.body, br#"{"took":1}"#.to_vec());
        assert_eq!(second.body, br#"{"took":2}"#.to_vec());
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_queue_is_unavailable() {
        let transport = MemoryTransport::new();
        let err = transport.perform(&request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Unavailable(_)));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_error_status() {
        let transport = MemoryTransport::new();
        transport.push_response(RawResponse::new(503, ""));
        let err = transport.perform(&request()).await.unwrap_err();
        match err {
            TransportError::Status(engine) => assert_eq!(engine.status, 503),
            other => panic!("Expected Status error, got {:?}", other),
        }
    }
}
