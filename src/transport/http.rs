// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! HTTP transport backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use tracing::{debug, warn};

use super::traits::{RawResponse, Transport, TransportError};
use crate::config::ClientConfig;
use crate::metrics;
use crate::query::SearchRequest;

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<(String, String)>,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        let credentials = config
            .username
            .clone()
            .map(|user| (user, config.password.clone().unwrap_or_default()));

        Ok(Self {
            client,
            base_url: config.base_url(),
            credentials,
            user_agent: config.user_agent.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(&self, request: &SearchRequest) -> Result<RawResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path_and_query());
        debug!(method = %request.method, url = %url, "Sending search request");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&request.body);
        if let Some((user, password)) = &self.credentials {
            builder = builder.basic_auth(user, Some(password));
        }

        let response = builder.send().await.map_err(|e| {
            metrics::record_transport_error(if e.is_timeout() { "timeout" } else { "connect" });
            TransportError::Http(e)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        let raw = RawResponse { status, headers, body };
        if !raw.is_success() {
            warn!(status, url = %url, "Search engine returned an error status");
            metrics::record_engine_error(status);
        }
        raw.error_for_status()
    }
}
