//! Configuration for the search client.
//!
//! # Example
//!
//! ```
//! use esquery::ClientConfig;
//!
//! // Minimal config (uses defaults)
//! let config = ClientConfig::default();
//! assert_eq!(config.url, "http://127.0.0.1:9200");
//!
//! // Full config
//! let config = ClientConfig {
//!     url: "https://search.internal:9200".into(),
//!     username: Some("elastic".into()),
//!     password: Some("changeme".into()),
//!     request_timeout_ms: 5_000,
//!     ..Default::default()
//! };
//! ```

use serde::Deserialize;

/// Configuration for the search client.
///
/// All fields have sensible defaults. At minimum, point `url` at the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Engine base URL (e.g., "http://localhost:9200"); scheme optional
    #[serde(default = "default_url")]
    pub url: String,

    /// HTTP basic auth credentials
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,

    /// Scheme used when `url` has none
    #[serde(default = "default_protocol")]
    pub default_protocol: String,

    /// Connection establishment timeout
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Whole-request timeout enforced by the HTTP client
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_url() -> String { "http://127.0.0.1:9200".to_string() }
fn default_protocol() -> String { "http".to_string() }
fn default_connect_timeout_ms() -> u64 { 1000 } // 1 second
fn default_request_timeout_ms() -> u64 { 30_000 }
fn default_user_agent() -> String { concat!("esquery/", env!("CARGO_PKG_VERSION")).to_string() }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: None,
            password: None,
            default_protocol: default_protocol(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// `url` with a scheme and without a trailing slash.
    pub fn base_url(&self) -> String {
        let url = self.url.trim().trim_end_matches('/');
        if url.contains("://") {
            url.to_string()
        } else {
            format!("{}://{}", self.default_protocol, url)
        }
    }
}
