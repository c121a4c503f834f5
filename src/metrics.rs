// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for esquery.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The embedding application chooses the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `esquery_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `outcome`: clause, absent, success, or an error kind
//! - `status`: HTTP status returned by the engine
//! - `kind`: timeout, connect

use metrics::{counter, histogram};
use std::time::{Duration, Instant};

/// Record the outcome of one condition translation
pub fn record_translation(outcome: &str) {
    counter!(
        "esquery_translations_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record the outcome of one search call
pub fn record_search(outcome: &str) {
    counter!(
        "esquery_searches_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record end-to-end search latency
pub fn record_search_latency(duration: Duration) {
    histogram!("esquery_search_seconds").record(duration.as_secs_f64());
}

/// Record the number of hits returned in one page
pub fn record_search_hits(count: usize) {
    histogram!("esquery_search_hits").record(count as f64);
}

/// Record a non-2xx reply from the engine
pub fn record_engine_error(status: u16) {
    counter!(
        "esquery_engine_errors_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a request that never got a reply
pub fn record_transport_error(kind: &str) {
    counter!(
        "esquery_transport_errors_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Records search latency when dropped.
pub struct LatencyTimer {
    start: Instant,
}

impl LatencyTimer {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for LatencyTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_search_latency(self.start.elapsed());
    }
}
