// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic esquery usage example.
//!
//! Demonstrates:
//! 1. Translating a condition into a bool query
//! 2. Building a search (where clauses, sort, aggregation, paging)
//! 3. Executing it and reading hits and aggregations
//! 4. Handling an unsupported condition
//! 5. Displaying metrics
//!
//! Runs against canned replies by default. Set `ESQUERY_URL` to search a
//! real engine instead.
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! ESQUERY_URL=http://localhost:9200 cargo run --example basic_usage
//! ```

use std::sync::Arc;

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use serde::Deserialize;
use serde_json::json;

use esquery::{Client, ClientConfig, ConditionTranslator, MemoryTransport, SortOrder};

#[derive(Debug, Deserialize)]
struct Waybill {
    status: String,
    weight: f64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install metrics recorder
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().map_err(|e| e.to_string())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "esquery=debug".into()),
        )
        .with_target(false)
        .compact()
        .init();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║               esquery: Basic Usage Example                    ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    // ─────────────────────────────────────────────────────────────────────────
    // 1. Translate a condition on its own
    // ─────────────────────────────────────────────────────────────────────────
    println!("🔎 Translating a condition...");
    let condition = json!([
        "and",
        ["between", "order_time", "2020-03-07T00:00:00", "2020-03-07T23:59:59"],
        ["in", "status", ["open", "null"]],
        [{"region": "eu"}]
    ]);
    if let Some(clause) = ConditionTranslator::translate_value(&condition)? {
        println!("{}\n", serde_json::to_string_pretty(&clause)?);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 2. Pick a transport
    // ─────────────────────────────────────────────────────────────────────────
    let client = match std::env::var("ESQUERY_URL") {
        Ok(url) => {
            println!("🌐 Searching {}", url);
            Client::new(&ClientConfig { url, ..Default::default() })?
        }
        Err(_) => {
            println!("📦 Using canned replies (set ESQUERY_URL for a real engine)");
            let transport = Arc::new(MemoryTransport::new());
            transport.push_json(&json!({
                "took": 3,
                "timed_out": false,
                "_shards": {"total": 1, "successful": 1, "failed": 0},
                "hits": {
                    "total": {"value": 2, "relation": "eq"},
                    "max_score": null,
                    "hits": [
                        {"_index": "waybills", "_id": "wb-2", "_score": null,
                         "_source": {"status": "open", "weight": 12.5}},
                        {"_index": "waybills", "_id": "wb-1", "_score": null,
                         "_source": {"status": "open", "weight": 3.0}}
                    ]
                },
                "aggregations": {"total_weight": {"value": 15.5}}
            }));
            Client::with_transport(transport)
        }
    };

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Build and execute a search
    // ─────────────────────────────────────────────────────────────────────────
    let query = client
        .search(["waybills"])
        .where_and(json!(["between", "order_time", "2020-03-07T00:00:00", "2020-03-07T23:59:59"]))
        .where_and(json!(["status", "open"]))
        .order_by([("weight", SortOrder::Desc)])
        .add_agg("total_weight", "sum", json!({"field": "weight"}))
        .limit(20);

    println!("\n📝 Request body:\n{}", serde_json::to_string_pretty(&query.build()?)?);

    let result = query.execute(&client).await?;
    println!("\n✅ {} hits in {}ms", result.total_hits(), result.took);
    for hit in &result.hits.hits {
        if let Some(waybill) = hit.source_as::<Waybill>()? {
            println!("   └─ {} status={} weight={}", hit.id, waybill.status, waybill.weight);
        }
    }
    if let Some(aggs) = result.aggregations_as::<serde_json::Value>()? {
        println!("   Σ total_weight = {}", aggs["total_weight"]["value"]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Unsupported conditions fail before any request is sent
    // ─────────────────────────────────────────────────────────────────────────
    let err = client
        .search(["waybills"])
        .where_and(json!(["like", "consignee", "Smith%"]))
        .execute(&client)
        .await
        .err();
    if let Some(err) = err {
        println!("\n⚠️  {}", err);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 5. Metrics
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n📊 Metrics:");
    dump_metrics(&snapshotter);

    Ok(())
}

/// Dump all captured metrics
fn dump_metrics(snapshotter: &Snapshotter) {
    let snapshot = snapshotter.snapshot();

    let mut counters: Vec<_> = vec![];
    let mut histograms: Vec<_> = vec![];

    for (composite_key, _, _, value) in snapshot.into_vec() {
        let (_, key) = composite_key.into_parts();
        let name = key.name().to_string();
        let labels: Vec<_> = key.labels().map(|l| format!("{}={}", l.key(), l.value())).collect();
        let label_str = if labels.is_empty() { String::new() } else { format!("{{{}}}", labels.join(",")) };

        match value {
            DebugValue::Counter(v) => counters.push((name, label_str, v)),
            DebugValue::Histogram(samples) => {
                let count = samples.len();
                let sum: f64 = samples.iter().map(|v| v.into_inner()).sum();
                histograms.push((name, label_str, count, sum));
            }
            DebugValue::Gauge(_) => {}
        }
    }

    counters.sort_by(|a, b| a.0.cmp(&b.0));
    histograms.sort_by(|a, b| a.0.cmp(&b.0));

    if !counters.is_empty() {
        println!("   ┌─ Counters (cumulative)");
        for (name, labels, value) in &counters {
            println!("   │  └─ {}{} = {}", name, labels, value);
        }
    }

    if !histograms.is_empty() {
        println!("   └─ Histograms (distributions)");
        for (name, labels, count, sum) in &histograms {
            println!("      └─ {}{} count={} sum={:.4}", name, labels, count, sum);
        }
    }

    if counters.is_empty() && histograms.is_empty() {
        println!("   └─ (no metrics recorded)");
    }
}
