//! Metrics collection.
//!
//! # Metrics
//! - `harness_rpc_requests_total` (counter): JSON-RPC requests by method, outcome
//! - `harness_rpc_request_duration_seconds` (histogram): request latency by method
//! - `harness_contract_calls_total` (counter): contract views/calls by kind, method
//!
//! No exporter is installed here; the `metrics` facade is a no-op until the
//! embedding process installs a recorder.

use std::time::Duration;

/// Record one JSON-RPC request attempt.
pub fn record_rpc_request(method: &str, success: bool, elapsed: Duration) {
    let outcome = if success { "ok" } else { "error" };
    metrics::counter!(
        "harness_rpc_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "harness_rpc_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(elapsed.as_secs_f64());
}

/// Record a contract view or call issued through the harness.
pub fn record_contract_call(kind: &'static str, method: &str) {
    metrics::counter!(
        "harness_contract_calls_total",
        "kind" => kind,
        "method" => method.to_string()
    )
    .increment(1);
}
