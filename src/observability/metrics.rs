//! Driver counters
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe via relaxed atomics

use std::sync::atomic::{AtomicU64, Ordering};

/// Operational counters for one dispatcher and the cursors it creates
#[derive(Debug, Default)]
pub struct DriverMetrics {
    /// Queries handed to the transport
    queries_dispatched: AtomicU64,
    /// Queries the transport refused
    queries_rejected: AtomicU64,
    /// Continuation batches fetched by cursors
    batches_fetched: AtomicU64,
    /// Items successfully decoded
    items_decoded: AtomicU64,
    /// Items that failed to decode
    decode_failures: AtomicU64,
    /// Error frames received from the server
    server_errors: AtomicU64,
}

impl DriverMetrics {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_queries_dispatched(&self) {
        self.queries_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_batches_fetched(&self) {
        self.batches_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_items_decoded(&self) {
        self.items_decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_decode_failures(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_server_errors(&self) {
        self.server_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_dispatched: self.queries_dispatched.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            batches_fetched: self.batches_fetched.load(Ordering::Relaxed),
            items_decoded: self.items_decoded.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            server_errors: self.server_errors.load(Ordering::Relaxed),
        }
    }

    /// Current counters as a JSON object
    pub fn to_json(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"{{"queries_dispatched":{},"queries_rejected":{},"batches_fetched":{},"items_decoded":{},"decode_failures":{},"server_errors":{}}}"#,
            s.queries_dispatched,
            s.queries_rejected,
            s.batches_fetched,
            s.items_decoded,
            s.decode_failures,
            s.server_errors,
        )
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub queries_dispatched: u64,
    pub queries_rejected: u64,
    pub batches_fetched: u64,
    pub items_decoded: u64,
    pub decode_failures: u64,
    pub server_errors: u64,
}
