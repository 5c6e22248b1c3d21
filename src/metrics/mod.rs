//! Metrics collection module
//!
//! Tracks gateway outcomes and engine response times.

use crate::engine::ErrorKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Number of recent response times kept for the rolling average
const LATENCY_WINDOW: usize = 100;

/// Gateway metrics collector
pub struct Metrics {
    started_at: DateTime<Utc>,
    total_queries: AtomicU64,
    answered: AtomicU64,
    rejected: AtomicU64,
    failures: RwLock<HashMap<ErrorKind, u64>>,
    response_times: RwLock<VecDeque<u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            total_queries: AtomicU64::new(0),
            answered: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            failures: RwLock::new(HashMap::new()),
            response_times: RwLock::new(VecDeque::with_capacity(LATENCY_WINDOW)),
        }
    }

    /// Record an empty query that never reached the engine
    pub fn record_rejected(&self) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful engine call
    pub fn record_answered(&self, time_ms: u64) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
        self.answered.fetch_add(1, Ordering::Relaxed);
        self.record_response_time(time_ms);
    }

    /// Record a failed engine call
    pub fn record_failure(&self, kind: ErrorKind, time_ms: u64) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
        {
            let mut failures = self.failures.write().unwrap_or_else(PoisonError::into_inner);
            *failures.entry(kind).or_insert(0) += 1;
        }
        self.record_response_time(time_ms);
    }

    fn record_response_time(&self, time_ms: u64) {
        let mut times = self
            .response_times
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if times.len() >= LATENCY_WINDOW {
            times.pop_front();
        }
        times.push_back(time_ms);
    }

    /// Get total queries
    pub fn total_queries(&self) -> u64 {
        self.total_queries.load(Ordering::Relaxed)
    }

    /// Get average engine response time over the window
    pub fn avg_response_time(&self) -> Option<u64> {
        let times = self
            .response_times
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if times.is_empty() {
            None
        } else {
            Some(times.iter().sum::<u64>() / times.len() as u64)
        }
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let failures = self.failures.read().unwrap_or_else(PoisonError::into_inner);
        let failed = failures.values().sum();
        let failures_by_kind = failures
            .iter()
            .map(|(kind, count)| (kind.as_str().to_string(), *count))
            .collect();

        MetricsSnapshot {
            started_at: self.started_at,
            total_queries: self.total_queries(),
            answered: self.answered.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed,
            failures_by_kind,
            avg_response_time_ms: self.avg_response_time(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable view of the gateway counters
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub started_at: DateTime<Utc>,
    pub total_queries: u64,
    pub answered: u64,
    pub rejected: u64,
    pub failed: u64,
    pub failures_by_kind: HashMap<String, u64>,
    pub avg_response_time_ms: Option<u64>,
}
