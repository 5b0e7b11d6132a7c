//! Per-query performance log. Query text is stored only as a blake3 digest.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use concierge_core::config::defaults::DEFAULT_QUERY_LOG_CAPACITY;
use concierge_core::{DataSource, Intent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub query_hash: String,
    pub intent: Intent,
    pub data_source: DataSource,
    pub latency: Duration,
    pub record_count: usize,
    pub timestamp_epoch_ms: i64,
}

impl QueryLogEntry {
    /// Create a new entry with the timestamp set to now.
    pub fn new(
        query: &str,
        intent: Intent,
        data_source: DataSource,
        latency: Duration,
        record_count: usize,
    ) -> Self {
        Self {
            query_hash: blake3::hash(query.as_bytes()).to_hex().to_string(),
            intent,
            data_source,
            latency,
            record_count,
            timestamp_epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Bounded ring of recent queries, shared across concurrent requests.
#[derive(Debug)]
pub struct QueryLog {
    entries: Mutex<VecDeque<QueryLogEntry>>,
    max_entries: usize,
}

impl QueryLog {
    pub fn with_capacity(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(max_entries.min(1024))),
            max_entries,
        }
    }

    pub fn record(&self, entry: QueryLogEntry) {
        tracing::debug!(
            event = "query_logged",
            query_hash = %entry.query_hash,
            intent = entry.intent.as_str(),
            data_source = entry.data_source.as_str(),
            latency_ms = entry.latency.as_millis() as u64,
            record_count = entry.record_count,
            "query logged"
        );

        let mut entries = self.lock();
        entries.push_back(entry);
        while entries.len() > self.max_entries {
            entries.pop_front();
        }
    }

    /// Snapshot of retained entries, oldest first.
    pub fn entries(&self) -> Vec<QueryLogEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn avg_latency(&self) -> Duration {
        let entries = self.lock();
        if entries.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = entries.iter().map(|e| e.latency).sum();
        total / entries.len() as u32
    }

    /// Latency at the given percentile (0.0 to 1.0).
    pub fn latency_percentile(&self, p: f64) -> Duration {
        let mut latencies: Vec<Duration> = self.lock().iter().map(|e| e.latency).collect();
        if latencies.is_empty() {
            return Duration::ZERO;
        }
        latencies.sort();
        let p = p.clamp(0.0, 1.0);
        let idx = ((p * (latencies.len() - 1) as f64).round() as usize).min(latencies.len() - 1);
        latencies[idx]
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<QueryLogEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUERY_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(query: &str, ms: u64) -> QueryLogEntry {
        QueryLogEntry::new(
            query,
            Intent::Policy,
            DataSource::Retrieval,
            Duration::from_millis(ms),
            0,
        )
    }

    #[test]
    fn query_text_is_not_retained() {
        let e = entry("what is the refund policy", 5);
        assert_eq!(e.query_hash.len(), 64);
        assert!(!e.query_hash.contains("refund"));
        assert_eq!(e.query_hash, entry("what is the refund policy", 9).query_hash);
    }

    #[test]
    fn ring_drops_oldest() {
        let log = QueryLog::with_capacity(2);
        for ms in [1, 2, 3] {
            log.record(entry("q", ms));
        }
        let latencies: Vec<_> = log.entries().iter().map(|e| e.latency.as_millis()).collect();
        assert_eq!(latencies, vec![2, 3]);
    }

    #[test]
    fn averages_and_percentiles() {
        let log = QueryLog::default();
        assert_eq!(log.avg_latency(), Duration::ZERO);
        for ms in [10, 20, 30, 40, 50] {
            log.record(entry("q", ms));
        }
        assert_eq!(log.count(), 5);
        assert_eq!(log.avg_latency(), Duration::from_millis(30));
        assert_eq!(log.latency_percentile(0.5), Duration::from_millis(30));
        assert_eq!(log.latency_percentile(1.0), Duration::from_millis(50));
    }
}
