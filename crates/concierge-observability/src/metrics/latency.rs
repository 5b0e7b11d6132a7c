//! Rolling latency window.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Percentile view over the retained window, in milliseconds, rounded to
/// two decimals. All zero when empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
    pub min_ms: f64,
    pub samples: usize,
}

/// Keeps the most recent `capacity` samples.
#[derive(Debug, Clone)]
pub struct LatencyWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl LatencyWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, latency_ms: f64) {
        if !latency_ms.is_finite() {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(latency_ms.max(0.0));
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn summary(&self) -> LatencySummary {
        if self.samples.is_empty() {
            return LatencySummary::default();
        }
        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();
        let at = |p: f64| round2(sorted[((n as f64 * p) as usize).min(n - 1)]);
        LatencySummary {
            p50_ms: at(0.50),
            p95_ms: at(0.95),
            p99_ms: at(0.99),
            max_ms: round2(sorted[n - 1]),
            min_ms: round2(sorted[0]),
            samples: n,
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_window_summarizes_to_zero() {
        assert_eq!(LatencyWindow::new(10).summary(), LatencySummary::default());
    }

    #[test]
    fn oldest_samples_are_evicted() {
        let mut w = LatencyWindow::new(3);
        for v in [100.0, 1.0, 2.0, 3.0] {
            w.push(v);
        }
        assert_eq!(w.len(), 3);
        assert_eq!(w.summary().max_ms, 3.0);
    }

    #[test]
    fn percentiles_over_one_to_hundred() {
        let mut w = LatencyWindow::new(1000);
        for v in 1..=100 {
            w.push(v as f64);
        }
        let s = w.summary();
        assert_eq!(s.p50_ms, 51.0);
        assert_eq!(s.p95_ms, 96.0);
        assert_eq!(s.p99_ms, 100.0);
        assert_eq!(s.min_ms, 1.0);
    }

    proptest! {
        #[test]
        fn percentiles_are_monotone(values in prop::collection::vec(0.0f64..10_000.0, 1..200)) {
            let mut w = LatencyWindow::new(1000);
            for v in &values {
                w.push(*v);
            }
            let s = w.summary();
            prop_assert!(s.min_ms <= s.p50_ms);
            prop_assert!(s.p50_ms <= s.p95_ms);
            prop_assert!(s.p95_ms <= s.p99_ms);
            prop_assert!(s.p99_ms <= s.max_ms);
        }
    }
}
