//! Race-safe facade counters and their serializable snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Cumulative counters, updated with atomic increments.
#[derive(Debug, Default)]
pub(crate) struct GenerationCounters {
    pub total_requests: AtomicU64,
    pub primary_success: AtomicU64,
    pub primary_failure: AtomicU64,
    pub secondary_success: AtomicU64,
    pub secondary_failure: AtomicU64,
    pub total_failures: AtomicU64,
}

impl GenerationCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> GenerationStats {
        let total = self.total_requests.load(Ordering::Relaxed);
        let primary_success = self.primary_success.load(Ordering::Relaxed);
        let secondary_success = self.secondary_success.load(Ordering::Relaxed);
        GenerationStats {
            total_requests: total,
            primary_success,
            primary_failure: self.primary_failure.load(Ordering::Relaxed),
            secondary_success,
            secondary_failure: self.secondary_failure.load(Ordering::Relaxed),
            total_failures: self.total_failures.load(Ordering::Relaxed),
            fallback_rate: rate(secondary_success, total),
            success_rate: rate(primary_success + secondary_success, total),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.total_requests,
            &self.primary_success,
            &self.primary_failure,
            &self.secondary_success,
            &self.secondary_failure,
            &self.total_failures,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Rounded to three decimals; zero when nothing was requested.
fn rate(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((part as f64 / total as f64) * 1000.0).round() / 1000.0
}

/// Read-only telemetry snapshot. Never consulted for routing decisions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub total_requests: u64,
    pub primary_success: u64,
    pub primary_failure: u64,
    pub secondary_success: u64,
    pub secondary_failure: u64,
    pub total_failures: u64,
    pub fallback_rate: f64,
    pub success_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_counters_have_zero_rates() {
        let stats = GenerationCounters::default().snapshot();
        assert_eq!(stats.fallback_rate, 0.0);
        assert_eq!(stats.success_rate, 0.0);
    }

    #[test]
    fn rates_are_rounded() {
        assert_eq!(rate(1, 3), 0.333);
        assert_eq!(rate(2, 3), 0.667);
    }

    #[test]
    fn reset_zeroes_everything() {
        let c = GenerationCounters::default();
        GenerationCounters::bump(&c.total_requests);
        GenerationCounters::bump(&c.primary_success);
        c.reset();
        assert_eq!(c.snapshot(), GenerationStats::default());
    }
}
