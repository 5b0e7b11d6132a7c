//! Pipeline metrics, fed by telemetry events.
//!
//! [`MetricsCollector`] is itself a telemetry sink. It is safe to share
//! across concurrent pipeline executions.

mod latency;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use concierge_core::config::defaults::DEFAULT_LATENCY_WINDOW;
use concierge_core::models::TelemetryEvent;
use concierge_core::traits::ITelemetrySink;

pub use latency::{LatencySummary, LatencyWindow};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleValidationSummary {
    pub allowed: u64,
    pub denied: u64,
    pub denial_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub primary_success: u64,
    pub fallback_success: u64,
    pub total_failures: u64,
    pub fallback_rate: f64,
}

/// Serializable snapshot of everything the collector knows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub uptime_seconds: f64,
    pub total_requests: u64,
    pub requests_per_second: f64,
    pub latency: LatencySummary,
    pub events: BTreeMap<String, u64>,
    pub intents: BTreeMap<String, u64>,
    pub role_validation: RoleValidationSummary,
    pub generation: GenerationSummary,
    pub errors: BTreeMap<String, u64>,
}

#[derive(Debug)]
pub struct MetricsCollector {
    started: Mutex<DateTime<Utc>>,
    latencies: Mutex<LatencyWindow>,
    events: DashMap<&'static str, u64>,
    intents: DashMap<&'static str, u64>,
    errors: DashMap<String, u64>,
    role_allowed: AtomicU64,
    role_denied: AtomicU64,
    generation_primary: AtomicU64,
    generation_fallback: AtomicU64,
    generation_failures: AtomicU64,
}

impl MetricsCollector {
    pub fn new(latency_window: usize) -> Self {
        Self {
            started: Mutex::new(Utc::now()),
            latencies: Mutex::new(LatencyWindow::new(latency_window)),
            events: DashMap::new(),
            intents: DashMap::new(),
            errors: DashMap::new(),
            role_allowed: AtomicU64::new(0),
            role_denied: AtomicU64::new(0),
            generation_primary: AtomicU64::new(0),
            generation_fallback: AtomicU64::new(0),
            generation_failures: AtomicU64::new(0),
        }
    }

    /// Update aggregates from one event.
    pub fn record(&self, event: &TelemetryEvent) {
        *self.events.entry(event.name()).or_default() += 1;

        match event {
            TelemetryEvent::IntentClassified { intent, .. } => {
                *self.intents.entry(intent.as_str()).or_default() += 1;
            }
            TelemetryEvent::RoleValidated { allowed, .. } => {
                let counter = if *allowed {
                    &self.role_allowed
                } else {
                    &self.role_denied
                };
                counter.fetch_add(1, Ordering::Relaxed);
            }
            TelemetryEvent::GenerationCompleted { fallback_used, .. } => {
                let counter = if *fallback_used {
                    &self.generation_fallback
                } else {
                    &self.generation_primary
                };
                counter.fetch_add(1, Ordering::Relaxed);
            }
            TelemetryEvent::GenerationUnavailable { .. } => {
                self.generation_failures.fetch_add(1, Ordering::Relaxed);
            }
            TelemetryEvent::QueryCompleted { latency_ms, .. } => {
                self.lock_latencies().push(*latency_ms);
            }
            TelemetryEvent::PipelineError { code, .. } => {
                *self.errors.entry(code.clone()).or_default() += 1;
            }
            _ => {}
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        let started = *self.started.lock().unwrap_or_else(|e| e.into_inner());
        let uptime = (Utc::now() - started).num_milliseconds().max(0) as f64 / 1000.0;
        let total_requests = self
            .events
            .get("query_completed")
            .map(|v| *v)
            .unwrap_or(0);

        let allowed = self.role_allowed.load(Ordering::Relaxed);
        let denied = self.role_denied.load(Ordering::Relaxed);
        let primary = self.generation_primary.load(Ordering::Relaxed);
        let fallback = self.generation_fallback.load(Ordering::Relaxed);

        MetricsSummary {
            uptime_seconds: round(uptime, 100.0),
            total_requests,
            requests_per_second: if uptime > 0.0 {
                round(total_requests as f64 / uptime, 100.0)
            } else {
                0.0
            },
            latency: self.lock_latencies().summary(),
            events: collect(&self.events),
            intents: collect(&self.intents),
            role_validation: RoleValidationSummary {
                allowed,
                denied,
                denial_rate: ratio(denied, allowed + denied),
            },
            generation: GenerationSummary {
                primary_success: primary,
                fallback_success: fallback,
                total_failures: self.generation_failures.load(Ordering::Relaxed),
                fallback_rate: ratio(fallback, primary + fallback),
            },
            errors: self
                .errors
                .iter()
                .map(|e| (e.key().clone(), *e.value()))
                .collect(),
        }
    }

    pub fn reset(&self) {
        *self.started.lock().unwrap_or_else(|e| e.into_inner()) = Utc::now();
        self.lock_latencies().clear();
        self.events.clear();
        self.intents.clear();
        self.errors.clear();
        for counter in [
            &self.role_allowed,
            &self.role_denied,
            &self.generation_primary,
            &self.generation_fallback,
            &self.generation_failures,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    fn lock_latencies(&self) -> std::sync::MutexGuard<'_, LatencyWindow> {
        self.latencies.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY_WINDOW)
    }
}

impl ITelemetrySink for MetricsCollector {
    fn emit(&self, event: &TelemetryEvent) {
        self.record(event);
    }
}

fn collect(map: &DashMap<&'static str, u64>) -> BTreeMap<String, u64> {
    map.iter().map(|e| (e.key().to_string(), *e.value())).collect()
}

/// Three-decimal ratio, zero over an empty denominator.
fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round(part as f64 / total as f64, 1000.0)
}

fn round(v: f64, scale: f64) -> f64 {
    (v * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::models::{BackendSlot, DataSource, Role};
    use concierge_core::Intent;
    use uuid::Uuid;

    #[test]
    fn role_validation_counts_and_rate() {
        let m = MetricsCollector::default();
        for allowed in [true, true, true, false] {
            m.record(&TelemetryEvent::RoleValidated {
                request_id: Uuid::nil(),
                role: Role::Consumer,
                intent: Intent::Analytics,
                allowed,
                denial: None,
            });
        }
        let s = m.summary();
        assert_eq!(s.role_validation.allowed, 3);
        assert_eq!(s.role_validation.denied, 1);
        assert_eq!(s.role_validation.denial_rate, 0.25);
        assert_eq!(s.events["role_validated"], 4);
    }

    #[test]
    fn completed_queries_feed_latency_and_totals() {
        let m = MetricsCollector::new(10);
        for latency_ms in [10.0, 20.0, 30.0] {
            m.record(&TelemetryEvent::QueryCompleted {
                request_id: Uuid::nil(),
                intent: Intent::Policy,
                data_source: DataSource::Retrieval,
                latency_ms,
            });
        }
        let s = m.summary();
        assert_eq!(s.total_requests, 3);
        assert_eq!(s.latency.samples, 3);
        assert_eq!(s.latency.max_ms, 30.0);
    }

    #[test]
    fn generation_fallback_rate() {
        let m = MetricsCollector::default();
        for fallback_used in [false, true] {
            m.record(&TelemetryEvent::GenerationCompleted {
                request_id: Uuid::nil(),
                backend: BackendSlot::Primary,
                fallback_used,
                latency_ms: 1.0,
            });
        }
        m.record(&TelemetryEvent::GenerationUnavailable {
            request_id: Uuid::nil(),
        });
        let g = m.summary().generation;
        assert_eq!(g.primary_success, 1);
        assert_eq!(g.fallback_success, 1);
        assert_eq!(g.total_failures, 1);
        assert_eq!(g.fallback_rate, 0.5);
    }

    #[test]
    fn reset_clears_everything() {
        let m = MetricsCollector::default();
        m.record(&TelemetryEvent::PipelineError {
            request_id: Uuid::nil(),
            code: "STORAGE_FAILURE".to_string(),
            stage: "data".to_string(),
        });
        assert_eq!(m.summary().errors["STORAGE_FAILURE"], 1);
        m.reset();
        let s = m.summary();
        assert!(s.errors.is_empty());
        assert!(s.events.is_empty());
    }
}
