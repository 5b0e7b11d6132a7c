use std::sync::Arc;

use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;

use concierge_core::models::{BackendSlot, DenialKind, TelemetryEvent};
use concierge_core::traits::ITelemetrySink;
use concierge_core::{DataSource, Intent, Role};
use concierge_observability::metrics::LatencyWindow;
use concierge_observability::{FanoutSink, MetricsCollector, TracingTelemetrySink};

fn pipeline_events(request_id: Uuid) -> Vec<TelemetryEvent> {
    vec![
        TelemetryEvent::QueryStarted {
            request_id,
            role: Role::Consumer,
            at: Utc::now(),
        },
        TelemetryEvent::IntentClassified {
            request_id,
            intent: Intent::Analytics,
            confidence: 0.95,
            method: concierge_core::ClassificationMethod::Pattern,
        },
        TelemetryEvent::RoleValidated {
            request_id,
            role: Role::Consumer,
            intent: Intent::Analytics,
            allowed: false,
            denial: Some(DenialKind::RoleNotPermitted),
        },
        TelemetryEvent::QueryCompleted {
            request_id,
            intent: Intent::Analytics,
            data_source: DataSource::None,
            latency_ms: 12.5,
        },
    ]
}

#[test]
fn fanout_feeds_metrics_and_logs() {
    let metrics = Arc::new(MetricsCollector::default());
    let sink = FanoutSink::new()
        .with(Arc::new(TracingTelemetrySink))
        .with(metrics.clone());
    assert_eq!(sink.len(), 2);

    for event in pipeline_events(Uuid::new_v4()) {
        sink.emit(&event);
    }

    let summary = metrics.summary();
    assert_eq!(summary.total_requests, 1);
    assert_eq!(summary.intents["analytics_query"], 1);
    assert_eq!(summary.role_validation.denied, 1);
    assert_eq!(summary.role_validation.denial_rate, 1.0);
    assert_eq!(summary.latency.p50_ms, 12.5);
}

#[test]
fn summary_serializes_with_stable_keys() {
    let metrics = MetricsCollector::default();
    metrics.emit(&TelemetryEvent::GenerationCompleted {
        request_id: Uuid::nil(),
        backend: BackendSlot::Secondary,
        fallback_used: true,
        latency_ms: 80.0,
    });
    let json = serde_json::to_value(metrics.summary()).unwrap();
    assert_eq!(json["generation"]["fallback_success"], 1);
    assert_eq!(json["generation"]["fallback_rate"], 1.0);
    assert!(json["latency"]["p95_ms"].is_number());
    assert!(json["uptime_seconds"].is_number());
}

#[test]
fn concurrent_emitters_are_all_counted() {
    let metrics = Arc::new(MetricsCollector::new(64));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let metrics = metrics.clone();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    metrics.emit(&TelemetryEvent::QueryCompleted {
                        request_id: Uuid::new_v4(),
                        intent: Intent::Policy,
                        data_source: DataSource::Retrieval,
                        latency_ms: 3.0,
                    });
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let summary = metrics.summary();
    assert_eq!(summary.total_requests, 200);
    assert_eq!(summary.latency.samples, 64);
}

proptest! {
    #[test]
    fn window_never_exceeds_capacity(cap in 1usize..50, samples in prop::collection::vec(0.0f64..5_000.0, 0..200)) {
        let mut window = LatencyWindow::new(cap);
        for s in &samples {
            window.push(*s);
        }
        prop_assert!(window.len() <= cap);
        let summary = window.summary();
        prop_assert!(summary.min_ms <= summary.p50_ms);
        prop_assert!(summary.p50_ms <= summary.max_ms);
    }
}

#[test]
fn tracing_installs_once_per_process() {
    use concierge_core::config::ObservabilityConfig;
    use concierge_observability::tracing_setup::{
        init_from_config, init_tracing, init_tracing_with_filter,
    };

    // Whichever call wins the global slot, later ones report false instead of panicking.
    init_tracing_with_filter("warn");
    assert!(!init_tracing());
    assert!(!init_from_config(&ObservabilityConfig::default()));
}
