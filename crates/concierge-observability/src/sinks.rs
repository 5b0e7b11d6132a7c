//! Telemetry sinks.

use std::sync::Arc;

use concierge_core::errors::error_code;
use concierge_core::models::TelemetryEvent;
use concierge_core::traits::ITelemetrySink;

use crate::tracing_setup::events;

/// Forwards every telemetry event to the matching structured log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetrySink;

impl ITelemetrySink for TracingTelemetrySink {
    fn emit(&self, event: &TelemetryEvent) {
        match event {
            TelemetryEvent::QueryStarted {
                request_id, role, ..
            } => events::query_started(request_id, role.as_str()),
            TelemetryEvent::IntentClassified {
                request_id,
                intent,
                confidence,
                method,
            } => events::intent_classified(request_id, intent.as_str(), *confidence, method.as_str()),
            TelemetryEvent::RoleValidated {
                request_id,
                role,
                intent,
                allowed,
                denial,
            } => {
                events::role_validated(request_id, role.as_str(), intent.as_str(), *allowed);
                if let Some(kind) = denial {
                    events::access_denied(
                        request_id,
                        role.as_str(),
                        intent.as_str(),
                        kind.metadata_tag(),
                    );
                }
            }
            TelemetryEvent::QueryRouted {
                request_id,
                intent,
                data_source,
            } => events::query_routed(request_id, intent.as_str(), data_source.as_str()),
            TelemetryEvent::DatabaseQueried {
                request_id,
                intent,
                success,
                record_count,
                latency_ms,
            } => events::database_query(
                request_id,
                intent.as_str(),
                *success,
                *record_count,
                *latency_ms,
            ),
            TelemetryEvent::RetrievalQueried {
                request_id,
                intent,
                success,
                chunk_count,
                latency_ms,
            } => events::retrieval_query(
                request_id,
                intent.as_str(),
                *success,
                *chunk_count,
                *latency_ms,
            ),
            TelemetryEvent::GenerationCompleted {
                request_id,
                backend,
                fallback_used,
                latency_ms,
            } => {
                events::generation_completed(request_id, backend.as_str(), *latency_ms);
                if *fallback_used {
                    events::generation_fallback(request_id, *latency_ms);
                }
            }
            TelemetryEvent::GenerationUnavailable { request_id } => {
                events::pipeline_error(request_id, error_code::GENERATION_UNAVAILABLE, "generation")
            }
            TelemetryEvent::QueryCompleted {
                request_id,
                intent,
                data_source,
                latency_ms,
            } => events::query_completed(
                request_id,
                intent.as_str(),
                data_source.as_str(),
                *latency_ms,
            ),
            TelemetryEvent::PipelineError {
                request_id,
                code,
                stage,
            } => events::pipeline_error(request_id, code, stage),
        }
    }
}

/// Delivers each event to several sinks, in order.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn ITelemetrySink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn ITelemetrySink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ITelemetrySink for FanoutSink {
    fn emit(&self, event: &TelemetryEvent) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}
