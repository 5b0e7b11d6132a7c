//! Structured log events for pipeline milestones.
//!
//! Each function emits one `tracing` event carrying an `event` field.

use uuid::Uuid;

pub fn query_started(request_id: &Uuid, role: &str) {
    tracing::info!(
        event = "query_started",
        request_id = %request_id,
        role = %role,
        "query started"
    );
}

pub fn intent_classified(request_id: &Uuid, intent: &str, confidence: f64, method: &str) {
    tracing::info!(
        event = "intent_classified",
        request_id = %request_id,
        intent = %intent,
        confidence = confidence,
        method = %method,
        "intent classified"
    );
}

pub fn role_validated(request_id: &Uuid, role: &str, intent: &str, allowed: bool) {
    tracing::info!(
        event = "role_validated",
        request_id = %request_id,
        role = %role,
        intent = %intent,
        allowed = allowed,
        "role validated"
    );
}

/// Security-relevant; logged at warn so denials stand out in audits.
pub fn access_denied(request_id: &Uuid, role: &str, intent: &str, denial: &str) {
    tracing::warn!(
        event = "access_denied",
        request_id = %request_id,
        role = %role,
        intent = %intent,
        denial = %denial,
        "access denied"
    );
}

pub fn query_routed(request_id: &Uuid, intent: &str, data_source: &str) {
    tracing::info!(
        event = "query_routed",
        request_id = %request_id,
        intent = %intent,
        data_source = %data_source,
        "query routed"
    );
}

pub fn database_query(
    request_id: &Uuid,
    intent: &str,
    success: bool,
    record_count: usize,
    latency_ms: f64,
) {
    tracing::info!(
        event = "database_query",
        request_id = %request_id,
        intent = %intent,
        success = success,
        record_count = record_count,
        latency_ms = latency_ms,
        "structured data queried"
    );
}

pub fn retrieval_query(
    request_id: &Uuid,
    intent: &str,
    success: bool,
    chunk_count: usize,
    latency_ms: f64,
) {
    tracing::info!(
        event = "retrieval_query",
        request_id = %request_id,
        intent = %intent,
        success = success,
        chunk_count = chunk_count,
        latency_ms = latency_ms,
        "documents retrieved"
    );
}

pub fn generation_completed(request_id: &Uuid, backend: &str, latency_ms: f64) {
    tracing::info!(
        event = "generation_completed",
        request_id = %request_id,
        backend = %backend,
        latency_ms = latency_ms,
        "generation completed"
    );
}

pub fn generation_fallback(request_id: &Uuid, latency_ms: f64) {
    tracing::warn!(
        event = "generation_fallback",
        request_id = %request_id,
        latency_ms = latency_ms,
        "generation served by secondary backend"
    );
}

pub fn query_completed(request_id: &Uuid, intent: &str, data_source: &str, latency_ms: f64) {
    tracing::info!(
        event = "query_completed",
        request_id = %request_id,
        intent = %intent,
        data_source = %data_source,
        latency_ms = latency_ms,
        "query completed"
    );
}

pub fn pipeline_error(request_id: &Uuid, code: &str, stage: &str) {
    tracing::error!(
        event = "pipeline_error",
        request_id = %request_id,
        code = %code,
        stage = %stage,
        "pipeline error"
    );
}

pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}
