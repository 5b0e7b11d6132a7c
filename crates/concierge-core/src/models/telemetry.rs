use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BackendSlot, ClassificationMethod, DataSource, DenialKind, Role};
use crate::intent::Intent;

/// Append-only pipeline telemetry. Emitted to sinks, never read back by the
/// pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TelemetryEvent {
    QueryStarted {
        request_id: Uuid,
        role: Role,
        at: DateTime<Utc>,
    },
    IntentClassified {
        request_id: Uuid,
        intent: Intent,
        confidence: f64,
        method: ClassificationMethod,
    },
    RoleValidated {
        request_id: Uuid,
        role: Role,
        intent: Intent,
        allowed: bool,
        denial: Option<DenialKind>,
    },
    QueryRouted {
        request_id: Uuid,
        intent: Intent,
        data_source: DataSource,
    },
    DatabaseQueried {
        request_id: Uuid,
        intent: Intent,
        success: bool,
        record_count: usize,
        latency_ms: f64,
    },
    RetrievalQueried {
        request_id: Uuid,
        intent: Intent,
        success: bool,
        chunk_count: usize,
        latency_ms: f64,
    },
    GenerationCompleted {
        request_id: Uuid,
        backend: BackendSlot,
        fallback_used: bool,
        latency_ms: f64,
    },
    GenerationUnavailable {
        request_id: Uuid,
    },
    QueryCompleted {
        request_id: Uuid,
        intent: Intent,
        data_source: DataSource,
        latency_ms: f64,
    },
    PipelineError {
        request_id: Uuid,
        code: String,
        stage: String,
    },
}

impl TelemetryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::QueryStarted { .. } => "query_started",
            Self::IntentClassified { .. } => "intent_classified",
            Self::RoleValidated { .. } => "role_validated",
            Self::QueryRouted { .. } => "query_routed",
            Self::DatabaseQueried { .. } => "database_queried",
            Self::RetrievalQueried { .. } => "retrieval_queried",
            Self::GenerationCompleted { .. } => "generation_completed",
            Self::GenerationUnavailable { .. } => "generation_unavailable",
            Self::QueryCompleted { .. } => "query_completed",
            Self::PipelineError { .. } => "pipeline_error",
        }
    }
}
