use serde::{Deserialize, Serialize};

use super::{BackendSlot, Citation, ClassificationMethod, Role};
use crate::intent::{Intent, RoutingFlags};

/// Which answer path produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Structured,
    Retrieval,
    Hybrid,
    None,
}

impl DataSource {
    /// Fully determined by the decision's routing flags.
    pub fn from_flags(flags: RoutingFlags) -> Self {
        match (flags.requires_structured, flags.requires_retrieval) {
            (true, true) => Self::Hybrid,
            (true, false) => Self::Structured,
            (false, true) => Self::Retrieval,
            (false, false) => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Retrieval => "retrieval",
            Self::Hybrid => "hybrid",
            Self::None => "none",
        }
    }
}

/// Response metadata. Always carries latency and classification details;
/// the optional fields appear only on the paths that produce them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub latency_ms: f64,
    pub intent_confidence: f64,
    pub classification_method: ClassificationMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_by: Option<BackendSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_used: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarification_requested: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl ResponseMetadata {
    pub fn new(intent_confidence: f64, classification_method: ClassificationMethod) -> Self {
        Self {
            latency_ms: 0.0,
            intent_confidence,
            classification_method,
            record_count: None,
            chunk_count: None,
            citations: None,
            formatted_by: None,
            fallback_used: None,
            error: None,
            reason: None,
            correlation_id: None,
            clarification_requested: None,
            suggestions: None,
        }
    }
}

/// The single externally observable result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub intent: Intent,
    #[serde(rename = "role_scope")]
    pub role: Role,
    pub data_source: DataSource,
    #[serde(rename = "response")]
    pub response_text: String,
    pub metadata: ResponseMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<serde_json::Value>,
}

impl QueryResponse {
    /// Serialize to the wire shape.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
