use serde::{Deserialize, Serialize};

/// A document chunk that survived threshold filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub id: String,
    pub text: String,
    pub source_label: String,
    pub section: String,
    /// In `[0.0, 1.0]`.
    pub similarity_score: f64,
}

/// Source reference attached to a synthesized answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    pub source: String,
    pub section: String,
    /// Rounded to three decimals.
    pub score: f64,
}

impl Citation {
    pub fn from_chunk(chunk: &RetrievedChunk) -> Self {
        Self {
            id: chunk.id.clone(),
            source: chunk.source_label.clone(),
            section: chunk.section.clone(),
            score: (chunk.similarity_score * 1000.0).round() / 1000.0,
        }
    }
}

/// Why retrieval declined to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefusalReason {
    /// The intent belongs to the structured path.
    ForbiddenIntent,
    /// No chunk cleared the similarity threshold.
    InsufficientEvidence,
    /// Both generation backends failed during synthesis.
    GenerationUnavailable,
}

impl RefusalReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForbiddenIntent => "forbidden_intent",
            Self::InsufficientEvidence => "insufficient_evidence",
            Self::GenerationUnavailable => "generation_unavailable",
        }
    }
}

/// Result of a retrieval-engine query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalOutcome {
    pub success: bool,
    pub response_text: String,
    pub citations: Vec<Citation>,
    pub chunk_count: usize,
    pub scores: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<RefusalReason>,
    /// Chunks used as context; only exposed as raw data on request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chunks: Vec<RetrievedChunk>,
}

impl RetrievalOutcome {
    pub fn refused(reason: RefusalReason, message: impl Into<String>) -> Self {
        Self {
            success: false,
            response_text: message.into(),
            citations: Vec::new(),
            chunk_count: 0,
            scores: Vec::new(),
            refusal: Some(reason),
            chunks: Vec::new(),
        }
    }
}
