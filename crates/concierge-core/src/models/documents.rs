use serde::{Deserialize, Serialize};

use crate::constants::{HELP_COLLECTION, POLICY_COLLECTION};
use crate::intent::Intent;

/// Document corpus partition. Each maps to one named index collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Policy,
    Help,
}

impl DocumentCategory {
    pub fn collection_name(&self) -> &'static str {
        match self {
            Self::Policy => POLICY_COLLECTION,
            Self::Help => HELP_COLLECTION,
        }
    }

    /// Policy questions search policies; every other intent searches help docs.
    pub fn for_intent(intent: Intent) -> Self {
        match intent {
            Intent::Policy => Self::Policy,
            _ => Self::Help,
        }
    }
}

/// Metadata stored alongside each indexed chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub document_id: String,
    /// Human-readable document title, shown in citations.
    pub source: String,
    pub section: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// One chunk of a document, ready to be embedded and stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    pub text: String,
    pub metadata: DocumentMetadata,
}

/// One similarity-search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentHit {
    pub id: String,
    pub text: String,
    pub metadata: DocumentMetadata,
    /// Cosine similarity clamped to `[0.0, 1.0]`.
    pub score: f64,
}
