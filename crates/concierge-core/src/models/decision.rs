use serde::{Deserialize, Serialize};

use crate::intent::{Intent, RoutingFlags};

/// How an intent was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMethod {
    Pattern,
    Embedding,
    None,
}

impl ClassificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pattern => "pattern",
            Self::Embedding => "embedding",
            Self::None => "none",
        }
    }
}

/// Output of classification. Produced once per query and only read afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDecision {
    pub intent: Intent,
    /// In `[0.0, 1.0]`.
    pub confidence: f64,
    pub requires_structured: bool,
    pub requires_retrieval: bool,
    pub method: ClassificationMethod,
}

impl IntentDecision {
    pub fn new(
        intent: Intent,
        confidence: f64,
        method: ClassificationMethod,
        flags: RoutingFlags,
    ) -> Self {
        Self {
            intent,
            confidence: confidence.clamp(0.0, 1.0),
            requires_structured: flags.requires_structured,
            requires_retrieval: flags.requires_retrieval,
            method,
        }
    }

    /// An `Unknown` decision. Needs neither data path.
    pub fn unknown(confidence: f64, method: ClassificationMethod) -> Self {
        Self::new(Intent::Unknown, confidence, method, RoutingFlags::NONE)
    }

    pub fn flags(&self) -> RoutingFlags {
        RoutingFlags {
            requires_structured: self.requires_structured,
            requires_retrieval: self.requires_retrieval,
        }
    }
}
