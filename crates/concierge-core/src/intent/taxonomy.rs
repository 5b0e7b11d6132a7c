use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::BoundaryError;

/// The classified purpose of a user query.
///
/// Nine variants: eight answerable intents plus `Unknown`.
/// Wire names carry the `_query` suffix used by existing API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Intent {
    #[serde(rename = "recommendation_query")]
    Recommendation,
    #[serde(rename = "saved_items_query")]
    SavedItems,
    #[serde(rename = "analytics_query")]
    Analytics,
    #[serde(rename = "revenue_query")]
    Revenue,
    #[serde(rename = "moderation_query")]
    Moderation,
    #[serde(rename = "policy_query")]
    Policy,
    #[serde(rename = "navigation_query")]
    Navigation,
    #[serde(rename = "troubleshooting_query")]
    Troubleshooting,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Intent {
    /// Total number of intent variants.
    pub const COUNT: usize = 9;

    /// All variants, in lexical-rule evaluation order, `Unknown` last.
    pub const ALL: [Intent; 9] = [
        Self::Recommendation,
        Self::SavedItems,
        Self::Analytics,
        Self::Revenue,
        Self::Moderation,
        Self::Policy,
        Self::Navigation,
        Self::Troubleshooting,
        Self::Unknown,
    ];

    /// Intents a classifier can positively select (everything but `Unknown`).
    pub const CLASSIFIABLE: [Intent; 8] = [
        Self::Recommendation,
        Self::SavedItems,
        Self::Analytics,
        Self::Revenue,
        Self::Moderation,
        Self::Policy,
        Self::Navigation,
        Self::Troubleshooting,
    ];

    /// Intents that must never be answered from documents.
    pub const STRUCTURED_ONLY: [Intent; 3] = [Self::Analytics, Self::Revenue, Self::SavedItems];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recommendation => "recommendation_query",
            Self::SavedItems => "saved_items_query",
            Self::Analytics => "analytics_query",
            Self::Revenue => "revenue_query",
            Self::Moderation => "moderation_query",
            Self::Policy => "policy_query",
            Self::Navigation => "navigation_query",
            Self::Troubleshooting => "troubleshooting_query",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this intent is reserved for the structured path.
    pub fn is_structured_only(&self) -> bool {
        Self::STRUCTURED_ONLY.contains(self)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = BoundaryError;

    /// Parses a wire name. Anything outside the closed set is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == needle)
            .ok_or_else(|| BoundaryError::UnknownIntent {
                value: s.to_string(),
            })
    }
}
