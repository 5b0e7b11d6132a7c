//! Static intent → data-path routing table.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Intent;

/// Which data paths an intent needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingFlags {
    pub requires_structured: bool,
    pub requires_retrieval: bool,
}

impl RoutingFlags {
    pub const STRUCTURED: Self = Self {
        requires_structured: true,
        requires_retrieval: false,
    };
    pub const RETRIEVAL: Self = Self {
        requires_structured: false,
        requires_retrieval: true,
    };
    pub const HYBRID: Self = Self {
        requires_structured: true,
        requires_retrieval: true,
    };
    pub const NONE: Self = Self {
        requires_structured: false,
        requires_retrieval: false,
    };

    /// Built-in flags for an intent.
    pub const fn for_intent(intent: Intent) -> Self {
        match intent {
            Intent::Recommendation
            | Intent::SavedItems
            | Intent::Analytics
            | Intent::Revenue
            | Intent::Moderation => Self::STRUCTURED,
            Intent::Policy | Intent::Navigation | Intent::Troubleshooting => Self::RETRIEVAL,
            Intent::Unknown => Self::NONE,
        }
    }
}

/// Lookup table consulted once per classification.
///
/// Defaults to [`RoutingFlags::for_intent`]. Deployments may promote intents
/// to hybrid; structured-only intents and `Unknown` are never promoted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingTable {
    hybrid: BTreeSet<Intent>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table where the given intents need both data paths.
    pub fn with_hybrid(intents: &[Intent]) -> Self {
        let hybrid = intents
            .iter()
            .copied()
            .filter(|i| !i.is_structured_only() && *i != Intent::Unknown)
            .collect();
        Self { hybrid }
    }

    pub fn flags(&self, intent: Intent) -> RoutingFlags {
        if self.hybrid.contains(&intent) {
            RoutingFlags::HYBRID
        } else {
            RoutingFlags::for_intent(intent)
        }
    }

    pub fn hybrid_intents(&self) -> impl Iterator<Item = Intent> + '_ {
        self.hybrid.iter().copied()
    }
}
