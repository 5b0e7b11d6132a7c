//! Closed set of structured operations, resolved statically from
//! intent × role. No string dispatch.

use concierge_core::models::{DataFailure, DataResult, Role, TimeRange};
use concierge_core::Intent;

/// One structured lookup or aggregation.
#[derive(Debug, Clone, PartialEq)]
pub enum DataOperation {
    Recommendations { user_id: String },
    SavedItems { owner_id: String },
    ProviderAnalytics { owner_id: String, range: TimeRange },
    SystemAnalytics { range: TimeRange },
    ProviderRevenue { owner_id: String, range: TimeRange },
    SystemRevenue { range: TimeRange },
    ModerationQueue,
}

impl DataOperation {
    /// Pick the operation for `intent` as `role`. `owner_id` is the effective
    /// owner (explicit resource owner, else the caller).
    ///
    /// The `Err` side is a ready-made, user-safe error envelope.
    pub fn resolve(
        intent: Intent,
        role: Role,
        user_id: &str,
        owner_id: &str,
        range: TimeRange,
    ) -> Result<Self, DataResult> {
        match (intent, role) {
            (Intent::Recommendation, _) => Ok(Self::Recommendations {
                user_id: user_id.to_string(),
            }),
            (Intent::SavedItems, _) => Ok(Self::SavedItems {
                owner_id: owner_id.to_string(),
            }),
            (Intent::Analytics, Role::Administrator) => Ok(Self::SystemAnalytics { range }),
            (Intent::Analytics, Role::Provider) => Ok(Self::ProviderAnalytics {
                owner_id: owner_id.to_string(),
                range,
            }),
            (Intent::Analytics, _) => Err(DataResult::error(
                DataFailure::NotPermitted,
                "Analytics not available for this role",
            )),
            (Intent::Revenue, Role::Administrator) => Ok(Self::SystemRevenue { range }),
            (Intent::Revenue, Role::Provider) => Ok(Self::ProviderRevenue {
                owner_id: owner_id.to_string(),
                range,
            }),
            (Intent::Revenue, _) => Err(DataResult::error(
                DataFailure::NotPermitted,
                "Revenue data not available for this role",
            )),
            (Intent::Moderation, Role::Administrator) => Ok(Self::ModerationQueue),
            (Intent::Moderation, _) => Err(DataResult::error(
                DataFailure::NotPermitted,
                "Moderation access denied",
            )),
            (other, _) => Err(DataResult::error(
                DataFailure::UnsupportedIntent,
                format!("Intent {other} not handled by data engine"),
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Recommendations { .. } => "recommendations",
            Self::SavedItems { .. } => "saved_items",
            Self::ProviderAnalytics { .. } => "provider_analytics",
            Self::SystemAnalytics { .. } => "system_analytics",
            Self::ProviderRevenue { .. } => "provider_revenue",
            Self::SystemRevenue { .. } => "system_revenue",
            Self::ModerationQueue => "moderation_queue",
        }
    }
}
