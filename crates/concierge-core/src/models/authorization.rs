use serde::{Deserialize, Serialize};

use super::Role;
use crate::intent::Intent;

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// The role is not on the allow-list for the intent.
    RoleNotPermitted,
    /// The role is permitted, but the resource belongs to someone else.
    ScopeViolation,
}

impl DenialKind {
    /// Value written to `metadata.error` on a denial response.
    pub fn metadata_tag(&self) -> &'static str {
        match self {
            Self::RoleNotPermitted => "access_denied",
            Self::ScopeViolation => "scope_violation",
        }
    }
}

/// Outcome of the role validator. Derived purely from role × intent × owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResult {
    pub allowed: bool,
    pub role: Role,
    pub intent: Intent,
    pub reason: String,
    pub scope_checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denial: Option<DenialKind>,
}

impl AuthorizationResult {
    pub fn granted(role: Role, intent: Intent, scope_checked: bool) -> Self {
        Self {
            allowed: true,
            role,
            intent,
            reason: "Access granted".to_string(),
            scope_checked,
            denial: None,
        }
    }

    pub fn denied(
        role: Role,
        intent: Intent,
        kind: DenialKind,
        reason: impl Into<String>,
        scope_checked: bool,
    ) -> Self {
        Self {
            allowed: false,
            role,
            intent,
            reason: reason.into(),
            scope_checked,
            denial: Some(kind),
        }
    }
}
