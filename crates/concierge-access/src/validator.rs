//! RoleValidator: allow-list first, then ownership scope.

use tracing::{debug, info, warn};

use concierge_core::models::{AuthorizationResult, DenialKind, Role};
use concierge_core::Intent;

use crate::policy;

pub const SCOPE_VIOLATION_REASON: &str = "Access denied: Cannot access other users' resources";

/// Stateless authorizer. Cheap to construct; one instance per runtime.
#[derive(Debug, Default)]
pub struct RoleValidator;

impl RoleValidator {
    pub fn new() -> Self {
        info!("RoleValidator initialized");
        Self
    }

    /// Decide whether `user_id` acting as `role` may run `intent`, optionally
    /// against data owned by `resource_owner_id`.
    ///
    /// Administrators skip the scope check but never the allow-list.
    pub fn authorize(
        &self,
        user_id: &str,
        role: Role,
        intent: Intent,
        resource_owner_id: Option<&str>,
    ) -> AuthorizationResult {
        let scope_checked = policy::requires_scope(intent);

        if !policy::is_role_allowed(role, intent) {
            let required = policy::allowed_roles(intent)
                .iter()
                .map(Role::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            warn!(
                user_id,
                role = %role,
                intent = %intent,
                required = %required,
                "access denied: role not permitted"
            );
            return AuthorizationResult::denied(
                role,
                intent,
                DenialKind::RoleNotPermitted,
                format!("Role '{role}' not permitted for {intent}. Required: {required}"),
                scope_checked,
            );
        }

        if scope_checked && role != Role::Administrator {
            if let Some(owner) = resource_owner_id.filter(|owner| *owner != user_id) {
                warn!(
                    user_id,
                    resource_owner_id = owner,
                    intent = %intent,
                    "scope violation: cross-resource access attempt"
                );
                return AuthorizationResult::denied(
                    role,
                    intent,
                    DenialKind::ScopeViolation,
                    SCOPE_VIOLATION_REASON,
                    scope_checked,
                );
            }
        }

        debug!(user_id, role = %role, intent = %intent, "access granted");
        AuthorizationResult::granted(role, intent, scope_checked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_reason_lists_required_roles() {
        let r = RoleValidator::new().authorize("u1", Role::Consumer, Intent::Analytics, None);
        assert_eq!(
            r.reason,
            "Role 'consumer' not permitted for analytics_query. Required: provider, administrator"
        );
        assert_eq!(r.denial, Some(DenialKind::RoleNotPermitted));
    }

    #[test]
    fn own_resource_is_not_a_violation() {
        let r = RoleValidator::new().authorize("p1", Role::Provider, Intent::Revenue, Some("p1"));
        assert!(r.allowed);
        assert!(r.scope_checked);
    }
}
