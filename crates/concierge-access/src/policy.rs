//! Static access policy tables.

use concierge_core::models::Role;
use concierge_core::Intent;

const EVERYONE: &[Role] = &[Role::Consumer, Role::Provider, Role::Administrator];

/// Roles permitted to invoke `intent`. Anything not listed is denied.
pub const fn allowed_roles(intent: Intent) -> &'static [Role] {
    match intent {
        Intent::SavedItems => &[Role::Consumer],
        Intent::Analytics | Intent::Revenue => &[Role::Provider, Role::Administrator],
        Intent::Moderation => &[Role::Administrator],
        Intent::Recommendation
        | Intent::Policy
        | Intent::Navigation
        | Intent::Troubleshooting
        | Intent::Unknown => EVERYONE,
    }
}

/// Intents that read data owned by a specific user.
pub const fn requires_scope(intent: Intent) -> bool {
    matches!(intent, Intent::Analytics | Intent::Revenue | Intent::SavedItems)
}

pub fn is_role_allowed(role: Role, intent: Intent) -> bool {
    allowed_roles(intent).contains(&role)
}
