//! Exhaustive and property checks over the authorization tables.

use concierge_access::policy::{allowed_roles, requires_scope};
use concierge_access::validator::SCOPE_VIOLATION_REASON;
use concierge_access::RoleValidator;
use concierge_core::models::{DenialKind, Role};
use concierge_core::Intent;
use proptest::prelude::*;

fn role_strategy() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

fn intent_strategy() -> impl Strategy<Value = Intent> {
    prop::sample::select(Intent::ALL.to_vec())
}

#[test]
fn consumer_asking_for_analytics_is_denied() {
    let r = RoleValidator::new().authorize("traveler_1", Role::Consumer, Intent::Analytics, None);
    assert!(!r.allowed);
    assert_eq!(r.denial.unwrap().metadata_tag(), "access_denied");
}

#[test]
fn provider_reading_another_providers_analytics_is_a_scope_violation() {
    let validator = RoleValidator::new();
    let r = validator.authorize("partner_1", Role::Provider, Intent::Analytics, Some("partner_2"));
    assert!(!r.allowed);
    assert_eq!(r.denial, Some(DenialKind::ScopeViolation));
    assert_eq!(r.reason, SCOPE_VIOLATION_REASON);

    let plain = validator.authorize("traveler_1", Role::Consumer, Intent::Analytics, None);
    assert_ne!(r.reason, plain.reason);
}

#[test]
fn administrator_bypasses_scope_but_not_allow_list() {
    let validator = RoleValidator::new();
    let r = validator.authorize("admin_1", Role::Administrator, Intent::Revenue, Some("partner_2"));
    assert!(r.allowed);
    let r = validator.authorize("admin_1", Role::Administrator, Intent::SavedItems, Some("traveler_1"));
    assert!(!r.allowed);
    assert_eq!(r.denial, Some(DenialKind::RoleNotPermitted));
}

#[test]
fn unknown_and_retrieval_intents_are_open_to_everyone() {
    let validator = RoleValidator::new();
    for role in Role::ALL {
        for intent in [Intent::Unknown, Intent::Policy, Intent::Navigation, Intent::Troubleshooting] {
            assert!(validator.authorize("u", role, intent, Some("someone_else")).allowed);
        }
    }
}

proptest! {
    #[test]
    fn roles_outside_the_allow_list_are_always_denied(
        role in role_strategy(),
        intent in intent_strategy(),
        owner in proptest::option::of("[a-z]{1,6}"),
    ) {
        let r = RoleValidator::new().authorize("user", role, intent, owner.as_deref());
        if !allowed_roles(intent).contains(&role) {
            prop_assert!(!r.allowed);
            prop_assert_eq!(r.denial, Some(DenialKind::RoleNotPermitted));
        }
        prop_assert_eq!(r.scope_checked, requires_scope(intent));
        prop_assert_eq!(r.role, role);
        prop_assert_eq!(r.intent, intent);
    }

    #[test]
    fn non_admin_cross_owner_on_scoped_intent_is_denied(
        intent in prop::sample::select(vec![Intent::Analytics, Intent::Revenue, Intent::SavedItems]),
        role in prop::sample::select(vec![Role::Consumer, Role::Provider]),
        user in "[a-z]{1,6}",
        owner in "[a-z]{1,6}",
    ) {
        prop_assume!(user != owner);
        let r = RoleValidator::new().authorize(&user, role, intent, Some(&owner));
        prop_assert!(!r.allowed);
    }
}
