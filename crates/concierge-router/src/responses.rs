//! Fixed-shape responses for the expected non-answers and for failures.
//!
//! Failure responses carry a correlation id and nothing else about the
//! failure. The detail is logged under the same id.

use uuid::Uuid;

use concierge_core::models::{AuthorizationResult, IntentDecision, ResponseMetadata};
use concierge_core::{DataSource, Intent, QueryResponse, Role};

pub const GENERIC_APOLOGY: &str =
    "I apologize, but I encountered an error processing your request. Please try again.";

pub const CANCELLED_MESSAGE: &str = "Your request was cancelled before it could complete.";

pub const CLARIFICATION_MESSAGE: &str = "I'm not sure I understand your question. Could you please rephrase? I can help with:
• Finding hotels and experiences
• Viewing your saved items
• Checking analytics (for partners)
• Explaining policies and guidelines
• Answering how-to questions";

pub const SUGGESTIONS: [&str; 4] = [
    "Show me beach resorts",
    "What have I saved?",
    "How many views did I get?",
    "What's the refund policy?",
];

/// `metadata.error` tag for a cancelled pipeline.
pub const CANCELLED_TAG: &str = "cancelled";

pub(crate) fn metadata(decision: &IntentDecision) -> ResponseMetadata {
    ResponseMetadata::new(decision.confidence, decision.method)
}

fn bare(intent: Intent, role: Role, text: String, metadata: ResponseMetadata) -> QueryResponse {
    QueryResponse {
        intent,
        role,
        data_source: DataSource::None,
        response_text: text,
        metadata,
        raw_data: None,
    }
}

pub fn denied(decision: &IntentDecision, authorization: &AuthorizationResult) -> QueryResponse {
    let mut meta = metadata(decision);
    meta.error = authorization.denial.map(|d| d.metadata_tag().to_string());
    meta.reason = Some(authorization.reason.clone());
    let text = format!(
        "Access denied: {}\n\nYour current role ({}) does not have permission to perform this action.",
        authorization.reason, authorization.role
    );
    bare(authorization.intent, authorization.role, text, meta)
}

pub fn clarification(decision: &IntentDecision, role: Role) -> QueryResponse {
    let mut meta = metadata(decision);
    meta.clarification_requested = Some(true);
    meta.suggestions = Some(SUGGESTIONS.iter().map(|s| s.to_string()).collect());
    bare(decision.intent, role, CLARIFICATION_MESSAGE.to_string(), meta)
}

/// Generic apology. `tag` is the lower-case failure category.
pub fn failure(
    decision: &IntentDecision,
    role: Role,
    data_source: DataSource,
    tag: &str,
    correlation_id: Uuid,
) -> QueryResponse {
    let mut meta = metadata(decision);
    meta.error = Some(tag.to_string());
    meta.correlation_id = Some(correlation_id.to_string());
    QueryResponse {
        data_source,
        ..bare(
            decision.intent,
            role,
            format!("{GENERIC_APOLOGY} (Reference: {correlation_id})"),
            meta,
        )
    }
}

/// Cancellation notice. `data_source` still follows the decision's flags.
pub fn cancelled(decision: &IntentDecision, role: Role) -> QueryResponse {
    let mut meta = metadata(decision);
    meta.error = Some(CANCELLED_TAG.to_string());
    QueryResponse {
        data_source: DataSource::from_flags(decision.flags()),
        ..bare(decision.intent, role, CANCELLED_MESSAGE.to_string(), meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::models::{ClassificationMethod, DenialKind};

    fn decision(intent: Intent) -> IntentDecision {
        IntentDecision::new(
            intent,
            1.0,
            ClassificationMethod::Pattern,
            concierge_core::RoutingFlags::for_intent(intent),
        )
    }

    #[test]
    fn denial_names_reason_and_role() {
        let auth = AuthorizationResult::denied(
            Role::Consumer,
            Intent::Analytics,
            DenialKind::RoleNotPermitted,
            "Role 'consumer' not permitted for analytics_query. Required: provider, administrator",
            true,
        );
        let r = denied(&decision(Intent::Analytics), &auth);
        assert_eq!(r.data_source, DataSource::None);
        assert_eq!(r.metadata.error.as_deref(), Some("access_denied"));
        assert!(r.response_text.starts_with("Access denied: Role 'consumer'"));
        assert!(r.response_text.contains("Your current role (consumer)"));
    }

    #[test]
    fn clarification_lists_suggestions() {
        let r = clarification(&IntentDecision::unknown(0.2, ClassificationMethod::Embedding), Role::Provider);
        assert_eq!(r.intent, Intent::Unknown);
        assert_eq!(r.metadata.clarification_requested, Some(true));
        assert_eq!(r.metadata.suggestions.as_ref().map(Vec::len), Some(4));
    }

    #[test]
    fn cancellation_keeps_the_routed_data_source() {
        let structured = cancelled(&decision(Intent::Revenue), Role::Provider);
        assert_eq!(structured.data_source, DataSource::Structured);
        assert_eq!(structured.metadata.error.as_deref(), Some(CANCELLED_TAG));

        let retrieval = cancelled(&decision(Intent::Policy), Role::Consumer);
        assert_eq!(retrieval.data_source, DataSource::Retrieval);

        let unknown = cancelled(
            &IntentDecision::unknown(0.1, ClassificationMethod::Embedding),
            Role::Consumer,
        );
        assert_eq!(unknown.data_source, DataSource::None);
    }

    #[test]
    fn failure_exposes_only_the_correlation_id() {
        let id = Uuid::new_v4();
        let r = failure(&decision(Intent::Revenue), Role::Provider, DataSource::Structured, "storage_failure", id);
        assert_eq!(r.metadata.correlation_id, Some(id.to_string()));
        assert!(r.response_text.starts_with(GENERIC_APOLOGY));
        assert!(r.response_text.contains(&id.to_string()));
    }
}
