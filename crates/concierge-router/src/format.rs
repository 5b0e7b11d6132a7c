//! Formatting prompts and the deterministic templates used when generation
//! is disabled or unavailable.

use concierge_core::models::{DataResult, RetrievalOutcome};
use concierge_core::Intent;

pub const FORMAT_SYSTEM_PROMPT: &str = "You are a helpful assistant formatting structured data for users.

CRITICAL RULES:
1. Use ONLY the data provided in the context
2. DO NOT invent, calculate, or modify numbers
3. DO NOT add information not in the data
4. Present the data in a friendly, conversational tone
5. Keep responses concise and clear";

pub const HYBRID_SYSTEM_PROMPT: &str = "You are a travel assistant helping users discover experiences.

Use the database data (user preferences, past activity) and knowledge base context to create a personalized response.

RULES:
1. Prioritize database data for user-specific information
2. Use knowledge base context only for general insights
3. DO NOT invent data not provided
4. Be conversational and helpful";

const NO_DATA: &str = "No data available";
const COMPLETED: &str = "Query completed successfully";

/// Prompt asking the facade to phrase a structured result.
pub fn format_prompt(intent: Intent, query: &str, result: &DataResult) -> String {
    format!(
        "Intent: {intent}\nUser Query: {query}\n\nData to format:\n{}\n\nFormat this data in a natural, helpful response.",
        data_json(result)
    )
}

/// Prompt combining structured data with whatever the knowledge base
/// contributed. A refused retrieval contributes nothing.
pub fn hybrid_prompt(
    intent: Intent,
    query: &str,
    result: &DataResult,
    knowledge: Option<&RetrievalOutcome>,
) -> String {
    let knowledge = knowledge
        .filter(|k| k.success)
        .map(|k| k.response_text.as_str())
        .unwrap_or("");
    format!(
        "Intent: {intent}\nQuery: {query}\n\nDatabase Context:\n{}\n\nKnowledge Base Context:\n{knowledge}\n\nProvide a helpful, personalized response.",
        data_json(result)
    )
}

/// Deterministic rendering of a structured result. Never empty.
pub fn template(intent: Intent, result: &DataResult) -> String {
    if !result.success {
        return non_empty(&result.message, NO_DATA);
    }
    match intent {
        Intent::Analytics => format!("Analytics: {} items found", result.count),
        Intent::SavedItems => format!("You have {} saved items", result.count),
        Intent::Revenue => {
            let total = result
                .data
                .as_ref()
                .and_then(|d| d.get("total_revenue"))
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            format!("Revenue: ${total:.2}")
        }
        _ => non_empty(&result.message, COMPLETED),
    }
}

fn data_json(result: &DataResult) -> String {
    let data = result.data.clone().unwrap_or(serde_json::Value::Null);
    serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string())
}

fn non_empty(text: &str, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::models::{DataFailure, RefusalReason};
    use serde_json::json;

    #[test]
    fn templates_per_intent() {
        let ok = DataResult::ok(json!({"total_revenue": 480.5}), 2, "");
        assert_eq!(template(Intent::Analytics, &ok), "Analytics: 2 items found");
        assert_eq!(template(Intent::SavedItems, &ok), "You have 2 saved items");
        assert_eq!(template(Intent::Revenue, &ok), "Revenue: $480.50");
        assert_eq!(template(Intent::Moderation, &ok), COMPLETED);
    }

    #[test]
    fn failed_result_shows_its_safe_message() {
        let err = DataResult::error(DataFailure::NotPermitted, "Moderation access denied");
        assert_eq!(template(Intent::Moderation, &err), "Moderation access denied");
        let blank = DataResult::error(DataFailure::Storage, "  ");
        assert_eq!(template(Intent::Analytics, &blank), NO_DATA);
    }

    #[test]
    fn format_prompt_carries_data_verbatim() {
        let ok = DataResult::ok(json!({"views": 4, "conversion_rate": 0.25}), 6, "ok");
        let prompt = format_prompt(Intent::Analytics, "how many views", &ok);
        assert!(prompt.contains("\"views\": 4"));
        assert!(prompt.contains("0.25"));
        assert!(prompt.contains("analytics_query"));
    }

    #[test]
    fn refused_knowledge_is_left_out() {
        let ok = DataResult::ok(json!({}), 0, "ok");
        let refused = RetrievalOutcome::refused(RefusalReason::InsufficientEvidence, "no idea");
        let prompt = hybrid_prompt(Intent::Policy, "q", &ok, Some(&refused));
        assert!(!prompt.contains("no idea"));
    }

    proptest::proptest! {
        #[test]
        fn template_text_is_never_blank(
            idx in 0usize..Intent::COUNT,
            success in proptest::bool::ANY,
            count in 0usize..1000,
            message in "[ a-z]{0,12}",
        ) {
            let intent = Intent::ALL[idx];
            let result = if success {
                DataResult::ok(json!({}), count, message)
            } else {
                DataResult::error(DataFailure::UnsupportedIntent, message)
            };
            proptest::prop_assert!(!template(intent, &result).trim().is_empty());
        }
    }
}
