//! Canonical example phrases and their embeddings.

use concierge_core::Intent;
use concierge_embeddings::cosine_similarity;

/// Three canonical phrases per classifiable intent.
pub const CANONICAL_PHRASES: [(Intent, [&str; 3]); 8] = [
    (
        Intent::Recommendation,
        [
            "Show me luxury beach resorts in Sri Lanka",
            "Find me adventure experiences in the mountains",
            "Recommend romantic hotels for honeymoon",
        ],
    ),
    (
        Intent::SavedItems,
        [
            "What have I bookmarked?",
            "Show my saved listings",
            "View my favorite hotels",
        ],
    ),
    (
        Intent::Analytics,
        [
            "How many views did my listing get this week?",
            "Show me my performance stats",
            "Total clicks on my experiences",
        ],
    ),
    (
        Intent::Revenue,
        [
            "What's my total earnings this month?",
            "How much revenue did I make?",
            "Show me my income breakdown",
        ],
    ),
    (
        Intent::Moderation,
        [
            "Review pending partner applications",
            "Show flagged content for moderation",
            "Approve new listings",
        ],
    ),
    (
        Intent::Policy,
        [
            "What's the refund policy?",
            "Explain the PDPA compliance requirements",
            "Show me partner commission terms",
        ],
    ),
    (
        Intent::Navigation,
        [
            "How do I edit my profile?",
            "Where can I upload photos?",
            "How to change my listing price?",
        ],
    ),
    (
        Intent::Troubleshooting,
        [
            "Why can't I upload images?",
            "Error when submitting my listing",
            "Payment not working",
        ],
    ),
];

/// All phrases flattened with their intent, in table order.
pub fn phrases() -> Vec<(Intent, String)> {
    CANONICAL_PHRASES
        .iter()
        .flat_map(|(intent, texts)| texts.iter().map(move |t| (*intent, (*t).to_string())))
        .collect()
}

/// Embedded exemplars. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct ExemplarTable {
    entries: Vec<(Intent, Vec<f32>)>,
}

impl ExemplarTable {
    pub fn new(entries: Vec<(Intent, Vec<f32>)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Intent with the highest per-intent maximum similarity. Ties keep the
    /// earlier intent in table order.
    pub fn best_match(&self, query: &[f32]) -> Option<(Intent, f64)> {
        let mut best: Option<(Intent, f64)> = None;
        for (intent, embedding) in &self.entries {
            let score = cosine_similarity(query, embedding).clamp(0.0, 1.0);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((*intent, score)),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_phrases_per_intent() {
        let all = phrases();
        assert_eq!(all.len(), 24);
        for intent in Intent::CLASSIFIABLE {
            assert_eq!(all.iter().filter(|(i, _)| *i == intent).count(), 3);
        }
    }

    #[test]
    fn best_match_prefers_higher_similarity() {
        let table = ExemplarTable::new(vec![
            (Intent::Policy, vec![1.0, 0.0]),
            (Intent::Navigation, vec![0.0, 1.0]),
        ]);
        let (intent, score) = table.best_match(&[0.1, 0.9]).unwrap();
        assert_eq!(intent, Intent::Navigation);
        assert!(score > 0.9);
    }

    #[test]
    fn empty_table_has_no_match() {
        assert!(ExemplarTable::new(vec![]).best_match(&[1.0]).is_none());
    }
}
