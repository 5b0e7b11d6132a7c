//! Ordered lexical rule groups, one per classifiable intent.
//!
//! All rules are case-insensitive and word-bounded. Groups are evaluated in
//! [`Intent::ALL`] order and the first group with any matching rule wins, so
//! a query like "show my bookings" lands on analytics only if no earlier
//! group claimed it.

use std::sync::LazyLock;

use regex::Regex;

use concierge_core::Intent;

macro_rules! intent_rule {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Option<Regex>> =
            LazyLock::new(|| Regex::new(concat!("(?i)", $regex_str)).ok());
    };
}

// ── Recommendation ─────────────────────────────────────────────────────────
intent_rule!(
    RE_REC_FIND_STAY,
    r"\b(recommend|suggest|find|show|discover|looking for|search)\b.*\b(hotels?|resorts?|experiences?|stays?|vacations?|trips?|destinations?)\b"
);
intent_rule!(
    RE_REC_BEST_PLACES,
    r"\b(best|top|popular)\b.*\b(places?|spots?|locations?|hotels?|resorts?)\b"
);
intent_rule!(
    RE_REC_THEMED_TRIP,
    r"\b(beach|mountain|city|adventure|luxury)\b.*\b(getaway|vacation|trip)\b"
);

// ── Saved items ────────────────────────────────────────────────────────────
intent_rule!(RE_SAVED_WORDS, r"\b(saved|bookmarked|favorites?|liked|my list)\b");
intent_rule!(RE_SAVED_VIEW, r"\b(show|view|see)\b.*\b(saved|bookmarks?|favorites?)\b");
intent_rule!(RE_SAVED_WHAT_DID_I, r"\bwhat (have I|did I)\b.*\b(save|bookmark|like)\b");

// ── Analytics ──────────────────────────────────────────────────────────────
intent_rule!(
    RE_ANALYTICS_COUNT,
    r"\b(how many|total|count)\b.*\b(views?|clicks?|impressions?|visitors?)\b"
);
intent_rule!(RE_ANALYTICS_WORDS, r"\b(analytics|stats?|statistics|performance|metrics)\b");
intent_rule!(RE_ANALYTICS_SHOW, r"\b(show|view|check)\b.*\b(analytics|stats?|performance)\b");
intent_rule!(RE_ANALYTICS_MINE, r"\b(my|our)\b.*\b(views?|clicks?|bookings?|reservations?)\b");

// ── Revenue ────────────────────────────────────────────────────────────────
intent_rule!(RE_REVENUE_WORDS, r"\b(revenue|earnings?|income|sales|profit)\b");
intent_rule!(RE_REVENUE_HOW_MUCH, r"\b(how much|total)\b.*\b(earned|made|revenue|income)\b");
intent_rule!(
    RE_REVENUE_PERIOD,
    r"\b(this (month|week|year)|last (month|week|year))\b.*\b(earnings?|revenue|income)\b"
);

// ── Moderation ─────────────────────────────────────────────────────────────
intent_rule!(
    RE_MOD_ACTION,
    r"\b(review|approve|reject|moderate|verify)\b.*\b(partners?|applications?|listings?|content)\b"
);
intent_rule!(RE_MOD_PENDING, r"\b(pending|awaiting)\b.*\b(approval|review|moderation)\b");
intent_rule!(RE_MOD_FLAGGED, r"\bflag(ged)?\b.*\b(content|review|listing)\b");

// ── Policy ─────────────────────────────────────────────────────────────────
intent_rule!(
    RE_POLICY_WORDS,
    r"\b(policy|policies|terms?|conditions?|guidelines?|rules?)\b"
);
intent_rule!(
    RE_POLICY_EXPLAIN,
    r"\b(what (is|are) the|explain the)\b.*\b(policy|terms?|rules?|guidelines?)\b"
);
intent_rule!(
    RE_POLICY_TOPIC,
    r"\b(refund|cancellation|privacy|commission|payout)\b.*\b(policy|terms?|rules?)\b"
);
intent_rule!(RE_POLICY_DATA, r"\b(PDPA|data protection|personal data)\b");

// ── Navigation ─────────────────────────────────────────────────────────────
intent_rule!(
    RE_NAV_HOW_TO,
    r"\b(how (do I|to|can I)|where (do I|to|can I))\b.*\b(edit|update|change|add|delete|create|upload)\b"
);
intent_rule!(
    RE_NAV_GO_TO,
    r"\b(navigate|go to|access|find)\b.*\b(pages?|sections?|settings|dashboard|profile)\b"
);

// ── Troubleshooting ────────────────────────────────────────────────────────
intent_rule!(
    RE_TROUBLE_WHY,
    r"\b(why (can't|cannot)|why (isn't|is not)|why (won't|will not))\b"
);
intent_rule!(
    RE_TROUBLE_WORDS,
    r"\b(errors?|issues?|problems?|not working|broken|failed)\b"
);
intent_rule!(
    RE_TROUBLE_UNABLE,
    r"\b(can't|cannot|unable to)\b.*\b(upload|submit|save|login|access)\b"
);

type Rule = &'static LazyLock<Option<Regex>>;

/// One intent's rules.
pub struct RuleGroup {
    pub intent: Intent,
    pub rules: &'static [Rule],
}

pub static RULE_GROUPS: &[RuleGroup] = &[
    RuleGroup {
        intent: Intent::Recommendation,
        rules: &[&RE_REC_FIND_STAY, &RE_REC_BEST_PLACES, &RE_REC_THEMED_TRIP],
    },
    RuleGroup {
        intent: Intent::SavedItems,
        rules: &[&RE_SAVED_WORDS, &RE_SAVED_VIEW, &RE_SAVED_WHAT_DID_I],
    },
    RuleGroup {
        intent: Intent::Analytics,
        rules: &[
            &RE_ANALYTICS_COUNT,
            &RE_ANALYTICS_WORDS,
            &RE_ANALYTICS_SHOW,
            &RE_ANALYTICS_MINE,
        ],
    },
    RuleGroup {
        intent: Intent::Revenue,
        rules: &[&RE_REVENUE_WORDS, &RE_REVENUE_HOW_MUCH, &RE_REVENUE_PERIOD],
    },
    RuleGroup {
        intent: Intent::Moderation,
        rules: &[&RE_MOD_ACTION, &RE_MOD_PENDING, &RE_MOD_FLAGGED],
    },
    RuleGroup {
        intent: Intent::Policy,
        rules: &[
            &RE_POLICY_WORDS,
            &RE_POLICY_EXPLAIN,
            &RE_POLICY_TOPIC,
            &RE_POLICY_DATA,
        ],
    },
    RuleGroup {
        intent: Intent::Navigation,
        rules: &[&RE_NAV_HOW_TO, &RE_NAV_GO_TO],
    },
    RuleGroup {
        intent: Intent::Troubleshooting,
        rules: &[&RE_TROUBLE_WHY, &RE_TROUBLE_WORDS, &RE_TROUBLE_UNABLE],
    },
];

/// First intent whose group has a matching rule.
pub fn match_rules(query: &str) -> Option<Intent> {
    RULE_GROUPS.iter().find_map(|group| {
        group
            .rules
            .iter()
            .filter_map(|rule| LazyLock::force(rule).as_ref())
            .any(|re| re.is_match(query))
            .then_some(group.intent)
    })
}

/// Number of rules that failed to compile. Zero in a healthy build; a
/// non-zero value means the affected rules silently never match.
pub fn failed_rule_count() -> usize {
    RULE_GROUPS
        .iter()
        .flat_map(|g| g.rules.iter())
        .filter(|rule| LazyLock::force(rule).is_none())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_compiles() {
        assert_eq!(failed_rule_count(), 0);
    }

    #[test]
    fn groups_follow_evaluation_order() {
        let order: Vec<Intent> = RULE_GROUPS.iter().map(|g| g.intent).collect();
        assert_eq!(order, Intent::CLASSIFIABLE.to_vec());
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(match_rules("SHOW ME MY ANALYTICS"), Some(Intent::Analytics));
        assert_eq!(match_rules("pdpa obligations"), Some(Intent::Policy));
    }

    #[test]
    fn earlier_group_wins() {
        // Matches both the saved-items and recommendation vocabularies.
        assert_eq!(
            match_rules("find hotels like the ones I saved"),
            Some(Intent::Recommendation)
        );
    }

    #[test]
    fn plain_greeting_matches_nothing() {
        assert_eq!(match_rules("Hello, how are you?"), None);
        assert_eq!(match_rules("Show pending partner applications"), None);
    }
}
