/// Concierge version string.
pub const CONCIERGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Below this confidence a classification is forced to `Intent::Unknown`.
pub const INTENT_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Confidence assigned to a lexical pattern match.
pub const PATTERN_CONFIDENCE: f64 = 1.0;

/// Retrieved chunks scoring below this are discarded.
pub const RETRIEVAL_SIMILARITY_THRESHOLD: f64 = 0.75;

/// Maximum chunks assembled into a synthesis context.
pub const MAX_CONTEXT_CHUNKS: usize = 5;

/// Per-backend generation timeout in seconds.
pub const GENERATION_TIMEOUT_SECS: u64 = 10;

/// Boundary limits on the raw query text (characters, after trimming).
pub const MIN_QUERY_CHARS: usize = 1;
pub const MAX_QUERY_CHARS: usize = 500;

/// Currency reported by revenue aggregations.
pub const REVENUE_CURRENCY: &str = "USD";

/// Document index collection names.
pub const POLICY_COLLECTION: &str = "policies";
pub const HELP_COLLECTION: &str = "help_docs";
