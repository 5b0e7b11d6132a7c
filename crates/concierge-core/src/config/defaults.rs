// Single source of truth for all default values.

// --- Classifier ---
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.6;
pub const DEFAULT_EMBEDDING_TIMEOUT_MS: u64 = 5_000;

// --- Retrieval ---
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.75;
pub const DEFAULT_MAX_CHUNKS: usize = 5;
pub const DEFAULT_SEARCH_CANDIDATES: usize = 10;
pub const DEFAULT_CHUNK_SIZE: usize = 700;
pub const DEFAULT_SYNTHESIS_MAX_TOKENS: u32 = 500;
pub const DEFAULT_SYNTHESIS_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 5_000;

// --- Structured data ---
pub const DEFAULT_RESULT_LIMIT: usize = 100;
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;

// --- Generation ---
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PRIMARY_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_PRIMARY_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_PRIMARY_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const DEFAULT_SECONDARY_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_SECONDARY_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_SECONDARY_API_KEY_ENV: &str = "GEMINI_API_KEY";

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "tfidf";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_L1_CACHE_SIZE: u64 = 10_000;
pub const DEFAULT_EMBEDDING_API_KEY_ENV: &str = "EMBEDDING_API_KEY";

// --- Router ---
pub const DEFAULT_FORMATTING_ENABLED: bool = true;
pub const DEFAULT_FORMAT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_FORMAT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_HYBRID_MAX_TOKENS: u32 = 500;

// --- Storage ---
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
pub const DEFAULT_LATENCY_WINDOW: usize = 1_000;
pub const DEFAULT_QUERY_LOG_CAPACITY: usize = 10_000;
