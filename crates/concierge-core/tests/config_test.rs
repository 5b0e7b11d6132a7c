use std::collections::HashMap;

use concierge_core::config::*;
use concierge_core::errors::ConfigError;
use concierge_core::models::TimeRange;
use concierge_core::Intent;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = ConciergeConfig::from_toml("").unwrap();

    // Classifier defaults
    assert_eq!(config.classifier.confidence_threshold, 0.6);
    assert_eq!(config.classifier.embedding_timeout_ms, 5_000);

    // Retrieval defaults
    assert_eq!(config.retrieval.similarity_threshold, 0.75);
    assert_eq!(config.retrieval.max_chunks, 5);
    assert_eq!(config.retrieval.chunk_size, 700);
    assert_eq!(config.retrieval.synthesis_max_tokens, 500);

    // Data defaults
    assert_eq!(config.data.default_limit, 100);
    assert_eq!(config.data.default_time_range, TimeRange::Last30Days);

    // Generation defaults
    assert_eq!(config.generation.timeout_secs, 10);
    assert_eq!(config.generation.primary.kind, BackendKind::OpenAiCompatible);
    assert_eq!(config.generation.secondary.kind, BackendKind::Gemini);
    assert_eq!(config.generation.primary.api_key_env, "GROQ_API_KEY");

    // Router defaults
    assert!(config.router.formatting_enabled);
    assert_eq!(config.router.format_max_tokens, 300);
    assert!(config.router.hybrid_intents.is_empty());

    // Embedding / storage / observability defaults
    assert_eq!(config.embedding.provider, "tfidf");
    assert_eq!(config.embedding.dimensions, 384);
    assert!(config.storage.db_path.is_none());
    assert_eq!(config.observability.log_level, "info");
    assert_eq!(config.observability.latency_window, 1_000);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[retrieval]
similarity_threshold = 0.8
max_chunks = 3

[data]
default_time_range = "last_7_days"

[router]
hybrid_intents = ["policy_query"]
"#;
    let config = ConciergeConfig::from_toml(toml).unwrap();
    assert_eq!(config.retrieval.similarity_threshold, 0.8);
    assert_eq!(config.retrieval.max_chunks, 3);
    // Non-overridden fields keep defaults
    assert_eq!(config.retrieval.chunk_size, 700);
    assert_eq!(config.data.default_time_range, TimeRange::Last7Days);
    assert_eq!(config.router.hybrid_intents, vec![Intent::Policy]);
    assert!(config.validate().is_ok());
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let err = ConciergeConfig::from_toml("[retrieval\nmax_chunks = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn validate_rejects_threshold_outside_unit_interval() {
    let mut config = ConciergeConfig::default();
    config.classifier.confidence_threshold = 1.5;
    match config.validate() {
        Err(ConfigError::ValidationFailed { field, .. }) => {
            assert_eq!(field, "classifier.confidence_threshold")
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn validate_rejects_api_provider_without_endpoint() {
    let mut config = ConciergeConfig::default();
    config.embedding.provider = "api".to_string();
    assert!(config.validate().is_err());
    config.embedding.api_endpoint = Some("http://localhost:8080/embed".to_string());
    assert!(config.validate().is_ok());
}

#[test]
fn validate_rejects_candidate_pool_smaller_than_chunk_cap() {
    let mut config = ConciergeConfig::default();
    config.retrieval.search_candidates = 2;
    assert!(config.validate().is_err());
}

#[test]
fn overrides_apply_from_lookup() {
    let vars: HashMap<&str, &str> = [
        ("CONCIERGE_CONFIDENCE_THRESHOLD", "0.7"),
        ("CONCIERGE_FORMATTING_ENABLED", "false"),
        ("CONCIERGE_DB_PATH", "/tmp/concierge.db"),
        ("CONCIERGE_GENERATION_TIMEOUT_SECS", "not-a-number"),
    ]
    .into_iter()
    .collect();

    let mut config = ConciergeConfig::default();
    config.apply_overrides_from(|k| vars.get(k).map(|v| v.to_string()));

    assert_eq!(config.classifier.confidence_threshold, 0.7);
    assert!(!config.router.formatting_enabled);
    assert_eq!(config.storage.db_path.as_deref(), Some("/tmp/concierge.db"));
    // Unparseable values are ignored.
    assert_eq!(config.generation.timeout_secs, 10);
}

#[test]
fn load_reads_file_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concierge.toml");
    std::fs::write(&path, "[retrieval]\nmax_chunks = 4\n").unwrap();
    let config = ConciergeConfig::load(Some(&path)).unwrap();
    assert_eq!(config.retrieval.max_chunks, 4);
}

#[test]
fn load_missing_file_is_reported() {
    let err = ConciergeConfig::load(Some(std::path::Path::new("/nonexistent/concierge.toml")))
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn toml_round_trip_preserves_values() {
    let mut config = ConciergeConfig::default();
    config.router.hybrid_intents = vec![Intent::Navigation];
    config.retrieval.max_chunks = 7;
    let text = config.to_toml().unwrap();
    let back = ConciergeConfig::from_toml(&text).unwrap();
    assert_eq!(back.router.hybrid_intents, vec![Intent::Navigation]);
    assert_eq!(back.retrieval.max_chunks, 7);
}
