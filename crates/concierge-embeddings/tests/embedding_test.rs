use concierge_core::config::EmbeddingConfig;
use concierge_core::traits::IEmbeddingProvider;
use concierge_embeddings::{cosine_similarity, EmbeddingEngine, TfIdfFallback};
use proptest::prelude::*;

#[test]
fn engine_batch_matches_individual() {
    let engine = EmbeddingEngine::new(&EmbeddingConfig {
        dimensions: 128,
        ..Default::default()
    });
    let texts = vec![
        "What's the refund policy?".to_string(),
        "How do I edit my profile?".to_string(),
    ];
    let batch = engine.embed_batch(&texts).unwrap();
    for (i, text) in texts.iter().enumerate() {
        assert_eq!(batch[i], engine.embed(text).unwrap());
    }
}

#[test]
fn greeting_is_far_from_domain_phrases() {
    let p = TfIdfFallback::new(384);
    let greeting = p.embed("Hello, how are you?").unwrap();
    for phrase in [
        "Show me luxury beach resorts in Sri Lanka",
        "What's the refund policy?",
        "How do I edit my profile?",
        "Why can't I upload images?",
    ] {
        let v = p.embed(phrase).unwrap();
        assert!(cosine_similarity(&greeting, &v) < 0.6, "{phrase}");
    }
}

proptest! {
    #[test]
    fn vectors_are_unit_or_zero(text in "[a-zA-Z ]{0,80}") {
        let p = TfIdfFallback::new(64);
        let v = p.embed(&text).unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        prop_assert!(norm == 0.0 || (norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn similarity_is_bounded(a in "[a-z ]{1,40}", b in "[a-z ]{1,40}") {
        let p = TfIdfFallback::new(64);
        let s = cosine_similarity(&p.embed(&a).unwrap(), &p.embed(&b).unwrap());
        prop_assert!((-1.0..=1.0 + 1e-9).contains(&s));
    }
}
