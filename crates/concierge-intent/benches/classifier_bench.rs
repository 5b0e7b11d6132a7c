use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use concierge_core::config::ClassifierConfig;
use concierge_core::RoutingTable;
use concierge_embeddings::TfIdfFallback;
use concierge_intent::IntentClassifier;

fn bench_rules(c: &mut Criterion) {
    let classifier = IntentClassifier::new(
        Arc::new(TfIdfFallback::new(384)),
        RoutingTable::new(),
        &ClassifierConfig::default(),
    );
    let queries = [
        "Show me beach resorts in Sri Lanka",
        "How many views did my listings get this week?",
        "Why can't I upload images?",
        "Show pending partner applications",
    ];

    c.bench_function("classify_by_rules_mixed", |b| {
        b.iter(|| {
            for q in &queries {
                black_box(classifier.classify_by_rules(black_box(q)));
            }
        })
    });
}

criterion_group!(benches, bench_rules);
criterion_main!(benches);
