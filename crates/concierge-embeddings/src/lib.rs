//! # concierge-embeddings
//!
//! Text embedding for intent classification and document search.
//!
//! ```text
//! EmbeddingEngine
//!   ├── L1 cache (moka, keyed by blake3 of the text)
//!   └── DegradationChain
//!         ├── configured provider (api | tfidf)
//!         └── TfIdfFallback (always available)
//! ```

pub mod cache;
pub mod degradation;
pub mod engine;
pub mod providers;

pub use degradation::DegradationChain;
pub use engine::EmbeddingEngine;
pub use providers::{ApiProvider, TfIdfFallback};

/// Cosine similarity between two vectors. Zero when either has zero norm or
/// the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::cosine_similarity;

    #[test]
    fn identical_vectors_have_unit_similarity() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_vector_is_zero_similarity() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn mismatched_lengths_are_zero_similarity() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }
}
