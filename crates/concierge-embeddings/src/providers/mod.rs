pub mod api_provider;
pub mod tfidf_fallback;

pub use api_provider::ApiProvider;
pub use tfidf_fallback::TfIdfFallback;

use concierge_core::config::EmbeddingConfig;
use concierge_core::traits::IEmbeddingProvider;
use tracing::warn;

/// Build the configured provider. Falls back to TF-IDF when the API provider
/// cannot be constructed.
pub fn create_provider(config: &EmbeddingConfig) -> Box<dyn IEmbeddingProvider> {
    match config.provider.as_str() {
        "api" => match ApiProvider::from_config(config) {
            Ok(provider) => Box::new(provider),
            Err(e) => {
                warn!(error = %e, "API embedding provider unavailable, using TF-IDF");
                Box::new(TfIdfFallback::new(config.dimensions))
            }
        },
        _ => Box::new(TfIdfFallback::new(config.dimensions)),
    }
}
