use async_trait::async_trait;

use crate::errors::GenerationError;
use crate::models::GenerationRequest;

/// One text-generation backend.
///
/// Implementations make a single attempt per call. Timeouts and fallback are
/// the facade's job.
#[async_trait]
pub trait IGenerationBackend: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Human-readable backend name. Logged, never shown to callers.
    fn name(&self) -> &str;

    /// Whether the backend is configured well enough to be tried.
    fn is_available(&self) -> bool;
}
