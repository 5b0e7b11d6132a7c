mod cancellation;
mod document_index;
mod embedding;
mod generation;
mod structured_store;
mod telemetry;

pub use cancellation::{Cancellable, CancellationToken};
pub use document_index::IDocumentIndex;
pub use embedding::IEmbeddingProvider;
pub use generation::IGenerationBackend;
pub use structured_store::IStructuredStore;
pub use telemetry::{ITelemetrySink, NoopTelemetrySink};
