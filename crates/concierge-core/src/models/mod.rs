mod authorization;
mod decision;
mod degradation_event;
mod documents;
mod generation;
mod records;
mod request;
mod response;
mod retrieval;
mod role;
mod structured;
mod telemetry;
mod time_range;

pub use authorization::{AuthorizationResult, DenialKind};
pub use decision::{ClassificationMethod, IntentDecision};
pub use degradation_event::DegradationEvent;
pub use documents::{DocumentCategory, DocumentChunk, DocumentHit, DocumentMetadata};
pub use generation::{BackendSlot, GenerationOutcome, GenerationRequest};
pub use records::{Collection, Page, Record, RecordFilter, SortOrder};
pub use request::{QueryRequest, RequestScope, ValidatedQuery};
pub use response::{DataSource, QueryResponse, ResponseMetadata};
pub use retrieval::{Citation, RefusalReason, RetrievalOutcome, RetrievedChunk};
pub use role::Role;
pub use structured::{DataFailure, DataResult};
pub use telemetry::TelemetryEvent;
pub use time_range::{ResolvedRange, TimeRange};
