use crate::models::TelemetryEvent;

/// Append-only structured event sink.
pub trait ITelemetrySink: Send + Sync {
    fn emit(&self, event: &TelemetryEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetrySink;

impl ITelemetrySink for NoopTelemetrySink {
    fn emit(&self, _event: &TelemetryEvent) {}
}
