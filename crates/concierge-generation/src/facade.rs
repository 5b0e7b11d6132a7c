//! GenerationFacade: primary → secondary, one attempt each, bounded by a timeout.

use std::sync::Arc;
use std::time::{Duration, Instant};

use concierge_core::config::GenerationConfig;
use concierge_core::errors::GenerationError;
use concierge_core::models::{BackendSlot, GenerationOutcome, GenerationRequest};
use concierge_core::traits::IGenerationBackend;
use tracing::{debug, info, warn};

use crate::backends;
use crate::stats::{GenerationCounters, GenerationStats};

/// Resilient single-call generation client.
///
/// Worst-case latency is two timeouts. The counters are telemetry only.
pub struct GenerationFacade {
    primary: Arc<dyn IGenerationBackend>,
    secondary: Arc<dyn IGenerationBackend>,
    timeout: Duration,
    counters: GenerationCounters,
}

impl GenerationFacade {
    pub fn new(
        primary: Arc<dyn IGenerationBackend>,
        secondary: Arc<dyn IGenerationBackend>,
        timeout: Duration,
    ) -> Self {
        info!(
            primary = primary.name(),
            secondary = secondary.name(),
            timeout_ms = timeout.as_millis() as u64,
            "GenerationFacade initialized"
        );
        Self {
            primary,
            secondary,
            timeout,
            counters: GenerationCounters::default(),
        }
    }

    /// Build both HTTP backends from config.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let primary = backends::from_config(&config.primary)?;
        let secondary = backends::from_config(&config.secondary)?;
        Ok(Self::new(
            primary,
            secondary,
            Duration::from_secs(config.timeout_secs),
        ))
    }

    /// Generate text. `None` when both backends failed.
    pub async fn generate(&self, request: &GenerationRequest) -> Option<GenerationOutcome> {
        GenerationCounters::bump(&self.counters.total_requests);
        let started = Instant::now();

        match self.attempt(self.primary.as_ref(), request).await {
            Ok(text) => {
                GenerationCounters::bump(&self.counters.primary_success);
                debug!(backend = self.primary.name(), "primary generation succeeded");
                return Some(GenerationOutcome {
                    text,
                    backend_used: BackendSlot::Primary,
                    latency_ms: elapsed_ms(started),
                    fallback_used: false,
                });
            }
            Err(e) => {
                GenerationCounters::bump(&self.counters.primary_failure);
                warn!(
                    backend = self.primary.name(),
                    error = %e,
                    "primary generation failed, falling back"
                );
            }
        }

        match self.attempt(self.secondary.as_ref(), request).await {
            Ok(text) => {
                GenerationCounters::bump(&self.counters.secondary_success);
                info!(backend = self.secondary.name(), "secondary generation succeeded");
                Some(GenerationOutcome {
                    text,
                    backend_used: BackendSlot::Secondary,
                    latency_ms: elapsed_ms(started),
                    fallback_used: true,
                })
            }
            Err(e) => {
                GenerationCounters::bump(&self.counters.secondary_failure);
                GenerationCounters::bump(&self.counters.total_failures);
                warn!(
                    backend = self.secondary.name(),
                    error = %e,
                    "secondary generation failed, no backend left"
                );
                None
            }
        }
    }

    async fn attempt(
        &self,
        backend: &dyn IGenerationBackend,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError> {
        if !backend.is_available() {
            return Err(GenerationError::NotConfigured {
                backend: backend.name().to_string(),
                reason: "backend reports unavailable".to_string(),
            });
        }
        let text = tokio::time::timeout(self.timeout, backend.generate(request))
            .await
            .map_err(|_| GenerationError::Timeout {
                backend: backend.name().to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            })??;
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyCompletion {
                backend: backend.name().to_string(),
            });
        }
        Ok(text)
    }

    pub fn stats(&self) -> GenerationStats {
        self.counters.snapshot()
    }

    pub fn reset_stats(&self) {
        self.counters.reset();
    }

    /// Whether at least one backend is worth trying.
    pub fn any_available(&self) -> bool {
        self.primary.is_available() || self.secondary.is_available()
    }

    pub fn backend_availability(&self) -> [(BackendSlot, bool); 2] {
        [
            (BackendSlot::Primary, self.primary.is_available()),
            (BackendSlot::Secondary, self.secondary.is_available()),
        ]
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
