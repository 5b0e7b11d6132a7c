//! DataEngine: resolves the operation, runs it off the async workers under a
//! timeout, and folds every failure into a user-safe envelope.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use concierge_core::config::DataConfig;
use concierge_core::errors::{ConciergeResult, StorageError};
use concierge_core::models::{DataFailure, DataResult, RequestScope, Role, TimeRange};
use concierge_core::traits::IStructuredStore;
use concierge_core::Intent;

use crate::aggregations::Aggregator;
use crate::operation::DataOperation;

/// Shown to users when the store fails. Details go to the log only.
pub const STORAGE_FAILURE_MESSAGE: &str =
    "Unable to retrieve your data right now. Please try again later.";

/// Input to [`DataEngine::execute`].
#[derive(Debug, Clone, PartialEq)]
pub struct DataRequest {
    pub intent: Intent,
    pub user_id: String,
    pub resource_owner_id: Option<String>,
    pub role: Role,
    /// `None` uses the configured default.
    pub time_range: Option<TimeRange>,
    /// `None` uses the configured default.
    pub limit: Option<usize>,
}

impl DataRequest {
    pub fn new(intent: Intent, user_id: impl Into<String>, role: Role) -> Self {
        Self {
            intent,
            user_id: user_id.into(),
            resource_owner_id: None,
            role,
            time_range: None,
            limit: None,
        }
    }

    pub fn from_scope(intent: Intent, scope: &RequestScope) -> Self {
        Self {
            intent,
            user_id: scope.user_id.clone(),
            resource_owner_id: scope.resource_owner_id.clone(),
            role: scope.role,
            time_range: None,
            limit: None,
        }
    }

    pub fn owner(mut self, owner_id: impl Into<String>) -> Self {
        self.resource_owner_id = Some(owner_id.into());
        self
    }

    pub fn time_range(mut self, range: TimeRange) -> Self {
        self.time_range = Some(range);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn effective_owner(&self) -> &str {
        self.resource_owner_id.as_deref().unwrap_or(&self.user_id)
    }
}

/// Structured data engine.
pub struct DataEngine {
    store: Arc<dyn IStructuredStore>,
    config: DataConfig,
    timeout: Duration,
}

impl DataEngine {
    pub fn new(store: Arc<dyn IStructuredStore>, config: &DataConfig) -> Self {
        info!(
            default_limit = config.default_limit,
            top_n = config.top_n,
            "DataEngine initialized"
        );
        Self {
            store,
            config: config.clone(),
            timeout: Duration::from_millis(config.store_timeout_ms),
        }
    }

    /// Run the operation for `request`. Never returns a raw storage error.
    pub async fn execute(&self, request: &DataRequest) -> DataResult {
        let op = match DataOperation::resolve(
            request.intent,
            request.role,
            &request.user_id,
            request.effective_owner(),
            request.time_range.unwrap_or(self.config.default_time_range),
        ) {
            Ok(op) => op,
            Err(envelope) => {
                debug!(
                    intent = %request.intent,
                    role = %request.role,
                    reason = %envelope.message,
                    "no structured operation"
                );
                return envelope;
            }
        };

        let aggregator = Aggregator::new(
            self.store.clone(),
            request.limit.unwrap_or(self.config.default_limit),
            self.config.top_n,
        );
        let name = op.name();
        debug!(operation = name, "running structured operation");

        match self.bounded(move || aggregator.run(&op, Utc::now())).await {
            Ok(result) => {
                debug!(operation = name, count = result.count, "structured operation complete");
                result
            }
            Err(e) => {
                error!(operation = name, error = %e, "structured operation failed");
                DataResult::error(DataFailure::Storage, STORAGE_FAILURE_MESSAGE)
            }
        }
    }

    /// Cheap reachability check.
    pub async fn ping(&self) -> bool {
        let store = self.store.clone();
        match self.bounded(move || store.ping()).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "structured store ping failed");
                false
            }
        }
    }

    async fn bounded<T, F>(&self, f: F) -> ConciergeResult<T>
    where
        F: FnOnce() -> ConciergeResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let timeout_ms = self.timeout.as_millis() as u64;
        match tokio::time::timeout(self.timeout, tokio::task::spawn_blocking(f)).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(StorageError::Unavailable {
                reason: format!("store task failed: {join}"),
            }
            .into()),
            Err(_) => Err(StorageError::Timeout { timeout_ms }.into()),
        }
    }
}
