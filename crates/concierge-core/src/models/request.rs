use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;
use crate::constants::{MAX_QUERY_CHARS, MIN_QUERY_CHARS};
use crate::errors::BoundaryError;
use crate::traits::CancellationToken;

/// A query as it arrives from the front end, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub user_id: String,
    pub role: String,
    #[serde(default, alias = "partner_id")]
    pub resource_owner_id: Option<String>,
    #[serde(default)]
    pub include_raw_data: bool,
}

impl QueryRequest {
    pub fn new(
        query: impl Into<String>,
        user_id: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            user_id: user_id.into(),
            role: role.into(),
            resource_owner_id: None,
            include_raw_data: false,
        }
    }

    pub fn with_resource_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.resource_owner_id = Some(owner_id.into());
        self
    }

    pub fn with_raw_data(mut self, include: bool) -> Self {
        self.include_raw_data = include;
        self
    }

    /// Reject malformed requests before they reach the pipeline.
    pub fn validate(&self) -> Result<ValidatedQuery, BoundaryError> {
        let query = self.query.trim();
        let chars = query.chars().count();
        if !(MIN_QUERY_CHARS..=MAX_QUERY_CHARS).contains(&chars) {
            return Err(BoundaryError::QueryLength {
                min: MIN_QUERY_CHARS,
                max: MAX_QUERY_CHARS,
                actual: chars,
            });
        }

        let user_id = self.user_id.trim();
        if user_id.is_empty() {
            return Err(BoundaryError::MissingField {
                field: "user_id".to_string(),
            });
        }

        let role: Role = self.role.parse()?;

        let resource_owner_id = self
            .resource_owner_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(ValidatedQuery {
            query: query.to_string(),
            user_id: user_id.to_string(),
            role,
            resource_owner_id,
            include_raw_data: self.include_raw_data,
        })
    }
}

/// A request that passed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub query: String,
    pub user_id: String,
    pub role: Role,
    pub resource_owner_id: Option<String>,
    pub include_raw_data: bool,
}

/// Per-request context threaded through the pipeline stages.
#[derive(Debug, Clone)]
pub struct RequestScope {
    pub request_id: Uuid,
    pub user_id: String,
    pub role: Role,
    pub resource_owner_id: Option<String>,
    pub include_raw_data: bool,
    pub cancel: CancellationToken,
}

impl RequestScope {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            user_id: user_id.into(),
            role,
            resource_owner_id: None,
            include_raw_data: false,
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_validated(query: &ValidatedQuery, cancel: CancellationToken) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            user_id: query.user_id.clone(),
            role: query.role,
            resource_owner_id: query.resource_owner_id.clone(),
            include_raw_data: query.include_raw_data,
            cancel,
        }
    }

    pub fn with_resource_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.resource_owner_id = Some(owner_id.into());
        self
    }

    pub fn with_raw_data(mut self, include: bool) -> Self {
        self.include_raw_data = include;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The owner whose data a structured query reads: the explicit resource
    /// owner when given, otherwise the caller.
    pub fn effective_owner(&self) -> &str {
        self.resource_owner_id.as_deref().unwrap_or(&self.user_id)
    }
}
