use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record families held by the structured store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Users,
    Listings,
    SavedItems,
    AnalyticsEvents,
    Bookings,
    PartnerApplications,
    ContentReports,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Self::Users,
        Self::Listings,
        Self::SavedItems,
        Self::AnalyticsEvents,
        Self::Bookings,
        Self::PartnerApplications,
        Self::ContentReports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Listings => "listings",
            Self::SavedItems => "saved_items",
            Self::AnalyticsEvents => "analytics_events",
            Self::Bookings => "bookings",
            Self::PartnerApplications => "partner_applications",
            Self::ContentReports => "content_reports",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored record.
///
/// The indexed columns (`owner_id`, `parent_id`, `status`, `kind`, `amount`,
/// `created_at`) are what filters and aggregations run on; `body` carries the
/// rest of the document untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub collection: Collection,
    /// Scope key: the user or provider that owns the record.
    pub owner_id: Option<String>,
    /// Related record, e.g. the listing an event or booking refers to.
    pub parent_id: Option<String>,
    pub status: Option<String>,
    pub kind: Option<String>,
    pub amount: Option<f64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub body: serde_json::Value,
}

impl Record {
    pub fn new(collection: Collection, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            collection,
            owner_id: None,
            parent_id: None,
            status: None,
            kind: None,
            amount: None,
            created_at: Utc::now(),
            body: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    pub fn owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = body;
        self
    }
}

/// Equality filters plus an optional half-open creation window `[from, to)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub owner_id: Option<String>,
    pub parent_id: Option<String>,
    pub status: Option<String>,
    pub kind: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self.created_to = Some(to);
        self
    }

    /// In-memory evaluation, used by stores without a query planner.
    pub fn matches(&self, record: &Record) -> bool {
        fn eq(want: &Option<String>, have: &Option<String>) -> bool {
            match want {
                Some(w) => have.as_deref() == Some(w.as_str()),
                None => true,
            }
        }
        eq(&self.owner_id, &record.owner_id)
            && eq(&self.parent_id, &record.parent_id)
            && eq(&self.status, &record.status)
            && eq(&self.kind, &record.kind)
            && self.created_from.map_or(true, |f| record.created_at >= f)
            && self.created_to.map_or(true, |t| record.created_at < t)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    AmountDesc,
}

/// Pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
    pub order: SortOrder,
}

impl Page {
    pub fn first(limit: usize) -> Self {
        Self {
            limit,
            offset: 0,
            order: SortOrder::NewestFirst,
        }
    }

    pub fn ordered(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}
