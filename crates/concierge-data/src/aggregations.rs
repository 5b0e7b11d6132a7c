//! Aggregation logic over the structured store.
//!
//! Every function here is blocking and deterministic for a given store and
//! `now`. Monetary values are rounded to cents, rates to three decimals.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

use concierge_core::constants::REVENUE_CURRENCY;
use concierge_core::errors::ConciergeResult;
use concierge_core::models::{
    Collection, DataResult, Page, Record, RecordFilter, SortOrder, TimeRange,
};
use concierge_core::traits::IStructuredStore;

use crate::operation::DataOperation;
use crate::time_range;

pub const EVENT_VIEW: &str = "view";
pub const EVENT_CLICK: &str = "click";
pub const EVENT_BOOKING: &str = "booking";
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_OPEN: &str = "open";
pub const KIND_PROVIDER: &str = "provider";

/// Popularity for recommendations is measured over this many days of views.
const POPULARITY_WINDOW_DAYS: i64 = 30;

/// Runs [`DataOperation`]s against a store.
#[derive(Clone)]
pub struct Aggregator {
    store: Arc<dyn IStructuredStore>,
    /// Row cap for list-shaped results.
    limit: usize,
    /// Size of ranked breakdowns.
    top_n: usize,
}

impl Aggregator {
    pub fn new(store: Arc<dyn IStructuredStore>, limit: usize, top_n: usize) -> Self {
        Self {
            store,
            limit: limit.max(1),
            top_n: top_n.max(1),
        }
    }

    pub fn run(&self, op: &DataOperation, now: DateTime<Utc>) -> ConciergeResult<DataResult> {
        match op {
            DataOperation::Recommendations { user_id } => self.recommendations(user_id, now),
            DataOperation::SavedItems { owner_id } => self.saved_items(owner_id),
            DataOperation::ProviderAnalytics { owner_id, range } => {
                self.provider_analytics(owner_id, *range, now)
            }
            DataOperation::SystemAnalytics { range } => self.system_analytics(*range, now),
            DataOperation::ProviderRevenue { owner_id, range } => {
                self.revenue(Some(owner_id), *range, now)
            }
            DataOperation::SystemRevenue { range } => self.revenue(None, *range, now),
            DataOperation::ModerationQueue => self.moderation_queue(),
        }
    }

    /// Active listings the user has not saved, ranked by preference-tag
    /// overlap, then recent views, then id.
    fn recommendations(&self, user_id: &str, now: DateTime<Utc>) -> ConciergeResult<DataResult> {
        let preferences: Vec<String> = self
            .store
            .get(Collection::Users, user_id)?
            .map(|user| body_strings(&user, "preferences"))
            .unwrap_or_default();

        let saved: HashSet<String> = self
            .store
            .query(
                Collection::SavedItems,
                &RecordFilter::new().owner(user_id),
                Page::first(self.limit),
            )?
            .into_iter()
            .filter_map(|r| r.parent_id)
            .collect();

        let listings = self.store.query(
            Collection::Listings,
            &RecordFilter::new().status(STATUS_ACTIVE),
            Page::first(self.limit),
        )?;

        let views: HashMap<String, u64> = self
            .store
            .count_by_parent(
                Collection::AnalyticsEvents,
                &RecordFilter::new()
                    .kind(EVENT_VIEW)
                    .between(now - Duration::days(POPULARITY_WINDOW_DAYS), now),
                self.limit,
            )?
            .into_iter()
            .collect();

        let mut ranked: Vec<(usize, u64, Record)> = listings
            .into_iter()
            .filter(|l| !saved.contains(&l.id))
            .map(|l| {
                let overlap = body_strings(&l, "tags")
                    .iter()
                    .filter(|t| preferences.contains(t))
                    .count();
                let popularity = views.get(&l.id).copied().unwrap_or(0);
                (overlap, popularity, l)
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then(b.1.cmp(&a.1))
                .then_with(|| a.2.id.cmp(&b.2.id))
        });
        ranked.truncate(self.top_n);

        let items: Vec<Value> = ranked
            .iter()
            .map(|(overlap, popularity, l)| {
                json!({
                    "id": l.id,
                    "name": l.body.get("name"),
                    "location": l.body.get("location"),
                    "tags": body_strings(l, "tags"),
                    "price": l.body.get("price"),
                    "match_score": overlap,
                    "recent_views": popularity,
                })
            })
            .collect();
        let count = items.len();
        Ok(DataResult::ok(
            json!({ "recommendations": items, "user_preferences": preferences }),
            count,
            format!("Found {count} recommendations"),
        ))
    }

    /// The owner's saved items, newest first, joined with listing names.
    fn saved_items(&self, owner_id: &str) -> ConciergeResult<DataResult> {
        let saved = self.store.query(
            Collection::SavedItems,
            &RecordFilter::new().owner(owner_id),
            Page::first(self.limit),
        )?;

        let mut items = Vec::with_capacity(saved.len());
        for item in &saved {
            let listing_name = match item.parent_id.as_deref() {
                Some(listing_id) => self
                    .store
                    .get(Collection::Listings, listing_id)?
                    .and_then(|l| l.body.get("name").cloned()),
                None => None,
            };
            items.push(json!({
                "id": item.id,
                "listing_id": item.parent_id,
                "listing_name": listing_name,
                "saved_at": item.created_at.to_rfc3339(),
            }));
        }

        let count = items.len();
        Ok(DataResult::ok(
            json!({ "saved_items": items }),
            count,
            format!("Found {count} saved items"),
        ))
    }

    fn provider_analytics(
        &self,
        owner_id: &str,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> ConciergeResult<DataResult> {
        let resolved = time_range::resolve(range, now);
        let base = RecordFilter::new()
            .owner(owner_id)
            .between(resolved.start, resolved.end);
        let counts = self.event_counts(&base)?;

        let top_listings: Vec<Value> = self
            .store
            .count_by_parent(
                Collection::AnalyticsEvents,
                &base.clone().kind(EVENT_VIEW),
                self.top_n,
            )?
            .into_iter()
            .map(|(listing_id, views)| json!({ "listing_id": listing_id, "views": views }))
            .collect();

        let total_events = self.store.count(Collection::AnalyticsEvents, &base)? as usize;
        Ok(DataResult::ok(
            json!({
                "views": counts.views,
                "clicks": counts.clicks,
                "bookings": counts.bookings,
                "conversion_rate": counts.conversion_rate(),
                "top_listings": top_listings,
                "time_range": time_range::describe(range, &resolved),
            }),
            total_events,
            "Analytics retrieved successfully",
        ))
    }

    fn system_analytics(&self, range: TimeRange, now: DateTime<Utc>) -> ConciergeResult<DataResult> {
        let resolved = time_range::resolve(range, now);
        let window = RecordFilter::new().between(resolved.start, resolved.end);
        let counts = self.event_counts(&window)?;

        let all = RecordFilter::new();
        let total_users = self.store.count(Collection::Users, &all)?;
        let total_providers = self
            .store
            .count(Collection::Users, &RecordFilter::new().kind(KIND_PROVIDER))?;
        let total_listings = self.store.count(Collection::Listings, &all)?;
        let total_bookings = self.store.count(Collection::Bookings, &window)?;
        let total_revenue = self.store.sum_amount(
            Collection::Bookings,
            &window.clone().status(STATUS_COMPLETED),
        )?;
        let total_events = self.store.count(Collection::AnalyticsEvents, &window)? as usize;

        Ok(DataResult::ok(
            json!({
                "total_users": total_users,
                "total_providers": total_providers,
                "total_listings": total_listings,
                "total_bookings": total_bookings,
                "total_revenue": cents(total_revenue),
                "views": counts.views,
                "clicks": counts.clicks,
                "booking_events": counts.bookings,
                "conversion_rate": counts.conversion_rate(),
                "currency": REVENUE_CURRENCY,
                "time_range": time_range::describe(range, &resolved),
            }),
            total_events,
            "System analytics retrieved successfully",
        ))
    }

    /// Completed bookings in range, scoped to `owner_id` when given.
    fn revenue(
        &self,
        owner_id: Option<&str>,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> ConciergeResult<DataResult> {
        let resolved = time_range::resolve(range, now);
        let mut filter = RecordFilter::new()
            .status(STATUS_COMPLETED)
            .between(resolved.start, resolved.end);
        if let Some(owner) = owner_id {
            filter = filter.owner(owner);
        }

        let total = self.store.sum_amount(Collection::Bookings, &filter)?;
        let bookings = self.store.count(Collection::Bookings, &filter)?;
        let average = if bookings > 0 {
            total / bookings as f64
        } else {
            0.0
        };

        let top: Vec<Value> = self
            .store
            .query(
                Collection::Bookings,
                &filter,
                Page::first(self.top_n).ordered(SortOrder::AmountDesc),
            )?
            .into_iter()
            .map(|b| {
                json!({
                    "id": b.id,
                    "listing_id": b.parent_id,
                    "amount": b.amount.map(cents),
                    "created_at": b.created_at.to_rfc3339(),
                })
            })
            .collect();

        Ok(DataResult::ok(
            json!({
                "scope": if owner_id.is_some() { "provider" } else { "system" },
                "total_revenue": cents(total),
                "total_bookings": bookings,
                "average_booking_value": cents(average),
                "bookings": top,
                "currency": REVENUE_CURRENCY,
                "time_range": time_range::describe(range, &resolved),
            }),
            bookings as usize,
            format!("Revenue calculated for {bookings} bookings"),
        ))
    }

    /// Pending provider applications plus open content reports.
    fn moderation_queue(&self) -> ConciergeResult<DataResult> {
        let applications: Vec<Value> = self
            .store
            .query(
                Collection::PartnerApplications,
                &RecordFilter::new().status(STATUS_PENDING),
                Page::first(self.limit),
            )?
            .into_iter()
            .map(|a| {
                json!({
                    "id": a.id,
                    "business_name": a.body.get("business_name"),
                    "submitted_at": a.created_at.to_rfc3339(),
                })
            })
            .collect();

        let reports: Vec<Value> = self
            .store
            .query(
                Collection::ContentReports,
                &RecordFilter::new().status(STATUS_OPEN),
                Page::first(self.limit),
            )?
            .into_iter()
            .map(|r| {
                json!({
                    "id": r.id,
                    "listing_id": r.parent_id,
                    "reason": r.body.get("reason"),
                    "reported_at": r.created_at.to_rfc3339(),
                })
            })
            .collect();

        let total = applications.len() + reports.len();
        Ok(DataResult::ok(
            json!({
                "pending_partners": applications,
                "flagged_listings": reports,
                "total_pending": total,
            }),
            total,
            "Moderation queue retrieved successfully",
        ))
    }

    fn event_counts(&self, base: &RecordFilter) -> ConciergeResult<EventCounts> {
        let count = |kind: &str| {
            self.store
                .count(Collection::AnalyticsEvents, &base.clone().kind(kind))
        };
        Ok(EventCounts {
            views: count(EVENT_VIEW)?,
            clicks: count(EVENT_CLICK)?,
            bookings: count(EVENT_BOOKING)?,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct EventCounts {
    views: u64,
    clicks: u64,
    bookings: u64,
}

impl EventCounts {
    /// Bookings per view, zero without views.
    fn conversion_rate(&self) -> f64 {
        if self.views == 0 {
            return 0.0;
        }
        ((self.bookings as f64 / self.views as f64) * 1000.0).round() / 1000.0
    }
}

fn cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// String array stored under `key` in the record body. Non-strings skipped.
fn body_strings(record: &Record, key: &str) -> Vec<String> {
    record
        .body
        .get(key)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
