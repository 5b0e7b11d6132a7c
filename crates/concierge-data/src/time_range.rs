//! Pure time-window resolution.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde_json::json;

use concierge_core::models::{ResolvedRange, TimeRange};

const FALLBACK_DAYS: i64 = 30;

/// Resolve a selector against `now`. The result is always `start <= end`.
///
/// `LastMonth` ends at the first instant of the current month, which the
/// half-open store filter treats as exclusive.
pub fn resolve(range: TimeRange, now: DateTime<Utc>) -> ResolvedRange {
    match range {
        TimeRange::Last7Days => trailing(now, 7),
        TimeRange::Last30Days => trailing(now, 30),
        TimeRange::Last90Days => trailing(now, 90),
        TimeRange::ThisMonth => match month_start(now.year(), now.month()) {
            Some(start) => ResolvedRange { start, end: now },
            None => trailing(now, FALLBACK_DAYS),
        },
        TimeRange::LastMonth => {
            let (year, month) = previous_month(now.year(), now.month());
            match (month_start(year, month), month_start(now.year(), now.month())) {
                (Some(start), Some(end)) => ResolvedRange { start, end },
                _ => trailing(now, FALLBACK_DAYS),
            }
        }
        TimeRange::Custom { start, end } => {
            let end = end.unwrap_or(now);
            let start = start.unwrap_or(end - Duration::days(FALLBACK_DAYS));
            if start <= end {
                ResolvedRange { start, end }
            } else {
                trailing(now, FALLBACK_DAYS)
            }
        }
    }
}

/// Wire name of the selector, as echoed in result payloads.
pub fn range_type(range: TimeRange) -> &'static str {
    match range {
        TimeRange::Last7Days => "last_7_days",
        TimeRange::Last30Days => "last_30_days",
        TimeRange::Last90Days => "last_90_days",
        TimeRange::ThisMonth => "this_month",
        TimeRange::LastMonth => "last_month",
        TimeRange::Custom { .. } => "custom",
    }
}

/// `{start, end, range_type}` block attached to time-windowed results.
pub fn describe(range: TimeRange, resolved: &ResolvedRange) -> serde_json::Value {
    json!({
        "start": resolved.start.to_rfc3339(),
        "end": resolved.end.to_rfc3339(),
        "range_type": range_type(range),
    })
}

fn trailing(now: DateTime<Utc>, days: i64) -> ResolvedRange {
    ResolvedRange {
        start: now - Duration::days(days),
        end: now,
    }
}

fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    Some(NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?.and_utc())
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn trailing_windows_end_now() {
        let now = at(2025, 3, 15, 12);
        let r = resolve(TimeRange::Last7Days, now);
        assert_eq!(r.end, now);
        assert_eq!(r.start, at(2025, 3, 8, 12));
        assert_eq!(resolve(TimeRange::Last90Days, now).start, now - Duration::days(90));
    }

    #[test]
    fn this_month_starts_at_midnight_on_the_first() {
        let r = resolve(TimeRange::ThisMonth, at(2025, 3, 15, 12));
        assert_eq!(r.start, at(2025, 3, 1, 0));
    }

    #[test]
    fn last_month_wraps_the_year() {
        let r = resolve(TimeRange::LastMonth, at(2025, 1, 10, 8));
        assert_eq!(r.start, at(2024, 12, 1, 0));
        assert_eq!(r.end, at(2025, 1, 1, 0));
    }

    #[test]
    fn custom_without_bounds_is_thirty_days() {
        let now = at(2025, 6, 30, 0);
        let r = resolve(TimeRange::Custom { start: None, end: None }, now);
        assert_eq!(r, resolve(TimeRange::Last30Days, now));
    }

    #[test]
    fn inverted_custom_range_falls_back() {
        let now = at(2025, 6, 30, 0);
        let r = resolve(
            TimeRange::Custom {
                start: Some(at(2025, 6, 20, 0)),
                end: Some(at(2025, 6, 10, 0)),
            },
            now,
        );
        assert_eq!(r, resolve(TimeRange::Last30Days, now));
    }

    #[test]
    fn description_carries_range_type() {
        let now = at(2025, 6, 30, 0);
        let d = describe(TimeRange::ThisMonth, &resolve(TimeRange::ThisMonth, now));
        assert_eq!(d["range_type"], "this_month");
        assert!(d["start"].as_str().unwrap().starts_with("2025-06-01T00:00:00"));
    }

    fn selector() -> impl Strategy<Value = TimeRange> {
        prop_oneof![
            Just(TimeRange::Last7Days),
            Just(TimeRange::Last30Days),
            Just(TimeRange::Last90Days),
            Just(TimeRange::ThisMonth),
            Just(TimeRange::LastMonth),
        ]
    }

    proptest! {
        #[test]
        fn resolved_ranges_are_ordered_and_never_in_the_future(
            range in selector(),
            secs in 0i64..4_000_000_000,
        ) {
            let now = Utc.timestamp_opt(secs, 0).unwrap();
            let r = resolve(range, now);
            prop_assert!(r.start <= r.end);
            prop_assert!(r.end <= now);
        }

        #[test]
        fn custom_ranges_are_ordered(a in 0i64..4_000_000_000, b in 0i64..4_000_000_000) {
            let now = Utc.timestamp_opt(4_000_000_000, 0).unwrap();
            let r = resolve(
                TimeRange::Custom {
                    start: Utc.timestamp_opt(a, 0).single(),
                    end: Utc.timestamp_opt(b, 0).single(),
                },
                now,
            );
            prop_assert!(r.start <= r.end);
        }
    }
}
