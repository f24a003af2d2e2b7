//! Dashboard date-range resolution.
//!
//! A dashboard query carries either a named period ("today", "week",
//! "month") or explicit date/time bounds. Both resolve to an optional
//! UTC half-open window `[start, end)`. Day boundaries are always
//! computed as UTC midnight; weeks start on Sunday.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use crate::errors::{AppError, AppResult};

/// Raw dashboard filter input as received from the API layer
#[derive(Debug, Clone, Default)]
pub struct DashboardQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub search_text: Option<String>,
    pub period_type: Option<String>,
}

/// Resolved half-open UTC window. Either bound may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Which side of the window a bound belongs to. A bare end date is
/// inclusive of its whole day, so its bound rolls to the next midnight.
#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

/// Resolve a dashboard query into a date window relative to `now`.
///
/// A present, non-blank period type wins over explicit bounds; unknown
/// period names resolve to an unbounded window. Fails with
/// `InvalidDateRange` when both bounds resolve and end < start.
pub fn resolve_range(query: &DashboardQuery, now: DateTime<Utc>) -> AppResult<DateWindow> {
    let (start, end) = match query.period_type.as_deref().map(str::trim) {
        Some(period) if !period.is_empty() => resolve_period(period, now),
        _ => (
            combine(query.start_date, query.start_time.as_deref(), Bound::Start),
            combine(query.end_date, query.end_time.as_deref(), Bound::End),
        ),
    };

    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(AppError::invalid_date_range(
                "End date cannot be earlier than start date",
            ));
        }
    }

    Ok(DateWindow { start, end })
}

/// Resolve a named period into a half-open window
fn resolve_period(period: &str, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let today = day_start(now);

    match period.to_lowercase().as_str() {
        "today" => (Some(today), Some(today + Duration::days(1))),
        "week" => {
            let start = week_start(now);
            (Some(start), Some(start + Duration::days(7)))
        }
        "month" => (Some(month_start(now)), Some(next_month_start(now))),
        _ => (None, None),
    }
}

/// Combine a date with an optional wall-clock time into a window bound.
///
/// The date's day is taken at UTC midnight; a parseable time is added
/// on top. Without a time, a start bound is that midnight and an end
/// bound is the following midnight (the whole day included, half-open).
fn combine(
    date: Option<DateTime<Utc>>,
    time: Option<&str>,
    bound: Bound,
) -> Option<DateTime<Utc>> {
    let date = date?;
    let midnight = day_start(date);

    let time = time
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .and_then(parse_time);

    match time {
        Some(t) => Some(midnight.date_naive().and_time(t).and_utc()),
        None => match bound {
            Bound::Start => Some(midnight),
            Bound::End => Some(midnight + Duration::days(1)),
        },
    }
}

/// Parse "HH:MM" or "HH:MM:SS"; anything else is ignored
fn parse_time(value: &str) -> Option<NaiveTime> {
    value.parse().ok()
}

/// UTC midnight of the given instant's day
fn day_start(t: DateTime<Utc>) -> DateTime<Utc> {
    t.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// UTC midnight of the most recent Sunday (weeks start Sunday)
fn week_start(t: DateTime<Utc>) -> DateTime<Utc> {
    let days_back = t.weekday().num_days_from_sunday() as i64;
    day_start(t) - Duration::days(days_back)
}

/// UTC midnight of the first day of the instant's month
fn month_start(t: DateTime<Utc>) -> DateTime<Utc> {
    let first = t.date_naive().with_day(1).unwrap_or_else(|| t.date_naive());
    first.and_time(NaiveTime::MIN).and_utc()
}

/// UTC midnight of the first day of the following month
fn next_month_start(t: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if t.month() == 12 {
        (t.year() + 1, 1)
    } else {
        (t.year(), t.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .unwrap_or_else(|| month_start(t))
}
