// ── Request analytics ──
//
// Aggregates over hourly buckets. Derived on every request, never stored.

use chrono::{DateTime, Duration, Utc};

/// One hourly aggregation interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HourlyBucket {
    pub requests: u64,
    pub threats: u64,
    pub cached_requests: u64,
}

/// Buckets reported for one zone, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneTraffic {
    pub buckets: Vec<HourlyBucket>,
}

/// A trailing time window ending at `until`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsWindow {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub hours: u32,
}

impl AnalyticsWindow {
    /// The `hours` hours leading up to `now`, truncated to whole seconds.
    pub fn trailing(hours: u32, now: DateTime<Utc>) -> Self {
        let until = now - Duration::nanoseconds(i64::from(now.timestamp_subsec_nanos()));
        Self {
            since: until - Duration::hours(i64::from(hours)),
            until,
            hours,
        }
    }
}

/// Totals over an analytics window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub total: u64,
    pub threats: u64,
    /// Requests answered from the edge cache.
    pub cached: u64,
    /// `total - cached`.
    pub served_by_origin: u64,
}

impl AnalyticsSummary {
    pub fn from_buckets(buckets: &[HourlyBucket]) -> Self {
        let (total, threats, cached) = buckets.iter().fold((0u64, 0u64, 0u64), |acc, b| {
            (
                acc.0.saturating_add(b.requests),
                acc.1.saturating_add(b.threats),
                acc.2.saturating_add(b.cached_requests),
            )
        });
        Self {
            total,
            threats,
            cached,
            served_by_origin: total.saturating_sub(cached),
        }
    }
}
