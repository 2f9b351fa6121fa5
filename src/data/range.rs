//! Inclusive time ranges for historical queries.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Span presets the History view steps through when zooming.
pub const SPAN_PRESETS: [Duration; 5] = [
    Duration::from_secs(60 * 60),
    Duration::from_secs(6 * 60 * 60),
    Duration::from_secs(24 * 60 * 60),
    Duration::from_secs(7 * 24 * 60 * 60),
    Duration::from_secs(30 * 24 * 60 * 60),
];

/// Default history span: one week.
pub const DEFAULT_SPAN: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// A `[start, end]` interval of epoch milliseconds, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeRange {
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// The `span` leading up to and including `now_ms`.
    pub fn last(span: Duration, now_ms: i64) -> Self {
        Self::new(now_ms.saturating_sub(span_ms(span)), now_ms)
    }

    /// The `span` leading up to now.
    pub fn last_from_now(span: Duration) -> Self {
        Self::last(span, now_ms())
    }

    /// Check whether a timestamp falls inside the range.
    pub fn contains(&self, timestamp_ms: i64) -> bool {
        self.start_ms <= timestamp_ms && timestamp_ms <= self.end_ms
    }

    /// Length of the range, zero for inverted ranges.
    pub fn span(&self) -> Duration {
        Duration::from_millis(self.end_ms.saturating_sub(self.start_ms).max(0) as u64)
    }

    /// Move both ends by `delta_ms` (negative moves back in time).
    pub fn shifted(&self, delta_ms: i64) -> Self {
        Self::new(self.start_ms.saturating_add(delta_ms), self.end_ms.saturating_add(delta_ms))
    }

    /// Same end, different length.
    pub fn with_span(&self, span: Duration) -> Self {
        Self::last(span, self.end_ms)
    }

    /// Format both ends as UTC date-times for display.
    pub fn label(&self) -> String {
        format!("{} → {}", format_instant(self.start_ms), format_instant(self.end_ms))
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn span_ms(span: Duration) -> i64 {
    i64::try_from(span.as_millis()).unwrap_or(i64::MAX)
}

/// Which end of a range a bare date is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Parse an instant given as RFC 3339 or as a bare `YYYY-MM-DD` date.
///
/// A bare date resolves to UTC midnight for [`Bound::Start`] and to the
/// last millisecond of that day for [`Bound::End`], so `--from 2024-05-01
/// --to 2024-05-01` covers the whole day.
pub fn parse_instant(s: &str, bound: Bound) -> Result<i64> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_millis());
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Unknown date format: {}", s))?;
    let time = match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End => {
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).context("Invalid end-of-day time")?
        }
    };
    Ok(date.and_time(time).and_utc().timestamp_millis())
}

/// Format epoch milliseconds as `YYYY-MM-DD HH:MM` UTC.
pub fn format_instant(timestamp_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => timestamp_ms.to_string(),
    }
}
