//! Report time window.
//!
//! This module provides [`ReportWindow`] for the trailing date range covered
//! by a summary run, plus the timestamp formatting shared by the renderer.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of trailing days covered by a default report run.
pub const DEFAULT_WINDOW_DAYS: i64 = 14;

/// The timestamp layout used in rendered summaries.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A closed time range `[since, until]` for querying meetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    /// Lower bound of the range, inclusive.
    pub since: DateTime<Utc>,
    /// Upper bound of the range, inclusive.
    pub until: DateTime<Utc>,
}

impl ReportWindow {
    /// Creates a window ending at `now` and starting `days` days earlier.
    pub fn trailing(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            since: now - Duration::days(days),
            until: now,
        }
    }

    /// Creates the default two-week trailing window ending at `now`.
    pub fn last_two_weeks(now: DateTime<Utc>) -> Self {
        Self::trailing(now, DEFAULT_WINDOW_DAYS)
    }

    /// The calendar date of the lower bound, as sent in query parameters.
    pub fn from_date(&self) -> NaiveDate {
        self.since.date_naive()
    }

    /// The calendar date of the upper bound, as sent in query parameters.
    pub fn to_date(&self) -> NaiveDate {
        self.until.date_naive()
    }

    /// Returns true if `at` falls inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.since <= at && at <= self.until
    }
}

impl std::fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.from_date(), self.to_date())
    }
}

/// Formats a UTC timestamp for rendered output.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
