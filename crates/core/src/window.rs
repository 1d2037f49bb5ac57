//! Calendar windows and the resolver that derives them from period tokens.
//!
//! All stored instants are UTC. Calendar boundaries (midnight, first of the
//! month) are computed in the resolver's fixed offset and converted back to
//! UTC, so every caller that shares a resolver sees the same boundaries.

use core::fmt;
use core::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};
use crate::record::Dated;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Named reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// The reference instant's calendar day.
    Day,
    /// The reference instant's calendar month.
    Month,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Month => "month",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = MetricsError;

    /// Parse a period token.
    ///
    /// Unknown tokens are rejected; there is no fallback period.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "today" => Ok(Period::Day),
            "month" | "this month" | "this_month" | "this-month" => Ok(Period::Month),
            _ => Err(MetricsError::invalid_period(s)),
        }
    }
}

/// Inclusive instant range: `start <= t <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct Window {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct WindowBounds {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<WindowBounds> for Window {
    type Error = MetricsError;

    fn try_from(bounds: WindowBounds) -> Result<Self, Self::Error> {
        Window::new(bounds.start, bounds.end)
    }
}

impl Window {
    /// Build a window, rejecting `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> MetricsResult<Self> {
        if start > end {
            return Err(MetricsError::validation(format!(
                "window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Both bounds inclusive.
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// Records whose `occurred_at` falls inside the window, in input order.
    pub fn select<'a, R: Dated>(self, records: &'a [R]) -> impl Iterator<Item = &'a R> + 'a {
        records.iter().filter(move |r| self.contains(r.occurred_at()))
    }
}

/// `window.start <= timestamp <= window.end`.
pub fn in_window(timestamp: DateTime<Utc>, window: &Window) -> bool {
    window.contains(timestamp)
}

/// Resolves periods into windows using a single fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowResolver {
    offset: FixedOffset,
}

impl Default for WindowResolver {
    fn default() -> Self {
        Self::utc()
    }
}

impl WindowResolver {
    /// Calendar days and months are UTC days and months.
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Build a resolver from an offset in minutes east of UTC.
    pub fn from_offset_minutes(minutes: i32) -> MetricsResult<Self> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                MetricsError::validation(format!("utc offset out of range: {minutes} minutes"))
            })?;
        Ok(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Window covering the calendar day or month that contains `reference`.
    ///
    /// The end bound is the last millisecond of the period (`23:59:59.999`).
    pub fn resolve(&self, period: Period, reference: DateTime<Utc>) -> Window {
        let local_date = reference.with_timezone(&self.offset).date_naive();

        let (first, last) = match period {
            Period::Day => (local_date, local_date),
            Period::Month => month_bounds(local_date),
        };

        let start = self.to_utc(first.and_time(NaiveTime::MIN));
        let end = self.to_utc(end_of_day(last));

        Window { start, end }
    }

    /// Parse `token` and resolve it against `reference`.
    pub fn resolve_token(&self, token: &str, reference: DateTime<Utc>) -> MetricsResult<Window> {
        let period: Period = token.parse()?;
        Ok(self.resolve(period, reference))
    }

    fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        self.offset
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&local))
    }
}

/// Resolve against UTC calendar days/months.
pub fn resolve_window(period: Period, reference: DateTime<Utc>) -> Window {
    WindowResolver::utc().resolve(period, reference)
}

fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::milliseconds(MILLIS_PER_DAY - 1))
        .unwrap_or(NaiveDateTime::MAX)
}
