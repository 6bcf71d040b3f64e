//! Elapsed-time calculations used by the pricing engines
//!
//! Rental tiers are selected on elapsed days and driver logs are billed on
//! elapsed hours or days. Both are measured from millisecond differences
//! between two instants, so a span of 36 hours is exactly `1.5` days.
//!
//! Calendar-day windows (used to list a driver's logs for one day) are
//! resolved in a configurable timezone.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Milliseconds in one hour
pub const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Milliseconds in one day
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: end {end} precedes start {start}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Local time {0} does not exist or is ambiguous in the configured timezone")]
    UnresolvableLocalTime(String),
}

/// The unit an elapsed duration is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Hours,
    Days,
}

impl TimeUnit {
    /// Number of milliseconds in one unit
    pub fn millis(&self) -> i64 {
        match self {
            TimeUnit::Hours => MILLIS_PER_HOUR,
            TimeUnit::Days => MILLIS_PER_DAY,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Hours => write!(f, "hours"),
            TimeUnit::Days => write!(f, "days"),
        }
    }
}

/// Computes fractional elapsed time between two instants
///
/// The result is signed: when `end` precedes `start` the duration is
/// negative and it is up to the caller to reject or floor it.
pub struct DurationCalculator;

impl DurationCalculator {
    /// Elapsed milliseconds from `start` to `end`
    pub fn elapsed_millis(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        (end - start).num_milliseconds()
    }

    /// Elapsed time expressed in `unit`
    pub fn elapsed_in(start: DateTime<Utc>, end: DateTime<Utc>, unit: TimeUnit) -> Decimal {
        Decimal::from(Self::elapsed_millis(start, end)) / Decimal::from(unit.millis())
    }

    /// Elapsed days, `(end - start) / 86_400_000 ms`
    pub fn elapsed_days(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
        Self::elapsed_in(start, end, TimeUnit::Days)
    }

    /// Elapsed hours, `(end - start) / 3_600_000 ms`
    pub fn elapsed_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
        Self::elapsed_in(start, end, TimeUnit::Hours)
    }
}

/// A span between two recorded instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ElapsedSpan {
    /// Creates a span without checking ordering
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Creates a span, rejecting an end that precedes the start
    pub fn ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TemporalError> {
        if end < start {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// Builds a span only when both instants are known
    pub fn from_optional(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Some(Self { start, end }),
            _ => None,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.end < self.start
    }

    pub fn elapsed_in(&self, unit: TimeUnit) -> Decimal {
        DurationCalculator::elapsed_in(self.start, self.end, unit)
    }

    pub fn days(&self) -> Decimal {
        self.elapsed_in(TimeUnit::Days)
    }

    pub fn hours(&self) -> Decimal {
        self.elapsed_in(TimeUnit::Hours)
    }

    /// Elapsed time in `unit`, with negative spans floored at zero
    pub fn non_negative_in(&self, unit: TimeUnit) -> Decimal {
        self.elapsed_in(unit).max(Decimal::ZERO)
    }
}

/// Timezone wrapper used to resolve calendar days
///
/// Wraps chrono_tz::Tz with string serialization (`"America/Chicago"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Parses an IANA timezone name
    pub fn parse(name: &str) -> Option<Self> {
        Tz::from_str(name).ok().map(Timezone)
    }

    /// Returns the first and last instant of `date` in this timezone, as UTC
    ///
    /// The window is inclusive on both ends: `00:00:00.000` to `23:59:59.999`.
    pub fn day_bounds(&self, date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), TemporalError> {
        let start = date
            .and_hms_milli_opt(0, 0, 0, 0)
            .and_then(|naive| naive.and_local_timezone(self.0).earliest())
            .ok_or_else(|| TemporalError::UnresolvableLocalTime(format!("{} 00:00:00", date)))?;
        let end = date
            .and_hms_milli_opt(23, 59, 59, 999)
            .and_then(|naive| naive.and_local_timezone(self.0).latest())
            .ok_or_else(|| TemporalError::UnresolvableLocalTime(format!("{} 23:59:59.999", date)))?;

        Ok((start.with_timezone(&Utc), end.with_timezone(&Utc)))
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}
